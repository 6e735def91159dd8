//! LessonLoom Generator Library Crate
//!
//! Configuration and wiring for the `generate` command-line tool. The binary
//! is a thin wrapper around this library.

pub mod app;
pub mod config;
