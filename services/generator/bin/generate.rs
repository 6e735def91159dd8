//! Main Entrypoint for the LessonLoom Generator
//!
//! Reads a generation request from a JSON file and streams the generated
//! activities to stdout, one JSON object per line. Logs go to stderr.

use anyhow::Context;
use clap::Parser;
use lessonloom_generator::{
    app::{build_generator, load_request, write_activities},
    config::Config,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "generate",
    version,
    about = "Generate lesson activities for a request and print them as JSON lines"
)]
struct Cli {
    /// Path to a JSON generation request.
    request_file: PathBuf,

    /// Ask for exactly this many activities, overriding the request file.
    #[arg(long)]
    num_activities: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    // --- 3. Build the Generator ---
    let request = load_request(&cli.request_file, cli.num_activities)?;
    let generator = build_generator(&config)?;
    info!(
        provider = ?config.provider,
        model = %config.chat_model,
        subject = %request.subject_label(),
        "Generator configured. Starting generation..."
    );

    // --- 4. Stream Activities ---
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let written = write_activities(generator.generate(request), &mut out).await?;

    info!(activities = written, "Generation complete.");
    Ok(())
}
