//! Best-effort parsing of truncated JSON text.
//!
//! A streaming model emits its JSON answer a few characters at a time. This
//! parser turns any prefix of a JSON document into the most complete value the
//! prefix supports: open strings are closed, open containers are closed, and
//! anything that cannot yet be decided (a dangling key, a number that may still
//! grow, half of `true`) is left out.

use serde_json::{Map, Value};

/// Parses a possibly-truncated JSON document.
///
/// Returns `None` when not even the start of a value is available.
pub fn parse_partial(text: &str) -> Option<Value> {
    let mut parser = PartialParser { text, pos: 0 };
    parser.parse_value().map(|(value, _)| value)
}

struct PartialParser<'a> {
    text: &'a str,
    pos: usize,
}

/// A parsed value and whether its closing delimiter was seen.
type Parsed = (Value, bool);

impl PartialParser<'_> {
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\n' | b'\r' | b'\t')) {
            self.pos += 1;
        }
    }

    fn parse_value(&mut self) -> Option<Parsed> {
        self.skip_ws();
        match self.peek()? {
            b'{' => Some(self.parse_object()),
            b'[' => Some(self.parse_array()),
            b'"' => self
                .parse_string()
                .map(|(s, closed)| (Value::String(s), closed)),
            b't' => self.parse_literal("true", Value::Bool(true)),
            b'f' => self.parse_literal("false", Value::Bool(false)),
            b'n' => self.parse_literal("null", Value::Null),
            b'-' | b'0'..=b'9' => self.parse_number(),
            _ => None,
        }
    }

    fn parse_object(&mut self) -> Parsed {
        self.pos += 1;
        let mut map = Map::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    return (Value::Object(map), true);
                }
                Some(b',') => {
                    self.pos += 1;
                    continue;
                }
                Some(b'"') => {}
                _ => return (Value::Object(map), false),
            }

            // Keys are only usable once fully known.
            let key = match self.parse_string() {
                Some((key, true)) => key,
                _ => return (Value::Object(map), false),
            };
            self.skip_ws();
            if self.peek() != Some(b':') {
                return (Value::Object(map), false);
            }
            self.pos += 1;

            match self.parse_value() {
                Some((value, true)) => {
                    map.insert(key, value);
                }
                Some((value, false)) => {
                    map.insert(key, value);
                    return (Value::Object(map), false);
                }
                None => return (Value::Object(map), false),
            }
        }
    }

    fn parse_array(&mut self) -> Parsed {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b']') => {
                    self.pos += 1;
                    return (Value::Array(items), true);
                }
                Some(b',') => {
                    self.pos += 1;
                    continue;
                }
                None => return (Value::Array(items), false),
                Some(_) => {}
            }

            match self.parse_value() {
                Some((value, true)) => items.push(value),
                Some((value, false)) => {
                    items.push(value);
                    return (Value::Array(items), false);
                }
                None => return (Value::Array(items), false),
            }
        }
    }

    /// Parses a string starting at the opening quote. An unterminated string
    /// yields its decoded prefix; a dangling escape sequence is dropped.
    fn parse_string(&mut self) -> Option<(String, bool)> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            let Some(c) = self.next_char() else {
                return Some((out, false));
            };
            match c {
                '"' => return Some((out, true)),
                '\\' => {
                    let Some(escaped) = self.next_char() else {
                        return Some((out, false));
                    };
                    match escaped {
                        '"' => out.push('"'),
                        '\\' => out.push('\\'),
                        '/' => out.push('/'),
                        'b' => out.push('\u{0008}'),
                        'f' => out.push('\u{000C}'),
                        'n' => out.push('\n'),
                        'r' => out.push('\r'),
                        't' => out.push('\t'),
                        'u' => match self.parse_unicode_escape() {
                            Some(decoded) => out.push(decoded),
                            None => return Some((out, false)),
                        },
                        other => out.push(other),
                    }
                }
                other => out.push(other),
            }
        }
    }

    /// Decodes the hex part of a `\u` escape, joining surrogate pairs. Returns
    /// `None` when the text ends before the escape is complete.
    fn parse_unicode_escape(&mut self) -> Option<char> {
        let high = self.read_hex4()?;
        if (0xD800..0xDC00).contains(&high) {
            let rest = self.rest();
            if rest.len() < 6 {
                if b"\\u".starts_with(&rest.as_bytes()[..rest.len().min(2)]) {
                    return None;
                }
                return Some(char::REPLACEMENT_CHARACTER);
            }
            if rest.starts_with("\\u") {
                self.pos += 2;
                let low = self.read_hex4()?;
                if (0xDC00..0xE000).contains(&low) {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return Some(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
            return Some(char::REPLACEMENT_CHARACTER);
        }
        Some(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn read_hex4(&mut self) -> Option<u32> {
        let digits = self.rest().get(..4)?;
        let code = u32::from_str_radix(digits, 16).ok()?;
        self.pos += 4;
        Some(code)
    }

    fn parse_literal(&mut self, literal: &str, value: Value) -> Option<Parsed> {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            return Some((value, true));
        }
        None
    }

    /// Numbers are only accepted once a delimiter follows them, since `12`
    /// at the end of the text may still become `123`.
    fn parse_number(&mut self) -> Option<Parsed> {
        let start = self.pos;
        let len = self
            .rest()
            .bytes()
            .take_while(|b| matches!(b, b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E'))
            .count();
        if start + len >= self.text.len() {
            return None;
        }
        let number: serde_json::Number = serde_json::from_str(&self.text[start..start + len]).ok()?;
        self.pos += len;
        Some((Value::Number(number), true))
    }
}
