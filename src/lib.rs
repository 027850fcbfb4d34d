#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod config;
pub mod errors;
pub mod macros;
pub mod type_checker;

extern crate regex;

/// A source location: line number (1-based) and the file it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }

    pub fn line(&self) -> u32 {
        self.0
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::null()
    }
}

/// Inclusive begin/end lines of a construct.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// A span covering a single line.
    pub fn line(position: Position) -> Self {
        Span {
            start: position.clone(),
            end: position,
        }
    }

    pub fn null() -> Self {
        Span::line(Position::null())
    }
}

/// Returns the text of a 1-based line, or `None` past the end of `source`.
pub fn get_line(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }
    source.lines().nth(line as usize - 1)
}


/// Renders an error against the source text it was reported for.
///
/// ```text
/// Error: message
/// -> model.stan
///   |
/// 5 | y ~ normal(0, 1);
///   | ^^^^^^^^^^^^^^^^^
/// ```
pub fn render_error(error: &Error, source: &str) -> String {
    let position = error.get_position();
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}\n", position.1));

    let Some(line_text) = get_line(source, position.0) else {
        return out;
    };

    let line_string = position.0.to_string();
    let padding = line_string.len() + 2;
    let trimmed = line_text.trim();

    out.push_str(&format!("{:>padding$}\n", "|"));
    out.push_str(&format!("{} | {}\n", line_string, trimmed));
    out.push_str(&format!("{:>padding$} {}\n", "|", "^".repeat(trimmed.len().max(1))));

    out
}
