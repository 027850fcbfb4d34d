use log::debug;

use crate::Position;

use super::errors::{Error, ErrorImpl};

/// Collects everything reported while checking one program.
///
/// Checking never aborts on a user error: the offending node is marked
/// ill-formed (or the declaration dropped) and the error lands here.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    errors: Vec<Error>,
    warnings: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn error(&mut self, error_impl: ErrorImpl, position: Position) {
        self.push(Error::new(error_impl, position));
    }

    pub fn warning(&mut self, error_impl: ErrorImpl, position: Position) {
        debug!("warning at line {}: {}", position.0, error_impl);
        self.warnings.push(Error::new(error_impl, position));
    }

    pub fn push(&mut self, error: Error) {
        debug!("error at line {}: {}", error.get_position().0, error.get_internal_error());
        self.errors.push(error);
    }

    /// Moves everything reported in `other` into this sink, skipping
    /// errors already recorded here at the same position.
    pub fn append(&mut self, other: Diagnostics) {
        for error in other.errors {
            if !self.errors.contains(&error) {
                self.push(error);
            }
        }
        self.warnings.extend(other.warnings);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Error] {
        &self.warnings
    }

    /// Error messages in report order, one per line.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    pub fn error_names(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.get_error_name()).collect()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }
}
