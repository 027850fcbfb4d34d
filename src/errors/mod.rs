//! Error types and error reporting for the semantic checker.
//!
//! This module defines the diagnostics produced while checking a program.
//! It includes:
//!
//! - Error structures with source position information
//! - One error variant per kind of semantic failure
//! - Helpful tips attached to each error
//! - A sink collecting errors and warnings for a compilation

pub mod diagnostics;
pub mod errors;
