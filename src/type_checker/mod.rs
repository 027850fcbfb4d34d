//! Type checking and semantic analysis module.
//!
//! This module holds the state a compilation is checked against:
//!
//! - The symbol table mapping variables to declarations and origins
//! - The function registry with overload resolution
//! - The built-in library the registry starts from
//! - The checker driving both while the tree is built
//!
//! The checker tracks the block being checked so it can tell which
//! variables may be assigned and where sampling, `_lp` and `_rng` calls
//! are allowed.

pub mod builtins;
pub mod signatures;
pub mod type_checker;
pub mod variable_map;

#[cfg(test)]
mod tests;
