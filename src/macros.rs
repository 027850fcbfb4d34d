//! Utility macros for the semantic core.
//!
//! This module defines helper macros used throughout the crate:
//!
//! - `MK_EXPR_TYPE!` - Creates an ExprType instance
//! - `MK_SIGNATURE!` - Creates a FunctionSignature instance
//!
//! These macros reduce boilerplate in the built-in signature tables.

/// Creates an ExprType instance.
///
/// # Arguments
///
/// * `$base` - The BaseType variant name
/// * `$dims` - Optional number of array dimensions (defaults to 0)
///
/// # Example
///
/// ```ignore
/// let real_array = MK_EXPR_TYPE!(Double, 1);
/// ```
#[macro_export]
macro_rules! MK_EXPR_TYPE {
    ($base:ident) => {
        $crate::ast::types::ExprType::new($crate::ast::types::BaseType::$base)
    };
    ($base:ident, $dims:expr) => {
        $crate::ast::types::ExprType::with_dims($crate::ast::types::BaseType::$base, $dims)
    };
}

/// Creates a FunctionSignature instance.
///
/// # Arguments
///
/// * `$result` - The result ExprType
/// * `$arg` - Zero or more argument ExprTypes
///
/// # Example
///
/// ```ignore
/// let sig = MK_SIGNATURE!(MK_EXPR_TYPE!(Double); MK_EXPR_TYPE!(Vector));
/// ```
#[macro_export]
macro_rules! MK_SIGNATURE {
    ($result:expr) => {
        $crate::type_checker::signatures::FunctionSignature::new($result, vec![])
    };
    ($result:expr; $($arg:expr),+ $(,)?) => {
        $crate::type_checker::signatures::FunctionSignature::new($result, vec![$($arg),+])
    };
}
