//! Type system definitions for the AST.
//!
//! This module defines the static types used by the modeling language:
//!
//! - Base types (void, int, real, vector, row vector, matrix)
//! - Array rank wrapped around a base type
//! - The ill-formed sentinel produced by failed inference
//! - Primitive promotion and assignability rules
//!
//! Every expression node caches one `ExprType`. Once an ill-formed type
//! is produced it flows upwards through every enclosing expression.

use std::fmt::Display;

/// Represents the non-array core of a type.
///
/// Declaration order matters: the derived ordering is used to sort
/// signatures deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaseType {
    Void,
    Int,
    Double,
    Vector,
    RowVector,
    Matrix,
    IllFormed,
}

impl BaseType {
    /// Number of dimensions the base type contributes on its own.
    pub fn own_dims(&self) -> usize {
        match self {
            BaseType::Vector | BaseType::RowVector => 1,
            BaseType::Matrix => 2,
            _ => 0,
        }
    }
}

impl Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaseType::Void => write!(f, "void"),
            BaseType::Int => write!(f, "int"),
            BaseType::Double => write!(f, "real"),
            BaseType::Vector => write!(f, "vector"),
            BaseType::RowVector => write!(f, "row vector"),
            BaseType::Matrix => write!(f, "matrix"),
            BaseType::IllFormed => write!(f, "ill formed"),
        }
    }
}

/// Represents the type of an expression: a base type wrapped in
/// `num_dims` array dimensions.
///
/// Field order matters for the derived ordering (base first, then rank).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExprType {
    base_type: BaseType,
    num_dims: usize,
}

impl Default for ExprType {
    fn default() -> Self {
        ExprType::ill_formed()
    }
}

impl ExprType {
    pub fn new(base_type: BaseType) -> Self {
        ExprType {
            base_type,
            num_dims: 0,
        }
    }

    pub fn with_dims(base_type: BaseType, num_dims: usize) -> Self {
        ExprType { base_type, num_dims }
    }

    pub fn ill_formed() -> Self {
        ExprType::new(BaseType::IllFormed)
    }

    pub fn base_type(&self) -> BaseType {
        self.base_type
    }

    pub fn num_dims(&self) -> usize {
        self.num_dims
    }

    pub fn is_primitive(&self) -> bool {
        self.num_dims == 0 && matches!(self.base_type, BaseType::Int | BaseType::Double)
    }

    pub fn is_primitive_int(&self) -> bool {
        self.num_dims == 0 && self.base_type == BaseType::Int
    }

    pub fn is_primitive_double(&self) -> bool {
        self.num_dims == 0 && self.base_type == BaseType::Double
    }

    pub fn is_ill_formed(&self) -> bool {
        self.base_type == BaseType::IllFormed
    }

    pub fn is_void(&self) -> bool {
        self.base_type == BaseType::Void
    }

    /// Array dimensions plus the dimensions of the base type itself.
    pub fn total_dims(&self) -> usize {
        self.num_dims + self.base_type.own_dims()
    }

    /// The same base type wrapped in one more array dimension.
    pub fn array_of(&self) -> Self {
        ExprType::with_dims(self.base_type, self.num_dims + 1)
    }
}

impl From<BaseType> for ExprType {
    fn from(base_type: BaseType) -> Self {
        ExprType::new(base_type)
    }
}

impl Display for ExprType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.base_type)?;
        if self.num_dims > 0 {
            write!(f, "[{}]", ",".repeat(self.num_dims - 1))?;
        }
        Ok(())
    }
}

/// Returns the type unchanged if it is a primitive int or real, otherwise
/// the ill-formed type.
pub fn promote_primitive(et: ExprType) -> ExprType {
    if !et.is_primitive() {
        return ExprType::ill_formed();
    }
    et
}

/// Arithmetic promotion shared by every binary numeric operator.
///
/// real if either side is real, int if both are int, ill-formed if
/// either side is not primitive.
pub fn promote_primitive2(et1: ExprType, et2: ExprType) -> ExprType {
    if !et1.is_primitive() || !et2.is_primitive() {
        return ExprType::ill_formed();
    }
    if et1.is_primitive_double() {
        et1
    } else {
        et2
    }
}

/// Whether a value of type `rhs` may be stored in a location of type `lhs`.
///
/// Ranks must agree; int may widen to real at any rank.
pub fn is_assignable(lhs: ExprType, rhs: ExprType) -> bool {
    lhs.num_dims == rhs.num_dims
        && (lhs.base_type == rhs.base_type
            || (lhs.base_type == BaseType::Double && rhs.base_type == BaseType::Int))
}

/// Element type unification for array literals when promotion between
/// int and real elements is enabled.
pub fn promote_array_elements(et1: ExprType, et2: ExprType) -> ExprType {
    if et1 == et2 {
        return et1;
    }
    let numeric = |b: BaseType| matches!(b, BaseType::Int | BaseType::Double);
    if et1.num_dims == et2.num_dims && numeric(et1.base_type) && numeric(et2.base_type) {
        ExprType::with_dims(BaseType::Double, et1.num_dims)
    } else {
        ExprType::ill_formed()
    }
}
