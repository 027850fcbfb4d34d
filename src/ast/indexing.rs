//! Index forms and the result types of indexing.
//!
//! Two indexing styles exist side by side:
//!
//! - the legacy multi-bracket form `e[i, j][k]`, where every index is a
//!   single int and only the total count matters (`infer_type_indexing`)
//! - the sliced form `e[i, :, lb:ub]`, where each position may keep or
//!   drop its dimension (`indexed_type`)

use std::fmt::Display;

use super::expressions::Expr;
use super::types::{BaseType, ExprType};

/// A single index position in a sliced indexing expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Idx {
    /// `e[i]`, selects one element and drops the dimension.
    Uni(Expr),
    /// `e[is]` with an int array, selects several elements.
    Multi(Expr),
    /// `e[:]`
    Omni,
    /// `e[lb:]`
    Lb(Expr),
    /// `e[:ub]`
    Ub(Expr),
    /// `e[lb:ub]`
    Lub(Expr, Expr),
}

impl Idx {
    /// False only for `Uni`: every other form keeps its dimension.
    pub fn is_multi_index(&self) -> bool {
        !matches!(self, Idx::Uni(_))
    }

    /// The expressions this index is built from.
    pub fn exprs(&self) -> Vec<&Expr> {
        match self {
            Idx::Uni(e) | Idx::Multi(e) | Idx::Lb(e) | Idx::Ub(e) => vec![e],
            Idx::Omni => vec![],
            Idx::Lub(lb, ub) => vec![lb, ub],
        }
    }
}

impl Display for Idx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Idx::Uni(e) | Idx::Multi(e) => write!(f, "{}", e),
            Idx::Omni => write!(f, ":"),
            Idx::Lb(e) => write!(f, "{}:", e),
            Idx::Ub(e) => write!(f, ":{}", e),
            Idx::Lub(lb, ub) => write!(f, "{}:{}", lb, ub),
        }
    }
}

/// Result type of applying `num_index_dims` single indexes to a value of
/// type `base_type` with `num_dims` array dimensions.
///
/// Array dimensions are consumed first, then the row/column of vectors
/// and matrices.
pub fn infer_type_indexing(base_type: BaseType, num_dims: usize, num_index_dims: usize) -> ExprType {
    if num_index_dims <= num_dims {
        return ExprType::with_dims(base_type, num_dims - num_index_dims);
    }
    if num_index_dims == num_dims + 1 {
        return match base_type {
            BaseType::Vector | BaseType::RowVector => ExprType::new(BaseType::Double),
            BaseType::Matrix => ExprType::new(BaseType::RowVector),
            _ => ExprType::ill_formed(),
        };
    }
    if num_index_dims == num_dims + 2 && base_type == BaseType::Matrix {
        return ExprType::new(BaseType::Double);
    }
    ExprType::ill_formed()
}

/// Result type of a sliced indexing expression.
pub fn indexed_type(expr_type: ExprType, idxs: &[Idx]) -> ExprType {
    if expr_type.is_ill_formed() {
        return ExprType::ill_formed();
    }
    let base_type = expr_type.base_type();

    // Peel array dimensions; a multi index keeps its dimension.
    let peeled = idxs.len().min(expr_type.num_dims());
    let out_dims = idxs[..peeled].iter().filter(|idx| idx.is_multi_index()).count();
    let unindexed_dims = expr_type.num_dims() - peeled;
    let rest = &idxs[peeled..];

    match (base_type, rest) {
        (_, []) => ExprType::with_dims(base_type, out_dims + unindexed_dims),
        (BaseType::Matrix, [idx]) => {
            if idx.is_multi_index() {
                ExprType::with_dims(BaseType::Matrix, out_dims)
            } else {
                ExprType::with_dims(BaseType::RowVector, out_dims)
            }
        }
        (BaseType::Vector | BaseType::RowVector, [idx]) => {
            if idx.is_multi_index() {
                ExprType::with_dims(base_type, out_dims)
            } else {
                ExprType::with_dims(BaseType::Double, out_dims)
            }
        }
        (BaseType::Matrix, [row, col]) => {
            let base = match (row.is_multi_index(), col.is_multi_index()) {
                (true, true) => BaseType::Matrix,
                (true, false) => BaseType::Vector,
                (false, true) => BaseType::RowVector,
                (false, false) => BaseType::Double,
            };
            ExprType::with_dims(base, out_dims)
        }
        _ => ExprType::ill_formed(),
    }
}
