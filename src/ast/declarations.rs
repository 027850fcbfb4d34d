//! Variable declarations.
//!
//! Each declaration kind fixes its base type and carries the constraint
//! expressions the kind allows: bounds for the unconstrained shapes, a
//! size `K` for the constrained vector and matrix shapes, and `(M, N)` for
//! rectangular matrices.

use super::expressions::Expr;
use super::statements::Range;
use super::types::{BaseType, ExprType};

/// The part of a declaration the symbol table keeps: name, array
/// dimensions and base type.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseVarDecl {
    pub name: String,
    pub dims: Vec<Expr>,
    pub base_type: BaseType,
}

impl BaseVarDecl {
    pub fn new(name: &str, dims: Vec<Expr>, base_type: BaseType) -> Self {
        BaseVarDecl {
            name: name.to_string(),
            dims,
            base_type,
        }
    }

    /// A declaration whose dimension expressions are unknown, as for
    /// function arguments: only the rank is recorded.
    pub fn with_rank(name: &str, num_dims: usize, base_type: BaseType) -> Self {
        BaseVarDecl::new(name, vec![Expr::Nil; num_dims], base_type)
    }

    pub fn expr_type(&self) -> ExprType {
        ExprType::with_dims(self.base_type, self.dims.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundedDecl {
    pub base: BaseVarDecl,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizedBoundedDecl {
    pub base: BaseVarDecl,
    pub range: Range,
    pub size: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixDecl {
    pub base: BaseVarDecl,
    pub range: Range,
    pub rows: Expr,
    pub cols: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizedDecl {
    pub base: BaseVarDecl,
    pub size: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CholeskyFactorDecl {
    pub base: BaseVarDecl,
    pub rows: Expr,
    pub cols: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VarDecl {
    Int(BoundedDecl),
    Double(BoundedDecl),
    Vector(SizedBoundedDecl),
    RowVector(SizedBoundedDecl),
    Matrix(MatrixDecl),
    Simplex(SizedDecl),
    UnitVector(SizedDecl),
    Ordered(SizedDecl),
    PositiveOrdered(SizedDecl),
    CholeskyFactor(CholeskyFactorDecl),
    CholeskyCorr(SizedDecl),
    CovMatrix(SizedDecl),
    CorrMatrix(SizedDecl),
}

/// Which constraint an expression of a declaration expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintRole {
    Size,
    Lower,
    Upper,
}

impl ConstraintRole {
    pub fn describe(&self) -> &'static str {
        match self {
            ConstraintRole::Size => "size",
            ConstraintRole::Lower => "lower bound",
            ConstraintRole::Upper => "upper bound",
        }
    }
}

impl VarDecl {
    pub fn int(name: &str, dims: Vec<Expr>, range: Range) -> Self {
        VarDecl::Int(BoundedDecl {
            base: BaseVarDecl::new(name, dims, BaseType::Int),
            range,
        })
    }

    pub fn double(name: &str, dims: Vec<Expr>, range: Range) -> Self {
        VarDecl::Double(BoundedDecl {
            base: BaseVarDecl::new(name, dims, BaseType::Double),
            range,
        })
    }

    pub fn vector(name: &str, dims: Vec<Expr>, range: Range, size: Expr) -> Self {
        VarDecl::Vector(SizedBoundedDecl {
            base: BaseVarDecl::new(name, dims, BaseType::Vector),
            range,
            size,
        })
    }

    pub fn row_vector(name: &str, dims: Vec<Expr>, range: Range, size: Expr) -> Self {
        VarDecl::RowVector(SizedBoundedDecl {
            base: BaseVarDecl::new(name, dims, BaseType::RowVector),
            range,
            size,
        })
    }

    pub fn matrix(name: &str, dims: Vec<Expr>, range: Range, rows: Expr, cols: Expr) -> Self {
        VarDecl::Matrix(MatrixDecl {
            base: BaseVarDecl::new(name, dims, BaseType::Matrix),
            range,
            rows,
            cols,
        })
    }

    pub fn simplex(name: &str, dims: Vec<Expr>, size: Expr) -> Self {
        VarDecl::Simplex(SizedDecl::vector(name, dims, size))
    }

    pub fn unit_vector(name: &str, dims: Vec<Expr>, size: Expr) -> Self {
        VarDecl::UnitVector(SizedDecl::vector(name, dims, size))
    }

    pub fn ordered(name: &str, dims: Vec<Expr>, size: Expr) -> Self {
        VarDecl::Ordered(SizedDecl::vector(name, dims, size))
    }

    pub fn positive_ordered(name: &str, dims: Vec<Expr>, size: Expr) -> Self {
        VarDecl::PositiveOrdered(SizedDecl::vector(name, dims, size))
    }

    /// `cholesky_factor_cov[M]` is shorthand for `cholesky_factor_cov[M, M]`.
    pub fn cholesky_factor(name: &str, dims: Vec<Expr>, rows: Expr, cols: Option<Expr>) -> Self {
        let cols = cols.unwrap_or_else(|| rows.clone());
        VarDecl::CholeskyFactor(CholeskyFactorDecl {
            base: BaseVarDecl::new(name, dims, BaseType::Matrix),
            rows,
            cols,
        })
    }

    pub fn cholesky_corr(name: &str, dims: Vec<Expr>, size: Expr) -> Self {
        VarDecl::CholeskyCorr(SizedDecl::matrix(name, dims, size))
    }

    pub fn cov_matrix(name: &str, dims: Vec<Expr>, size: Expr) -> Self {
        VarDecl::CovMatrix(SizedDecl::matrix(name, dims, size))
    }

    pub fn corr_matrix(name: &str, dims: Vec<Expr>, size: Expr) -> Self {
        VarDecl::CorrMatrix(SizedDecl::matrix(name, dims, size))
    }

    pub fn base_decl(&self) -> &BaseVarDecl {
        match self {
            VarDecl::Int(d) | VarDecl::Double(d) => &d.base,
            VarDecl::Vector(d) | VarDecl::RowVector(d) => &d.base,
            VarDecl::Matrix(d) => &d.base,
            VarDecl::CholeskyFactor(d) => &d.base,
            VarDecl::Simplex(d)
            | VarDecl::UnitVector(d)
            | VarDecl::Ordered(d)
            | VarDecl::PositiveOrdered(d)
            | VarDecl::CholeskyCorr(d)
            | VarDecl::CovMatrix(d)
            | VarDecl::CorrMatrix(d) => &d.base,
        }
    }

    pub fn name(&self) -> &str {
        &self.base_decl().name
    }

    pub fn dims(&self) -> &[Expr] {
        &self.base_decl().dims
    }

    pub fn base_type(&self) -> BaseType {
        self.base_decl().base_type
    }

    pub fn expr_type(&self) -> ExprType {
        self.base_decl().expr_type()
    }

    /// Keyword the declaration is written with.
    pub fn kind_name(&self) -> &'static str {
        match self {
            VarDecl::Int(_) => "int",
            VarDecl::Double(_) => "real",
            VarDecl::Vector(_) => "vector",
            VarDecl::RowVector(_) => "row_vector",
            VarDecl::Matrix(_) => "matrix",
            VarDecl::Simplex(_) => "simplex",
            VarDecl::UnitVector(_) => "unit_vector",
            VarDecl::Ordered(_) => "ordered",
            VarDecl::PositiveOrdered(_) => "positive_ordered",
            VarDecl::CholeskyFactor(_) => "cholesky_factor_cov",
            VarDecl::CholeskyCorr(_) => "cholesky_factor_corr",
            VarDecl::CovMatrix(_) => "cov_matrix",
            VarDecl::CorrMatrix(_) => "corr_matrix",
        }
    }

    pub fn range(&self) -> Option<&Range> {
        match self {
            VarDecl::Int(d) | VarDecl::Double(d) => Some(&d.range),
            VarDecl::Vector(d) | VarDecl::RowVector(d) => Some(&d.range),
            VarDecl::Matrix(d) => Some(&d.range),
            _ => None,
        }
    }

    /// Constraint expressions paired with the role they play.
    pub fn constraints(&self) -> Vec<(ConstraintRole, &Expr)> {
        let mut constraints = Vec::new();
        match self {
            VarDecl::Int(_) | VarDecl::Double(_) => {}
            VarDecl::Vector(d) | VarDecl::RowVector(d) => constraints.push((ConstraintRole::Size, &d.size)),
            VarDecl::Matrix(d) => {
                constraints.push((ConstraintRole::Size, &d.rows));
                constraints.push((ConstraintRole::Size, &d.cols));
            }
            VarDecl::CholeskyFactor(d) => {
                constraints.push((ConstraintRole::Size, &d.rows));
                constraints.push((ConstraintRole::Size, &d.cols));
            }
            VarDecl::Simplex(d)
            | VarDecl::UnitVector(d)
            | VarDecl::Ordered(d)
            | VarDecl::PositiveOrdered(d)
            | VarDecl::CholeskyCorr(d)
            | VarDecl::CovMatrix(d)
            | VarDecl::CorrMatrix(d) => constraints.push((ConstraintRole::Size, &d.size)),
        }
        if let Some(range) = self.range() {
            if let Some(low) = &range.low {
                constraints.push((ConstraintRole::Lower, low));
            }
            if let Some(high) = &range.high {
                constraints.push((ConstraintRole::Upper, high));
            }
        }
        constraints
    }

    /// Bounds on the unconstrained shapes, or any of the inherently
    /// constrained kinds.
    pub fn has_constraints(&self) -> bool {
        match self.range() {
            Some(range) => range.has_low() || range.has_high(),
            None => true,
        }
    }
}

impl SizedDecl {
    fn vector(name: &str, dims: Vec<Expr>, size: Expr) -> Self {
        SizedDecl {
            base: BaseVarDecl::new(name, dims, BaseType::Vector),
            size,
        }
    }

    fn matrix(name: &str, dims: Vec<Expr>, size: Expr) -> Self {
        SizedDecl {
            base: BaseVarDecl::new(name, dims, BaseType::Matrix),
            size,
        }
    }
}
