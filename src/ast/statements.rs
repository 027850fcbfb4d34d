use crate::errors::diagnostics::Diagnostics;
use crate::errors::errors::ErrorImpl;
use crate::Span;

use super::declarations::VarDecl;
use super::expressions::Expr;
use super::indexing::Idx;
use super::types::{is_assignable, ExprType};

/// A statement together with the source lines it spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Nil,
    Assignment(Assignment),
    Assgn(Assgn),
    Sample(Sample),
    IncrementLogProb(Expr),
    Expression(Expr),
    Statements(Statements),
    For(ForStatement),
    Conditional(Conditional),
    While(WhileStatement),
    Print(Vec<Printable>),
    Reject(Vec<Printable>),
    Return(ReturnStatement),
    NoOp,
}

impl Statement {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Statement { kind, span }
    }

    pub fn no_op(span: Span) -> Self {
        Statement::new(StmtKind::NoOp, span)
    }

    pub fn is_no_op(&self) -> bool {
        matches!(self.kind, StmtKind::NoOp)
    }

    pub fn begin_line(&self) -> u32 {
        self.span.start.0
    }

    pub fn end_line(&self) -> u32 {
        self.span.end.0
    }
}

impl Default for Statement {
    fn default() -> Self {
        Statement::no_op(Span::default())
    }
}

impl StmtKind {
    /// Human readable name used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            StmtKind::Nil => "nil statement",
            StmtKind::Assignment(_) | StmtKind::Assgn(_) => "assignment statement",
            StmtKind::Sample(_) => "sampling statement",
            StmtKind::IncrementLogProb(_) => "increment_log_prob statement",
            StmtKind::Expression(_) => "expression statement",
            StmtKind::Statements(_) => "statement block",
            StmtKind::For(_) => "for statement",
            StmtKind::Conditional(_) => "conditional statement",
            StmtKind::While(_) => "while statement",
            StmtKind::Print(_) => "print statement",
            StmtKind::Reject(_) => "reject statement",
            StmtKind::Return(_) => "return statement",
            StmtKind::NoOp => "no-op statement",
        }
    }
}

/// Legacy assignment target `name[dims]`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDims {
    pub name: String,
    pub dims: Vec<Expr>,
}

impl VariableDims {
    pub fn new(name: &str, dims: Vec<Expr>) -> Self {
        VariableDims {
            name: name.to_string(),
            dims,
        }
    }
}

/// `name[dims] <- expr`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub var_dims: VariableDims,
    pub expr: Expr,
    /// Declared type of the assigned variable.
    pub var_type: ExprType,
}

/// `name[idxs] = rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Assgn {
    pub lhs_var: String,
    pub idxs: Vec<Idx>,
    pub rhs: Expr,
}

impl Assgn {
    /// True when the assigned variable is read on the right-hand side, in
    /// which case the right-hand side must be evaluated into a copy first.
    pub fn lhs_var_occurs_on_rhs(&self) -> bool {
        self.rhs.var_occurs(&self.lhs_var)
    }
}

/// Lower and upper bounds; either may be absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Range {
    pub low: Option<Expr>,
    pub high: Option<Expr>,
}

impl Range {
    pub fn new(low: Option<Expr>, high: Option<Expr>) -> Self {
        Range { low, high }
    }

    pub fn unbounded() -> Self {
        Range::default()
    }

    pub fn has_low(&self) -> bool {
        self.low.is_some()
    }

    pub fn has_high(&self) -> bool {
        self.high.is_some()
    }

    pub fn bounds(&self) -> impl Iterator<Item = &Expr> {
        self.low.iter().chain(self.high.iter())
    }
}

/// `family(args)` on the right of `~`.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub family: String,
    pub args: Vec<Expr>,
}

impl Distribution {
    pub fn new(family: &str, args: Vec<Expr>) -> Self {
        Distribution {
            family: family.to_string(),
            args,
        }
    }
}

/// `expr ~ dist(args) T[low, high]`
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub expr: Expr,
    pub dist: Distribution,
    pub truncation: Range,
}

impl Sample {
    /// A sample is ill formed when the sampled expression is, or when a
    /// truncation bound's type differs from the sampled expression's.
    pub fn is_ill_formed(&self) -> bool {
        let et = self.expr.expr_type();
        et.is_ill_formed() || self.truncation.bounds().any(|b| b.expr_type() != et)
    }
}

/// A block with its own local declarations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statements {
    pub local_decls: Vec<VarDecl>,
    pub statements: Vec<Statement>,
}

/// `for (variable in low:high) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub variable: String,
    pub range: Range,
    pub body: Box<Statement>,
}

/// `if (c1) b1 else if (c2) b2 ... else bn`
///
/// `bodies` is one longer than `conditions` when a final `else` is present.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub conditions: Vec<Expr>,
    pub bodies: Vec<Statement>,
}

impl Conditional {
    pub fn has_else(&self) -> bool {
        self.bodies.len() > self.conditions.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expr,
    pub body: Box<Statement>,
}

/// An argument to `print` or `reject`.
#[derive(Debug, Clone, PartialEq)]
pub enum Printable {
    Text(String),
    Expr(Expr),
}

/// `return e;` or `return;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Option<Expr>,
}

/// Whether every execution path through `stmt` ends in a return of a
/// value assignable to `return_type`.
///
/// Void functions need no return. Failures are reported to `diagnostics`.
pub fn returns_type(return_type: ExprType, stmt: &Statement, diagnostics: &mut Diagnostics) -> bool {
    if return_type.is_void() {
        return true;
    }
    let position = stmt.span.start.clone();

    match &stmt.kind {
        StmtKind::Statements(block) => {
            if block.statements.is_empty() {
                diagnostics.error(
                    ErrorImpl::MissingReturn {
                        found: String::from("statement block with empty body"),
                    },
                    position,
                );
                return false;
            }
            // Only the report of the last statement survives a failure.
            let mut last = Diagnostics::new();
            for statement in &block.statements {
                let mut scratch = Diagnostics::new();
                if returns_type(return_type, statement, &mut scratch) {
                    return true;
                }
                last = scratch;
            }
            diagnostics.append(last);
            false
        }
        StmtKind::Conditional(conditional) => {
            if !conditional.has_else() {
                diagnostics.error(
                    ErrorImpl::MissingReturn {
                        found: String::from("conditional without final else"),
                    },
                    position,
                );
                return false;
            }
            conditional
                .bodies
                .iter()
                .map(|body| returns_type(return_type, body, diagnostics))
                .fold(true, |all, returns| all && returns)
        }
        StmtKind::Return(ReturnStatement { value: Some(e) }) => {
            let et = e.expr_type();
            if et.is_ill_formed() {
                return false;
            }
            if !is_assignable(return_type, et) {
                diagnostics.error(
                    ErrorImpl::ReturnTypeMismatch {
                        expected: return_type.to_string(),
                        received: et.to_string(),
                    },
                    position,
                );
                return false;
            }
            true
        }
        StmtKind::Return(ReturnStatement { value: None }) => {
            diagnostics.error(ErrorImpl::MissingReturnValue, position);
            false
        }
        other => {
            diagnostics.error(
                ErrorImpl::MissingReturn {
                    found: other.describe().to_string(),
                },
                position,
            );
            false
        }
    }
}
