use std::fmt::Display;

use crate::type_checker::variable_map::{VarOrigin, VariableMap};

use super::indexing::{indexed_type, infer_type_indexing, Idx};
use super::types::{promote_array_elements, promote_primitive, promote_primitive2, BaseType, ExprType};

/// An expression node. Every variant caches its type at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Nil,
    IntLiteral(IntLiteral),
    DoubleLiteral(DoubleLiteral),
    ArrayLiteral(ArrayLiteral),
    Variable(Variable),
    Fun(Fun),
    IntegrateOde(IntegrateOde),
    IntegrateOdeControl(IntegrateOdeControl),
    IndexOp(IndexOp),
    IndexOpSliced(IndexOpSliced),
    BinaryOp(BinaryOp),
    UnaryOp(UnaryOp),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntLiteral {
    value: i64,
    type_: ExprType,
}

impl IntLiteral {
    pub fn new(value: i64) -> Self {
        IntLiteral {
            value,
            type_: ExprType::new(BaseType::Int),
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoubleLiteral {
    value: f64,
    type_: ExprType,
}

impl DoubleLiteral {
    pub fn new(value: f64) -> Self {
        DoubleLiteral {
            value,
            type_: ExprType::new(BaseType::Double),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// `{e1, e2, ...}`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    args: Vec<Expr>,
    type_: ExprType,
}

impl ArrayLiteral {
    /// Elements must all share exactly one type.
    pub fn new(args: Vec<Expr>) -> Self {
        let type_ = Self::element_type(&args, |a, b| if a == b { a } else { ExprType::ill_formed() });
        ArrayLiteral { args, type_ }
    }

    /// Like `new`, but int and real elements of equal rank unify to real.
    pub fn with_promotion(args: Vec<Expr>) -> Self {
        let type_ = Self::element_type(&args, promote_array_elements);
        ArrayLiteral { args, type_ }
    }

    fn element_type(args: &[Expr], unify: impl Fn(ExprType, ExprType) -> ExprType) -> ExprType {
        let Some(first) = args.first() else {
            return ExprType::ill_formed();
        };
        let element = args
            .iter()
            .skip(1)
            .fold(first.expr_type(), |acc, arg| unify(acc, arg.expr_type()));
        if element.is_ill_formed() || element.is_void() {
            return ExprType::ill_formed();
        }
        element.array_of()
    }

    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    pub fn expr_type(&self) -> ExprType {
        self.type_
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    type_: ExprType,
}

impl Variable {
    /// `type_` is the declared type looked up at the point of reference.
    pub fn new(name: &str, type_: ExprType) -> Self {
        Variable {
            name: name.to_string(),
            type_,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A function application. Operators on non-primitive operands are
/// represented as calls under their function name (`add`, `multiply`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Fun {
    name: String,
    args: Vec<Expr>,
    type_: ExprType,
}

impl Fun {
    /// `type_` is the result type chosen by overload resolution.
    pub fn new(name: &str, args: Vec<Expr>, type_: ExprType) -> Self {
        Fun {
            name: name.to_string(),
            args,
            type_,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Expr] {
        &self.args
    }
}

/// The shape an ODE solver argument must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdeArgKind {
    RealArray,
    IntArray,
    Primitive,
    PrimitiveInt,
}

impl OdeArgKind {
    pub fn accepts(&self, et: ExprType) -> bool {
        match self {
            OdeArgKind::RealArray => et == ExprType::with_dims(BaseType::Double, 1),
            OdeArgKind::IntArray => et == ExprType::with_dims(BaseType::Int, 1),
            OdeArgKind::Primitive => et.is_primitive(),
            OdeArgKind::PrimitiveInt => et.is_primitive_int(),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            OdeArgKind::RealArray => "real[]",
            OdeArgKind::IntArray => "int[]",
            OdeArgKind::Primitive => "int or real",
            OdeArgKind::PrimitiveInt => "int",
        }
    }
}

/// One argument of an ODE solver call together with its requirements.
pub struct OdeArgument<'a> {
    pub label: &'static str,
    pub expr: &'a Expr,
    pub kind: OdeArgKind,
    pub data_only: bool,
}

/// `integrate_ode(f, y0, t0, ts, theta, x, x_int)`
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrateOde {
    integration_function: String,
    system_function: String,
    y0: Box<Expr>,
    t0: Box<Expr>,
    ts: Box<Expr>,
    theta: Box<Expr>,
    x: Box<Expr>,
    x_int: Box<Expr>,
    type_: ExprType,
}

impl IntegrateOde {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        integration_function: &str,
        system_function: &str,
        y0: Expr,
        t0: Expr,
        ts: Expr,
        theta: Expr,
        x: Expr,
        x_int: Expr,
    ) -> Self {
        let mut ode = IntegrateOde {
            integration_function: integration_function.to_string(),
            system_function: system_function.to_string(),
            y0: Box::new(y0),
            t0: Box::new(t0),
            ts: Box::new(ts),
            theta: Box::new(theta),
            x: Box::new(x),
            x_int: Box::new(x_int),
            type_: ExprType::ill_formed(),
        };
        if ode.arguments().iter().all(|a| a.kind.accepts(a.expr.expr_type())) {
            ode.type_ = ExprType::with_dims(BaseType::Double, 2);
        }
        ode
    }

    pub fn integration_function(&self) -> &str {
        &self.integration_function
    }

    pub fn system_function(&self) -> &str {
        &self.system_function
    }

    pub fn arguments(&self) -> Vec<OdeArgument<'_>> {
        vec![
            OdeArgument { label: "initial state", expr: &self.y0, kind: OdeArgKind::RealArray, data_only: false },
            OdeArgument { label: "initial time", expr: &self.t0, kind: OdeArgKind::Primitive, data_only: false },
            OdeArgument { label: "solution times", expr: &self.ts, kind: OdeArgKind::RealArray, data_only: true },
            OdeArgument { label: "parameters", expr: &self.theta, kind: OdeArgKind::RealArray, data_only: false },
            OdeArgument { label: "real data", expr: &self.x, kind: OdeArgKind::RealArray, data_only: true },
            OdeArgument { label: "integer data", expr: &self.x_int, kind: OdeArgKind::IntArray, data_only: true },
        ]
    }

    pub(crate) fn into_ill_formed(mut self) -> Self {
        self.type_ = ExprType::ill_formed();
        self
    }
}

/// `integrate_ode_bdf(f, y0, t0, ts, theta, x, x_int, rel_tol, abs_tol, max_num_steps)`
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrateOdeControl {
    ode: IntegrateOde,
    rel_tol: Box<Expr>,
    abs_tol: Box<Expr>,
    max_num_steps: Box<Expr>,
    type_: ExprType,
}

impl IntegrateOdeControl {
    pub fn new(ode: IntegrateOde, rel_tol: Expr, abs_tol: Expr, max_num_steps: Expr) -> Self {
        let mut control = IntegrateOdeControl {
            ode,
            rel_tol: Box::new(rel_tol),
            abs_tol: Box::new(abs_tol),
            max_num_steps: Box::new(max_num_steps),
            type_: ExprType::ill_formed(),
        };
        if control.arguments().iter().all(|a| a.kind.accepts(a.expr.expr_type())) {
            control.type_ = ExprType::with_dims(BaseType::Double, 2);
        }
        control
    }

    pub fn ode(&self) -> &IntegrateOde {
        &self.ode
    }

    pub fn arguments(&self) -> Vec<OdeArgument<'_>> {
        let mut arguments = self.ode.arguments();
        arguments.extend([
            OdeArgument { label: "relative tolerance", expr: &self.rel_tol, kind: OdeArgKind::Primitive, data_only: true },
            OdeArgument { label: "absolute tolerance", expr: &self.abs_tol, kind: OdeArgKind::Primitive, data_only: true },
            OdeArgument { label: "maximum steps", expr: &self.max_num_steps, kind: OdeArgKind::PrimitiveInt, data_only: true },
        ]);
        arguments
    }

    pub(crate) fn into_ill_formed(mut self) -> Self {
        self.type_ = ExprType::ill_formed();
        self
    }
}

/// Legacy multi-bracket indexing `e[i, j][k]`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexOp {
    expr: Box<Expr>,
    dimss: Vec<Vec<Expr>>,
    type_: ExprType,
}

impl IndexOp {
    pub fn new(expr: Expr, dimss: Vec<Vec<Expr>>) -> Self {
        let num_index_dims = dimss.iter().map(Vec::len).sum();
        let et = expr.expr_type();
        let type_ = if et.is_ill_formed() {
            ExprType::ill_formed()
        } else {
            infer_type_indexing(et.base_type(), et.num_dims(), num_index_dims)
        };
        IndexOp {
            expr: Box::new(expr),
            dimss,
            type_,
        }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn dimss(&self) -> &[Vec<Expr>] {
        &self.dimss
    }

    pub fn expr_type(&self) -> ExprType {
        self.type_
    }

    pub(crate) fn into_ill_formed(mut self) -> Self {
        self.type_ = ExprType::ill_formed();
        self
    }
}

/// Sliced indexing `e[idx, ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexOpSliced {
    expr: Box<Expr>,
    idxs: Vec<Idx>,
    type_: ExprType,
}

impl IndexOpSliced {
    pub fn new(expr: Expr, idxs: Vec<Idx>) -> Self {
        let type_ = indexed_type(expr.expr_type(), &idxs);
        IndexOpSliced {
            expr: Box::new(expr),
            idxs,
            type_,
        }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn idxs(&self) -> &[Idx] {
        &self.idxs
    }

    pub fn expr_type(&self) -> ExprType {
        self.type_
    }

    pub(crate) fn into_ill_formed(mut self) -> Self {
        self.type_ = ExprType::ill_formed();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    Pow,
    EltMultiply,
    EltDivide,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Equals,
    NotEquals,
    And,
    Or,
}

impl BinaryOperator {
    /// Name the operator is registered under in the function registry.
    pub fn function_name(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "add",
            BinaryOperator::Subtract => "subtract",
            BinaryOperator::Multiply => "multiply",
            BinaryOperator::Divide => "divide",
            BinaryOperator::Modulus => "modulus",
            BinaryOperator::Pow => "pow",
            BinaryOperator::EltMultiply => "elt_multiply",
            BinaryOperator::EltDivide => "elt_divide",
            BinaryOperator::Less => "logical_lt",
            BinaryOperator::LessEquals => "logical_lte",
            BinaryOperator::Greater => "logical_gt",
            BinaryOperator::GreaterEquals => "logical_gte",
            BinaryOperator::Equals => "logical_eq",
            BinaryOperator::NotEquals => "logical_neq",
            BinaryOperator::And => "logical_and",
            BinaryOperator::Or => "logical_or",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulus => "%",
            BinaryOperator::Pow => "^",
            BinaryOperator::EltMultiply => ".*",
            BinaryOperator::EltDivide => "./",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEquals => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEquals => ">=",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        }
    }

    /// Result type for two primitive operands.
    fn result_type(&self, left: ExprType, right: ExprType) -> ExprType {
        if !left.is_primitive() || !right.is_primitive() {
            return ExprType::ill_formed();
        }
        match self {
            BinaryOperator::Add
            | BinaryOperator::Subtract
            | BinaryOperator::Multiply
            | BinaryOperator::Divide => promote_primitive2(left, right),
            BinaryOperator::Modulus => {
                if left.is_primitive_int() && right.is_primitive_int() {
                    left
                } else {
                    ExprType::ill_formed()
                }
            }
            BinaryOperator::Pow => ExprType::new(BaseType::Double),
            BinaryOperator::EltMultiply | BinaryOperator::EltDivide => ExprType::ill_formed(),
            BinaryOperator::Less
            | BinaryOperator::LessEquals
            | BinaryOperator::Greater
            | BinaryOperator::GreaterEquals
            | BinaryOperator::Equals
            | BinaryOperator::NotEquals
            | BinaryOperator::And
            | BinaryOperator::Or => ExprType::new(BaseType::Int),
        }
    }
}

/// A binary operator applied to primitive operands.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    op: BinaryOperator,
    left: Box<Expr>,
    right: Box<Expr>,
    type_: ExprType,
}

impl BinaryOp {
    pub fn new(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        let type_ = op.result_type(left.expr_type(), right.expr_type());
        BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
            type_,
        }
    }

    pub fn op(&self) -> BinaryOperator {
        self.op
    }

    pub fn left(&self) -> &Expr {
        &self.left
    }

    pub fn right(&self) -> &Expr {
        &self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Minus,
    Plus,
    Not,
    Transpose,
}

impl UnaryOperator {
    pub fn function_name(&self) -> &'static str {
        match self {
            UnaryOperator::Minus => "minus",
            UnaryOperator::Plus => "plus",
            UnaryOperator::Not => "logical_negation",
            UnaryOperator::Transpose => "transpose",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
            UnaryOperator::Transpose => "'",
        }
    }
}

/// A prefix (or postfix transpose) operator applied to a primitive operand.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOp {
    op: UnaryOperator,
    operand: Box<Expr>,
    type_: ExprType,
}

impl UnaryOp {
    pub fn new(op: UnaryOperator, operand: Expr) -> Self {
        let et = operand.expr_type();
        let type_ = match op {
            UnaryOperator::Minus | UnaryOperator::Plus => promote_primitive(et),
            UnaryOperator::Not if et.is_primitive() => ExprType::new(BaseType::Int),
            UnaryOperator::Not | UnaryOperator::Transpose => ExprType::ill_formed(),
        };
        UnaryOp {
            op,
            operand: Box::new(operand),
            type_,
        }
    }

    pub fn op(&self) -> UnaryOperator {
        self.op
    }

    pub fn operand(&self) -> &Expr {
        &self.operand
    }
}

/// Function names treated as linear when deciding whether a sampled
/// expression needs a Jacobian adjustment.
const LINEAR_FUNCTIONS: &[&str] = &[
    "add",
    "subtract",
    "minus",
    "plus",
    "transpose",
    "sum",
    "head",
    "tail",
    "segment",
    "col",
    "row",
    "block",
    "diagonal",
    "append_row",
    "append_col",
    "to_vector",
    "to_row_vector",
    "to_matrix",
    "to_array_1d",
    "to_array_2d",
    "rep_vector",
    "rep_row_vector",
    "rep_matrix",
];

/// Functions linear in each argument as long as at most one argument
/// depends on parameters.
const BILINEAR_FUNCTIONS: [&str; 3] = ["multiply", "elt_multiply", "dot_product"];

impl Expr {
    pub fn expr_type(&self) -> ExprType {
        match self {
            Expr::Nil => ExprType::ill_formed(),
            Expr::IntLiteral(e) => e.type_,
            Expr::DoubleLiteral(e) => e.type_,
            Expr::ArrayLiteral(e) => e.type_,
            Expr::Variable(e) => e.type_,
            Expr::Fun(e) => e.type_,
            Expr::IntegrateOde(e) => e.type_,
            Expr::IntegrateOdeControl(e) => e.type_,
            Expr::IndexOp(e) => e.type_,
            Expr::IndexOpSliced(e) => e.type_,
            Expr::BinaryOp(e) => e.type_,
            Expr::UnaryOp(e) => e.type_,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Expr::Nil)
    }

    pub fn total_dims(&self) -> usize {
        self.expr_type().total_dims()
    }

    /// Immediate sub-expressions, in source order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Nil | Expr::IntLiteral(_) | Expr::DoubleLiteral(_) | Expr::Variable(_) => vec![],
            Expr::ArrayLiteral(e) => e.args.iter().collect(),
            Expr::Fun(e) => e.args.iter().collect(),
            Expr::IntegrateOde(e) => e.arguments().into_iter().map(|a| a.expr).collect(),
            Expr::IntegrateOdeControl(e) => e.arguments().into_iter().map(|a| a.expr).collect(),
            Expr::IndexOp(e) => std::iter::once(e.expr.as_ref())
                .chain(e.dimss.iter().flatten())
                .collect(),
            Expr::IndexOpSliced(e) => std::iter::once(e.expr.as_ref())
                .chain(e.idxs.iter().flat_map(Idx::exprs))
                .collect(),
            Expr::BinaryOp(e) => vec![e.left.as_ref(), e.right.as_ref()],
            Expr::UnaryOp(e) => vec![e.operand.as_ref()],
        }
    }

    /// Whether the expression mentions a parameter, a transformed
    /// parameter or a non-int local variable.
    pub fn has_var(&self, variable_map: &VariableMap) -> bool {
        match self {
            Expr::Variable(v) => match variable_map.get_origin(&v.name) {
                Some(VarOrigin::Parameter | VarOrigin::TransformedParameter) => true,
                Some(VarOrigin::Local) => variable_map.get_base_type(&v.name) != BaseType::Int,
                _ => false,
            },
            _ => self.children().iter().any(|c| c.has_var(variable_map)),
        }
    }

    /// Whether the expression mentions a transformed parameter or a local
    /// variable, or applies a non-linear function to something mentioning
    /// a parameter.
    pub fn has_non_param_var(&self, variable_map: &VariableMap) -> bool {
        match self {
            Expr::Nil | Expr::IntLiteral(_) | Expr::DoubleLiteral(_) => false,
            Expr::Variable(v) => matches!(
                variable_map.get_origin(&v.name),
                Some(VarOrigin::TransformedParameter | VarOrigin::Local)
            ),
            Expr::ArrayLiteral(e) => e.args.iter().any(|a| a.has_non_param_var(variable_map)),
            Expr::Fun(e) => {
                let args: Vec<&Expr> = e.args.iter().collect();
                applies_non_linearly(&e.name, &args, variable_map)
            }
            Expr::IntegrateOde(e) => e.y0.has_var(variable_map) || e.theta.has_var(variable_map),
            Expr::IntegrateOdeControl(e) => {
                e.ode.y0.has_var(variable_map) || e.ode.theta.has_var(variable_map)
            }
            Expr::IndexOp(e) => e.expr.has_non_param_var(variable_map),
            Expr::IndexOpSliced(e) => e.expr.has_non_param_var(variable_map),
            Expr::BinaryOp(e) => applies_non_linearly(
                e.op.function_name(),
                &[e.left.as_ref(), e.right.as_ref()],
                variable_map,
            ),
            Expr::UnaryOp(e) => {
                applies_non_linearly(e.op.function_name(), &[e.operand.as_ref()], variable_map)
            }
        }
    }

    /// Whether the variable `name` occurs anywhere in the expression.
    pub fn var_occurs(&self, name: &str) -> bool {
        match self {
            Expr::Variable(v) => v.name == name,
            _ => self.children().iter().any(|c| c.var_occurs(name)),
        }
    }

    /// Whether every variable the expression mentions is data, transformed
    /// data or a local variable.
    pub fn is_data_only(&self, variable_map: &VariableMap) -> bool {
        match self {
            Expr::Variable(v) => matches!(
                variable_map.get_origin(&v.name),
                Some(VarOrigin::Data | VarOrigin::TransformedData | VarOrigin::Local)
            ),
            _ => self.children().iter().all(|c| c.is_data_only(variable_map)),
        }
    }
}

fn applies_non_linearly(name: &str, args: &[&Expr], variable_map: &VariableMap) -> bool {
    if args.iter().any(|a| a.has_non_param_var(variable_map)) {
        return true;
    }
    if LINEAR_FUNCTIONS.contains(&name) {
        return false;
    }
    let with_var = args.iter().filter(|a| a.has_var(variable_map)).count();
    if BILINEAR_FUNCTIONS.contains(&name) {
        return with_var > 1;
    }
    if matches!(name, "divide" | "elt_divide") {
        return args.iter().skip(1).any(|a| a.has_var(variable_map));
    }
    with_var > 0
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Nil => write!(f, "nil"),
            Expr::IntLiteral(e) => write!(f, "{}", e.value),
            Expr::DoubleLiteral(e) => write!(f, "{:?}", e.value),
            Expr::ArrayLiteral(e) => write!(f, "{{{}}}", join(&e.args)),
            Expr::Variable(e) => write!(f, "{}", e.name),
            Expr::Fun(e) => write!(f, "{}({})", e.name, join(&e.args)),
            Expr::IntegrateOde(e) => write_ode(f, e, &[]),
            Expr::IntegrateOdeControl(e) => {
                write_ode(f, &e.ode, &[e.rel_tol.as_ref(), e.abs_tol.as_ref(), e.max_num_steps.as_ref()])
            }
            Expr::IndexOp(e) => {
                write!(f, "{}", e.expr)?;
                for dims in &e.dimss {
                    write!(f, "[{}]", join(dims))?;
                }
                Ok(())
            }
            Expr::IndexOpSliced(e) => {
                let idxs: Vec<String> = e.idxs.iter().map(|i| i.to_string()).collect();
                write!(f, "{}[{}]", e.expr, idxs.join(", "))
            }
            Expr::BinaryOp(e) => write!(f, "({} {} {})", e.left, e.op.symbol(), e.right),
            Expr::UnaryOp(e) => match e.op {
                UnaryOperator::Transpose => write!(f, "{}'", e.operand),
                _ => write!(f, "{}{}", e.op.symbol(), e.operand),
            },
        }
    }
}

fn join(exprs: &[Expr]) -> String {
    exprs.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", ")
}

fn write_ode(f: &mut std::fmt::Formatter<'_>, ode: &IntegrateOde, control: &[&Expr]) -> std::fmt::Result {
    write!(
        f,
        "{}({}, {}, {}, {}, {}, {}, {}",
        ode.integration_function, ode.system_function, ode.y0, ode.t0, ode.ts, ode.theta, ode.x, ode.x_int
    )?;
    for e in control {
        write!(f, ", {}", e)?;
    }
    write!(f, ")")
}

impl From<IntLiteral> for Expr {
    fn from(e: IntLiteral) -> Self {
        Expr::IntLiteral(e)
    }
}

impl From<DoubleLiteral> for Expr {
    fn from(e: DoubleLiteral) -> Self {
        Expr::DoubleLiteral(e)
    }
}

impl From<ArrayLiteral> for Expr {
    fn from(e: ArrayLiteral) -> Self {
        Expr::ArrayLiteral(e)
    }
}

impl From<Variable> for Expr {
    fn from(e: Variable) -> Self {
        Expr::Variable(e)
    }
}

impl From<Fun> for Expr {
    fn from(e: Fun) -> Self {
        Expr::Fun(e)
    }
}

impl From<IntegrateOde> for Expr {
    fn from(e: IntegrateOde) -> Self {
        Expr::IntegrateOde(e)
    }
}

impl From<IntegrateOdeControl> for Expr {
    fn from(e: IntegrateOdeControl) -> Self {
        Expr::IntegrateOdeControl(e)
    }
}

impl From<IndexOp> for Expr {
    fn from(e: IndexOp) -> Self {
        Expr::IndexOp(e)
    }
}

impl From<IndexOpSliced> for Expr {
    fn from(e: IndexOpSliced) -> Self {
        Expr::IndexOpSliced(e)
    }
}

impl From<BinaryOp> for Expr {
    fn from(e: BinaryOp) -> Self {
        Expr::BinaryOp(e)
    }
}

impl From<UnaryOp> for Expr {
    fn from(e: UnaryOp) -> Self {
        Expr::UnaryOp(e)
    }
}
