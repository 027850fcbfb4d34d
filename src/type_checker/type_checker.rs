use std::collections::{HashMap, HashSet};

use log::debug;

use crate::{
    ast::{
        ast::{ArgDecl, FunctionDeclDef, Program},
        declarations::{BaseVarDecl, ConstraintRole, VarDecl},
        expressions::{
            ArrayLiteral, BinaryOp, BinaryOperator, DoubleLiteral, Expr, Fun, IndexOp, IndexOpSliced,
            IntLiteral, IntegrateOde, IntegrateOdeControl, OdeArgument, UnaryOp, UnaryOperator, Variable,
        },
        indexing::{indexed_type, infer_type_indexing, Idx},
        statements::{
            returns_type, Assgn, Assignment, Conditional, Distribution, ForStatement, Printable, Range,
            ReturnStatement, Sample, Statement, Statements, StmtKind, VariableDims, WhileStatement,
        },
        types::{is_assignable, promote_array_elements, BaseType, ExprType},
    },
    config::CheckerConfig,
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    Position, Span, MK_EXPR_TYPE, MK_SIGNATURE,
};

use super::{
    builtins::validate_identifier,
    signatures::{render_types, FunctionSignature, FunctionSignatures},
    variable_map::{VarOrigin, VariableMap},
};

/// Why a declaration was turned away.
enum Rejection {
    /// A child expression was ill formed and has been reported already.
    AlreadyReported,
    Error(Error),
}

impl From<Error> for Rejection {
    fn from(error: Error) -> Self {
        Rejection::Error(error)
    }
}

/// The function whose body is being checked.
#[derive(Debug)]
struct FunctionScope {
    name: String,
    return_type: ExprType,
    args: Vec<String>,
    enclosing_origin: VarOrigin,
}

/// Checking context for one compilation.
///
/// The parser builds the tree bottom-up through these methods. Each one
/// infers types on the spot, validates against the symbol table and the
/// function registry, and reports failures to the diagnostics sink. A
/// failing expression comes back ill formed; a failing declaration is not
/// entered into the symbol table.
#[derive(Debug)]
pub struct TypeChecker {
    config: CheckerConfig,
    variable_map: VariableMap,
    signatures: FunctionSignatures,
    diagnostics: Diagnostics,
    origin: VarOrigin,
    scopes: Vec<Vec<String>>,
    function: Option<FunctionScope>,
    functions_declared: HashMap<(String, FunctionSignature), Position>,
    functions_defined: HashSet<(String, FunctionSignature)>,
}

impl Default for TypeChecker {
    fn default() -> Self {
        TypeChecker::new()
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker::with_config(CheckerConfig::default())
    }

    pub fn with_config(config: CheckerConfig) -> Self {
        let mut variable_map = VariableMap::new();
        variable_map.add(
            &config.model_name,
            BaseVarDecl::new(&config.model_name, vec![], BaseType::Void),
            VarOrigin::ModelName,
        );
        TypeChecker {
            config,
            variable_map,
            signatures: FunctionSignatures::new(),
            diagnostics: Diagnostics::new(),
            origin: VarOrigin::Data,
            scopes: vec![],
            function: None,
            functions_declared: HashMap::new(),
            functions_defined: HashSet::new(),
        }
    }

    /// Forgets the program checked so far, keeping the configuration.
    pub fn reset(&mut self) {
        debug!("resetting type checker");
        *self = TypeChecker::with_config(self.config.clone());
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn variable_map(&self) -> &VariableMap {
        &self.variable_map
    }

    pub fn signatures(&self) -> &FunctionSignatures {
        &self.signatures
    }

    pub fn signatures_mut(&mut self) -> &mut FunctionSignatures {
        &mut self.signatures
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn current_origin(&self) -> VarOrigin {
        self.origin
    }

    /// Starts checking a program block. Use `Local` for the model block.
    pub fn enter_block(&mut self, origin: VarOrigin) {
        debug!("entering {} block", origin);
        self.origin = origin;
    }

    fn report(&mut self, error_impl: ErrorImpl, position: &Position) {
        self.diagnostics.error(error_impl, position.clone());
    }

    fn open_scope(&mut self) {
        self.scopes.push(vec![]);
    }

    fn close_scope(&mut self) {
        if let Some(names) = self.scopes.pop() {
            debug!("closing scope, removing {} variable(s)", names.len());
            for name in names {
                self.variable_map.remove(&name);
            }
        }
    }

    fn declaration_origin(&self) -> VarOrigin {
        if self.scopes.is_empty() && self.function.is_none() {
            self.origin
        } else {
            VarOrigin::Local
        }
    }

    // Declarations

    /// Validates a declaration and, when it passes, enters it into the
    /// symbol table. Returns whether the variable was added.
    pub fn add_var(&mut self, decl: &VarDecl, position: Position) -> bool {
        let origin = self.declaration_origin();
        match self.validate_var_decl(decl, origin, &position) {
            Ok(()) => {
                debug!("declaring {} {} ({})", decl.kind_name(), decl.name(), origin);
                self.variable_map.add(decl.name(), decl.base_decl().clone(), origin);
                if let Some(scope) = self.scopes.last_mut() {
                    scope.push(decl.name().to_string());
                }
                true
            }
            Err(Rejection::AlreadyReported) => false,
            Err(Rejection::Error(error)) => {
                self.diagnostics.push(error);
                false
            }
        }
    }

    fn validate_var_decl(&self, decl: &VarDecl, origin: VarOrigin, position: &Position) -> Result<(), Rejection> {
        let name = decl.name();
        let error = |error_impl: ErrorImpl| Rejection::Error(Error::new(error_impl, position.clone()));

        for dim in decl.dims() {
            self.validate_size(name, dim, origin, position)?;
        }

        for (role, constraint) in decl.constraints() {
            let et = constraint.expr_type();
            if et.is_ill_formed() {
                return Err(Rejection::AlreadyReported);
            }
            let (accepted, expected) = match role {
                ConstraintRole::Size => (et.is_primitive_int(), "int"),
                ConstraintRole::Lower | ConstraintRole::Upper if decl.base_type() == BaseType::Int => {
                    (et.is_primitive_int(), "int")
                }
                ConstraintRole::Lower | ConstraintRole::Upper => (et.is_primitive(), "int or real"),
            };
            if !accepted {
                return Err(error(ErrorImpl::ConstraintTypeError {
                    variable: name.to_string(),
                    constraint: role.describe().to_string(),
                    expected: expected.to_string(),
                    received: et.to_string(),
                }));
            }
            if role == ConstraintRole::Size && origin != VarOrigin::Local && !constraint.is_data_only(&self.variable_map) {
                return Err(error(ErrorImpl::DimensionNotData {
                    variable: name.to_string(),
                }));
            }
        }

        if origin == VarOrigin::Local && decl.has_constraints() {
            return Err(error(ErrorImpl::ConstraintsNotAllowed {
                variable: name.to_string(),
            }));
        }

        if matches!(origin, VarOrigin::Parameter | VarOrigin::TransformedParameter) && decl.base_type() == BaseType::Int {
            return Err(error(ErrorImpl::IntegerParameter {
                variable: name.to_string(),
            }));
        }

        self.validate_new_name(name, origin, position)?;
        Ok(())
    }

    fn validate_size(&self, name: &str, dim: &Expr, origin: VarOrigin, position: &Position) -> Result<(), Rejection> {
        let et = dim.expr_type();
        if et.is_ill_formed() {
            return Err(Rejection::AlreadyReported);
        }
        if !et.is_primitive_int() {
            return Err(Error::new(
                ErrorImpl::DimensionTypeError {
                    variable: name.to_string(),
                    received: et.to_string(),
                },
                position.clone(),
            )
            .into());
        }
        if origin != VarOrigin::Local && !dim.is_data_only(&self.variable_map) {
            return Err(Error::new(
                ErrorImpl::DimensionNotData {
                    variable: name.to_string(),
                },
                position.clone(),
            )
            .into());
        }
        Ok(())
    }

    fn validate_new_name(&self, name: &str, origin: VarOrigin, position: &Position) -> Result<(), Error> {
        validate_identifier(name).map_err(|reason| {
            Error::new(
                ErrorImpl::IllegalIdentifier {
                    identifier: name.to_string(),
                    reason,
                },
                position.clone(),
            )
        })?;
        if let Some(existing) = self.variable_map.get_origin(name) {
            return Err(Error::new(
                ErrorImpl::VariableAlreadyDeclared {
                    variable: name.to_string(),
                    original: existing.to_string(),
                    attempted: origin.to_string(),
                },
                position.clone(),
            ));
        }
        Ok(())
    }

    // Expressions

    pub fn int_literal(&self, value: i64) -> Expr {
        IntLiteral::new(value).into()
    }

    pub fn double_literal(&self, value: f64) -> Expr {
        DoubleLiteral::new(value).into()
    }

    pub fn array_literal(&mut self, args: Vec<Expr>, position: Position) -> Expr {
        if args.is_empty() {
            self.report(ErrorImpl::EmptyArrayLiteral, &position);
            return ArrayLiteral::new(args).into();
        }
        let promote = self.config.allow_array_literal_promotion;
        let literal = if promote {
            ArrayLiteral::with_promotion(args)
        } else {
            ArrayLiteral::new(args)
        };
        let literal_type = literal.expr_type();
        let types: Vec<ExprType> = literal.args().iter().map(Expr::expr_type).collect();
        if !literal_type.is_ill_formed() || types.iter().any(ExprType::is_ill_formed) {
            return literal.into();
        }

        if types.iter().any(ExprType::is_void) {
            self.report(
                ErrorImpl::VoidExpression {
                    context: String::from("array expression"),
                },
                &position,
            );
        } else {
            let expected = types[0];
            let unify = |a: ExprType, b: ExprType| {
                if promote {
                    promote_array_elements(a, b)
                } else if a == b {
                    a
                } else {
                    ExprType::ill_formed()
                }
            };
            let received = types
                .iter()
                .copied()
                .find(|t| unify(expected, *t).is_ill_formed())
                .unwrap_or(expected);
            self.report(
                ErrorImpl::ArrayElementTypeMismatch {
                    expected: expected.to_string(),
                    received: received.to_string(),
                },
                &position,
            );
        }
        literal.into()
    }

    pub fn variable(&mut self, name: &str, position: Position) -> Expr {
        match self.variable_map.get(name) {
            Some(decl) => Variable::new(name, decl.expr_type()).into(),
            None => {
                self.report(
                    ErrorImpl::UndeclaredVariable {
                        variable: name.to_string(),
                    },
                    &position,
                );
                Variable::new(name, ExprType::ill_formed()).into()
            }
        }
    }

    /// A function call, resolved against the registry.
    pub fn fun(&mut self, name: &str, args: Vec<Expr>, position: Position) -> Expr {
        let arg_types: Vec<ExprType> = args.iter().map(Expr::expr_type).collect();
        if arg_types.iter().any(ExprType::is_ill_formed) {
            return Fun::new(name, args, ExprType::ill_formed()).into();
        }
        if arg_types.iter().any(ExprType::is_void) {
            self.report(
                ErrorImpl::VoidExpression {
                    context: format!("argument to {}", name),
                },
                &position,
            );
            return Fun::new(name, args, ExprType::ill_formed()).into();
        }
        if name.ends_with("_lp") && !self.origin.allows_lp() {
            self.report(
                ErrorImpl::LpFunctionNotAllowed {
                    function: name.to_string(),
                },
                &position,
            );
            return Fun::new(name, args, ExprType::ill_formed()).into();
        }
        if name.ends_with("_rng") && !self.origin.allows_rng() {
            self.report(
                ErrorImpl::RngFunctionNotAllowed {
                    function: name.to_string(),
                },
                &position,
            );
            return Fun::new(name, args, ExprType::ill_formed()).into();
        }
        let result = self
            .signatures
            .get_result_type(name, &arg_types, &mut self.diagnostics, position, false);
        Fun::new(name, args, result).into()
    }

    /// Primitive operands are typed by the operator itself; anything else
    /// becomes a call of the operator's registry function.
    pub fn binary_op(&mut self, op: BinaryOperator, left: Expr, right: Expr, position: Position) -> Expr {
        let (lt, rt) = (left.expr_type(), right.expr_type());
        if lt.is_ill_formed() || rt.is_ill_formed() {
            return BinaryOp::new(op, left, right).into();
        }
        if lt.is_primitive() && rt.is_primitive() {
            let expr: Expr = BinaryOp::new(op, left, right).into();
            if expr.expr_type().is_ill_formed() {
                self.report(
                    ErrorImpl::OperandTypeError {
                        operator: op.symbol().to_string(),
                        operands: render_types(&[lt, rt]),
                    },
                    &position,
                );
            }
            return expr;
        }
        self.fun(op.function_name(), vec![left, right], position)
    }

    pub fn unary_op(&mut self, op: UnaryOperator, operand: Expr, position: Position) -> Expr {
        let et = operand.expr_type();
        if et.is_ill_formed() || (et.is_primitive() && op != UnaryOperator::Transpose) {
            return UnaryOp::new(op, operand).into();
        }
        match op {
            UnaryOperator::Plus if !et.is_void() => operand,
            _ => self.fun(op.function_name(), vec![operand], position),
        }
    }

    pub fn index_op(&mut self, expr: Expr, dimss: Vec<Vec<Expr>>, position: Position) -> Expr {
        let et = expr.expr_type();
        let mut valid = !et.is_ill_formed();
        for dim in dimss.iter().flatten() {
            valid &= self.check_index(dim, false, &position);
        }
        let num_index_dims: usize = dimss.iter().map(Vec::len).sum();
        let node = IndexOp::new(expr, dimss);
        if !valid {
            return node.into_ill_formed().into();
        }
        if node.expr_type().is_ill_formed() {
            self.report(
                ErrorImpl::TooManyIndexes {
                    expression_type: et.to_string(),
                    indexes: num_index_dims,
                },
                &position,
            );
        }
        node.into()
    }

    pub fn index_op_sliced(&mut self, expr: Expr, idxs: Vec<Idx>, position: Position) -> Expr {
        let et = expr.expr_type();
        let mut valid = !et.is_ill_formed();
        for idx in &idxs {
            valid &= self.check_idx(idx, &position);
        }
        let num_indexes = idxs.len();
        let node = IndexOpSliced::new(expr, idxs);
        if !valid {
            return node.into_ill_formed().into();
        }
        if node.expr_type().is_ill_formed() {
            self.report(
                ErrorImpl::TooManyIndexes {
                    expression_type: et.to_string(),
                    indexes: num_indexes,
                },
                &position,
            );
        }
        node.into()
    }

    /// A single index must be an int, a multi index an int array.
    fn check_index(&mut self, index: &Expr, multi: bool, position: &Position) -> bool {
        let et = index.expr_type();
        if et.is_ill_formed() {
            return false;
        }
        let (accepted, expected) = if multi {
            (et == MK_EXPR_TYPE!(Int, 1), "int[]")
        } else {
            (et.is_primitive_int(), "int")
        };
        if !accepted {
            self.report(
                ErrorImpl::IndexTypeError {
                    expected: expected.to_string(),
                    received: et.to_string(),
                },
                position,
            );
        }
        accepted
    }

    fn check_idx(&mut self, idx: &Idx, position: &Position) -> bool {
        let multi = matches!(idx, Idx::Multi(_));
        idx.exprs()
            .into_iter()
            .map(|e| self.check_index(e, multi, position))
            .fold(true, |all, ok| all && ok)
    }

    pub fn integrate_ode(&mut self, ode: IntegrateOde, position: Position) -> Expr {
        let valid = self.check_ode(ode.integration_function(), ode.system_function(), &ode.arguments(), &position);
        if valid {
            ode.into()
        } else {
            ode.into_ill_formed().into()
        }
    }

    pub fn integrate_ode_control(&mut self, ode: IntegrateOdeControl, position: Position) -> Expr {
        let valid = self.check_ode(
            ode.ode().integration_function(),
            ode.ode().system_function(),
            &ode.arguments(),
            &position,
        );
        if valid {
            ode.into()
        } else {
            ode.into_ill_formed().into()
        }
    }

    fn check_ode(&mut self, integration_function: &str, system_function: &str, arguments: &[OdeArgument<'_>], position: &Position) -> bool {
        let mut valid = true;

        let system_signature = MK_SIGNATURE!(
            MK_EXPR_TYPE!(Double, 1);
            MK_EXPR_TYPE!(Double),
            MK_EXPR_TYPE!(Double, 1),
            MK_EXPR_TYPE!(Double, 1),
            MK_EXPR_TYPE!(Double, 1),
            MK_EXPR_TYPE!(Int, 1)
        );
        if !self.signatures.is_defined(system_function, &system_signature) {
            self.report(
                ErrorImpl::OdeSystemFunction {
                    function: system_function.to_string(),
                },
                position,
            );
            valid = false;
        }

        for argument in arguments {
            let et = argument.expr.expr_type();
            if et.is_ill_formed() {
                valid = false;
                continue;
            }
            if !argument.kind.accepts(et) {
                self.report(
                    ErrorImpl::OdeArgumentTypeError {
                        function: integration_function.to_string(),
                        argument: argument.label.to_string(),
                        expected: argument.kind.describe().to_string(),
                        received: et.to_string(),
                    },
                    position,
                );
                valid = false;
                continue;
            }
            if argument.data_only && !argument.expr.is_data_only(&self.variable_map) {
                self.report(
                    ErrorImpl::OdeArgumentNotData {
                        function: integration_function.to_string(),
                        argument: argument.label.to_string(),
                    },
                    position,
                );
                valid = false;
            }
        }
        valid
    }

    // Statements

    /// The declared type of an assignment target, if it may be assigned
    /// from the block being checked.
    fn assignable_target(&mut self, name: &str, position: &Position) -> Option<ExprType> {
        let Some(origin) = self.variable_map.get_origin(name) else {
            self.report(
                ErrorImpl::UndeclaredVariable {
                    variable: name.to_string(),
                },
                position,
            );
            return None;
        };
        let wrong_block = origin.is_function_argument()
            || origin == VarOrigin::ModelName
            || (origin != VarOrigin::Local && origin != self.origin);
        if wrong_block {
            self.report(
                ErrorImpl::AssignmentWrongBlock {
                    variable: name.to_string(),
                    origin: origin.to_string(),
                },
                position,
            );
            return None;
        }
        self.variable_map.get(name).map(BaseVarDecl::expr_type)
    }

    fn check_assigned_value(&mut self, name: &str, lhs_type: ExprType, rhs: &Expr, position: &Position) {
        let rhs_type = rhs.expr_type();
        if rhs_type.is_ill_formed() || lhs_type.is_ill_formed() {
            return;
        }
        if rhs_type.is_void() {
            self.report(
                ErrorImpl::VoidExpression {
                    context: String::from("assignment"),
                },
                position,
            );
        } else if !is_assignable(lhs_type, rhs_type) {
            self.report(
                ErrorImpl::AssignmentTypeMismatch {
                    variable: name.to_string(),
                    expected: lhs_type.to_string(),
                    received: rhs_type.to_string(),
                },
                position,
            );
        }
    }

    /// `name[dims] <- rhs`
    pub fn assignment(&mut self, var_dims: VariableDims, rhs: Expr, span: Span) -> Statement {
        let position = span.start.clone();
        let var_type = self.variable_map.get(&var_dims.name).map_or(ExprType::ill_formed(), BaseVarDecl::expr_type);

        if let Some(declared) = self.assignable_target(&var_dims.name, &position) {
            let mut valid = true;
            for dim in &var_dims.dims {
                valid &= self.check_index(dim, false, &position);
            }
            if valid {
                let lhs_type = infer_type_indexing(declared.base_type(), declared.num_dims(), var_dims.dims.len());
                if lhs_type.is_ill_formed() {
                    self.report(
                        ErrorImpl::TooManyIndexes {
                            expression_type: declared.to_string(),
                            indexes: var_dims.dims.len(),
                        },
                        &position,
                    );
                } else {
                    self.check_assigned_value(&var_dims.name, lhs_type, &rhs, &position);
                }
            }
        }

        Statement::new(
            StmtKind::Assignment(Assignment {
                var_dims,
                expr: rhs,
                var_type,
            }),
            span,
        )
    }

    /// `name[idxs] = rhs`
    pub fn assgn(&mut self, lhs_var: &str, idxs: Vec<Idx>, rhs: Expr, span: Span) -> Statement {
        let position = span.start.clone();

        if let Some(declared) = self.assignable_target(lhs_var, &position) {
            let mut valid = true;
            for idx in &idxs {
                valid &= self.check_idx(idx, &position);
            }
            if valid {
                let lhs_type = indexed_type(declared, &idxs);
                if lhs_type.is_ill_formed() {
                    self.report(
                        ErrorImpl::TooManyIndexes {
                            expression_type: declared.to_string(),
                            indexes: idxs.len(),
                        },
                        &position,
                    );
                } else {
                    self.check_assigned_value(lhs_var, lhs_type, &rhs, &position);
                }
            }
        }

        Statement::new(
            StmtKind::Assgn(Assgn {
                lhs_var: lhs_var.to_string(),
                idxs,
                rhs,
            }),
            span,
        )
    }

    /// `expr ~ family(args) T[low, high]`
    pub fn sample(&mut self, expr: Expr, dist: Distribution, truncation: Range, span: Span) -> Statement {
        let position = span.start.clone();
        if !self.origin.allows_sampling() {
            self.report(ErrorImpl::SamplingNotAllowed, &position);
        }

        let mut arg_types = vec![expr.expr_type()];
        arg_types.extend(dist.args.iter().map(Expr::expr_type));

        if arg_types.iter().any(ExprType::is_void) {
            self.report(
                ErrorImpl::VoidExpression {
                    context: String::from("sampling statement"),
                },
                &position,
            );
        } else if !arg_types.iter().any(ExprType::is_ill_formed) {
            self.signatures.get_result_type(
                &format!("{}_log", dist.family),
                &arg_types,
                &mut self.diagnostics,
                position.clone(),
                true,
            );

            let bounds = [(&truncation.low, "_ccdf_log"), (&truncation.high, "_cdf_log")];
            for (bound, suffix) in bounds {
                let Some(bound) = bound else {
                    continue;
                };
                let bound_type = bound.expr_type();
                if bound_type.is_ill_formed() {
                    continue;
                }
                if !bound_type.is_primitive() {
                    self.report(
                        ErrorImpl::TruncationTypeError {
                            received: bound_type.to_string(),
                        },
                        &position,
                    );
                    continue;
                }
                let mut cdf_types = vec![bound_type];
                cdf_types.extend_from_slice(&arg_types[1..]);
                self.signatures.get_result_type(
                    &format!("{}{}", dist.family, suffix),
                    &cdf_types,
                    &mut self.diagnostics,
                    position.clone(),
                    false,
                );
            }

            if self.config.warn_on_jacobian && expr.has_non_param_var(&self.variable_map) {
                self.diagnostics.warning(ErrorImpl::JacobianWarning, position.clone());
            }
        }

        Statement::new(StmtKind::Sample(Sample { expr, dist, truncation }), span)
    }

    pub fn increment_log_prob(&mut self, expr: Expr, span: Span) -> Statement {
        let position = span.start.clone();
        if !self.origin.allows_sampling() {
            self.report(ErrorImpl::IncrementLogProbNotAllowed, &position);
        }
        if expr.expr_type().is_void() {
            self.report(
                ErrorImpl::VoidExpression {
                    context: String::from("increment_log_prob"),
                },
                &position,
            );
        }
        Statement::new(StmtKind::IncrementLogProb(expr), span)
    }

    /// Only calls of void functions may stand alone as statements.
    pub fn expression_statement(&mut self, expr: Expr, span: Span) -> Statement {
        let et = expr.expr_type();
        if !et.is_ill_formed() && !et.is_void() {
            self.report(
                ErrorImpl::NonVoidExpressionStatement {
                    received: et.to_string(),
                },
                &span.start,
            );
        }
        Statement::new(StmtKind::Expression(expr), span)
    }

    /// Opens a block; local declarations that follow are scoped to it.
    pub fn begin_statements(&mut self) {
        self.open_scope();
    }

    /// Closes the block opened by `begin_statements`.
    pub fn finish_statements(&mut self, local_decls: Vec<VarDecl>, statements: Vec<Statement>, span: Span) -> Statement {
        self.close_scope();
        Statement::new(
            StmtKind::Statements(Statements {
                local_decls,
                statements,
            }),
            span,
        )
    }

    /// Checks the loop bounds and scopes the loop variable as an int local
    /// for the body. Returns whether the variable was added.
    pub fn begin_for(&mut self, variable: &str, low: &Expr, high: &Expr, position: Position) -> bool {
        for bound in [low, high] {
            let et = bound.expr_type();
            if !et.is_ill_formed() && !et.is_primitive_int() {
                self.report(
                    ErrorImpl::LoopBoundTypeError {
                        received: et.to_string(),
                    },
                    &position,
                );
            }
        }

        self.open_scope();
        if let Err(error) = self.validate_new_name(variable, VarOrigin::Local, &position) {
            self.diagnostics.push(error);
            return false;
        }
        self.variable_map.add(
            variable,
            BaseVarDecl::new(variable, vec![], BaseType::Int),
            VarOrigin::Local,
        );
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(variable.to_string());
        }
        true
    }

    pub fn finish_for(&mut self, variable: &str, low: Expr, high: Expr, body: Statement, span: Span) -> Statement {
        self.close_scope();
        Statement::new(
            StmtKind::For(ForStatement {
                variable: variable.to_string(),
                range: Range::new(Some(low), Some(high)),
                body: Box::new(body),
            }),
            span,
        )
    }

    fn check_condition(&mut self, condition: &Expr, position: &Position) {
        let et = condition.expr_type();
        if !et.is_ill_formed() && !et.is_primitive() {
            self.report(
                ErrorImpl::ConditionTypeError {
                    received: et.to_string(),
                },
                position,
            );
        }
    }

    pub fn conditional(&mut self, conditions: Vec<Expr>, bodies: Vec<Statement>, span: Span) -> Statement {
        for condition in &conditions {
            self.check_condition(condition, &span.start);
        }
        Statement::new(StmtKind::Conditional(Conditional { conditions, bodies }), span)
    }

    pub fn while_statement(&mut self, condition: Expr, body: Statement, span: Span) -> Statement {
        self.check_condition(&condition, &span.start);
        Statement::new(
            StmtKind::While(WhileStatement {
                condition,
                body: Box::new(body),
            }),
            span,
        )
    }

    fn check_printables(&mut self, printables: &[Printable], context: &str, position: &Position) {
        let has_void = printables
            .iter()
            .any(|p| matches!(p, Printable::Expr(e) if e.expr_type().is_void()));
        if has_void {
            self.report(
                ErrorImpl::VoidExpression {
                    context: context.to_string(),
                },
                position,
            );
        }
    }

    pub fn print(&mut self, printables: Vec<Printable>, span: Span) -> Statement {
        self.check_printables(&printables, "print", &span.start);
        Statement::new(StmtKind::Print(printables), span)
    }

    pub fn reject(&mut self, printables: Vec<Printable>, span: Span) -> Statement {
        self.check_printables(&printables, "reject", &span.start);
        Statement::new(StmtKind::Reject(printables), span)
    }

    pub fn return_statement(&mut self, value: Option<Expr>, span: Span) -> Statement {
        let position = span.start.clone();
        match self.function.as_ref().map(|f| f.return_type) {
            None => self.report(ErrorImpl::ReturnOutsideFunction, &position),
            Some(return_type) => match &value {
                Some(e) if e.expr_type().is_ill_formed() => {}
                Some(e) => {
                    let et = e.expr_type();
                    if return_type.is_void() {
                        self.report(ErrorImpl::VoidFunctionReturnsValue, &position);
                    } else if et.is_void() {
                        self.report(
                            ErrorImpl::VoidExpression {
                                context: String::from("return"),
                            },
                            &position,
                        );
                    } else if !is_assignable(return_type, et) {
                        self.report(
                            ErrorImpl::ReturnTypeMismatch {
                                expected: return_type.to_string(),
                                received: et.to_string(),
                            },
                            &position,
                        );
                    }
                }
                None if !return_type.is_void() => self.report(ErrorImpl::MissingReturnValue, &position),
                None => {}
            },
        }
        Statement::new(StmtKind::Return(ReturnStatement { value }), span)
    }

    pub fn no_op(&self, span: Span) -> Statement {
        Statement::no_op(span)
    }

    // Functions

    /// Validates a function header, registers its signature and scopes
    /// the arguments for the body. Returns whether the header is valid.
    pub fn start_function(&mut self, return_type: ExprType, name: &str, arg_decls: &[ArgDecl], position: Position) -> bool {
        let mut valid = true;

        if let Err(reason) = validate_identifier(name) {
            self.report(
                ErrorImpl::IllegalIdentifier {
                    identifier: name.to_string(),
                    reason,
                },
                &position,
            );
            valid = false;
        }
        for arg in arg_decls.iter().filter(|a| a.arg_type.is_void() || a.arg_type.is_ill_formed()) {
            self.report(
                ErrorImpl::IllegalArgumentType {
                    function: name.to_string(),
                    argument: arg.name.clone(),
                },
                &position,
            );
            valid = false;
        }
        if name.ends_with("_log") && (!return_type.is_primitive_double() || arg_decls.is_empty()) {
            self.report(
                ErrorImpl::LogFunctionSignature {
                    function: name.to_string(),
                },
                &position,
            );
            valid = false;
        }

        let arg_types: Vec<ExprType> = arg_decls.iter().map(|a| a.arg_type).collect();
        let sig = FunctionSignature::new(return_type, arg_types.clone());
        if self.signatures.is_defined(name, &sig) && !self.signatures.is_user_defined(name, &sig) {
            self.report(
                ErrorImpl::FunctionAlreadyDefined {
                    function: name.to_string(),
                },
                &position,
            );
            valid = false;
        } else if self
            .signatures
            .overloads(name)
            .iter()
            .any(|other| other.args() == arg_types.as_slice() && other.result() != return_type)
        {
            self.report(
                ErrorImpl::FunctionDeclarationMismatch {
                    function: name.to_string(),
                },
                &position,
            );
            valid = false;
        }

        if valid {
            debug!("registering function {}", sig.describe(name));
            self.signatures.add(name, return_type, arg_types);
            self.signatures.set_user_defined(name, sig.clone());
            self.functions_declared
                .entry((name.to_string(), sig))
                .or_insert_with(|| position.clone());
        }

        let arg_origin = VarOrigin::for_function_arguments(name, return_type.is_void());
        let mut scoped = Vec::new();
        for arg in arg_decls {
            match self.validate_new_name(&arg.name, arg_origin, &position) {
                Ok(()) => {
                    self.variable_map.add(&arg.name, arg.base_variable_declaration(), arg_origin);
                    scoped.push(arg.name.clone());
                }
                Err(error) => {
                    self.diagnostics.push(error);
                    valid = false;
                }
            }
        }

        self.function = Some(FunctionScope {
            name: name.to_string(),
            return_type,
            args: scoped,
            enclosing_origin: self.origin,
        });
        self.origin = arg_origin;
        valid
    }

    /// Checks the body against the return type, unscopes the arguments and
    /// records the definition. A no-op body is a forward declaration.
    pub fn finish_function(
        &mut self,
        return_type: ExprType,
        name: &str,
        arg_decls: Vec<ArgDecl>,
        body: Statement,
        span: Span,
    ) -> FunctionDeclDef {
        let decl_def = FunctionDeclDef::new(return_type, name, arg_decls, body);

        if !decl_def.is_forward_declaration() {
            let sig = FunctionSignature::new(return_type, decl_def.arg_types());
            if !self.functions_defined.insert((name.to_string(), sig)) {
                self.report(
                    ErrorImpl::FunctionAlreadyDefined {
                        function: name.to_string(),
                    },
                    &span.start,
                );
            }
            // Return statements were already checked as they were built.
            let mut coverage = Diagnostics::new();
            returns_type(return_type, &decl_def.body, &mut coverage);
            self.diagnostics.append(coverage);
        }

        if let Some(scope) = self.function.take() {
            debug!("leaving function {}", scope.name);
            for arg in &scope.args {
                self.variable_map.remove(arg);
            }
            self.origin = scope.enclosing_origin;
        }
        decl_def
    }

    /// Reports functions that were declared but never given a body.
    pub fn finish_program(&mut self, program: Program) -> Program {
        let mut undefined: Vec<(&(String, FunctionSignature), &Position)> = self
            .functions_declared
            .iter()
            .filter(|(key, _)| !self.functions_defined.contains(*key))
            .collect();
        undefined.sort_by(|a, b| a.0.cmp(b.0));
        let errors: Vec<Error> = undefined
            .into_iter()
            .map(|((name, _), position)| {
                Error::new(
                    ErrorImpl::FunctionNotDefined {
                        function: name.clone(),
                    },
                    position.clone(),
                )
            })
            .collect();
        for error in errors {
            self.diagnostics.push(error);
        }
        program
    }
}
