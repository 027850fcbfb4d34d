use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UndeclaredVariable { .. } => "UndeclaredVariable",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::IllegalIdentifier { .. } => "IllegalIdentifier",
            ErrorImpl::IntegerParameter { .. } => "IntegerParameter",
            ErrorImpl::ConstraintsNotAllowed { .. } => "ConstraintsNotAllowed",
            ErrorImpl::DimensionTypeError { .. } => "DimensionTypeError",
            ErrorImpl::DimensionNotData { .. } => "DimensionNotData",
            ErrorImpl::ConstraintTypeError { .. } => "ConstraintTypeError",
            ErrorImpl::NoMatchingSignature { .. } => "NoMatchingSignature",
            ErrorImpl::AmbiguousCall { .. } => "AmbiguousCall",
            ErrorImpl::NoMatchingDistribution { .. } => "NoMatchingDistribution",
            ErrorImpl::EmptyArrayLiteral => "EmptyArrayLiteral",
            ErrorImpl::ArrayElementTypeMismatch { .. } => "ArrayElementTypeMismatch",
            ErrorImpl::OperandTypeError { .. } => "OperandTypeError",
            ErrorImpl::TooManyIndexes { .. } => "TooManyIndexes",
            ErrorImpl::IndexTypeError { .. } => "IndexTypeError",
            ErrorImpl::OdeSystemFunction { .. } => "OdeSystemFunction",
            ErrorImpl::OdeArgumentTypeError { .. } => "OdeArgumentTypeError",
            ErrorImpl::OdeArgumentNotData { .. } => "OdeArgumentNotData",
            ErrorImpl::AssignmentWrongBlock { .. } => "AssignmentWrongBlock",
            ErrorImpl::AssignmentTypeMismatch { .. } => "AssignmentTypeMismatch",
            ErrorImpl::LpFunctionNotAllowed { .. } => "LpFunctionNotAllowed",
            ErrorImpl::RngFunctionNotAllowed { .. } => "RngFunctionNotAllowed",
            ErrorImpl::SamplingNotAllowed => "SamplingNotAllowed",
            ErrorImpl::IncrementLogProbNotAllowed => "IncrementLogProbNotAllowed",
            ErrorImpl::TruncationTypeError { .. } => "TruncationTypeError",
            ErrorImpl::JacobianWarning => "JacobianWarning",
            ErrorImpl::VoidExpression { .. } => "VoidExpression",
            ErrorImpl::NonVoidExpressionStatement { .. } => "NonVoidExpressionStatement",
            ErrorImpl::ConditionTypeError { .. } => "ConditionTypeError",
            ErrorImpl::LoopBoundTypeError { .. } => "LoopBoundTypeError",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::VoidFunctionReturnsValue => "VoidFunctionReturnsValue",
            ErrorImpl::MissingReturnValue => "MissingReturnValue",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::FunctionAlreadyDefined { .. } => "FunctionAlreadyDefined",
            ErrorImpl::FunctionDeclarationMismatch { .. } => "FunctionDeclarationMismatch",
            ErrorImpl::FunctionNotDefined { .. } => "FunctionNotDefined",
            ErrorImpl::LogFunctionSignature { .. } => "LogFunctionSignature",
            ErrorImpl::IllegalArgumentType { .. } => "IllegalArgumentType",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UndeclaredVariable { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` is not in scope", variable))
            }
            ErrorImpl::VariableAlreadyDeclared {
                variable,
                original,
                attempted,
            } => ErrorTip::Suggestion(format!(
                "Variable `{}` was declared as {}, attempted to redeclare as {}",
                variable, original, attempted
            )),
            ErrorImpl::IllegalIdentifier { identifier, reason } => {
                ErrorTip::Suggestion(format!("Identifier `{}` {}", identifier, reason))
            }
            ErrorImpl::IntegerParameter { variable } => ErrorTip::Suggestion(format!(
                "Parameter `{}` is declared int, parameters must be real-valued",
                variable
            )),
            ErrorImpl::ConstraintsNotAllowed { variable } => ErrorTip::Suggestion(format!(
                "Remove the constraints from local variable `{}`",
                variable
            )),
            ErrorImpl::DimensionTypeError { variable, received } => ErrorTip::Suggestion(format!(
                "Sizes of `{}` must be int, found `{}`",
                variable, received
            )),
            ErrorImpl::DimensionNotData { variable } => ErrorTip::Suggestion(format!(
                "Sizes of `{}` may only depend on data",
                variable
            )),
            ErrorImpl::ConstraintTypeError {
                variable,
                constraint,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Constraint `{}` of `{}` must be {}, found `{}`",
                constraint, variable, expected, received
            )),
            ErrorImpl::NoMatchingSignature {
                function,
                arguments,
                available,
            } => ErrorTip::Suggestion(signature_listing(
                &format!("No matches for `{}({})`", function, arguments),
                function,
                available,
            )),
            ErrorImpl::AmbiguousCall {
                function,
                arguments,
                matches,
            } => ErrorTip::Suggestion(format!(
                "Call `{}({})` matches {} signatures equally well",
                function, arguments, matches
            )),
            ErrorImpl::NoMatchingDistribution {
                distribution,
                arguments,
                available,
            } => ErrorTip::Suggestion(signature_listing(
                &format!("No matches for `{} ~ {}(...)`", arguments, distribution),
                distribution,
                available,
            )),
            ErrorImpl::EmptyArrayLiteral => ErrorTip::Suggestion(String::from(
                "Array expressions must contain at least one element",
            )),
            ErrorImpl::ArrayElementTypeMismatch { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Array elements must share one type, found `{}` and `{}`",
                    expected, received
                ))
            }
            ErrorImpl::OperandTypeError { operator, operands } => ErrorTip::Suggestion(format!(
                "Operator `{}` is not defined for operands `{}`",
                operator, operands
            )),
            ErrorImpl::TooManyIndexes {
                expression_type,
                indexes,
            } => ErrorTip::Suggestion(format!(
                "Cannot apply {} indexes to an expression of type `{}`",
                indexes, expression_type
            )),
            ErrorImpl::IndexTypeError { expected, received } => ErrorTip::Suggestion(format!(
                "Index must be `{}`, found `{}`",
                expected, received
            )),
            ErrorImpl::OdeSystemFunction { function } => ErrorTip::Suggestion(format!(
                "System function `{}` must have signature (real, real[], real[], real[], int[]) : real[]",
                function
            )),
            ErrorImpl::OdeArgumentTypeError {
                function,
                argument,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Argument `{}` to `{}` must be `{}`, found `{}`",
                argument, function, expected, received
            )),
            ErrorImpl::OdeArgumentNotData { function, argument } => ErrorTip::Suggestion(format!(
                "Argument `{}` to `{}` may only depend on data",
                argument, function
            )),
            ErrorImpl::AssignmentWrongBlock { variable, origin } => ErrorTip::Suggestion(format!(
                "Variable `{}` belongs to {} and cannot be assigned here",
                variable, origin
            )),
            ErrorImpl::AssignmentTypeMismatch {
                variable,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Cannot assign `{}` to `{}` of type `{}`",
                received, variable, expected
            )),
            ErrorImpl::LpFunctionNotAllowed { function } => ErrorTip::Suggestion(format!(
                "`{}` may only be used in transformed parameters, model or _lp functions",
                function
            )),
            ErrorImpl::RngFunctionNotAllowed { function } => ErrorTip::Suggestion(format!(
                "`{}` may only be used in transformed data, generated quantities or _rng functions",
                function
            )),
            ErrorImpl::SamplingNotAllowed => ErrorTip::Suggestion(String::from(
                "Sampling statements are only allowed in the model block or _lp functions",
            )),
            ErrorImpl::IncrementLogProbNotAllowed => ErrorTip::Suggestion(String::from(
                "increment_log_prob is only allowed in the model block or _lp functions",
            )),
            ErrorImpl::TruncationTypeError { received } => ErrorTip::Suggestion(format!(
                "Truncation bounds must be int or real, found `{}`",
                received
            )),
            ErrorImpl::JacobianWarning => ErrorTip::Suggestion(String::from(
                "If the left-hand side is a non-linear transform of a parameter, increment the log density with the log absolute Jacobian determinant",
            )),
            ErrorImpl::VoidExpression { context } => {
                ErrorTip::Suggestion(format!("Void expression not allowed in {}", context))
            }
            ErrorImpl::NonVoidExpressionStatement { received } => ErrorTip::Suggestion(format!(
                "Expression of type `{}` used as a statement, only void function calls may be",
                received
            )),
            ErrorImpl::ConditionTypeError { received } => ErrorTip::Suggestion(format!(
                "Conditions must be int or real, found `{}`",
                received
            )),
            ErrorImpl::LoopBoundTypeError { received } => ErrorTip::Suggestion(format!(
                "Loop bounds must be int, found `{}`",
                received
            )),
            ErrorImpl::ReturnOutsideFunction => ErrorTip::None,
            ErrorImpl::ReturnTypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Returned `{}` does not match return type `{}`",
                received, expected
            )),
            ErrorImpl::VoidFunctionReturnsValue => ErrorTip::Suggestion(String::from(
                "Void functions may only use `return;`",
            )),
            ErrorImpl::MissingReturnValue => ErrorTip::Suggestion(String::from(
                "Non-void functions must return a value",
            )),
            ErrorImpl::MissingReturn { found } => ErrorTip::Suggestion(format!(
                "Every path through a non-void function must end in a return, found {}",
                found
            )),
            ErrorImpl::FunctionAlreadyDefined { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already defined", function))
            }
            ErrorImpl::FunctionDeclarationMismatch { function } => ErrorTip::Suggestion(format!(
                "Function `{}` declared with a different return type",
                function
            )),
            ErrorImpl::FunctionNotDefined { function } => ErrorTip::Suggestion(format!(
                "Function `{}` declared but never defined",
                function
            )),
            ErrorImpl::LogFunctionSignature { function } => ErrorTip::Suggestion(format!(
                "`{}` ends in _log so it must return real and take at least one argument",
                function
            )),
            ErrorImpl::IllegalArgumentType { function, argument } => ErrorTip::Suggestion(format!(
                "Argument `{}` of `{}` cannot be void",
                argument, function
            )),
        }
    }
}

fn signature_listing(header: &str, function: &str, available: &[String]) -> String {
    if available.is_empty() {
        format!("{}; no function named `{}`", header, function)
    } else {
        format!(
            "{}; available signatures for `{}`: {}",
            header,
            function,
            available.join(", ")
        )
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.position.0, self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("variable {variable:?} not in scope")]
    UndeclaredVariable { variable: String },
    #[error("duplicate declaration of variable {variable:?}")]
    VariableAlreadyDeclared {
        variable: String,
        original: String,
        attempted: String,
    },
    #[error("illegal identifier {identifier:?}: {reason}")]
    IllegalIdentifier { identifier: String, reason: String },
    #[error("integer parameters or transformed parameters are not allowed: {variable:?}")]
    IntegerParameter { variable: String },
    #[error("local variable {variable:?} may not have constraints")]
    ConstraintsNotAllowed { variable: String },
    #[error("dimension of {variable:?} must be int, found {received}")]
    DimensionTypeError { variable: String, received: String },
    #[error("non-local variable dimensions must be data only: {variable:?}")]
    DimensionNotData { variable: String },
    #[error("constraint {constraint} of {variable:?} must be {expected}, found {received}")]
    ConstraintTypeError {
        variable: String,
        constraint: String,
        expected: String,
        received: String,
    },
    #[error("no matching signature for {function}({arguments})")]
    NoMatchingSignature {
        function: String,
        arguments: String,
        available: Vec<String>,
    },
    #[error("ambiguous call {function}({arguments}): {matches} equally good signatures")]
    AmbiguousCall {
        function: String,
        arguments: String,
        matches: usize,
    },
    #[error("no matching distribution {distribution} for sampled type {arguments}")]
    NoMatchingDistribution {
        distribution: String,
        arguments: String,
        available: Vec<String>,
    },
    #[error("array expression must contain at least one element")]
    EmptyArrayLiteral,
    #[error("array elements must have the same type: expected {expected}, found {received}")]
    ArrayElementTypeMismatch { expected: String, received: String },
    #[error("operator {operator} not defined for operands {operands}")]
    OperandTypeError { operator: String, operands: String },
    #[error("too many indexes ({indexes}) for expression of type {expression_type}")]
    TooManyIndexes {
        expression_type: String,
        indexes: usize,
    },
    #[error("index must be {expected}, found {received}")]
    IndexTypeError { expected: String, received: String },
    #[error("ode system function {function:?} not found with the required signature")]
    OdeSystemFunction { function: String },
    #[error("argument {argument} to {function} must be {expected}, found {received}")]
    OdeArgumentTypeError {
        function: String,
        argument: String,
        expected: String,
        received: String,
    },
    #[error("argument {argument} to {function} must be data only")]
    OdeArgumentNotData { function: String, argument: String },
    #[error("attempt to assign variable {variable:?} in wrong block (origin {origin})")]
    AssignmentWrongBlock { variable: String, origin: String },
    #[error("type mismatch assigning to {variable:?}: expected {expected}, found {received}")]
    AssignmentTypeMismatch {
        variable: String,
        expected: String,
        received: String,
    },
    #[error("function {function:?} ending in _lp not allowed here")]
    LpFunctionNotAllowed { function: String },
    #[error("function {function:?} ending in _rng not allowed here")]
    RngFunctionNotAllowed { function: String },
    #[error("sampling not allowed in this block")]
    SamplingNotAllowed,
    #[error("increment_log_prob not allowed in this block")]
    IncrementLogProbNotAllowed,
    #[error("truncation bound must be int or real, found {received}")]
    TruncationTypeError { received: String },
    #[error("left-hand side of sampling statement may contain a non-linear transform")]
    JacobianWarning,
    #[error("void expression in {context}")]
    VoidExpression { context: String },
    #[error("illegal statement beginning with non-void expression of type {received}")]
    NonVoidExpressionStatement { received: String },
    #[error("condition must be int or real, found {received}")]
    ConditionTypeError { received: String },
    #[error("loop bound must be int, found {received}")]
    LoopBoundTypeError { received: String },
    #[error("return statements only allowed in function bodies")]
    ReturnOutsideFunction,
    #[error("returned expression does not match return type: expected {expected}, found {received}")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("void function cannot return a value")]
    VoidFunctionReturnsValue,
    #[error("non-void function must return a value")]
    MissingReturnValue,
    #[error("expecting return, found {found}")]
    MissingReturn { found: String },
    #[error("function {function:?} already defined")]
    FunctionAlreadyDefined { function: String },
    #[error("function {function:?} redeclared with a different return type")]
    FunctionDeclarationMismatch { function: String },
    #[error("function {function:?} declared but not defined")]
    FunctionNotDefined { function: String },
    #[error("function {function:?} ending in _log must return real with at least one argument")]
    LogFunctionSignature { function: String },
    #[error("argument {argument:?} of function {function:?} has an illegal type")]
    IllegalArgumentType { function: String, argument: String },
}
