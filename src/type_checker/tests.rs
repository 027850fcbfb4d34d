//! Unit tests for the type checker module.
//!
//! This module contains tests for:
//! - Overload resolution and the built-in library
//! - The symbol table and variable origins
//! - Declaration validation
//! - Expression and statement checking per block
//! - User-defined functions and ODE solver calls

use std::rc::Rc;

use crate::ast::ast::{ArgDecl, Program};
use crate::ast::declarations::{BaseVarDecl, VarDecl};
use crate::ast::expressions::{BinaryOperator, Expr, IntegrateOde, IntegrateOdeControl, UnaryOperator};
use crate::ast::indexing::Idx;
use crate::ast::statements::{Distribution, Printable, Range, Statement, VariableDims};
use crate::ast::types::{BaseType, ExprType};
use crate::config::CheckerConfig;
use crate::errors::diagnostics::Diagnostics;
use crate::type_checker::builtins::validate_identifier;
use crate::type_checker::signatures::{num_promotions, FunctionSignatures};
use crate::type_checker::type_checker::TypeChecker;
use crate::type_checker::variable_map::{VarOrigin, VariableMap};
use crate::{Position, Span, MK_EXPR_TYPE, MK_SIGNATURE};

fn pos(line: u32) -> Position {
    Position(line, Rc::new(String::from("test.stan")))
}

fn span(line: u32) -> Span {
    Span::line(pos(line))
}

fn error_names(tc: &TypeChecker) -> Vec<String> {
    tc.diagnostics().error_names().into_iter().map(String::from).collect()
}

/// A checker with `real y; real y_arr[3];` as data, `real mu; real<lower=0> sigma;`
/// as parameters and `real log_sigma;` as a transformed parameter, left in
/// the model block.
fn model_checker() -> TypeChecker {
    let mut tc = TypeChecker::new();
    tc.enter_block(VarOrigin::Data);
    assert!(tc.add_var(&VarDecl::double("y", vec![], Range::unbounded()), pos(1)));
    let three = tc.int_literal(3);
    assert!(tc.add_var(&VarDecl::double("y_arr", vec![three], Range::unbounded()), pos(2)));
    tc.enter_block(VarOrigin::Parameter);
    assert!(tc.add_var(&VarDecl::double("mu", vec![], Range::unbounded()), pos(3)));
    let zero = tc.int_literal(0);
    assert!(tc.add_var(&VarDecl::double("sigma", vec![], Range::new(Some(zero), None)), pos(4)));
    tc.enter_block(VarOrigin::TransformedParameter);
    assert!(tc.add_var(&VarDecl::double("log_sigma", vec![], Range::unbounded()), pos(5)));
    tc.enter_block(VarOrigin::Local);
    assert!(!tc.diagnostics().has_errors());
    tc
}

#[test]
fn test_num_promotions() {
    let i = MK_EXPR_TYPE!(Int);
    let r = MK_EXPR_TYPE!(Double);
    assert_eq!(num_promotions(&[r, r], &[r, r]), Some(0));
    assert_eq!(num_promotions(&[i, i], &[r, r]), Some(2));
    assert_eq!(num_promotions(&[i, r], &[r, r]), Some(1));
    assert_eq!(num_promotions(&[r], &[i]), None);
    assert_eq!(num_promotions(&[i], &[i, i]), None);
    assert_eq!(num_promotions(&[MK_EXPR_TYPE!(Int, 1)], &[MK_EXPR_TYPE!(Double, 1)]), None);
}

#[test]
fn test_signature_resolution_picks_fewest_promotions() {
    let sigs = FunctionSignatures::new();
    let mut diagnostics = Diagnostics::new();

    let result = sigs.get_result_type("min", &[MK_EXPR_TYPE!(Int), MK_EXPR_TYPE!(Int)], &mut diagnostics, pos(1), false);
    assert_eq!(result, MK_EXPR_TYPE!(Int));

    let result = sigs.get_result_type("min", &[MK_EXPR_TYPE!(Int), MK_EXPR_TYPE!(Double)], &mut diagnostics, pos(1), false);
    assert_eq!(result, MK_EXPR_TYPE!(Double));

    let result = sigs.get_result_type(
        "normal_log",
        &[MK_EXPR_TYPE!(Vector), MK_EXPR_TYPE!(Int), MK_EXPR_TYPE!(Int)],
        &mut diagnostics,
        pos(1),
        false,
    );
    assert_eq!(result, MK_EXPR_TYPE!(Double));
    assert!(!diagnostics.has_errors());
}

#[test]
fn test_signature_resolution_ambiguous() {
    let mut sigs = FunctionSignatures::empty();
    let (i, r) = (MK_EXPR_TYPE!(Int), MK_EXPR_TYPE!(Double));
    sigs.add2("f", r, r, i);
    sigs.add2("f", r, i, r);

    let (count, sig) = sigs.get_signature_matches("f", &[i, i]);
    assert_eq!(count, 2);
    assert!(sig.is_some());

    let mut diagnostics = Diagnostics::new();
    assert!(sigs.get_result_type("f", &[i, i], &mut diagnostics, pos(3), false).is_ill_formed());
    assert_eq!(diagnostics.error_names(), vec!["AmbiguousCall"]);

    let mut diagnostics = Diagnostics::new();
    assert_eq!(sigs.get_result_type("f", &[r, i], &mut diagnostics, pos(3), false), r);
    assert!(!diagnostics.has_errors());
}

#[test]
fn test_signature_resolution_no_match() {
    let sigs = FunctionSignatures::new();
    let mut diagnostics = Diagnostics::new();

    let result = sigs.get_result_type("exp", &[MK_EXPR_TYPE!(Int, 2)], &mut diagnostics, pos(1), false);
    assert!(result.is_ill_formed());
    assert_eq!(diagnostics.error_names(), vec!["NoMatchingSignature"]);

    let result = sigs.get_result_type("foo_log", &[MK_EXPR_TYPE!(Double)], &mut diagnostics, pos(2), true);
    assert!(result.is_ill_formed());
    assert_eq!(diagnostics.error_names(), vec!["NoMatchingSignature", "NoMatchingDistribution"]);
    assert!(diagnostics.messages()[1].contains("no matching distribution foo"));
}

#[test]
fn test_add_is_idempotent() {
    let mut sigs = FunctionSignatures::empty();
    sigs.add1("g", MK_EXPR_TYPE!(Double), MK_EXPR_TYPE!(Vector));
    sigs.add1("g", MK_EXPR_TYPE!(Double), MK_EXPR_TYPE!(Vector));
    assert_eq!(sigs.overloads("g").len(), 1);
    assert!(sigs.is_defined("g", &MK_SIGNATURE!(MK_EXPR_TYPE!(Double); MK_EXPR_TYPE!(Vector))));
    assert!(sigs.overloads("h").is_empty());
}

#[test]
fn test_builtins_loaded() {
    let sigs = FunctionSignatures::new();
    for name in ["add", "multiply", "transpose", "normal_log", "normal_cdf_log", "normal_ccdf_log", "normal_rng", "poisson_log", "dirichlet_log", "pi", "rep_array"] {
        assert!(sigs.has_key(name), "missing builtin {}", name);
    }
    assert!(sigs.is_defined(
        "add",
        &MK_SIGNATURE!(MK_EXPR_TYPE!(Vector); MK_EXPR_TYPE!(Vector), MK_EXPR_TYPE!(Vector))
    ));
    assert!(sigs.key_set().contains("exp"));
}

#[test]
fn test_reset_drops_user_functions() {
    let mut sigs = FunctionSignatures::new();
    let sig = MK_SIGNATURE!(MK_EXPR_TYPE!(Double); MK_EXPR_TYPE!(Double));
    sigs.add1("my_fun", MK_EXPR_TYPE!(Double), MK_EXPR_TYPE!(Double));
    sigs.set_user_defined("my_fun", sig.clone());
    assert!(sigs.is_user_defined("my_fun", &sig));

    sigs.reset();
    assert!(!sigs.has_key("my_fun"));
    assert!(!sigs.is_user_defined("my_fun", &sig));
    assert!(sigs.has_key("exp"));
}

#[test]
fn test_signature_describe() {
    let sig = MK_SIGNATURE!(MK_EXPR_TYPE!(Double); MK_EXPR_TYPE!(Vector), MK_EXPR_TYPE!(Double, 2));
    assert_eq!(sig.describe("f"), "real f(vector, real[,])");
    assert_eq!(sig.to_string(), "real(vector, real[,])");
}

#[test]
fn test_validate_identifier() {
    assert!(validate_identifier("x").is_ok());
    assert!(validate_identifier("log_sigma2").is_ok());
    assert!(validate_identifier("2x").is_err());
    assert!(validate_identifier("_x").is_err());
    assert_eq!(validate_identifier("x__"), Err(String::from("must not end in two underscores")));
    assert_eq!(validate_identifier("for"), Err(String::from("is a reserved word")));
    assert_eq!(validate_identifier("class"), Err(String::from("is a reserved word")));
}

#[test]
fn test_variable_map() {
    let mut vm = VariableMap::new();
    assert!(vm.is_empty());
    vm.add("b", BaseVarDecl::with_rank("b", 2, BaseType::Double), VarOrigin::Data);
    vm.add("a", BaseVarDecl::new("a", vec![], BaseType::Int), VarOrigin::Data);
    vm.add("p", BaseVarDecl::new("p", vec![], BaseType::Vector), VarOrigin::Parameter);

    assert_eq!(vm.len(), 3);
    assert!(vm.exists("a"));
    assert_eq!(vm.get_base_type("p"), BaseType::Vector);
    assert_eq!(vm.get_base_type("missing"), BaseType::IllFormed);
    assert_eq!(vm.get_num_dims("b"), 2);
    assert_eq!(vm.get_origin("p"), Some(VarOrigin::Parameter));

    let data: Vec<&String> = vm.iter_origin(VarOrigin::Data).map(|(name, _)| name).collect();
    assert_eq!(data, vec!["a", "b"]);

    assert!(vm.remove("a").is_some());
    assert!(!vm.exists("a"));
    assert!(vm.remove("a").is_none());
}

#[test]
fn test_var_origin_rules() {
    assert_eq!(VarOrigin::for_function_arguments("f", false), VarOrigin::FunctionArgument);
    assert_eq!(VarOrigin::for_function_arguments("f_lp", false), VarOrigin::FunctionArgumentLp);
    assert_eq!(VarOrigin::for_function_arguments("f_rng", true), VarOrigin::VoidFunctionArgumentRng);

    assert!(VarOrigin::Local.allows_sampling());
    assert!(!VarOrigin::Derived.allows_sampling());
    assert!(VarOrigin::TransformedParameter.allows_lp());
    assert!(!VarOrigin::Derived.allows_lp());
    assert!(VarOrigin::Derived.allows_rng());
    assert!(VarOrigin::TransformedData.allows_rng());
    assert!(!VarOrigin::Local.allows_rng());
    assert_eq!(VarOrigin::Derived.to_string(), "generated quantities");
}

#[test]
fn test_integer_parameter_rejected() {
    let mut tc = TypeChecker::new();
    tc.enter_block(VarOrigin::Parameter);
    assert!(!tc.add_var(&VarDecl::int("n", vec![], Range::unbounded()), pos(2)));
    assert_eq!(error_names(&tc), vec!["IntegerParameter"]);
    assert!(!tc.variable_map().exists("n"));
}

#[test]
fn test_dimensions_must_be_int_data() {
    let mut tc = TypeChecker::new();
    tc.enter_block(VarOrigin::Derived);
    assert!(tc.add_var(&VarDecl::int("k", vec![], Range::unbounded()), pos(1)));

    let k = tc.variable("k", pos(2));
    assert!(!tc.add_var(&VarDecl::vector("v", vec![], Range::unbounded(), k.clone()), pos(2)));
    assert!(!tc.add_var(&VarDecl::double("xs", vec![k], Range::unbounded()), pos(3)));
    let half = tc.double_literal(0.5);
    assert!(!tc.add_var(&VarDecl::double("zs", vec![half], Range::unbounded()), pos(4)));

    assert_eq!(error_names(&tc), vec!["DimensionNotData", "DimensionNotData", "DimensionTypeError"]);
}

#[test]
fn test_constraint_types() {
    let mut tc = TypeChecker::new();
    let half = tc.double_literal(0.5);
    assert!(!tc.add_var(&VarDecl::int("n", vec![], Range::new(Some(half.clone()), None)), pos(1)));
    assert!(tc.add_var(&VarDecl::double("x", vec![], Range::new(Some(half.clone()), None)), pos(2)));
    assert!(!tc.add_var(&VarDecl::simplex("theta", vec![], half), pos(3)));

    assert_eq!(error_names(&tc), vec!["ConstraintTypeError", "ConstraintTypeError"]);
    assert!(tc.diagnostics().messages()[1].contains("constraint size of \"theta\" must be int, found real"));
}

#[test]
fn test_ill_formed_dimension_not_reported_twice() {
    let mut tc = TypeChecker::new();
    let n = tc.variable("N", pos(1));
    assert!(!tc.add_var(&VarDecl::double("x", vec![n], Range::unbounded()), pos(1)));
    assert_eq!(error_names(&tc), vec!["UndeclaredVariable"]);
}

#[test]
fn test_local_constraints_rejected() {
    let mut tc = model_checker();
    tc.begin_statements();
    let zero = tc.int_literal(0);
    assert!(!tc.add_var(&VarDecl::double("z", vec![], Range::new(Some(zero), None)), pos(10)));
    let three = tc.int_literal(3);
    assert!(!tc.add_var(&VarDecl::simplex("s", vec![], three), pos(11)));
    assert_eq!(error_names(&tc), vec!["ConstraintsNotAllowed", "ConstraintsNotAllowed"]);
}

#[test]
fn test_duplicate_declaration() {
    let mut tc = model_checker();
    assert!(!tc.add_var(&VarDecl::double("mu", vec![], Range::unbounded()), pos(10)));
    assert!(!tc.add_var(&VarDecl::double("model", vec![], Range::unbounded()), pos(11)));
    assert!(!tc.add_var(&VarDecl::double("x__", vec![], Range::unbounded()), pos(12)));
    assert_eq!(
        error_names(&tc),
        vec!["VariableAlreadyDeclared", "IllegalIdentifier", "IllegalIdentifier"]
    );
    assert!(tc.diagnostics().messages()[0].contains("duplicate declaration of variable \"mu\""));
}

#[test]
fn test_custom_model_name() {
    let mut tc = TypeChecker::with_config(CheckerConfig::default().with_model_name("eight_schools"));
    assert_eq!(tc.variable_map().get_origin("eight_schools"), Some(VarOrigin::ModelName));
    assert!(!tc.add_var(&VarDecl::double("eight_schools", vec![], Range::unbounded()), pos(1)));
    assert_eq!(error_names(&tc), vec!["VariableAlreadyDeclared"]);
    assert!(tc.diagnostics().messages()[0].contains("model name"));
}

#[test]
fn test_local_scope_closes() {
    let mut tc = model_checker();
    tc.begin_statements();
    let decl = VarDecl::double("z", vec![], Range::unbounded());
    assert!(tc.add_var(&decl, pos(10)));
    assert_eq!(tc.variable_map().get_origin("z"), Some(VarOrigin::Local));
    let block = tc.finish_statements(vec![decl], vec![], span(11));
    assert!(!block.is_no_op());
    assert!(!tc.variable_map().exists("z"));

    tc.begin_statements();
    let three = tc.int_literal(3);
    let redecl = VarDecl::vector("z", vec![], Range::unbounded(), three);
    assert!(tc.add_var(&redecl, pos(12)));
    let z = tc.variable("z", pos(13));
    assert_eq!(z.expr_type(), MK_EXPR_TYPE!(Vector));
    tc.finish_statements(vec![redecl], vec![], span(14));
    assert!(!tc.diagnostics().has_errors());
}

#[test]
fn test_undeclared_variable_propagates_silently() {
    let mut tc = model_checker();
    let x = tc.variable("x", pos(10));
    assert!(x.expr_type().is_ill_formed());

    let call = tc.fun("exp", vec![x], pos(10));
    assert!(call.expr_type().is_ill_formed());
    let one = tc.int_literal(1);
    let sum = tc.binary_op(BinaryOperator::Add, call, one, pos(10));
    assert!(sum.expr_type().is_ill_formed());

    assert_eq!(error_names(&tc), vec!["UndeclaredVariable"]);
}

#[test]
fn test_operators_on_containers_route_through_registry() {
    let mut tc = TypeChecker::new();
    let n = tc.int_literal(3);
    tc.add_var(&VarDecl::vector("v", vec![], Range::unbounded(), n.clone()), pos(1));
    tc.add_var(&VarDecl::row_vector("r", vec![], Range::unbounded(), n), pos(2));

    let v = tc.variable("v", pos(3));
    let sum = tc.binary_op(BinaryOperator::Add, v.clone(), v.clone(), pos(3));
    assert_eq!(sum.expr_type(), MK_EXPR_TYPE!(Vector));
    assert!(matches!(&sum, Expr::Fun(f) if f.name() == "add"));

    let r = tc.variable("r", pos(4));
    let dot = tc.binary_op(BinaryOperator::Multiply, r, v.clone(), pos(4));
    assert_eq!(dot.expr_type(), MK_EXPR_TYPE!(Double));

    let transposed = tc.unary_op(UnaryOperator::Transpose, v.clone(), pos(5));
    assert_eq!(transposed.expr_type(), MK_EXPR_TYPE!(RowVector));
    let negated = tc.unary_op(UnaryOperator::Minus, v.clone(), pos(5));
    assert_eq!(negated.expr_type(), MK_EXPR_TYPE!(Vector));
    let plus = tc.unary_op(UnaryOperator::Plus, v.clone(), pos(5));
    assert_eq!(plus, v);
    assert!(!tc.diagnostics().has_errors());

    let bad = tc.binary_op(BinaryOperator::Multiply, v.clone(), v, pos(6));
    assert!(bad.expr_type().is_ill_formed());
    assert_eq!(error_names(&tc), vec!["NoMatchingSignature"]);
}

#[test]
fn test_primitive_operator_errors() {
    let mut tc = TypeChecker::new();
    let (five, half) = (tc.int_literal(5), tc.double_literal(0.5));
    let e = tc.binary_op(BinaryOperator::Modulus, five.clone(), half, pos(1));
    assert!(e.expr_type().is_ill_formed());
    assert_eq!(error_names(&tc), vec!["OperandTypeError"]);
    assert!(tc.diagnostics().messages()[0].contains("operator % not defined for operands int, real"));

    let e = tc.binary_op(BinaryOperator::Divide, five.clone(), five, pos(2));
    assert_eq!(e.expr_type(), MK_EXPR_TYPE!(Int));
}

#[test]
fn test_array_literals() {
    let mut tc = TypeChecker::new();
    let (one, half) = (tc.int_literal(1), tc.double_literal(0.5));

    let ok = tc.array_literal(vec![one.clone(), one.clone()], pos(1));
    assert_eq!(ok.expr_type(), MK_EXPR_TYPE!(Int, 1));
    assert!(!tc.diagnostics().has_errors());

    let mixed = tc.array_literal(vec![one.clone(), half.clone()], pos(2));
    assert!(mixed.expr_type().is_ill_formed());
    let empty = tc.array_literal(vec![], pos(3));
    assert!(empty.expr_type().is_ill_formed());
    assert_eq!(error_names(&tc), vec!["ArrayElementTypeMismatch", "EmptyArrayLiteral"]);
    assert!(tc.diagnostics().messages()[0].contains("expected int, found real"));

    let mut tc = TypeChecker::with_config(CheckerConfig::default().with_array_literal_promotion(true));
    let promoted = tc.array_literal(vec![one, half], pos(1));
    assert_eq!(promoted.expr_type(), MK_EXPR_TYPE!(Double, 1));
    assert!(!tc.diagnostics().has_errors());
}

#[test]
fn test_indexing() {
    let mut tc = TypeChecker::new();
    let n = tc.int_literal(2);
    tc.add_var(&VarDecl::matrix("m", vec![n.clone()], Range::unbounded(), n.clone(), n.clone()), pos(1));
    let m = tc.variable("m", pos(2));
    let (one, half) = (tc.int_literal(1), tc.double_literal(0.5));

    let e = tc.index_op(m.clone(), vec![vec![one.clone(), one.clone()]], pos(2));
    assert_eq!(e.expr_type(), MK_EXPR_TYPE!(RowVector));

    let e = tc.index_op_sliced(m.clone(), vec![Idx::Uni(one.clone()), Idx::Omni, Idx::Uni(one.clone())], pos(3));
    assert_eq!(e.expr_type(), MK_EXPR_TYPE!(Vector));
    assert!(!tc.diagnostics().has_errors());

    let e = tc.index_op(m.clone(), vec![vec![half]], pos(4));
    assert!(e.expr_type().is_ill_formed());
    let e = tc.index_op(m.clone(), vec![vec![one.clone(), one.clone()], vec![one.clone(), one.clone()]], pos(5));
    assert!(e.expr_type().is_ill_formed());
    let e = tc.index_op_sliced(m, vec![Idx::Multi(one)], pos(6));
    assert!(e.expr_type().is_ill_formed());

    assert_eq!(error_names(&tc), vec!["IndexTypeError", "TooManyIndexes", "IndexTypeError"]);
    assert!(tc.diagnostics().messages()[2].contains("index must be int[], found int"));
}

#[test]
fn test_sampling_context() {
    let mut tc = model_checker();
    let y = tc.variable("y", pos(10));
    let (zero, one) = (tc.int_literal(0), tc.int_literal(1));
    tc.sample(y.clone(), Distribution::new("normal", vec![zero.clone(), one.clone()]), Range::unbounded(), span(10));
    assert!(!tc.diagnostics().has_errors());
    assert!(tc.diagnostics().warnings().is_empty());

    tc.sample(y.clone(), Distribution::new("foo", vec![zero.clone()]), Range::unbounded(), span(11));
    assert_eq!(error_names(&tc), vec!["NoMatchingDistribution"]);

    let mut tc = model_checker();
    tc.enter_block(VarOrigin::Derived);
    tc.sample(y.clone(), Distribution::new("normal", vec![zero.clone(), one.clone()]), Range::unbounded(), span(20));
    tc.increment_log_prob(y, span(21));
    assert_eq!(error_names(&tc), vec!["SamplingNotAllowed", "IncrementLogProbNotAllowed"]);
}

#[test]
fn test_sampling_truncation() {
    let mut tc = model_checker();
    let y = tc.variable("y", pos(10));
    let (zero, one) = (tc.int_literal(0), tc.int_literal(1));
    let dist = Distribution::new("normal", vec![zero.clone(), one.clone()]);

    tc.sample(y.clone(), dist.clone(), Range::new(Some(zero.clone()), Some(one)), span(10));
    assert!(!tc.diagnostics().has_errors());

    let y_arr = tc.variable("y_arr", pos(11));
    tc.sample(y, dist, Range::new(Some(y_arr), None), span(11));
    assert_eq!(error_names(&tc), vec!["TruncationTypeError"]);
}

#[test]
fn test_jacobian_warning() {
    let mut tc = model_checker();
    let (zero, one) = (tc.int_literal(0), tc.int_literal(1));
    let dist = Distribution::new("normal", vec![zero, one]);

    let mu = tc.variable("mu", pos(10));
    tc.sample(mu.clone(), dist.clone(), Range::unbounded(), span(10));
    assert!(tc.diagnostics().warnings().is_empty());

    let log_sigma = tc.variable("log_sigma", pos(11));
    tc.sample(log_sigma.clone(), dist.clone(), Range::unbounded(), span(11));
    let log_mu = tc.fun("log", vec![mu], pos(12));
    tc.sample(log_mu, dist.clone(), Range::unbounded(), span(12));
    assert_eq!(tc.diagnostics().warnings().len(), 2);
    assert_eq!(tc.diagnostics().warnings()[0].get_error_name(), "JacobianWarning");
    assert!(!tc.diagnostics().has_errors());

    let mut tc = TypeChecker::new();
    tc.enter_block(VarOrigin::Parameter);
    let three = tc.int_literal(3);
    tc.add_var(&VarDecl::double("eta", vec![three], Range::unbounded()), pos(1));
    tc.enter_block(VarOrigin::Local);
    let eta = tc.variable("eta", pos(2));
    let eta_vec = tc.fun("to_vector", vec![eta.clone()], pos(2));
    tc.sample(eta_vec, dist.clone(), Range::unbounded(), span(2));
    let eta_sum = tc.fun("sum", vec![eta], pos(3));
    assert_eq!(eta_sum.expr_type(), MK_EXPR_TYPE!(Double));
    tc.sample(eta_sum, dist.clone(), Range::unbounded(), span(3));
    assert!(tc.diagnostics().warnings().is_empty());
    assert!(!tc.diagnostics().has_errors());

    let mut tc = TypeChecker::with_config(CheckerConfig::default().with_jacobian_warning(false));
    tc.enter_block(VarOrigin::TransformedParameter);
    tc.add_var(&VarDecl::double("t", vec![], Range::unbounded()), pos(1));
    tc.enter_block(VarOrigin::Local);
    let t = tc.variable("t", pos(2));
    tc.sample(t, dist, Range::unbounded(), span(2));
    assert!(tc.diagnostics().warnings().is_empty());
}

#[test]
fn test_rng_and_lp_contexts() {
    let mut tc = model_checker();
    let (zero, one) = (tc.double_literal(0.0), tc.double_literal(1.0));

    let draw = tc.fun("normal_rng", vec![zero.clone(), one.clone()], pos(10));
    assert!(draw.expr_type().is_ill_formed());
    assert_eq!(error_names(&tc), vec!["RngFunctionNotAllowed"]);

    tc.enter_block(VarOrigin::Derived);
    let draw = tc.fun("normal_rng", vec![zero.clone(), one.clone()], pos(20));
    assert_eq!(draw.expr_type(), MK_EXPR_TYPE!(Double));
    let lp = tc.fun("foo_lp", vec![zero], pos(21));
    assert!(lp.expr_type().is_ill_formed());
    assert_eq!(error_names(&tc), vec!["RngFunctionNotAllowed", "LpFunctionNotAllowed"]);
}

#[test]
fn test_assignment_blocks() {
    let mut tc = model_checker();
    let one = tc.double_literal(1.0);
    tc.assgn("y", vec![], one.clone(), span(10));
    tc.assgn("mu", vec![], one.clone(), span(11));
    tc.assgn("nope", vec![], one.clone(), span(12));
    assert_eq!(error_names(&tc), vec!["AssignmentWrongBlock", "AssignmentWrongBlock", "UndeclaredVariable"]);

    let mut tc = model_checker();
    tc.enter_block(VarOrigin::TransformedParameter);
    tc.assgn("log_sigma", vec![], one.clone(), span(10));
    assert!(!tc.diagnostics().has_errors());

    tc.enter_block(VarOrigin::Local);
    tc.begin_statements();
    let k = VarDecl::int("k", vec![], Range::unbounded());
    tc.add_var(&k, pos(20));
    tc.assgn("k", vec![], one, span(21));
    tc.finish_statements(vec![k], vec![], span(22));
    assert_eq!(error_names(&tc), vec!["AssignmentTypeMismatch"]);
}

#[test]
fn test_assignment_with_indexes() {
    let mut tc = TypeChecker::new();
    tc.enter_block(VarOrigin::TransformedData);
    let n = tc.int_literal(3);
    tc.add_var(&VarDecl::matrix("m", vec![], Range::unbounded(), n.clone(), n.clone()), pos(1));
    tc.add_var(&VarDecl::row_vector("r", vec![], Range::unbounded(), n.clone()), pos(2));
    tc.add_var(&VarDecl::vector("v", vec![], Range::unbounded(), n.clone()), pos(3));
    tc.add_var(&VarDecl::double("xs", vec![n.clone()], Range::unbounded()), pos(4));

    let (r, v, one) = (tc.variable("r", pos(5)), tc.variable("v", pos(5)), tc.int_literal(1));
    tc.assgn("m", vec![Idx::Uni(one.clone())], r, span(5));
    assert!(!tc.diagnostics().has_errors());

    tc.assgn("m", vec![Idx::Uni(one.clone())], v, span(6));
    assert_eq!(error_names(&tc), vec!["AssignmentTypeMismatch"]);

    tc.assignment(VariableDims::new("xs", vec![one.clone()]), one.clone(), span(7));
    tc.assignment(VariableDims::new("xs", vec![one.clone(), one.clone()]), one, span(8));
    assert_eq!(error_names(&tc), vec!["AssignmentTypeMismatch", "TooManyIndexes"]);
}

#[test]
fn test_for_loop_scoping() {
    let mut tc = model_checker();
    let (one, ten, half) = (tc.int_literal(1), tc.int_literal(10), tc.double_literal(0.5));

    assert!(tc.begin_for("i", &one, &ten, pos(10)));
    let i = tc.variable("i", pos(11));
    assert_eq!(i.expr_type(), MK_EXPR_TYPE!(Int));
    let body = tc.no_op(span(11));
    let stmt = tc.finish_for("i", one.clone(), ten, body, span(12));
    assert_eq!(stmt.begin_line(), 12);
    assert!(!tc.variable_map().exists("i"));
    assert!(!tc.diagnostics().has_errors());

    assert!(tc.begin_for("j", &one, &half, pos(20)));
    let body = tc.no_op(span(20));
    tc.finish_for("j", one.clone(), half, body, span(20));
    assert!(!tc.begin_for("mu", &one, &one, pos(21)));
    let body = tc.no_op(span(21));
    tc.finish_for("mu", one.clone(), one, body, span(21));
    assert_eq!(error_names(&tc), vec!["LoopBoundTypeError", "VariableAlreadyDeclared"]);
    assert!(tc.variable_map().exists("mu"));
}

#[test]
fn test_statement_checks() {
    let mut tc = model_checker();
    let y = tc.variable("y", pos(10));
    tc.expression_statement(y, span(10));

    let y_arr = tc.variable("y_arr", pos(11));
    let body = tc.no_op(span(11));
    tc.conditional(vec![y_arr.clone()], vec![body.clone()], span(11));
    tc.while_statement(y_arr, body, span(12));

    let mu = tc.variable("mu", pos(13));
    tc.print(vec![Printable::Text(String::from("mu = ")), Printable::Expr(mu)], span(13));
    tc.return_statement(None, span(14));

    assert_eq!(
        error_names(&tc),
        vec![
            "NonVoidExpressionStatement",
            "ConditionTypeError",
            "ConditionTypeError",
            "ReturnOutsideFunction"
        ]
    );
}

fn real_arg(name: &str) -> ArgDecl {
    ArgDecl::new(MK_EXPR_TYPE!(Double), name)
}

/// Checks `real name(real x) { return x; }`.
fn define_identity(tc: &mut TypeChecker, name: &str, line: u32) {
    let args = vec![real_arg("x")];
    assert!(tc.start_function(MK_EXPR_TYPE!(Double), name, &args, pos(line)));
    tc.begin_statements();
    let x = tc.variable("x", pos(line));
    let ret = tc.return_statement(Some(x), span(line));
    let body = tc.finish_statements(vec![], vec![ret], span(line));
    tc.finish_function(MK_EXPR_TYPE!(Double), name, args, body, span(line));
}

#[test]
fn test_user_function_definition() {
    let mut tc = TypeChecker::new();
    define_identity(&mut tc, "twice", 1);
    assert!(!tc.diagnostics().has_errors());
    assert!(!tc.variable_map().exists("x"));
    assert_eq!(tc.current_origin(), VarOrigin::Data);

    let one = tc.int_literal(1);
    let call = tc.fun("twice", vec![one], pos(5));
    assert_eq!(call.expr_type(), MK_EXPR_TYPE!(Double));
    assert!(tc.signatures().is_user_defined("twice", &MK_SIGNATURE!(MK_EXPR_TYPE!(Double); MK_EXPR_TYPE!(Double))));

    tc.finish_program(Program::default());
    assert!(!tc.diagnostics().has_errors());
}

#[test]
fn test_forward_declaration() {
    let mut tc = TypeChecker::new();
    let args = vec![real_arg("x")];
    assert!(tc.start_function(MK_EXPR_TYPE!(Double), "later", &args, pos(1)));
    let decl = tc.finish_function(MK_EXPR_TYPE!(Double), "later", args.clone(), Statement::no_op(span(1)), span(1));
    assert!(decl.is_forward_declaration());

    assert!(tc.start_function(MK_EXPR_TYPE!(Double), "never", &args, pos(2)));
    tc.finish_function(MK_EXPR_TYPE!(Double), "never", args, Statement::no_op(span(2)), span(2));

    define_identity(&mut tc, "later", 3);
    assert!(!tc.diagnostics().has_errors());

    tc.finish_program(Program::default());
    assert_eq!(error_names(&tc), vec!["FunctionNotDefined"]);
    assert_eq!(tc.diagnostics().errors()[0].get_position().line(), 2);
}

#[test]
fn test_function_redefinitions() {
    let mut tc = TypeChecker::new();
    let args = vec![real_arg("x")];

    assert!(!tc.start_function(MK_EXPR_TYPE!(Double), "exp", &args, pos(1)));
    tc.finish_function(MK_EXPR_TYPE!(Double), "exp", args.clone(), Statement::no_op(span(1)), span(1));

    define_identity(&mut tc, "f", 2);
    define_identity(&mut tc, "f", 3);

    assert!(!tc.start_function(MK_EXPR_TYPE!(Int), "f", &args, pos(4)));
    tc.finish_function(MK_EXPR_TYPE!(Int), "f", args, Statement::no_op(span(4)), span(4));

    assert_eq!(
        error_names(&tc),
        vec!["FunctionAlreadyDefined", "FunctionAlreadyDefined", "FunctionDeclarationMismatch"]
    );
}

#[test]
fn test_function_header_rules() {
    let mut tc = TypeChecker::new();
    let args = vec![ArgDecl::new(MK_EXPR_TYPE!(Void), "v")];
    assert!(!tc.start_function(MK_EXPR_TYPE!(Void), "g", &args, pos(1)));
    tc.finish_function(MK_EXPR_TYPE!(Void), "g", args, Statement::no_op(span(1)), span(1));

    let args = vec![real_arg("y")];
    assert!(!tc.start_function(MK_EXPR_TYPE!(Int), "foo_log", &args, pos(2)));
    tc.finish_function(MK_EXPR_TYPE!(Int), "foo_log", args, Statement::no_op(span(2)), span(2));

    assert_eq!(error_names(&tc), vec!["IllegalArgumentType", "LogFunctionSignature"]);
}

#[test]
fn test_function_body_rules() {
    let mut tc = TypeChecker::new();
    let args = vec![real_arg("x")];

    assert!(tc.start_function(MK_EXPR_TYPE!(Double), "h", &args, pos(1)));
    assert_eq!(tc.current_origin(), VarOrigin::FunctionArgument);
    let one = tc.double_literal(1.0);
    let assign = tc.assgn("x", vec![], one.clone(), span(2));
    let x = tc.variable("x", pos(3));
    let (zero, sd) = (tc.int_literal(0), tc.int_literal(1));
    let sample = tc.sample(x, Distribution::new("normal", vec![zero.clone(), sd.clone()]), Range::unbounded(), span(3));
    tc.begin_statements();
    let body = tc.finish_statements(vec![], vec![assign, sample], span(4));
    tc.finish_function(MK_EXPR_TYPE!(Double), "h", args.clone(), body, span(4));

    assert_eq!(
        error_names(&tc),
        vec!["AssignmentWrongBlock", "SamplingNotAllowed", "MissingReturn"]
    );
    assert!(tc.diagnostics().messages()[2].contains("expecting return, found sampling statement"));

    let mut tc = TypeChecker::new();
    assert!(tc.start_function(MK_EXPR_TYPE!(Void), "h_lp", &args, pos(1)));
    let x = tc.variable("x", pos(2));
    let sample = tc.sample(x, Distribution::new("normal", vec![zero, sd]), Range::unbounded(), span(2));
    let ret = tc.return_statement(Some(one), span(3));
    tc.begin_statements();
    let body = tc.finish_statements(vec![], vec![sample, ret], span(3));
    tc.finish_function(MK_EXPR_TYPE!(Void), "h_lp", args, body, span(3));
    assert_eq!(error_names(&tc), vec!["VoidFunctionReturnsValue"]);
}

/// Registers `real[] sho(real, real[], real[], real[], int[])` and data
/// `y0`, `ts`, `x_r`, `x_i` with parameter `theta`.
fn ode_checker(define_system: bool) -> TypeChecker {
    let mut tc = TypeChecker::new();
    let reals = MK_EXPR_TYPE!(Double, 1);
    if define_system {
        let args = vec![
            ArgDecl::new(MK_EXPR_TYPE!(Double), "t"),
            ArgDecl::new(reals, "state"),
            ArgDecl::new(reals, "params"),
            ArgDecl::new(reals, "x_real"),
            ArgDecl::new(MK_EXPR_TYPE!(Int, 1), "x_int"),
        ];
        assert!(tc.start_function(reals, "sho", &args, pos(1)));
        let state = tc.variable("state", pos(2));
        let ret = tc.return_statement(Some(state), span(2));
        tc.finish_function(reals, "sho", args, ret, span(2));
    }

    tc.enter_block(VarOrigin::Data);
    let two = tc.int_literal(2);
    for name in ["y0", "ts", "x_r"] {
        tc.add_var(&VarDecl::double(name, vec![two.clone()], Range::unbounded()), pos(3));
    }
    tc.add_var(&VarDecl::int("x_i", vec![two.clone()], Range::unbounded()), pos(3));
    tc.enter_block(VarOrigin::Parameter);
    tc.add_var(&VarDecl::double("theta", vec![two], Range::unbounded()), pos(4));
    tc.enter_block(VarOrigin::Local);
    assert!(!tc.diagnostics().has_errors());
    tc
}

fn ode_call(tc: &mut TypeChecker, args: [&str; 5]) -> IntegrateOde {
    let [y0, ts, theta, x_r, x_i] = args.map(|name| tc.variable(name, pos(10)));
    let t0 = tc.double_literal(0.0);
    IntegrateOde::new("integrate_ode_rk45", "sho", y0, t0, ts, theta, x_r, x_i)
}

#[test]
fn test_integrate_ode() {
    let mut tc = ode_checker(true);
    let ode = ode_call(&mut tc, ["y0", "ts", "theta", "x_r", "x_i"]);
    let e = tc.integrate_ode(ode, pos(10));
    assert_eq!(e.expr_type(), MK_EXPR_TYPE!(Double, 2));
    assert!(!tc.diagnostics().has_errors());

    let ode = ode_call(&mut tc, ["y0", "ts", "theta", "theta", "x_i"]);
    let e = tc.integrate_ode(ode, pos(11));
    assert!(e.expr_type().is_ill_formed());
    assert_eq!(error_names(&tc), vec!["OdeArgumentNotData"]);

    let ode = ode_call(&mut tc, ["y0", "ts", "theta", "x_r", "x_r"]);
    let e = tc.integrate_ode(ode, pos(12));
    assert!(e.expr_type().is_ill_formed());
    assert_eq!(error_names(&tc), vec!["OdeArgumentNotData", "OdeArgumentTypeError"]);
}

#[test]
fn test_integrate_ode_requires_system_function() {
    let mut tc = ode_checker(false);
    let ode = ode_call(&mut tc, ["y0", "ts", "theta", "x_r", "x_i"]);
    let e = tc.integrate_ode(ode, pos(10));
    assert!(e.expr_type().is_ill_formed());
    assert_eq!(error_names(&tc), vec!["OdeSystemFunction"]);
}

#[test]
fn test_integrate_ode_control() {
    let mut tc = ode_checker(true);
    let ode = ode_call(&mut tc, ["y0", "ts", "theta", "x_r", "x_i"]);
    let (tol, steps) = (tc.double_literal(1e-6), tc.int_literal(1000));
    let control = IntegrateOdeControl::new(ode.clone(), tol.clone(), tol.clone(), steps);
    let e = tc.integrate_ode_control(control, pos(10));
    assert_eq!(e.expr_type(), MK_EXPR_TYPE!(Double, 2));
    assert!(!tc.diagnostics().has_errors());

    let control = IntegrateOdeControl::new(ode, tol.clone(), tol.clone(), tol);
    let e = tc.integrate_ode_control(control, pos(11));
    assert!(e.expr_type().is_ill_formed());
    assert_eq!(error_names(&tc), vec!["OdeArgumentTypeError"]);
    assert!(tc.diagnostics().messages()[0].contains("maximum steps"));
}

#[test]
fn test_reset_forgets_program() {
    let mut tc = model_checker();
    define_identity(&mut tc, "f", 1);
    let x = tc.variable("undeclared", pos(2));
    assert!(x.expr_type().is_ill_formed());

    tc.reset();
    assert!(!tc.variable_map().exists("mu"));
    assert!(tc.variable_map().exists("model"));
    assert!(!tc.signatures().has_key("f"));
    assert!(!tc.diagnostics().has_errors());
    assert_eq!(tc.current_origin(), VarOrigin::Data);
}

#[test]
fn test_take_diagnostics() {
    let mut tc = TypeChecker::new();
    tc.variable("x", pos(1));
    let diagnostics = tc.take_diagnostics();
    assert_eq!(diagnostics.errors().len(), 1);
    assert!(!tc.diagnostics().has_errors());
    assert_eq!(ExprType::default(), ExprType::ill_formed());
}
