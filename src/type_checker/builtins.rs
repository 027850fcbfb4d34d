//! The built-in function library and identifier rules.
//!
//! Every registry starts from these tables: operators on vectors and
//! matrices, elementary math, reductions, container constructors and the
//! probability distributions with their `_log`, `_cdf_log`, `_ccdf_log`
//! and `_rng` variants. Distribution densities are vectorized: each
//! real-valued argument may be a scalar, a real array, a vector or a row
//! vector.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use crate::{ast::types::ExprType, MK_EXPR_TYPE};

use super::signatures::FunctionSignatures;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new("^[a-zA-Z][a-zA-Z0-9_]*$").unwrap();

    pub static ref RESERVED_WORDS: HashSet<&'static str> = {
        let mut words = HashSet::new();
        // language
        words.extend([
            "for", "in", "while", "repeat", "until", "if", "then", "else", "true", "false",
            "int", "real", "vector", "simplex", "unit_vector", "ordered", "positive_ordered",
            "row_vector", "matrix", "cholesky_factor_cov", "cholesky_factor_corr",
            "cov_matrix", "corr_matrix", "functions", "model", "data", "parameters",
            "quantities", "transformed", "generated", "void", "return", "print", "reject",
            "increment_log_prob", "integrate_ode", "integrate_ode_rk45", "integrate_ode_bdf",
            "target", "lp__", "var", "fvar", "STAN_MAJOR", "STAN_MINOR", "STAN_PATCH",
            "STAN_MATH_MAJOR", "STAN_MATH_MINOR", "STAN_MATH_PATCH",
        ]);
        // generated C++
        words.extend([
            "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool",
            "break", "case", "catch", "char", "char16_t", "char32_t", "class", "compl",
            "const", "constexpr", "const_cast", "continue", "decltype", "default", "delete",
            "do", "double", "dynamic_cast", "enum", "explicit", "export", "extern", "float",
            "friend", "goto", "inline", "long", "mutable", "namespace", "new", "noexcept",
            "not", "not_eq", "nullptr", "operator", "or", "or_eq", "private", "protected",
            "public", "register", "reinterpret_cast", "short", "signed", "sizeof", "static",
            "static_assert", "static_cast", "struct", "switch", "template", "this",
            "thread_local", "throw", "try", "typedef", "typeid", "typename", "union",
            "unsigned", "using", "virtual", "volatile", "wchar_t", "xor", "xor_eq",
        ]);
        words
    };

    /// `real f()`
    static ref CONSTANTS: Vec<&'static str> = vec![
        "pi", "e", "sqrt2", "log2", "log10", "not_a_number", "positive_infinity",
        "negative_infinity", "machine_precision",
    ];

    /// `real f(real)`, also applied elementwise to vectors and matrices.
    static ref UNARY_MATH: Vec<&'static str> = vec![
        "abs", "fabs", "exp", "exp2", "expm1", "log", "log2", "log10", "log1p", "log1m",
        "log1m_exp", "log1p_exp", "log1m_inv_logit", "log_inv_logit", "sqrt", "cbrt",
        "square", "inv", "inv_sqrt", "inv_square", "logit", "inv_logit", "inv_cloglog",
        "lgamma", "tgamma", "digamma", "trigamma", "erf", "erfc", "Phi", "Phi_approx",
        "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "asinh",
        "acosh", "atanh", "floor", "ceil", "round", "trunc",
    ];

    /// `real f(real, real)`
    static ref BINARY_MATH: Vec<&'static str> = vec![
        "pow", "fmin", "fmax", "fdim", "fmod", "hypot", "atan2", "lbeta", "lchoose",
        "log_diff_exp", "log_sum_exp", "owens_t", "gamma_p", "gamma_q", "falling_factorial",
        "rising_factorial", "log_falling_factorial", "log_rising_factorial",
        "multiply_log", "binomial_coefficient_log",
    ];

    /// `real f(real, real, real)`
    static ref TERNARY_MATH: Vec<&'static str> = vec!["fma", "log_mix", "inc_beta"];

    /// Real-argument univariate densities and how many parameters each takes.
    static ref CONTINUOUS_DISTRIBUTIONS: HashMap<&'static str, usize> = {
        let mut map = HashMap::new();
        map.insert("normal", 2);
        map.insert("student_t", 3);
        map.insert("cauchy", 2);
        map.insert("double_exponential", 2);
        map.insert("logistic", 2);
        map.insert("gumbel", 2);
        map.insert("lognormal", 2);
        map.insert("chi_square", 1);
        map.insert("inv_chi_square", 1);
        map.insert("scaled_inv_chi_square", 2);
        map.insert("exponential", 1);
        map.insert("gamma", 2);
        map.insert("inv_gamma", 2);
        map.insert("weibull", 2);
        map.insert("frechet", 2);
        map.insert("rayleigh", 1);
        map.insert("pareto", 2);
        map.insert("pareto_type_2", 3);
        map.insert("beta", 2);
        map.insert("uniform", 2);
        map.insert("skew_normal", 3);
        map.insert("exp_mod_normal", 3);
        map
    };

    /// Int-valued densities: the number of int parameters followed by the
    /// number of real parameters.
    static ref DISCRETE_DISTRIBUTIONS: HashMap<&'static str, (usize, usize)> = {
        let mut map = HashMap::new();
        map.insert("bernoulli", (0, 1));
        map.insert("bernoulli_logit", (0, 1));
        map.insert("binomial", (1, 1));
        map.insert("binomial_logit", (1, 1));
        map.insert("beta_binomial", (1, 2));
        map.insert("poisson", (0, 1));
        map.insert("poisson_log", (0, 1));
        map.insert("neg_binomial", (0, 2));
        map.insert("neg_binomial_2", (0, 2));
        map.insert("neg_binomial_2_log", (0, 2));
        map
    };
}

/// Checks the shape of a user identifier. The error is the reason the
/// identifier is rejected.
pub fn validate_identifier(identifier: &str) -> Result<(), String> {
    if !IDENTIFIER.is_match(identifier) {
        return Err(String::from(
            "must start with a letter and contain only letters, digits and underscores",
        ));
    }
    if identifier.ends_with("__") {
        return Err(String::from("must not end in two underscores"));
    }
    if RESERVED_WORDS.contains(identifier) {
        return Err(String::from("is a reserved word"));
    }
    Ok(())
}

fn int() -> ExprType {
    MK_EXPR_TYPE!(Int)
}

fn real() -> ExprType {
    MK_EXPR_TYPE!(Double)
}

fn vector() -> ExprType {
    MK_EXPR_TYPE!(Vector)
}

fn row_vector() -> ExprType {
    MK_EXPR_TYPE!(RowVector)
}

fn matrix() -> ExprType {
    MK_EXPR_TYPE!(Matrix)
}

/// Shapes a vectorized real argument may take.
fn vectorized_reals() -> [ExprType; 4] {
    [real(), MK_EXPR_TYPE!(Double, 1), vector(), row_vector()]
}

/// Shapes a vectorized int argument may take.
fn vectorized_ints() -> [ExprType; 2] {
    [int(), MK_EXPR_TYPE!(Int, 1)]
}

/// Every argument list choosing one type per position.
fn cartesian(positions: &[&[ExprType]]) -> Vec<Vec<ExprType>> {
    positions.iter().fold(vec![vec![]], |lists, choices| {
        lists
            .iter()
            .flat_map(|list| {
                choices.iter().map(move |choice| {
                    let mut extended = list.clone();
                    extended.push(*choice);
                    extended
                })
            })
            .collect()
    })
}

pub fn load_builtins(sigs: &mut FunctionSignatures) {
    load_operators(sigs);
    load_math(sigs);
    load_containers(sigs);
    load_distributions(sigs);
}

fn load_operators(sigs: &mut FunctionSignatures) {
    let linear = [vector(), row_vector(), matrix()];

    for op in ["add", "subtract"] {
        sigs.add2(op, int(), int(), int());
        sigs.add2(op, real(), real(), real());
        for t in linear {
            sigs.add2(op, t, t, t);
            sigs.add2(op, t, t, real());
            sigs.add2(op, t, real(), t);
        }
    }

    sigs.add2("multiply", int(), int(), int());
    sigs.add2("multiply", real(), real(), real());
    for t in linear {
        sigs.add2("multiply", t, t, real());
        sigs.add2("multiply", t, real(), t);
    }
    sigs.add2("multiply", real(), row_vector(), vector());
    sigs.add2("multiply", matrix(), vector(), row_vector());
    sigs.add2("multiply", vector(), matrix(), vector());
    sigs.add2("multiply", row_vector(), row_vector(), matrix());
    sigs.add2("multiply", matrix(), matrix(), matrix());

    sigs.add2("divide", int(), int(), int());
    sigs.add2("divide", real(), real(), real());
    for t in linear {
        sigs.add2("divide", t, t, real());
    }
    sigs.add2("divide", row_vector(), row_vector(), matrix());
    sigs.add2("divide", matrix(), matrix(), matrix());

    for t in linear {
        sigs.add2("elt_multiply", t, t, t);
        sigs.add2("elt_divide", t, t, t);
        sigs.add2("elt_divide", t, t, real());
        sigs.add2("elt_divide", t, real(), t);
        sigs.add1("minus", t, t);
    }
    sigs.add1("minus", int(), int());
    sigs.add1("minus", real(), real());

    sigs.add2("modulus", int(), int(), int());
    sigs.add1("transpose", row_vector(), vector());
    sigs.add1("transpose", vector(), row_vector());
    sigs.add1("transpose", matrix(), matrix());

    for op in ["logical_lt", "logical_lte", "logical_gt", "logical_gte", "logical_eq", "logical_neq", "logical_and", "logical_or"] {
        sigs.add2(op, int(), int(), int());
        sigs.add2(op, int(), real(), real());
    }
    sigs.add1("logical_negation", int(), int());
    sigs.add1("logical_negation", int(), real());
}

fn load_math(sigs: &mut FunctionSignatures) {
    for name in CONSTANTS.iter() {
        sigs.add_nullary(name);
    }
    for name in UNARY_MATH.iter() {
        sigs.add_unary(name);
        for t in [vector(), row_vector(), matrix()] {
            sigs.add1(name, t, t);
        }
    }
    for name in BINARY_MATH.iter() {
        sigs.add_binary(name);
    }
    for name in TERNARY_MATH.iter() {
        sigs.add_ternary(name);
    }

    sigs.add1("abs", int(), int());
    sigs.add1("int_step", int(), int());
    sigs.add1("int_step", int(), real());
    sigs.add1("step", real(), real());
    sigs.add1("is_inf", int(), real());
    sigs.add1("is_nan", int(), real());
    sigs.add2("min", int(), int(), int());
    sigs.add2("max", int(), int(), int());
    sigs.add_binary("min");
    sigs.add_binary("max");
    sigs.add3("if_else", real(), int(), real(), real());
    sigs.add2("binary_log_loss", real(), int(), real());
    sigs.add2("choose", int(), int(), int());
    sigs.add2("bessel_first_kind", real(), int(), real());
    sigs.add2("modified_bessel_second_kind", real(), int(), real());
    sigs.add4("hypergeometric_pFq", real(), MK_EXPR_TYPE!(Double, 1), MK_EXPR_TYPE!(Double, 1), real(), real());
}

fn load_containers(sigs: &mut FunctionSignatures) {
    let real_containers = [vector(), row_vector(), matrix(), MK_EXPR_TYPE!(Double, 1)];

    for name in ["sum", "prod", "mean", "variance", "sd", "log_sum_exp", "min", "max"] {
        for t in real_containers {
            sigs.add1(name, real(), t);
        }
    }
    for name in ["sum", "prod", "min", "max"] {
        sigs.add1(name, int(), MK_EXPR_TYPE!(Int, 1));
    }

    for t in [vector(), row_vector(), matrix()] {
        sigs.add1("num_elements", int(), t);
        sigs.add1("rows", int(), t);
        sigs.add1("cols", int(), t);
        sigs.add1("dot_self", real(), t);
    }
    for base in [int(), real(), vector(), row_vector(), matrix()] {
        for dims in 1..=3 {
            let array = ExprType::with_dims(base.base_type(), dims);
            sigs.add1("size", int(), array);
            sigs.add1("num_elements", int(), array);
        }
    }

    sigs.add2("dot_product", real(), vector(), vector());
    sigs.add2("dot_product", real(), row_vector(), row_vector());
    sigs.add2("dot_product", real(), vector(), row_vector());
    sigs.add2("dot_product", real(), row_vector(), vector());
    sigs.add2("dot_product", real(), MK_EXPR_TYPE!(Double, 1), MK_EXPR_TYPE!(Double, 1));
    sigs.add2("squared_distance", real(), vector(), vector());
    sigs.add2("distance", real(), vector(), vector());
    sigs.add2("columns_dot_product", row_vector(), matrix(), matrix());
    sigs.add2("rows_dot_product", vector(), matrix(), matrix());

    sigs.add2("rep_vector", vector(), real(), int());
    sigs.add2("rep_row_vector", row_vector(), real(), int());
    sigs.add3("rep_matrix", matrix(), real(), int(), int());
    sigs.add2("rep_matrix", matrix(), vector(), int());
    sigs.add2("rep_matrix", matrix(), row_vector(), int());
    for base in [int(), real(), vector(), row_vector(), matrix()] {
        sigs.add2("rep_array", base.array_of(), base, int());
        sigs.add3("rep_array", ExprType::with_dims(base.base_type(), 2), base, int(), int());
        sigs.add4("rep_array", ExprType::with_dims(base.base_type(), 3), base, int(), int(), int());
    }

    for t in [row_vector(), matrix(), MK_EXPR_TYPE!(Double, 1), MK_EXPR_TYPE!(Int, 1)] {
        sigs.add1("to_vector", vector(), t);
    }
    for t in [vector(), matrix(), MK_EXPR_TYPE!(Double, 1), MK_EXPR_TYPE!(Int, 1)] {
        sigs.add1("to_row_vector", row_vector(), t);
    }
    for t in [vector(), row_vector(), matrix()] {
        sigs.add1("to_array_1d", MK_EXPR_TYPE!(Double, 1), t);
        sigs.add1("to_matrix", matrix(), t);
    }
    sigs.add1("to_matrix", matrix(), MK_EXPR_TYPE!(Double, 2));
    sigs.add3("to_matrix", matrix(), vector(), int(), int());
    sigs.add1("to_array_2d", MK_EXPR_TYPE!(Double, 2), matrix());

    sigs.add2("col", vector(), matrix(), int());
    sigs.add2("row", row_vector(), matrix(), int());
    sigs.add5("block", matrix(), matrix(), int(), int(), int(), int());
    sigs.add4("sub_col", vector(), matrix(), int(), int(), int());
    sigs.add4("sub_row", row_vector(), matrix(), int(), int(), int());
    for t in [vector(), row_vector(), MK_EXPR_TYPE!(Double, 1), MK_EXPR_TYPE!(Int, 1)] {
        sigs.add2("head", t, t, int());
        sigs.add2("tail", t, t, int());
        sigs.add3("segment", t, t, int(), int());
        sigs.add1("cumulative_sum", t, t);
        sigs.add1("sort_asc", t, t);
        sigs.add1("sort_desc", t, t);
        sigs.add1("rank", MK_EXPR_TYPE!(Int, 1), t);
    }

    sigs.add1("diag_matrix", matrix(), vector());
    sigs.add1("diagonal", vector(), matrix());
    sigs.add2("diag_pre_multiply", matrix(), vector(), matrix());
    sigs.add2("diag_post_multiply", matrix(), matrix(), vector());
    for name in ["inverse", "inverse_spd", "crossprod", "tcrossprod", "cholesky_decompose", "multiply_lower_tri_self_transpose", "matrix_exp", "eigenvectors_sym"] {
        sigs.add1(name, matrix(), matrix());
    }
    for name in ["determinant", "log_determinant", "trace"] {
        sigs.add1(name, real(), matrix());
    }
    sigs.add1("eigenvalues_sym", vector(), matrix());
    sigs.add1("singular_values", vector(), matrix());
    sigs.add1("softmax", vector(), vector());
    sigs.add1("log_softmax", vector(), vector());
    sigs.add2("quad_form", real(), matrix(), vector());
    sigs.add2("quad_form", matrix(), matrix(), matrix());
    sigs.add2("mdivide_left_tri_low", vector(), matrix(), vector());
    sigs.add2("mdivide_left_tri_low", matrix(), matrix(), matrix());
    sigs.add2("mdivide_right_tri_low", row_vector(), row_vector(), matrix());
    sigs.add2("mdivide_right_tri_low", matrix(), matrix(), matrix());
    sigs.add2("append_row", matrix(), matrix(), matrix());
    sigs.add2("append_row", vector(), vector(), vector());
    sigs.add2("append_col", matrix(), matrix(), matrix());
    sigs.add2("append_col", row_vector(), row_vector(), row_vector());
}

fn load_distributions(sigs: &mut FunctionSignatures) {
    let reals = vectorized_reals();
    let ints = vectorized_ints();

    for (family, &num_params) in CONTINUOUS_DISTRIBUTIONS.iter() {
        let positions = vec![&reals[..]; num_params + 1];
        for args in cartesian(&positions) {
            for suffix in ["_log", "_cdf_log", "_ccdf_log"] {
                sigs.add(&format!("{}{}", family, suffix), real(), args.clone());
            }
        }
        sigs.add(&format!("{}_rng", family), real(), vec![real(); num_params]);
    }

    for (family, &(num_ints, num_reals)) in DISCRETE_DISTRIBUTIONS.iter() {
        let mut positions: Vec<&[ExprType]> = vec![&ints[..]; num_ints + 1];
        positions.extend(vec![&reals[..]; num_reals]);
        for args in cartesian(&positions) {
            for suffix in ["_log", "_cdf_log", "_ccdf_log"] {
                sigs.add(&format!("{}{}", family, suffix), real(), args.clone());
            }
        }
        let mut rng_args = vec![int(); num_ints];
        rng_args.extend(vec![real(); num_reals]);
        sigs.add(&format!("{}_rng", family), int(), rng_args);
    }

    let vectors = MK_EXPR_TYPE!(Vector, 1);
    for family in ["multi_normal", "multi_normal_cholesky"] {
        for y in [vector(), vectors] {
            for mu in [vector(), vectors] {
                sigs.add2(&format!("{}_log", family), real(), y, mu);
                sigs.add3(&format!("{}_log", family), real(), y, mu, matrix());
            }
        }
        sigs.add2(&format!("{}_rng", family), vector(), vector(), matrix());
    }
    for y in [vector(), vectors] {
        sigs.add4("multi_student_t_log", real(), y, real(), vector(), matrix());
    }
    sigs.add3("multi_student_t_rng", vector(), real(), vector(), matrix());
    sigs.add2("dirichlet_log", real(), vector(), vector());
    sigs.add1("dirichlet_rng", vector(), vector());
    sigs.add2("lkj_corr_log", real(), matrix(), real());
    sigs.add2("lkj_corr_cholesky_log", real(), matrix(), real());
    sigs.add2("lkj_corr_rng", matrix(), int(), real());
    sigs.add2("lkj_corr_cholesky_rng", matrix(), int(), real());
    sigs.add3("wishart_log", real(), matrix(), real(), matrix());
    sigs.add3("inv_wishart_log", real(), matrix(), real(), matrix());
    sigs.add2("wishart_rng", matrix(), real(), matrix());
    sigs.add2("inv_wishart_rng", matrix(), real(), matrix());
    for family in ["categorical", "categorical_logit"] {
        for y in ints {
            sigs.add2(&format!("{}_log", family), real(), y, vector());
        }
    }
    sigs.add1("categorical_rng", int(), vector());
    sigs.add2("multinomial_log", real(), MK_EXPR_TYPE!(Int, 1), vector());
    sigs.add2("multinomial_rng", MK_EXPR_TYPE!(Int, 1), vector(), int());
    sigs.add3("ordered_logistic_log", real(), int(), real(), vector());
    sigs.add2("ordered_logistic_rng", int(), real(), vector());
}
