use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt::Display,
};

use log::{debug, trace};

use crate::{
    ast::types::{BaseType, ExprType},
    errors::{diagnostics::Diagnostics, errors::ErrorImpl},
    Position,
};

use super::builtins::load_builtins;

/// A function signature: result type and argument types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionSignature {
    result: ExprType,
    args: Vec<ExprType>,
}

impl FunctionSignature {
    pub fn new(result: ExprType, args: Vec<ExprType>) -> Self {
        FunctionSignature { result, args }
    }

    pub fn result(&self) -> ExprType {
        self.result
    }

    pub fn args(&self) -> &[ExprType] {
        &self.args
    }

    /// `real normal_log(real, real, real)`
    pub fn describe(&self, name: &str) -> String {
        format!("{} {}({})", self.result, name, render_types(&self.args))
    }
}

impl Display for FunctionSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.result, render_types(&self.args))
    }
}

pub fn render_types(types: &[ExprType]) -> String {
    types.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
}

/// Cost of calling `sig` with arguments of types `call_args`: the number
/// of int to real promotions needed, or `None` when the call does not fit.
pub fn num_promotions(call_args: &[ExprType], sig: &[ExprType]) -> Option<usize> {
    if call_args.len() != sig.len() {
        return None;
    }
    let mut promotions = 0;
    for (call_arg, sig_arg) in call_args.iter().zip(sig) {
        if call_arg == sig_arg {
            continue;
        }
        if call_arg.is_primitive_int() && sig_arg.is_primitive_double() {
            promotions += 1;
        } else {
            return None;
        }
    }
    Some(promotions)
}

/// The function registry: every callable name with its overloads, plus
/// which of them the program defined itself.
#[derive(Debug, Clone)]
pub struct FunctionSignatures {
    sigs_map: HashMap<String, Vec<FunctionSignature>>,
    user_defined: HashSet<(String, FunctionSignature)>,
}

impl Default for FunctionSignatures {
    fn default() -> Self {
        FunctionSignatures::new()
    }
}

impl FunctionSignatures {
    /// A registry holding the built-in library.
    pub fn new() -> Self {
        let mut signatures = FunctionSignatures::empty();
        load_builtins(&mut signatures);
        signatures
    }

    /// A registry with nothing in it.
    pub fn empty() -> Self {
        FunctionSignatures {
            sigs_map: HashMap::new(),
            user_defined: HashSet::new(),
        }
    }

    /// Drops user-defined functions, leaving only the built-ins.
    pub fn reset(&mut self) {
        debug!("resetting function signatures");
        *self = FunctionSignatures::new();
    }

    /// Registers an overload. Registering the same signature twice is a
    /// no-op.
    pub fn add(&mut self, name: &str, result: ExprType, args: Vec<ExprType>) {
        let sig = FunctionSignature::new(result, args);
        let overloads = self.sigs_map.entry(name.to_string()).or_default();
        if !overloads.contains(&sig) {
            overloads.push(sig);
        }
    }

    pub fn add0(&mut self, name: &str, result: ExprType) {
        self.add(name, result, vec![]);
    }

    pub fn add1(&mut self, name: &str, result: ExprType, arg1: ExprType) {
        self.add(name, result, vec![arg1]);
    }

    pub fn add2(&mut self, name: &str, result: ExprType, arg1: ExprType, arg2: ExprType) {
        self.add(name, result, vec![arg1, arg2]);
    }

    pub fn add3(&mut self, name: &str, result: ExprType, arg1: ExprType, arg2: ExprType, arg3: ExprType) {
        self.add(name, result, vec![arg1, arg2, arg3]);
    }

    pub fn add4(
        &mut self,
        name: &str,
        result: ExprType,
        arg1: ExprType,
        arg2: ExprType,
        arg3: ExprType,
        arg4: ExprType,
    ) {
        self.add(name, result, vec![arg1, arg2, arg3, arg4]);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add5(
        &mut self,
        name: &str,
        result: ExprType,
        arg1: ExprType,
        arg2: ExprType,
        arg3: ExprType,
        arg4: ExprType,
        arg5: ExprType,
    ) {
        self.add(name, result, vec![arg1, arg2, arg3, arg4, arg5]);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add6(
        &mut self,
        name: &str,
        result: ExprType,
        arg1: ExprType,
        arg2: ExprType,
        arg3: ExprType,
        arg4: ExprType,
        arg5: ExprType,
        arg6: ExprType,
    ) {
        self.add(name, result, vec![arg1, arg2, arg3, arg4, arg5, arg6]);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add7(
        &mut self,
        name: &str,
        result: ExprType,
        arg1: ExprType,
        arg2: ExprType,
        arg3: ExprType,
        arg4: ExprType,
        arg5: ExprType,
        arg6: ExprType,
        arg7: ExprType,
    ) {
        self.add(name, result, vec![arg1, arg2, arg3, arg4, arg5, arg6, arg7]);
    }

    /// `real name()`
    pub fn add_nullary(&mut self, name: &str) {
        self.add(name, real(), vec![]);
    }

    /// `real name(real)`
    pub fn add_unary(&mut self, name: &str) {
        self.add(name, real(), vec![real()]);
    }

    /// `real name(real, real)`
    pub fn add_binary(&mut self, name: &str) {
        self.add(name, real(), vec![real(); 2]);
    }

    /// `real name(real, real, real)`
    pub fn add_ternary(&mut self, name: &str) {
        self.add(name, real(), vec![real(); 3]);
    }

    /// `real name(real, real, real, real)`
    pub fn add_quaternary(&mut self, name: &str) {
        self.add(name, real(), vec![real(); 4]);
    }

    pub fn set_user_defined(&mut self, name: &str, sig: FunctionSignature) {
        self.user_defined.insert((name.to_string(), sig));
    }

    pub fn is_user_defined(&self, name: &str, sig: &FunctionSignature) -> bool {
        self.user_defined.contains(&(name.to_string(), sig.clone()))
    }

    /// Whether exactly this signature is registered under `name`.
    pub fn is_defined(&self, name: &str, sig: &FunctionSignature) -> bool {
        self.sigs_map.get(name).is_some_and(|overloads| overloads.contains(sig))
    }

    pub fn has_key(&self, name: &str) -> bool {
        self.sigs_map.contains_key(name)
    }

    pub fn key_set(&self) -> BTreeSet<&str> {
        self.sigs_map.keys().map(String::as_str).collect()
    }

    pub fn overloads(&self, name: &str) -> &[FunctionSignature] {
        self.sigs_map.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of overloads tied for the fewest promotions, and the first
    /// of them.
    pub fn get_signature_matches(&self, name: &str, args: &[ExprType]) -> (usize, Option<&FunctionSignature>) {
        let mut best: Option<(usize, &FunctionSignature)> = None;
        let mut count = 0;
        for sig in self.overloads(name) {
            let Some(cost) = num_promotions(args, &sig.args) else {
                continue;
            };
            match best {
                Some((best_cost, _)) if cost > best_cost => {}
                Some((best_cost, _)) if cost == best_cost => count += 1,
                _ => {
                    best = Some((cost, sig));
                    count = 1;
                }
            }
        }
        trace!(
            "resolving {}({}): {} match(es) at cost {:?}",
            name,
            render_types(args),
            count,
            best.map(|(cost, _)| cost)
        );
        (count, best.map(|(_, sig)| sig))
    }

    /// Resolves a call to its result type, reporting missing or ambiguous
    /// overloads. `sampling_error_style` phrases the report for a `~`
    /// statement, where `name` is `<family>_log`.
    pub fn get_result_type(
        &self,
        name: &str,
        args: &[ExprType],
        diagnostics: &mut Diagnostics,
        position: Position,
        sampling_error_style: bool,
    ) -> ExprType {
        let (count, sig) = self.get_signature_matches(name, args);
        match (count, sig) {
            (1, Some(sig)) => sig.result,
            (0, _) | (_, None) => {
                let available = self.describe_overloads(name);
                let error = if sampling_error_style {
                    ErrorImpl::NoMatchingDistribution {
                        distribution: name.strip_suffix("_log").unwrap_or(name).to_string(),
                        arguments: render_types(args),
                        available,
                    }
                } else {
                    ErrorImpl::NoMatchingSignature {
                        function: name.to_string(),
                        arguments: render_types(args),
                        available,
                    }
                };
                diagnostics.error(error, position);
                ExprType::ill_formed()
            }
            (matches, Some(_)) => {
                diagnostics.error(
                    ErrorImpl::AmbiguousCall {
                        function: name.to_string(),
                        arguments: render_types(args),
                        matches,
                    },
                    position,
                );
                ExprType::ill_formed()
            }
        }
    }

    fn describe_overloads(&self, name: &str) -> Vec<String> {
        let mut overloads: Vec<&FunctionSignature> = self.overloads(name).iter().collect();
        overloads.sort();
        overloads.into_iter().map(|sig| sig.describe(name)).collect()
    }
}

fn real() -> ExprType {
    ExprType::new(BaseType::Double)
}
