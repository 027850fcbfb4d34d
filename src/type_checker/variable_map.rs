use std::{collections::HashMap, fmt::Display};

use crate::ast::{declarations::BaseVarDecl, types::BaseType};

/// Where a variable was declared. Decides where it may be read, assigned
/// and whether it counts as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarOrigin {
    ModelName,
    Data,
    TransformedData,
    Parameter,
    TransformedParameter,
    Derived,
    Local,
    FunctionArgument,
    FunctionArgumentLp,
    FunctionArgumentRng,
    VoidFunctionArgument,
    VoidFunctionArgumentLp,
    VoidFunctionArgumentRng,
}

impl VarOrigin {
    /// Origin of the arguments of a function with the given name and
    /// return kind.
    pub fn for_function_arguments(name: &str, is_void: bool) -> Self {
        match (is_void, name.ends_with("_lp"), name.ends_with("_rng")) {
            (false, true, _) => VarOrigin::FunctionArgumentLp,
            (false, _, true) => VarOrigin::FunctionArgumentRng,
            (false, _, _) => VarOrigin::FunctionArgument,
            (true, true, _) => VarOrigin::VoidFunctionArgumentLp,
            (true, _, true) => VarOrigin::VoidFunctionArgumentRng,
            (true, _, _) => VarOrigin::VoidFunctionArgument,
        }
    }

    pub fn is_function_argument(&self) -> bool {
        matches!(
            self,
            VarOrigin::FunctionArgument
                | VarOrigin::FunctionArgumentLp
                | VarOrigin::FunctionArgumentRng
                | VarOrigin::VoidFunctionArgument
                | VarOrigin::VoidFunctionArgumentLp
                | VarOrigin::VoidFunctionArgumentRng
        )
    }

    /// Blocks (and function bodies) where `_lp` functions may be called.
    pub fn allows_lp(&self) -> bool {
        matches!(
            self,
            VarOrigin::TransformedParameter
                | VarOrigin::Local
                | VarOrigin::FunctionArgumentLp
                | VarOrigin::VoidFunctionArgumentLp
        )
    }

    /// Blocks (and function bodies) where `_rng` functions may be called.
    pub fn allows_rng(&self) -> bool {
        matches!(
            self,
            VarOrigin::TransformedData
                | VarOrigin::Derived
                | VarOrigin::FunctionArgumentRng
                | VarOrigin::VoidFunctionArgumentRng
        )
    }

    /// The model block and `_lp` function bodies.
    pub fn allows_sampling(&self) -> bool {
        matches!(
            self,
            VarOrigin::Local | VarOrigin::FunctionArgumentLp | VarOrigin::VoidFunctionArgumentLp
        )
    }
}

impl Display for VarOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarOrigin::ModelName => write!(f, "model name"),
            VarOrigin::Data => write!(f, "data"),
            VarOrigin::TransformedData => write!(f, "transformed data"),
            VarOrigin::Parameter => write!(f, "parameter"),
            VarOrigin::TransformedParameter => write!(f, "transformed parameter"),
            VarOrigin::Derived => write!(f, "generated quantities"),
            VarOrigin::Local => write!(f, "local"),
            VarOrigin::FunctionArgument => write!(f, "function argument"),
            VarOrigin::FunctionArgumentLp => write!(f, "function argument '_lp' suffixed"),
            VarOrigin::FunctionArgumentRng => write!(f, "function argument '_rng' suffixed"),
            VarOrigin::VoidFunctionArgument => write!(f, "void function argument"),
            VarOrigin::VoidFunctionArgumentLp => write!(f, "void function argument '_lp' suffixed"),
            VarOrigin::VoidFunctionArgumentRng => write!(f, "void function argument '_rng' suffixed"),
        }
    }
}

/// The symbol table: every variable in scope with its declaration and
/// origin. Scoping is flat; locals are removed when their block closes.
#[derive(Debug, Clone, Default)]
pub struct VariableMap {
    map: HashMap<String, (BaseVarDecl, VarOrigin)>,
}

impl VariableMap {
    pub fn new() -> Self {
        VariableMap::default()
    }

    /// Inserts or replaces `name`.
    pub fn add(&mut self, name: &str, base_decl: BaseVarDecl, origin: VarOrigin) {
        self.map.insert(name.to_string(), (base_decl, origin));
    }

    pub fn exists(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&BaseVarDecl> {
        self.map.get(name).map(|(decl, _)| decl)
    }

    /// The ill-formed base type when `name` is not declared.
    pub fn get_base_type(&self, name: &str) -> BaseType {
        self.get(name).map_or(BaseType::IllFormed, |decl| decl.base_type)
    }

    pub fn get_num_dims(&self, name: &str) -> usize {
        self.get(name).map_or(0, |decl| decl.dims.len())
    }

    pub fn get_origin(&self, name: &str) -> Option<VarOrigin> {
        self.map.get(name).map(|(_, origin)| *origin)
    }

    pub fn remove(&mut self, name: &str) -> Option<BaseVarDecl> {
        self.map.remove(name).map(|(decl, _)| decl)
    }

    /// Declarations of one origin, sorted by name.
    pub fn iter_origin(&self, origin: VarOrigin) -> impl Iterator<Item = (&String, &BaseVarDecl)> {
        let mut entries: Vec<(&String, &BaseVarDecl)> = self
            .map
            .iter()
            .filter(|(_, (_, o))| *o == origin)
            .map(|(name, (decl, _))| (name, decl))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
