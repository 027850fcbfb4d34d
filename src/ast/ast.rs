use super::declarations::{BaseVarDecl, VarDecl};
use super::statements::Statement;
use super::types::ExprType;

/// A function argument: its type and name.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgDecl {
    pub arg_type: ExprType,
    pub name: String,
}

impl ArgDecl {
    pub fn new(arg_type: ExprType, name: &str) -> Self {
        ArgDecl {
            arg_type,
            name: name.to_string(),
        }
    }

    /// The declaration the argument is scoped as inside the body.
    pub fn base_variable_declaration(&self) -> BaseVarDecl {
        BaseVarDecl::with_rank(&self.name, self.arg_type.num_dims(), self.arg_type.base_type())
    }
}

/// A user function declaration or definition. A body that is a no-op
/// marks a forward declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclDef {
    pub return_type: ExprType,
    pub name: String,
    pub arg_decls: Vec<ArgDecl>,
    pub body: Statement,
}

impl FunctionDeclDef {
    pub fn new(return_type: ExprType, name: &str, arg_decls: Vec<ArgDecl>, body: Statement) -> Self {
        FunctionDeclDef {
            return_type,
            name: name.to_string(),
            arg_decls,
            body,
        }
    }

    pub fn is_forward_declaration(&self) -> bool {
        self.body.is_no_op()
    }

    pub fn arg_types(&self) -> Vec<ExprType> {
        self.arg_decls.iter().map(|a| a.arg_type).collect()
    }
}

/// Declarations of a block followed by the statements that fill them in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeclsAndStatements {
    pub decls: Vec<VarDecl>,
    pub statements: Vec<Statement>,
}

impl DeclsAndStatements {
    pub fn new(decls: Vec<VarDecl>, statements: Vec<Statement>) -> Self {
        DeclsAndStatements { decls, statements }
    }
}

/// A checked program, handed to code generation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub function_decl_defs: Vec<FunctionDeclDef>,
    pub data_decl: Vec<VarDecl>,
    pub derived_data_decl: DeclsAndStatements,
    pub parameter_decl: Vec<VarDecl>,
    pub derived_decl: DeclsAndStatements,
    pub statement: Statement,
    pub generated_decl: DeclsAndStatements,
}
