/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Programs and user function definitions
/// - declarations: Variable declarations and their constraints
/// - expressions: Expression nodes with their inferred types
/// - indexing: Index forms and the types indexing produces
/// - statements: Statement nodes and return-path analysis
/// - types: Definitions for type representations in the AST
pub mod ast;
pub mod declarations;
pub mod expressions;
pub mod indexing;
pub mod statements;
pub mod types;
