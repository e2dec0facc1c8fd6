//! Syntax tree API for the jsym symbol solver.
//!
//! The resolver consumes an already-built tree: per node a kind, children,
//! a parent link and identifier text. Trees are produced by an external
//! parser through [`UnitBuilder`]; this crate never reads source text.

pub mod arena;
pub mod base;
pub mod builder;
pub mod node;

pub use arena::{Ancestors, NodeArena};
pub use base::{NodeIndex, SyntaxRef, UnitId};
pub use builder::UnitBuilder;
pub use node::{
    ArrayAccessData, BlockData, CastData, ClassTypeData, CompilationUnitData, EnumConstantData,
    FieldAccessData, FieldData, ImportData, InitializerData, LambdaData, LiteralData, LiteralKind,
    LocalVarData, MethodCallData, MethodData, Modifiers, Node, NodeData, ObjectCreationData,
    ParameterData, SyntaxKind, TypeDeclData, TypeDeclKind, TypeParameterData, Variance,
    WildcardTypeData,
};
