//! Node kinds and per-kind payloads.
//!
//! Each node is a parent link plus a [`NodeData`] payload. Child links are
//! stored in the payloads as [`NodeIndex`] values; [`NodeIndex::NONE`] marks an
//! absent optional child.

use crate::base::NodeIndex;
use bitflags::bitflags;
use jsym_common::PrimitiveKind;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

bitflags! {
    /// Declaration modifiers.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
        /// Interface method with a body.
        const DEFAULT = 1 << 6;
        const NATIVE = 1 << 7;
    }
}

/// Class-like declaration kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeDeclKind {
    Class,
    Interface,
    Enum,
}

/// Wildcard direction (`? extends T` / `? super T`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variance {
    Extends,
    Super,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
    Char,
    Boolean,
    String,
    Null,
}

/// Discriminant of [`NodeData`], for cheap matching.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    CompilationUnit,
    Import,
    TypeDecl,
    EnumConstant,
    Field,
    Method,
    Parameter,
    TypeParameter,
    Initializer,
    Block,
    LocalVar,
    ExprStatement,
    Return,
    Literal,
    Name,
    This,
    FieldAccess,
    ArrayAccess,
    MethodCall,
    ObjectCreation,
    Cast,
    Lambda,
    PrimitiveType,
    VoidType,
    ClassType,
    ArrayType,
    WildcardType,
}

impl SyntaxKind {
    /// Nodes that denote a type annotation.
    pub const fn is_type(self) -> bool {
        matches!(
            self,
            Self::PrimitiveType
                | Self::VoidType
                | Self::ClassType
                | Self::ArrayType
                | Self::WildcardType
        )
    }

    /// Nodes that introduce a declaration with a name.
    pub const fn is_declaration(self) -> bool {
        matches!(
            self,
            Self::TypeDecl
                | Self::EnumConstant
                | Self::Field
                | Self::Method
                | Self::Parameter
                | Self::LocalVar
                | Self::TypeParameter
        )
    }
}

// =============================================================================
// Payloads
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CompilationUnitData {
    pub package: Option<String>,
    pub imports: Vec<NodeIndex>,
    pub types: Vec<NodeIndex>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImportData {
    /// Imported name without the trailing `.*` for on-demand imports.
    pub name: String,
    pub is_static: bool,
    pub on_demand: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeDeclData {
    pub name: String,
    pub kind: TypeDeclKind,
    pub modifiers: Modifiers,
    pub type_params: Vec<NodeIndex>,
    /// Superclass for classes, superinterfaces for interfaces.
    pub extends: Vec<NodeIndex>,
    pub implements: Vec<NodeIndex>,
    /// Fields, methods, enum constants, initializers and member types.
    pub members: Vec<NodeIndex>,
}

impl TypeDeclData {
    pub fn new(name: impl Into<String>, kind: TypeDeclKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Modifiers::empty(),
            type_params: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeDeclKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeDeclKind::Interface)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, TypeDeclKind::Enum)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_type_params(mut self, type_params: Vec<NodeIndex>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn with_extends(mut self, extends: Vec<NodeIndex>) -> Self {
        self.extends = extends;
        self
    }

    pub fn with_implements(mut self, implements: Vec<NodeIndex>) -> Self {
        self.implements = implements;
        self
    }

    pub fn with_members(mut self, members: Vec<NodeIndex>) -> Self {
        self.members = members;
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnumConstantData {
    pub name: String,
    pub args: Vec<NodeIndex>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldData {
    pub name: String,
    pub modifiers: Modifiers,
    pub ty: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MethodData {
    pub name: String,
    pub modifiers: Modifiers,
    pub type_params: Vec<NodeIndex>,
    pub params: Vec<NodeIndex>,
    /// [`NodeIndex::NONE`] means `void`.
    pub return_type: NodeIndex,
    /// [`NodeIndex::NONE`] for bodiless (abstract or native) methods.
    pub body: NodeIndex,
}

impl MethodData {
    pub fn new(name: impl Into<String>, return_type: NodeIndex) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::empty(),
            type_params: Vec::new(),
            params: Vec::new(),
            return_type,
            body: NodeIndex::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_type_params(mut self, type_params: Vec<NodeIndex>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn with_params(mut self, params: Vec<NodeIndex>) -> Self {
        self.params = params;
        self
    }

    pub fn with_body(mut self, body: NodeIndex) -> Self {
        self.body = body;
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterData {
    pub name: String,
    /// [`NodeIndex::NONE`] for implicitly typed lambda parameters.
    pub ty: NodeIndex,
    pub varargs: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeParameterData {
    pub name: String,
    pub bounds: Vec<NodeIndex>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InitializerData {
    pub is_static: bool,
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BlockData {
    pub statements: Vec<NodeIndex>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocalVarData {
    pub name: String,
    /// [`NodeIndex::NONE`] for `var` declarations.
    pub ty: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiteralData {
    pub kind: LiteralKind,
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldAccessData {
    pub receiver: NodeIndex,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArrayAccessData {
    pub array: NodeIndex,
    pub index: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MethodCallData {
    /// [`NodeIndex::NONE`] for calls with an implicit receiver.
    pub receiver: NodeIndex,
    pub name: String,
    pub args: Vec<NodeIndex>,
    /// Explicit type arguments (`recv.<String>m()`).
    pub type_args: Vec<NodeIndex>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectCreationData {
    pub ty: NodeIndex,
    pub args: Vec<NodeIndex>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CastData {
    pub ty: NodeIndex,
    pub expr: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LambdaData {
    pub params: Vec<NodeIndex>,
    /// An expression or a block.
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassTypeData {
    /// Simple or dotted name as written.
    pub name: String,
    pub type_args: Vec<NodeIndex>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WildcardTypeData {
    /// [`NodeIndex::NONE`] for an unbounded `?`.
    pub bound: NodeIndex,
    pub variance: Variance,
}

/// Per-kind node payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum NodeData {
    CompilationUnit(CompilationUnitData),
    Import(ImportData),
    TypeDecl(TypeDeclData),
    EnumConstant(EnumConstantData),
    Field(FieldData),
    Method(MethodData),
    Parameter(ParameterData),
    TypeParameter(TypeParameterData),
    Initializer(InitializerData),
    Block(BlockData),
    LocalVar(LocalVarData),
    ExprStatement { expr: NodeIndex },
    Return { expr: NodeIndex },
    Literal(LiteralData),
    Name { name: String },
    This,
    FieldAccess(FieldAccessData),
    ArrayAccess(ArrayAccessData),
    MethodCall(MethodCallData),
    ObjectCreation(ObjectCreationData),
    Cast(CastData),
    Lambda(LambdaData),
    PrimitiveType(PrimitiveKind),
    VoidType,
    ClassType(ClassTypeData),
    ArrayType { element: NodeIndex },
    WildcardType(WildcardTypeData),
}

impl NodeData {
    pub const fn kind(&self) -> SyntaxKind {
        match self {
            Self::CompilationUnit(_) => SyntaxKind::CompilationUnit,
            Self::Import(_) => SyntaxKind::Import,
            Self::TypeDecl(_) => SyntaxKind::TypeDecl,
            Self::EnumConstant(_) => SyntaxKind::EnumConstant,
            Self::Field(_) => SyntaxKind::Field,
            Self::Method(_) => SyntaxKind::Method,
            Self::Parameter(_) => SyntaxKind::Parameter,
            Self::TypeParameter(_) => SyntaxKind::TypeParameter,
            Self::Initializer(_) => SyntaxKind::Initializer,
            Self::Block(_) => SyntaxKind::Block,
            Self::LocalVar(_) => SyntaxKind::LocalVar,
            Self::ExprStatement { .. } => SyntaxKind::ExprStatement,
            Self::Return { .. } => SyntaxKind::Return,
            Self::Literal(_) => SyntaxKind::Literal,
            Self::Name { .. } => SyntaxKind::Name,
            Self::This => SyntaxKind::This,
            Self::FieldAccess(_) => SyntaxKind::FieldAccess,
            Self::ArrayAccess(_) => SyntaxKind::ArrayAccess,
            Self::MethodCall(_) => SyntaxKind::MethodCall,
            Self::ObjectCreation(_) => SyntaxKind::ObjectCreation,
            Self::Cast(_) => SyntaxKind::Cast,
            Self::Lambda(_) => SyntaxKind::Lambda,
            Self::PrimitiveType(_) => SyntaxKind::PrimitiveType,
            Self::VoidType => SyntaxKind::VoidType,
            Self::ClassType(_) => SyntaxKind::ClassType,
            Self::ArrayType { .. } => SyntaxKind::ArrayType,
            Self::WildcardType(_) => SyntaxKind::WildcardType,
        }
    }

    /// Identifier text carried by the node, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::TypeDecl(d) => Some(&d.name),
            Self::EnumConstant(d) => Some(&d.name),
            Self::Field(d) => Some(&d.name),
            Self::Method(d) => Some(&d.name),
            Self::Parameter(d) => Some(&d.name),
            Self::TypeParameter(d) => Some(&d.name),
            Self::LocalVar(d) => Some(&d.name),
            Self::Name { name } => Some(name),
            Self::FieldAccess(d) => Some(&d.name),
            Self::MethodCall(d) => Some(&d.name),
            Self::ClassType(d) => Some(&d.name),
            Self::Import(d) => Some(&d.name),
            _ => None,
        }
    }

    /// Direct children in source order, absent children skipped.
    pub fn children(&self) -> SmallVec<[NodeIndex; 8]> {
        let mut out: SmallVec<[NodeIndex; 8]> = SmallVec::new();
        let mut push = |idx: NodeIndex| {
            if idx.is_some() {
                out.push(idx);
            }
        };
        match self {
            Self::CompilationUnit(d) => {
                d.imports.iter().copied().for_each(&mut push);
                d.types.iter().copied().for_each(&mut push);
            }
            Self::TypeDecl(d) => {
                d.type_params.iter().copied().for_each(&mut push);
                d.extends.iter().copied().for_each(&mut push);
                d.implements.iter().copied().for_each(&mut push);
                d.members.iter().copied().for_each(&mut push);
            }
            Self::EnumConstant(d) => d.args.iter().copied().for_each(&mut push),
            Self::Field(d) => {
                push(d.ty);
                push(d.initializer);
            }
            Self::Method(d) => {
                d.type_params.iter().copied().for_each(&mut push);
                d.params.iter().copied().for_each(&mut push);
                push(d.return_type);
                push(d.body);
            }
            Self::Parameter(d) => push(d.ty),
            Self::TypeParameter(d) => d.bounds.iter().copied().for_each(&mut push),
            Self::Initializer(d) => push(d.body),
            Self::Block(d) => d.statements.iter().copied().for_each(&mut push),
            Self::LocalVar(d) => {
                push(d.ty);
                push(d.initializer);
            }
            Self::ExprStatement { expr } | Self::Return { expr } => push(*expr),
            Self::FieldAccess(d) => push(d.receiver),
            Self::ArrayAccess(d) => {
                push(d.array);
                push(d.index);
            }
            Self::MethodCall(d) => {
                push(d.receiver);
                d.type_args.iter().copied().for_each(&mut push);
                d.args.iter().copied().for_each(&mut push);
            }
            Self::ObjectCreation(d) => {
                push(d.ty);
                d.args.iter().copied().for_each(&mut push);
            }
            Self::Cast(d) => {
                push(d.ty);
                push(d.expr);
            }
            Self::Lambda(d) => {
                d.params.iter().copied().for_each(&mut push);
                push(d.body);
            }
            Self::ClassType(d) => d.type_args.iter().copied().for_each(&mut push),
            Self::ArrayType { element } => push(*element),
            Self::WildcardType(d) => push(d.bound),
            Self::Import(_)
            | Self::Literal(_)
            | Self::Name { .. }
            | Self::This
            | Self::PrimitiveType(_)
            | Self::VoidType => {}
        }
        out
    }
}

/// A node: payload plus parent link.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub parent: NodeIndex,
    pub data: NodeData,
}

impl Node {
    #[inline]
    pub const fn kind(&self) -> SyntaxKind {
        self.data.kind()
    }
}
