//! Programmatic construction of compilation units.
//!
//! The resolver never parses text; an embedding front end (or a test) builds
//! each compilation unit bottom-up with a [`UnitBuilder`] and hands the
//! finished [`NodeArena`] to a session.
//!
//! ```ignore
//! let mut b = UnitBuilder::new(Some("demo"));
//! let outer_ty = b.class_type("Outer", vec![]);
//! let x = b.field(Modifiers::empty(), "x", outer_ty, NodeIndex::NONE);
//! let inner = b.type_decl(TypeDeclData::class("Inner").with_members(vec![x]));
//! let outer = b.type_decl(TypeDeclData::class("Outer").with_members(vec![inner]));
//! let arena = b.finish(vec![outer]);
//! ```

use crate::arena::NodeArena;
use crate::base::NodeIndex;
use crate::node::*;
use jsym_common::PrimitiveKind;

pub struct UnitBuilder {
    arena: NodeArena,
    package: Option<String>,
    imports: Vec<NodeIndex>,
}

impl UnitBuilder {
    pub fn new(package: Option<&str>) -> Self {
        Self {
            arena: NodeArena::new(),
            package: package.map(str::to_string),
            imports: Vec::new(),
        }
    }

    /// Escape hatch for node kinds without a dedicated helper.
    pub fn add(&mut self, data: NodeData) -> NodeIndex {
        self.arena.add(data)
    }

    // =========================================================================
    // Imports
    // =========================================================================

    fn push_import(&mut self, name: &str, is_static: bool, on_demand: bool) -> NodeIndex {
        let idx = self.arena.add(NodeData::Import(ImportData {
            name: name.to_string(),
            is_static,
            on_demand,
        }));
        self.imports.push(idx);
        idx
    }

    /// `import a.b.C;`
    pub fn import(&mut self, name: &str) -> NodeIndex {
        self.push_import(name, false, false)
    }

    /// `import a.b.*;` (pass the name without `.*`)
    pub fn import_on_demand(&mut self, name: &str) -> NodeIndex {
        self.push_import(name, false, true)
    }

    /// `import static a.b.C.member;`
    pub fn import_static(&mut self, name: &str) -> NodeIndex {
        self.push_import(name, true, false)
    }

    /// `import static a.b.C.*;`
    pub fn import_static_on_demand(&mut self, name: &str) -> NodeIndex {
        self.push_import(name, true, true)
    }

    // =========================================================================
    // Type annotations
    // =========================================================================

    pub fn primitive(&mut self, kind: PrimitiveKind) -> NodeIndex {
        self.arena.add(NodeData::PrimitiveType(kind))
    }

    pub fn void_type(&mut self) -> NodeIndex {
        self.arena.add(NodeData::VoidType)
    }

    pub fn class_type(&mut self, name: &str, type_args: Vec<NodeIndex>) -> NodeIndex {
        self.arena.add(NodeData::ClassType(ClassTypeData {
            name: name.to_string(),
            type_args,
        }))
    }

    pub fn array_type(&mut self, element: NodeIndex) -> NodeIndex {
        self.arena.add(NodeData::ArrayType { element })
    }

    /// `?`, `? extends B` or `? super B`; pass [`NodeIndex::NONE`] for `?`.
    pub fn wildcard(&mut self, bound: NodeIndex, variance: Variance) -> NodeIndex {
        self.arena
            .add(NodeData::WildcardType(WildcardTypeData { bound, variance }))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn type_param(&mut self, name: &str, bounds: Vec<NodeIndex>) -> NodeIndex {
        self.arena.add(NodeData::TypeParameter(TypeParameterData {
            name: name.to_string(),
            bounds,
        }))
    }

    pub fn param(&mut self, name: &str, ty: NodeIndex) -> NodeIndex {
        self.arena.add(NodeData::Parameter(ParameterData {
            name: name.to_string(),
            ty,
            varargs: false,
        }))
    }

    /// `T... name`; `ty` is the element type.
    pub fn varargs_param(&mut self, name: &str, ty: NodeIndex) -> NodeIndex {
        self.arena.add(NodeData::Parameter(ParameterData {
            name: name.to_string(),
            ty,
            varargs: true,
        }))
    }

    /// Implicitly typed lambda parameter.
    pub fn lambda_param(&mut self, name: &str) -> NodeIndex {
        self.param(name, NodeIndex::NONE)
    }

    pub fn field(
        &mut self,
        modifiers: Modifiers,
        name: &str,
        ty: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex {
        self.arena.add(NodeData::Field(FieldData {
            name: name.to_string(),
            modifiers,
            ty,
            initializer,
        }))
    }

    pub fn method(&mut self, data: MethodData) -> NodeIndex {
        self.arena.add(NodeData::Method(data))
    }

    pub fn enum_constant(&mut self, name: &str, args: Vec<NodeIndex>) -> NodeIndex {
        self.arena.add(NodeData::EnumConstant(EnumConstantData {
            name: name.to_string(),
            args,
        }))
    }

    pub fn type_decl(&mut self, data: TypeDeclData) -> NodeIndex {
        self.arena.add(NodeData::TypeDecl(data))
    }

    pub fn initializer(&mut self, is_static: bool, body: NodeIndex) -> NodeIndex {
        self.arena
            .add(NodeData::Initializer(InitializerData { is_static, body }))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.arena.add(NodeData::Block(BlockData { statements }))
    }

    /// Local variable declaration; pass [`NodeIndex::NONE`] as `ty` for `var`.
    pub fn local(&mut self, name: &str, ty: NodeIndex, initializer: NodeIndex) -> NodeIndex {
        self.arena.add(NodeData::LocalVar(LocalVarData {
            name: name.to_string(),
            ty,
            initializer,
        }))
    }

    pub fn expr_stmt(&mut self, expr: NodeIndex) -> NodeIndex {
        self.arena.add(NodeData::ExprStatement { expr })
    }

    pub fn ret(&mut self, expr: NodeIndex) -> NodeIndex {
        self.arena.add(NodeData::Return { expr })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn literal(&mut self, kind: LiteralKind, text: &str) -> NodeIndex {
        self.arena.add(NodeData::Literal(LiteralData {
            kind,
            text: text.to_string(),
        }))
    }

    pub fn int_lit(&mut self, value: i64) -> NodeIndex {
        self.literal(LiteralKind::Int, &value.to_string())
    }

    pub fn string_lit(&mut self, value: &str) -> NodeIndex {
        self.literal(LiteralKind::String, value)
    }

    pub fn null_lit(&mut self) -> NodeIndex {
        self.literal(LiteralKind::Null, "null")
    }

    pub fn name(&mut self, name: &str) -> NodeIndex {
        self.arena.add(NodeData::Name {
            name: name.to_string(),
        })
    }

    pub fn this(&mut self) -> NodeIndex {
        self.arena.add(NodeData::This)
    }

    pub fn field_access(&mut self, receiver: NodeIndex, name: &str) -> NodeIndex {
        self.arena.add(NodeData::FieldAccess(FieldAccessData {
            receiver,
            name: name.to_string(),
        }))
    }

    pub fn array_access(&mut self, array: NodeIndex, index: NodeIndex) -> NodeIndex {
        self.arena
            .add(NodeData::ArrayAccess(ArrayAccessData { array, index }))
    }

    /// Method call; pass [`NodeIndex::NONE`] as receiver for `m(args)`.
    pub fn call(&mut self, receiver: NodeIndex, name: &str, args: Vec<NodeIndex>) -> NodeIndex {
        self.arena.add(NodeData::MethodCall(MethodCallData {
            receiver,
            name: name.to_string(),
            args,
            type_args: Vec::new(),
        }))
    }

    pub fn new_object(&mut self, ty: NodeIndex, args: Vec<NodeIndex>) -> NodeIndex {
        self.arena
            .add(NodeData::ObjectCreation(ObjectCreationData { ty, args }))
    }

    pub fn cast(&mut self, ty: NodeIndex, expr: NodeIndex) -> NodeIndex {
        self.arena.add(NodeData::Cast(CastData { ty, expr }))
    }

    pub fn lambda(&mut self, params: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex {
        self.arena.add(NodeData::Lambda(LambdaData { params, body }))
    }

    // =========================================================================
    // Finish
    // =========================================================================

    /// Create the compilation-unit node over `types`, link parents and
    /// return the arena.
    pub fn finish(mut self, types: Vec<NodeIndex>) -> NodeArena {
        let root = self
            .arena
            .add(NodeData::CompilationUnit(CompilationUnitData {
                package: self.package.take(),
                imports: std::mem::take(&mut self.imports),
                types,
            }));
        self.arena.set_root(root);
        self.arena
    }
}

#[cfg(test)]
#[path = "../tests/builder_tests.rs"]
mod tests;
