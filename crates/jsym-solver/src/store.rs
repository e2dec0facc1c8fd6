//! Declaration tables.
//!
//! Every type, field and method known to a session gets a handle
//! ([`TypeDeclId`], [`FieldId`], [`MethodId`]) and an immutable info record
//! stored here. Syntax declarations are registered while the session is
//! populated; metadata declarations are registered lazily on first lookup,
//! possibly from several reader threads, so the tables are concurrent maps
//! with atomic handle allocation.

use crate::metadata::TypeDescriptor;
use crate::types::{FieldId, MethodId, TypeDeclId};
use dashmap::DashMap;
use jsym_syntax::{Modifiers, SyntaxRef, TypeDeclKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

// =============================================================================
// Origins
// =============================================================================

/// Where a type declaration comes from.
#[derive(Clone, Debug)]
pub enum TypeOrigin {
    /// The `TypeDecl` node.
    Syntax(SyntaxRef),
    Metadata(Arc<TypeDescriptor>),
}

/// Where a field or method comes from.
#[derive(Clone, Debug)]
pub enum MemberOrigin {
    /// The `Field`, `EnumConstant` or `Method` node.
    Syntax(SyntaxRef),
    /// Index into the descriptor's `fields` or `methods`.
    Metadata {
        descriptor: Arc<TypeDescriptor>,
        index: usize,
    },
}

impl MemberOrigin {
    pub fn syntax(&self) -> Option<SyntaxRef> {
        match self {
            Self::Syntax(sref) => Some(*sref),
            Self::Metadata { .. } => None,
        }
    }
}

// =============================================================================
// Info records
// =============================================================================

#[derive(Clone, Debug)]
pub struct TypeDeclInfo {
    pub name: Arc<str>,
    pub qualified_name: Arc<str>,
    pub kind: TypeDeclKind,
    pub modifiers: Modifiers,
    pub enclosing: Option<TypeDeclId>,
    pub fields: Vec<FieldId>,
    pub methods: Vec<MethodId>,
    /// Member types declared in source. Metadata member types are imported
    /// on demand from `TypeDescriptor::nested_types`.
    pub member_types: Vec<TypeDeclId>,
    pub origin: TypeOrigin,
}

impl TypeDeclInfo {
    pub fn is_interface(&self) -> bool {
        self.kind == TypeDeclKind::Interface
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeDeclKind::Enum
    }

    pub fn syntax(&self) -> Option<SyntaxRef> {
        match &self.origin {
            TypeOrigin::Syntax(sref) => Some(*sref),
            TypeOrigin::Metadata(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FieldInfo {
    pub name: Arc<str>,
    pub declaring_type: TypeDeclId,
    pub modifiers: Modifiers,
    pub is_enum_constant: bool,
    pub origin: MemberOrigin,
}

#[derive(Clone, Debug)]
pub struct MethodInfo {
    pub name: Arc<str>,
    pub declaring_type: TypeDeclId,
    /// Declared modifiers plus the implicit ones (`ABSTRACT` for bodiless
    /// interface methods).
    pub modifiers: Modifiers,
    pub is_varargs: bool,
    pub param_count: usize,
    pub origin: MemberOrigin,
}

/// What a declaration node was registered as.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxDecl {
    Type(TypeDeclId),
    Field(FieldId),
    Method(MethodId),
}

// =============================================================================
// DeclarationStore
// =============================================================================

/// Storage for declaration info records.
pub struct DeclarationStore {
    types: DashMap<TypeDeclId, Arc<TypeDeclInfo>>,
    fields: DashMap<FieldId, Arc<FieldInfo>>,
    methods: DashMap<MethodId, Arc<MethodInfo>>,
    syntax_decls: DashMap<SyntaxRef, SyntaxDecl>,
    next_type: AtomicU32,
    next_field: AtomicU32,
    next_method: AtomicU32,
}

impl Default for DeclarationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationStore {
    pub fn new() -> Self {
        Self {
            types: DashMap::new(),
            fields: DashMap::new(),
            methods: DashMap::new(),
            syntax_decls: DashMap::new(),
            next_type: AtomicU32::new(TypeDeclId::FIRST_VALID),
            next_field: AtomicU32::new(0),
            next_method: AtomicU32::new(0),
        }
    }

    /// Reserve a type handle. Members need the handle of their declaring
    /// type before the type's own record can be built.
    pub fn allocate_type(&self) -> TypeDeclId {
        TypeDeclId(self.next_type.fetch_add(1, Ordering::SeqCst))
    }

    pub fn insert_type(&self, id: TypeDeclId, info: TypeDeclInfo) {
        trace!(type_id = id.0, name = %info.qualified_name, "DeclarationStore::insert_type");
        if let Some(sref) = info.syntax() {
            self.syntax_decls.insert(sref, SyntaxDecl::Type(id));
        }
        self.types.insert(id, Arc::new(info));
    }

    pub fn register_field(&self, info: FieldInfo) -> FieldId {
        let id = FieldId(self.next_field.fetch_add(1, Ordering::SeqCst));
        if let Some(sref) = info.origin.syntax() {
            self.syntax_decls.insert(sref, SyntaxDecl::Field(id));
        }
        self.fields.insert(id, Arc::new(info));
        id
    }

    pub fn register_method(&self, info: MethodInfo) -> MethodId {
        let id = MethodId(self.next_method.fetch_add(1, Ordering::SeqCst));
        if let Some(sref) = info.origin.syntax() {
            self.syntax_decls.insert(sref, SyntaxDecl::Method(id));
        }
        self.methods.insert(id, Arc::new(info));
        id
    }

    pub fn type_info(&self, id: TypeDeclId) -> Option<Arc<TypeDeclInfo>> {
        self.types.get(&id).map(|r| Arc::clone(r.value()))
    }

    pub fn field_info(&self, id: FieldId) -> Option<Arc<FieldInfo>> {
        self.fields.get(&id).map(|r| Arc::clone(r.value()))
    }

    pub fn method_info(&self, id: MethodId) -> Option<Arc<MethodInfo>> {
        self.methods.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// Handle registered for a declaration node.
    pub fn syntax_decl(&self, sref: SyntaxRef) -> Option<SyntaxDecl> {
        self.syntax_decls.get(&sref).map(|r| *r.value())
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

#[cfg(test)]
#[path = "../tests/store_tests.rs"]
mod tests;
