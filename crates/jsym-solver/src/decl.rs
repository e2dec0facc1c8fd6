//! Declaration model.
//!
//! A [`Declaration`] is a small copyable handle. The accessor views
//! ([`TypeDecl`], [`FieldDecl`], [`MethodDecl`], [`ParameterDecl`]) answer the
//! same questions whether the declaration was parsed from source or imported
//! from metadata; origin dispatch happens only inside them.

use crate::db::TypeDatabase;
use crate::store::{FieldInfo, MemberOrigin, MethodInfo, TypeDeclInfo, TypeOrigin};
use crate::substitute::Substitution;
use crate::type_lookup::SigScope;
use crate::types::{FieldId, MethodId, MethodSignature, Type, TypeDeclId, TypeParamInfo};
use jsym_syntax::{Modifiers, NodeData, SyntaxRef, TypeDeclKind};
use std::sync::Arc;

// =============================================================================
// Handles
// =============================================================================

/// Declaration that owns a parameter list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamOwner {
    Method(MethodId),
    /// The `Lambda` node.
    Lambda(SyntaxRef),
}

/// The `index`-th parameter of a method or lambda.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamRef {
    pub owner: ParamOwner,
    pub index: u32,
}

/// Anything a name can resolve to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Declaration {
    Field(FieldId),
    Parameter(ParamRef),
    /// The `LocalVar` node.
    LocalVar(SyntaxRef),
    Method(MethodId),
    Type(TypeDeclId),
}

impl Declaration {
    pub fn is_field(&self) -> bool {
        matches!(self, Self::Field(_))
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self, Self::Parameter(_))
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::LocalVar(_))
    }

    pub fn is_method(&self) -> bool {
        matches!(self, Self::Method(_))
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Self::Type(_))
    }

    pub fn as_type(&self) -> Option<TypeDeclId> {
        match self {
            Self::Type(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<MethodId> {
        match self {
            Self::Method(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<FieldId> {
        match self {
            Self::Field(id) => Some(*id),
            _ => None,
        }
    }

    pub fn name(&self, db: &TypeDatabase) -> Option<Arc<str>> {
        match *self {
            Self::Field(id) => db.field(id).map(|f| f.name()),
            Self::Method(id) => db.method(id).map(|m| m.name()),
            Self::Type(id) => db.type_decl(id).map(|t| t.name()),
            Self::Parameter(param) => db.parameter(param).map(|p| p.name()),
            Self::LocalVar(sref) => match db.node(sref)? {
                NodeData::LocalVar(local) => Some(Arc::from(local.name.as_str())),
                _ => None,
            },
        }
    }

    /// The type a member belongs to. For types, the enclosing type.
    /// Parameters and locals have none.
    pub fn declaring_type(&self, db: &TypeDatabase) -> Option<TypeDeclId> {
        match *self {
            Self::Field(id) => db.field(id).map(|f| f.declaring_type()),
            Self::Method(id) => db.method(id).map(|m| m.declaring_type()),
            Self::Type(id) => db.type_decl(id).and_then(|t| t.enclosing()),
            Self::Parameter(_) | Self::LocalVar(_) => None,
        }
    }
}

// =============================================================================
// Views
// =============================================================================

impl TypeDatabase {
    pub fn type_decl(&self, id: TypeDeclId) -> Option<TypeDecl<'_>> {
        let info = self.store.type_info(id)?;
        Some(TypeDecl { db: self, id, info })
    }

    pub fn field(&self, id: FieldId) -> Option<FieldDecl<'_>> {
        let info = self.store.field_info(id)?;
        Some(FieldDecl { db: self, id, info })
    }

    pub fn method(&self, id: MethodId) -> Option<MethodDecl<'_>> {
        let info = self.store.method_info(id)?;
        Some(MethodDecl { db: self, id, info })
    }

    pub fn parameter(&self, param: ParamRef) -> Option<ParameterDecl<'_>> {
        let count = match param.owner {
            ParamOwner::Method(id) => self.method(id)?.parameter_count(),
            ParamOwner::Lambda(sref) => match self.node(sref)? {
                NodeData::Lambda(lambda) => lambda.params.len(),
                _ => return None,
            },
        };
        ((param.index as usize) < count).then_some(ParameterDecl { db: self, param })
    }

    /// Resolved signature of a method, cached.
    pub fn method_signature(&self, id: MethodId) -> Arc<MethodSignature> {
        if let Some(cached) = self.method_sigs.get(&id) {
            return Arc::clone(cached.value());
        }
        let signature = Arc::new(self.compute_method_signature(id));
        self.method_sigs.insert(id, Arc::clone(&signature));
        signature
    }

    fn compute_method_signature(&self, id: MethodId) -> MethodSignature {
        let empty = MethodSignature {
            type_params: Arc::from(Vec::new()),
            params: Vec::new(),
            return_type: Type::Unknown,
        };
        let Some(info) = self.store.method_info(id) else {
            return empty;
        };
        match &info.origin {
            MemberOrigin::Syntax(sref) => {
                let Some(NodeData::Method(method)) = self.node(*sref) else {
                    return empty;
                };
                let type_params = method
                    .type_params
                    .iter()
                    .filter_map(|&p| self.syntax_type_param_info(sref.with_node(p)))
                    .collect();
                let params = method
                    .params
                    .iter()
                    .map(|&p| match self.node(sref.with_node(p)) {
                        Some(NodeData::Parameter(param)) => {
                            let ty = self.resolve_type_node(sref.with_node(param.ty));
                            if param.varargs { Type::array(ty) } else { ty }
                        }
                        _ => Type::Unknown,
                    })
                    .collect();
                let return_type = if method.return_type.is_none() {
                    Type::Void
                } else {
                    self.resolve_type_node(sref.with_node(method.return_type))
                };
                MethodSignature {
                    type_params,
                    params,
                    return_type,
                }
            }
            MemberOrigin::Metadata { descriptor, index } => {
                let Some(method) = descriptor.methods.get(*index) else {
                    return empty;
                };
                let scope = SigScope {
                    class: Some(&**descriptor),
                    method: Some(method),
                };
                MethodSignature {
                    type_params: method
                        .type_params
                        .iter()
                        .map(|p| self.sig_type_param_info(&p.name, &p.bounds, scope))
                        .collect(),
                    params: method
                        .params
                        .iter()
                        .map(|p| self.type_from_sig(&p.ty, scope))
                        .collect(),
                    return_type: self.type_from_sig(&method.return_type, scope),
                }
            }
        }
    }

    /// Declared type of a field; an enum constant has its enum's type.
    pub fn field_type(&self, id: FieldId) -> Type {
        if let Some(cached) = self.field_types.get(&id) {
            return cached.clone();
        }
        let Some(info) = self.store.field_info(id) else {
            return Type::Unknown;
        };
        let ty = if info.is_enum_constant {
            Type::raw(info.declaring_type)
        } else {
            match &info.origin {
                MemberOrigin::Syntax(sref) => match self.node(*sref) {
                    Some(NodeData::Field(field)) => self.resolve_type_node(sref.with_node(field.ty)),
                    _ => Type::Unknown,
                },
                MemberOrigin::Metadata { descriptor, index } => descriptor
                    .fields
                    .get(*index)
                    .map_or(Type::Unknown, |field| {
                        let scope = SigScope {
                            class: Some(&**descriptor),
                            method: None,
                        };
                        self.type_from_sig(&field.ty, scope)
                    }),
            }
        };
        self.field_types.insert(id, ty.clone());
        ty
    }
}

/// Accessors of a class, interface or enum.
#[derive(Clone)]
pub struct TypeDecl<'db> {
    db: &'db TypeDatabase,
    id: TypeDeclId,
    info: Arc<TypeDeclInfo>,
}

impl TypeDecl<'_> {
    pub fn id(&self) -> TypeDeclId {
        self.id
    }

    pub fn name(&self) -> Arc<str> {
        Arc::clone(&self.info.name)
    }

    pub fn qualified_name(&self) -> Arc<str> {
        Arc::clone(&self.info.qualified_name)
    }

    pub fn kind(&self) -> TypeDeclKind {
        self.info.kind
    }

    pub fn is_interface(&self) -> bool {
        self.info.is_interface()
    }

    pub fn is_enum(&self) -> bool {
        self.info.is_enum()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.info.modifiers
    }

    pub fn enclosing(&self) -> Option<TypeDeclId> {
        self.info.enclosing
    }

    pub fn origin(&self) -> &TypeOrigin {
        &self.info.origin
    }

    pub fn syntax(&self) -> Option<SyntaxRef> {
        self.info.syntax()
    }

    pub fn type_parameters(&self) -> Arc<[TypeParamInfo]> {
        self.db.type_params(self.id)
    }

    pub fn supertypes(&self) -> Arc<[Type]> {
        self.db.supertypes(self.id)
    }

    /// Fields declared here (not inherited), enum constants included.
    pub fn fields(&self) -> &[FieldId] {
        &self.info.fields
    }

    /// Methods declared here (not inherited).
    pub fn methods(&self) -> &[MethodId] {
        &self.info.methods
    }

    pub fn member_type(&self, name: &str) -> Option<TypeDeclId> {
        self.db.member_type(self.id, name)
    }

    /// The generic self type: `C<T1..Tn>` with the declaration's own type
    /// variables as arguments.
    pub fn as_type(&self) -> Type {
        let args = self.type_parameters().iter().map(TypeParamInfo::as_type).collect();
        Type::reference(self.id, args)
    }

    pub fn raw_type(&self) -> Type {
        Type::raw(self.id)
    }

    pub fn declared_field(&self, name: &str) -> Option<FieldId> {
        self.info.fields.iter().copied().find(|&f| {
            self.db
                .store
                .field_info(f)
                .is_some_and(|info| &*info.name == name)
        })
    }

    pub fn declared_methods_named(&self, name: &str) -> Vec<MethodId> {
        self.info
            .methods
            .iter()
            .copied()
            .filter(|&m| {
                self.db
                    .store
                    .method_info(m)
                    .is_some_and(|info| &*info.name == name)
            })
            .collect()
    }
}

impl std::fmt::Debug for TypeDecl<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDecl")
            .field("id", &self.id)
            .field("qualified_name", &self.info.qualified_name)
            .field("kind", &self.info.kind)
            .finish()
    }
}

/// Accessors of a field or enum constant.
#[derive(Clone)]
pub struct FieldDecl<'db> {
    db: &'db TypeDatabase,
    id: FieldId,
    info: Arc<FieldInfo>,
}

impl FieldDecl<'_> {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> Arc<str> {
        Arc::clone(&self.info.name)
    }

    pub fn declaring_type(&self) -> TypeDeclId {
        self.info.declaring_type
    }

    pub fn field_type(&self) -> Type {
        self.db.field_type(self.id)
    }

    pub fn is_static(&self) -> bool {
        self.info.modifiers.contains(Modifiers::STATIC)
    }

    pub fn is_enum_constant(&self) -> bool {
        self.info.is_enum_constant
    }

    pub fn origin(&self) -> &MemberOrigin {
        &self.info.origin
    }
}

/// Accessors of a method.
#[derive(Clone)]
pub struct MethodDecl<'db> {
    db: &'db TypeDatabase,
    id: MethodId,
    info: Arc<MethodInfo>,
}

impl MethodDecl<'_> {
    pub fn id(&self) -> MethodId {
        self.id
    }

    pub fn name(&self) -> Arc<str> {
        Arc::clone(&self.info.name)
    }

    pub fn declaring_type(&self) -> TypeDeclId {
        self.info.declaring_type
    }

    pub fn modifiers(&self) -> Modifiers {
        self.info.modifiers
    }

    pub fn origin(&self) -> &MemberOrigin {
        &self.info.origin
    }

    pub fn signature(&self) -> Arc<MethodSignature> {
        self.db.method_signature(self.id)
    }

    pub fn parameter_count(&self) -> usize {
        self.info.param_count
    }

    /// Declared type of the `index`-th parameter; a varargs parameter is an
    /// array type.
    pub fn parameter_type(&self, index: usize) -> Option<Type> {
        self.signature().params.get(index).cloned()
    }

    pub fn parameter(&self, index: usize) -> Option<ParamRef> {
        (index < self.info.param_count).then_some(ParamRef {
            owner: ParamOwner::Method(self.id),
            index: index as u32,
        })
    }

    pub fn type_parameters(&self) -> Arc<[TypeParamInfo]> {
        Arc::clone(&self.signature().type_params)
    }

    pub fn declared_return_type(&self) -> Type {
        self.signature().return_type.clone()
    }

    /// Return type with `substitution` applied. The method's own type
    /// parameters shadow same-named entries of the substitution.
    pub fn return_type(&self, substitution: &Substitution) -> Type {
        let signature = self.signature();
        substitution
            .without(&signature.type_params)
            .apply(&signature.return_type)
    }

    pub fn is_abstract(&self) -> bool {
        self.info.modifiers.contains(Modifiers::ABSTRACT)
    }

    pub fn is_static(&self) -> bool {
        self.info.modifiers.contains(Modifiers::STATIC)
    }

    pub fn is_default(&self) -> bool {
        self.info.modifiers.contains(Modifiers::DEFAULT)
    }

    pub fn is_varargs(&self) -> bool {
        self.info.is_varargs
    }

    pub fn is_private(&self) -> bool {
        self.info.modifiers.contains(Modifiers::PRIVATE)
    }

    /// `name(erased,param,types)`, e.g. `equals(java.lang.Object)`.
    pub fn signature_key(&self) -> Arc<str> {
        self.signature_key_with(&Substitution::default())
    }

    /// Signature key after applying a supertype substitution, so that
    /// `compare(T,T)` seen through `Comparator<String>` keys as
    /// `compare(java.lang.String,java.lang.String)`.
    pub fn signature_key_with(&self, substitution: &Substitution) -> Arc<str> {
        let signature = self.signature();
        let substitution = substitution.without(&signature.type_params);
        let mut key = String::with_capacity(self.info.name.len() + 16);
        key.push_str(&self.info.name);
        key.push('(');
        for (i, param) in signature.params.iter().enumerate() {
            if i > 0 {
                key.push(',');
            }
            let erased = self.db.erasure(&substitution.apply(param));
            key.push_str(&self.db.erased_name(&erased));
        }
        key.push(')');
        Arc::from(key)
    }
}

impl std::fmt::Debug for MethodDecl<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodDecl")
            .field("id", &self.id)
            .field("name", &self.info.name)
            .field("declaring_type", &self.info.declaring_type)
            .finish()
    }
}

/// Accessors of a method or lambda parameter.
#[derive(Clone)]
pub struct ParameterDecl<'db> {
    db: &'db TypeDatabase,
    param: ParamRef,
}

impl ParameterDecl<'_> {
    pub fn param_ref(&self) -> ParamRef {
        self.param
    }

    pub fn index(&self) -> usize {
        self.param.index as usize
    }

    /// The `Parameter` node, for source declarations.
    pub fn syntax(&self) -> Option<SyntaxRef> {
        let (owner, params) = match self.param.owner {
            ParamOwner::Method(id) => {
                let sref = self.db.store.method_info(id)?.origin.syntax()?;
                match self.db.node(sref)? {
                    NodeData::Method(method) => (sref, &method.params),
                    _ => return None,
                }
            }
            ParamOwner::Lambda(sref) => match self.db.node(sref)? {
                NodeData::Lambda(lambda) => (sref, &lambda.params),
                _ => return None,
            },
        };
        params.get(self.index()).map(|&p| owner.with_node(p))
    }

    /// Declared name; metadata parameters without names are `argN`.
    pub fn name(&self) -> Arc<str> {
        if let Some(sref) = self.syntax()
            && let Some(NodeData::Parameter(param)) = self.db.node(sref)
        {
            return Arc::from(param.name.as_str());
        }
        if let ParamOwner::Method(id) = self.param.owner
            && let Some(info) = self.db.store.method_info(id)
            && let MemberOrigin::Metadata { descriptor, index } = &info.origin
            && let Some(name) = descriptor
                .methods
                .get(*index)
                .and_then(|m| m.params.get(self.index()))
                .and_then(|p| p.name.as_deref())
        {
            return Arc::from(name);
        }
        Arc::from(format!("arg{}", self.index()))
    }

    /// Declared type, `None` for an implicitly typed lambda parameter
    /// (its type comes from the lambda's target).
    pub fn declared_type(&self) -> Option<Type> {
        match self.param.owner {
            ParamOwner::Method(id) => self.db.method(id)?.parameter_type(self.index()),
            ParamOwner::Lambda(_) => {
                let sref = self.syntax()?;
                match self.db.node(sref)? {
                    NodeData::Parameter(param) if param.ty.is_some() => {
                        let ty = self.db.resolve_type_node(sref.with_node(param.ty));
                        Some(if param.varargs { Type::array(ty) } else { ty })
                    }
                    _ => None,
                }
            }
        }
    }

    pub fn is_varargs(&self) -> bool {
        self.syntax()
            .and_then(|sref| match self.db.node(sref) {
                Some(NodeData::Parameter(param)) => Some(param.varargs),
                _ => None,
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "../tests/decl_tests.rs"]
mod tests;
