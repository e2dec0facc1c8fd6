//! Type-name resolution.
//!
//! Simple names are searched in this order:
//! 1. single-type imports,
//! 2. types of the same compilation unit (member types of the enclosing
//!    types, inner to outer, then the unit's top-level types),
//! 3. on-demand imports,
//! 4. the unit's package,
//! 5. the implicit packages, then the global namespace.
//!
//! Type variables shadow all of the above but only exist for type
//! annotations, so they are handled by [`TypeDatabase::resolve_type_node`].
//!
//! Qualified names resolve their longest prefix that names a type and walk
//! the remaining segments as member types.

use crate::db::TypeDatabase;
use crate::error::ConfigurationError;
use crate::metadata::{MethodDescriptor, TypeDescriptor, TypeSig, builtin_descriptor};
use crate::reference::SymbolReference;
use crate::store::{FieldInfo, MemberOrigin, MethodInfo, SyntaxDecl, TypeDeclInfo, TypeOrigin};
use crate::types::{Type, TypeDeclId, TypeParamInfo};
use jsym_common::limits::MAX_QUALIFIED_NAME_SEGMENTS;
use jsym_common::names::{is_qualified, qualifier, qualify, segments, simple_name};
use jsym_syntax::{
    ClassTypeData, Modifiers, NodeData, NodeIndex, SyntaxKind, SyntaxRef, TypeDeclKind, UnitId,
};
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, trace};

/// Where a type name is being resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupContext {
    pub unit: UnitId,
    /// Enclosing source types, innermost first.
    pub enclosing: SmallVec<[TypeDeclId; 4]>,
}

impl LookupContext {
    /// Top level of a unit: imports and packages only.
    pub fn for_unit(unit: UnitId) -> Self {
        Self {
            unit,
            enclosing: SmallVec::new(),
        }
    }
}

/// Type variables whose bounds are being resolved. A variable met again
/// while its own bound is in progress gets an `Unknown` bound.
#[derive(Default)]
pub(crate) struct BoundStack {
    nodes: SmallVec<[SyntaxRef; 4]>,
    sig_vars: SmallVec<[Arc<str>; 4]>,
}

/// Type variables visible to a metadata signature.
#[derive(Clone, Copy)]
pub(crate) struct SigScope<'a> {
    pub class: Option<&'a TypeDescriptor>,
    pub method: Option<&'a MethodDescriptor>,
}

impl TypeDatabase {
    // =========================================================================
    // Contexts
    // =========================================================================

    /// Lookup context of a node: its unit plus the source types around it.
    /// A type declaration node counts as enclosing itself.
    pub fn lookup_context(&self, sref: SyntaxRef) -> LookupContext {
        let mut ctx = LookupContext::for_unit(sref.unit);
        let Some(arena) = self.unit(sref.unit) else {
            return ctx;
        };
        for node in std::iter::once(sref.node).chain(arena.ancestors(sref.node)) {
            if arena.kind(node) != Some(SyntaxKind::TypeDecl) {
                continue;
            }
            if let Some(SyntaxDecl::Type(id)) = self.store.syntax_decl(sref.with_node(node)) {
                ctx.enclosing.push(id);
            }
        }
        ctx
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Resolve a simple or qualified type name.
    pub fn resolve_type_by_name(
        &self,
        name: &str,
        ctx: &LookupContext,
    ) -> SymbolReference<TypeDeclId> {
        let outcome = if is_qualified(name) {
            self.resolve_qualified_type_name(name, ctx)
        } else {
            self.resolve_simple_type_name(name, ctx)
        };
        trace!(name, unit = ctx.unit.0, ?outcome, "resolve_type_by_name");
        outcome
    }

    fn resolve_simple_type_name(
        &self,
        name: &str,
        ctx: &LookupContext,
    ) -> SymbolReference<TypeDeclId> {
        if let Some(arena) = self.unit(ctx.unit) {
            for import in arena.imports().filter(|i| !i.is_static && !i.on_demand) {
                if simple_name(&import.name) != name {
                    continue;
                }
                if let Some(id) = self.resolve_qualified_global(&import.name) {
                    return SymbolReference::Solved(id);
                }
            }

            for &decl in &ctx.enclosing {
                if let Some(id) = self.member_type(decl, name) {
                    return SymbolReference::Solved(id);
                }
            }
            for &node in arena.top_level_types() {
                if arena.identifier_text(node) != Some(name) {
                    continue;
                }
                if let Some(SyntaxDecl::Type(id)) =
                    self.store.syntax_decl(SyntaxRef::new(ctx.unit, node))
                {
                    return SymbolReference::Solved(id);
                }
            }

            let mut on_demand: SmallVec<[TypeDeclId; 2]> = SmallVec::new();
            for import in arena.imports().filter(|i| !i.is_static && i.on_demand) {
                let candidate = qualify(Some(&import.name), name);
                if let Some(id) = self.resolve_qualified_global(&candidate)
                    && !on_demand.contains(&id)
                {
                    on_demand.push(id);
                }
            }
            match on_demand.len() {
                0 => {}
                1 => return SymbolReference::Solved(on_demand[0]),
                _ => return SymbolReference::Ambiguous(on_demand),
            }

            if let Some(package) = arena.package()
                && let Some(id) = self.lookup_qualified(&qualify(Some(package), name))
            {
                return SymbolReference::Solved(id);
            }
        }

        for package in &self.options.implicit_packages {
            if let Some(id) = self.lookup_qualified(&qualify(Some(package), name)) {
                return SymbolReference::Solved(id);
            }
        }
        self.lookup_qualified(name).into()
    }

    fn resolve_qualified_type_name(
        &self,
        name: &str,
        ctx: &LookupContext,
    ) -> SymbolReference<TypeDeclId> {
        let segs: SmallVec<[&str; 8]> = segments(name).take(MAX_QUALIFIED_NAME_SEGMENTS).collect();
        if let Some((&first, rest)) = segs.split_first()
            && let SymbolReference::Solved(mut id) = self.resolve_simple_type_name(first, ctx)
        {
            let mut walked = true;
            for seg in rest {
                match self.member_type(id, seg) {
                    Some(member) => id = member,
                    None => {
                        walked = false;
                        break;
                    }
                }
            }
            if walked {
                return SymbolReference::Solved(id);
            }
        }
        self.resolve_qualified_global(name).into()
    }

    /// Resolve a fully qualified name, allowing member types
    /// (`pkg.Outer.Inner`).
    pub fn resolve_qualified_global(&self, name: &str) -> Option<TypeDeclId> {
        if let Some(id) = self.lookup_qualified(name) {
            return Some(id);
        }
        let segs: SmallVec<[&str; 8]> = segments(name).take(MAX_QUALIFIED_NAME_SEGMENTS).collect();
        for split in (1..segs.len()).rev() {
            let prefix = segs[..split].join(".");
            let Some(mut id) = self.lookup_qualified(&prefix) else {
                continue;
            };
            for seg in &segs[split..] {
                id = self.member_type(id, seg)?;
            }
            return Some(id);
        }
        None
    }

    /// Exact qualified-name lookup: source types, then metadata (imported
    /// on first use), then the bootstrap descriptors.
    pub fn lookup_qualified(&self, name: &str) -> Option<TypeDeclId> {
        if let Some(id) = self.registry.get(name) {
            return Some(id);
        }
        if self.registry.is_known_miss(name) {
            return None;
        }
        let descriptor = self
            .provider
            .lookup_by_qualified_name(name)
            .or_else(|| builtin_descriptor(name));
        match descriptor {
            Some(descriptor) if descriptor.name == name => Some(self.import_descriptor(descriptor)),
            Some(descriptor) => {
                self.record_error(ConfigurationError::DescriptorNameMismatch {
                    requested: name.to_string(),
                    found: descriptor.name.clone(),
                });
                self.registry.record_miss(name);
                None
            }
            None => {
                self.registry.record_miss(name);
                None
            }
        }
    }

    fn import_descriptor(&self, descriptor: Arc<TypeDescriptor>) -> TypeDeclId {
        // Resolved before taking the registry entry: the registration closure
        // must not read the registry. Package prefixes simply miss.
        let enclosing = qualifier(&descriptor.name).and_then(|outer| self.lookup_qualified(outer));
        let name = descriptor.name.clone();
        self.registry
            .import_with(&name, || self.register_descriptor(descriptor, enclosing))
    }

    fn register_descriptor(
        &self,
        descriptor: Arc<TypeDescriptor>,
        enclosing: Option<TypeDeclId>,
    ) -> TypeDeclId {
        let id = self.store.allocate_type();
        let fields = descriptor
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let mut modifiers = Modifiers::PUBLIC;
                if field.is_static || field.is_enum_constant {
                    modifiers |= Modifiers::STATIC;
                }
                if field.is_enum_constant {
                    modifiers |= Modifiers::FINAL;
                }
                self.store.register_field(FieldInfo {
                    name: Arc::from(field.name.as_str()),
                    declaring_type: id,
                    modifiers,
                    is_enum_constant: field.is_enum_constant,
                    origin: MemberOrigin::Metadata {
                        descriptor: Arc::clone(&descriptor),
                        index,
                    },
                })
            })
            .collect();
        let methods = descriptor
            .methods
            .iter()
            .enumerate()
            .map(|(index, method)| {
                let mut modifiers = Modifiers::PUBLIC;
                modifiers.set(Modifiers::ABSTRACT, method.is_abstract);
                modifiers.set(Modifiers::STATIC, method.is_static);
                modifiers.set(Modifiers::DEFAULT, method.is_default);
                self.store.register_method(MethodInfo {
                    name: Arc::from(method.name.as_str()),
                    declaring_type: id,
                    modifiers,
                    is_varargs: method.is_varargs,
                    param_count: method.params.len(),
                    origin: MemberOrigin::Metadata {
                        descriptor: Arc::clone(&descriptor),
                        index,
                    },
                })
            })
            .collect();

        debug!(type_id = id.0, name = %descriptor.name, "imported metadata type");
        self.store.insert_type(
            id,
            TypeDeclInfo {
                name: Arc::from(simple_name(&descriptor.name)),
                qualified_name: Arc::from(descriptor.name.as_str()),
                kind: descriptor.kind,
                modifiers: Modifiers::PUBLIC,
                enclosing,
                fields,
                methods,
                member_types: Vec::new(),
                origin: TypeOrigin::Metadata(descriptor),
            },
        );
        id
    }

    /// Member type `simple` declared directly in `decl`.
    pub fn member_type(&self, decl: TypeDeclId, simple: &str) -> Option<TypeDeclId> {
        let info = self.store.type_info(decl)?;
        match &info.origin {
            TypeOrigin::Syntax(_) => info.member_types.iter().copied().find(|&member| {
                self.store
                    .type_info(member)
                    .is_some_and(|m| &*m.name == simple)
            }),
            TypeOrigin::Metadata(descriptor) => {
                if descriptor.nested_types.iter().any(|n| n == simple) {
                    self.lookup_qualified(&qualify(Some(&info.qualified_name), simple))
                } else {
                    None
                }
            }
        }
    }

    // =========================================================================
    // Type annotations
    // =========================================================================

    /// Resolve a type annotation node.
    ///
    /// Unresolvable names yield `Unknown`. A type-argument list whose length
    /// differs from the declaration's parameter count is dropped (raw use).
    pub fn resolve_type_node(&self, sref: SyntaxRef) -> Type {
        if self.options.memoize
            && let Some(cached) = self.type_nodes.get(&sref)
        {
            return cached.clone();
        }
        let ty = self.type_node_with(sref, &mut BoundStack::default());
        if self.options.memoize {
            self.type_nodes.insert(sref, ty.clone());
        }
        ty
    }

    fn type_node_with(&self, sref: SyntaxRef, stack: &mut BoundStack) -> Type {
        let Some(data) = self.node(sref) else {
            return Type::Unknown;
        };
        match data {
            NodeData::PrimitiveType(kind) => Type::Primitive(*kind),
            NodeData::VoidType => Type::Void,
            NodeData::ArrayType { element } => {
                Type::array(self.type_node_with(sref.with_node(*element), stack))
            }
            NodeData::WildcardType(wildcard) => Type::Wildcard {
                bound: wildcard
                    .bound
                    .is_some()
                    .then(|| Box::new(self.type_node_with(sref.with_node(wildcard.bound), stack))),
                variance: wildcard.variance,
            },
            NodeData::ClassType(class) => self.class_type_node(sref, class, stack),
            _ => Type::Unknown,
        }
    }

    fn class_type_node(&self, sref: SyntaxRef, class: &ClassTypeData, stack: &mut BoundStack) -> Type {
        if !is_qualified(&class.name)
            && let Some(param) = self.find_type_param(sref, &class.name)
        {
            return self.syntax_type_variable(param, stack);
        }
        let ctx = self.lookup_context(sref);
        match self.resolve_type_by_name(&class.name, &ctx) {
            SymbolReference::Solved(decl) => {
                let mut args: Vec<Type> = class
                    .type_args
                    .iter()
                    .map(|&arg| self.type_node_with(sref.with_node(arg), stack))
                    .collect();
                let expected = self.type_param_count(decl);
                if !args.is_empty() && args.len() != expected {
                    debug!(
                        name = %class.name,
                        expected,
                        found = args.len(),
                        "type argument count mismatch, using raw type"
                    );
                    args.clear();
                }
                Type::reference(decl, args)
            }
            _ => Type::Unknown,
        }
    }

    /// Type parameter named `name` visible from `sref`: method type
    /// parameters first, then the enclosing types' parameters, inner to
    /// outer. Static members and static nested types cut off the outer
    /// parameters.
    pub fn find_type_param(&self, sref: SyntaxRef, name: &str) -> Option<SyntaxRef> {
        let arena = self.unit(sref.unit)?;
        let find_in = |params: &[NodeIndex]| {
            params
                .iter()
                .copied()
                .find(|&p| arena.identifier_text(p) == Some(name))
                .map(|p| sref.with_node(p))
        };
        let mut static_member = false;
        for ancestor in arena.ancestors(sref.node) {
            match arena.data(ancestor) {
                Some(NodeData::Method(method)) => {
                    if let Some(found) = find_in(&method.type_params) {
                        return Some(found);
                    }
                    static_member = method.modifiers.contains(Modifiers::STATIC);
                }
                Some(NodeData::Field(field)) => {
                    static_member = field.modifiers.contains(Modifiers::STATIC);
                }
                Some(NodeData::Initializer(init)) => static_member = init.is_static,
                Some(NodeData::TypeDecl(decl)) => {
                    if !static_member && let Some(found) = find_in(&decl.type_params) {
                        return Some(found);
                    }
                    if decl.kind != TypeDeclKind::Class || decl.modifiers.contains(Modifiers::STATIC) {
                        return None;
                    }
                    static_member = false;
                }
                _ => {}
            }
        }
        None
    }

    fn syntax_type_variable(&self, param: SyntaxRef, stack: &mut BoundStack) -> Type {
        let Some(NodeData::TypeParameter(data)) = self.node(param) else {
            return Type::Unknown;
        };
        if stack.nodes.contains(&param) {
            return Type::type_variable(data.name.as_str(), Type::Unknown);
        }
        stack.nodes.push(param);
        let bound = self.syntax_param_bound(param, stack);
        stack.nodes.pop();
        Type::type_variable(data.name.as_str(), bound)
    }

    fn syntax_param_bound(&self, param: SyntaxRef, stack: &mut BoundStack) -> Type {
        match self.node(param) {
            Some(NodeData::TypeParameter(data)) => match data.bounds.first() {
                Some(&bound) => self.type_node_with(param.with_node(bound), stack),
                None => self.root_type(),
            },
            _ => Type::Unknown,
        }
    }

    /// Formal parameter info of a `TypeParameter` node.
    pub(crate) fn syntax_type_param_info(&self, param: SyntaxRef) -> Option<TypeParamInfo> {
        let name = match self.node(param)? {
            NodeData::TypeParameter(data) => Arc::from(data.name.as_str()),
            _ => return None,
        };
        let mut stack = BoundStack::default();
        stack.nodes.push(param);
        let bound = self.syntax_param_bound(param, &mut stack);
        Some(TypeParamInfo { name, bound })
    }

    // =========================================================================
    // Metadata signatures
    // =========================================================================

    pub(crate) fn type_from_sig(&self, sig: &TypeSig, scope: SigScope<'_>) -> Type {
        self.sig_with(sig, scope, &mut BoundStack::default())
    }

    fn sig_with(&self, sig: &TypeSig, scope: SigScope<'_>, stack: &mut BoundStack) -> Type {
        match sig {
            TypeSig::Primitive { name } => Type::Primitive(*name),
            TypeSig::Void => Type::Void,
            TypeSig::Array { element } => Type::array(self.sig_with(element, scope, stack)),
            TypeSig::Wildcard { variance, bound } => Type::Wildcard {
                bound: bound
                    .as_deref()
                    .map(|b| Box::new(self.sig_with(b, scope, stack))),
                variance: *variance,
            },
            TypeSig::Class { name, args } => match self.resolve_qualified_global(name) {
                Some(decl) => {
                    let mut args: Vec<Type> =
                        args.iter().map(|a| self.sig_with(a, scope, stack)).collect();
                    if !args.is_empty() && args.len() != self.type_param_count(decl) {
                        debug!(name = %name, "metadata type argument count mismatch, using raw type");
                        args.clear();
                    }
                    Type::reference(decl, args)
                }
                None => Type::Unknown,
            },
            TypeSig::TypeVar { name } => self.sig_type_variable(name, scope, stack),
        }
    }

    fn sig_type_variable(&self, name: &str, scope: SigScope<'_>, stack: &mut BoundStack) -> Type {
        let param = scope
            .method
            .and_then(|m| m.type_params.iter().find(|p| p.name == name))
            .or_else(|| {
                scope
                    .class
                    .and_then(|c| c.type_params.iter().find(|p| p.name == name))
            });
        let Some(param) = param else {
            return Type::Unknown;
        };
        if stack.sig_vars.iter().any(|v| &**v == name) {
            return Type::type_variable(name, Type::Unknown);
        }
        stack.sig_vars.push(Arc::from(name));
        let bound = match param.bounds.first() {
            Some(bound) => self.sig_with(bound, scope, stack),
            None => self.root_type(),
        };
        stack.sig_vars.pop();
        Type::type_variable(name, bound)
    }

    pub(crate) fn sig_type_param_info(
        &self,
        name: &str,
        bounds: &[TypeSig],
        scope: SigScope<'_>,
    ) -> TypeParamInfo {
        let mut stack = BoundStack::default();
        stack.sig_vars.push(Arc::from(name));
        let bound = match bounds.first() {
            Some(bound) => self.sig_with(bound, scope, &mut stack),
            None => self.root_type(),
        };
        TypeParamInfo {
            name: Arc::from(name),
            bound,
        }
    }

    // =========================================================================
    // Generic declarations
    // =========================================================================

    /// Number of formal type parameters, without resolving their bounds.
    pub fn type_param_count(&self, decl: TypeDeclId) -> usize {
        let Some(info) = self.store.type_info(decl) else {
            return 0;
        };
        match &info.origin {
            TypeOrigin::Syntax(sref) => self
                .unit(sref.unit)
                .and_then(|arena| arena.get_type_decl(sref.node))
                .map_or(0, |data| data.type_params.len()),
            TypeOrigin::Metadata(descriptor) => descriptor.type_params.len(),
        }
    }

    /// Formal type parameters of a type, in declaration order.
    pub fn type_params(&self, decl: TypeDeclId) -> Arc<[TypeParamInfo]> {
        if let Some(cached) = self.type_params.get(&decl) {
            return Arc::clone(cached.value());
        }
        let params: Arc<[TypeParamInfo]> = match self.store.type_info(decl) {
            Some(info) => match &info.origin {
                TypeOrigin::Syntax(sref) => self
                    .unit(sref.unit)
                    .and_then(|arena| arena.get_type_decl(sref.node))
                    .map(|data| {
                        data.type_params
                            .iter()
                            .filter_map(|&p| self.syntax_type_param_info(sref.with_node(p)))
                            .collect()
                    })
                    .unwrap_or_default(),
                TypeOrigin::Metadata(descriptor) => {
                    let scope = SigScope {
                        class: Some(&**descriptor),
                        method: None,
                    };
                    descriptor
                        .type_params
                        .iter()
                        .map(|p| self.sig_type_param_info(&p.name, &p.bounds, scope))
                        .collect()
                }
            },
            None => Arc::from(Vec::new()),
        };
        self.type_params.insert(decl, Arc::clone(&params));
        params
    }

    /// Direct supertypes: superclass first (the root type or enum base when
    /// implicit), then interfaces. Unresolvable supertypes are skipped.
    pub fn supertypes(&self, decl: TypeDeclId) -> Arc<[Type]> {
        if let Some(cached) = self.supertypes.get(&decl) {
            return Arc::clone(cached.value());
        }
        let supertypes: Arc<[Type]> = self.compute_supertypes(decl).into();
        self.supertypes.insert(decl, Arc::clone(&supertypes));
        supertypes
    }

    fn compute_supertypes(&self, decl: TypeDeclId) -> Vec<Type> {
        let Some(info) = self.store.type_info(decl) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        match &info.origin {
            TypeOrigin::Syntax(sref) => {
                let Some(data) = self.unit(sref.unit).and_then(|a| a.get_type_decl(sref.node))
                else {
                    return out;
                };
                for &node in data.extends.iter().chain(&data.implements) {
                    match self.resolve_type_node(sref.with_node(node)) {
                        ty @ Type::Reference { .. } => out.push(ty),
                        _ => trace!(type_name = %info.qualified_name, "skipping unresolved supertype"),
                    }
                }
            }
            TypeOrigin::Metadata(descriptor) => {
                let scope = SigScope {
                    class: Some(&**descriptor),
                    method: None,
                };
                for sig in descriptor.superclass.iter().chain(&descriptor.interfaces) {
                    self.check_sig_supertype_arity(&info.qualified_name, sig);
                    match self.type_from_sig(sig, scope) {
                        ty @ Type::Reference { .. } => out.push(ty),
                        _ => trace!(type_name = %info.qualified_name, "skipping unresolved supertype"),
                    }
                }
            }
        }

        let has_superclass = out.iter().any(|ty| {
            ty.declaration()
                .and_then(|d| self.store.type_info(d))
                .is_some_and(|i| !i.is_interface())
        });
        if !has_superclass {
            let implicit = match info.kind {
                TypeDeclKind::Class if !self.is_root(decl) => self.root_decl().map(Type::raw),
                TypeDeclKind::Enum => self.enum_base(decl),
                _ => None,
            };
            if let Some(implicit) = implicit {
                out.insert(0, implicit);
            }
        }
        out
    }

    /// A metadata supertype whose argument count differs from the
    /// supertype's formal count is a provider error; the supertype itself
    /// is then used raw.
    fn check_sig_supertype_arity(&self, type_name: &str, sig: &TypeSig) {
        let TypeSig::Class { name, args } = sig else {
            return;
        };
        if args.is_empty() {
            return;
        }
        let Some(supertype) = self.resolve_qualified_global(name) else {
            return;
        };
        let expected = self.type_param_count(supertype);
        if expected != args.len() {
            self.record_error(ConfigurationError::SupertypeArityMismatch {
                type_name: type_name.to_string(),
                supertype: name.clone(),
                expected,
                found: args.len(),
            });
        }
    }

    /// `Enum<Self>` for an enum, or the raw base when it is not generic.
    fn enum_base(&self, decl: TypeDeclId) -> Option<Type> {
        let base = self.lookup_qualified(&self.options.enum_base_type)?;
        if self.type_param_count(base) == 1 {
            Some(Type::reference(base, vec![Type::raw(decl)]))
        } else {
            Some(Type::raw(base))
        }
    }
}

#[cfg(test)]
#[path = "../tests/type_lookup_tests.rs"]
mod tests;
