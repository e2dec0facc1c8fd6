//! The type database: one per resolution session.
//!
//! `TypeDatabase` owns the compilation units, the declaration tables, the
//! qualified-name registry, the metadata provider and every derived cache.
//! It is populated through `&mut self` ([`TypeDatabase::add_unit`]) and only
//! read through `&self` afterwards; derived data is cached in append-only
//! concurrent maps, so parallel readers at worst compute an entry twice.

use crate::error::ConfigurationError;
use crate::metadata::MetadataProvider;
use crate::registry::TypeRegistry;
use crate::store::{
    DeclarationStore, FieldInfo, MemberOrigin, MethodInfo, TypeDeclInfo, TypeOrigin,
};
use crate::types::{FieldId, MethodId, MethodSignature, Type, TypeDeclId, TypeParamInfo};
use dashmap::DashMap;
use jsym_common::names::qualify;
use jsym_syntax::{Modifiers, NodeArena, NodeData, NodeIndex, SyntaxRef, TypeDeclKind, UnitId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, warn};

/// Knobs of the type solver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Implicit superclass of every class and member source of every
    /// interface.
    pub root_type: String,
    /// Packages searched for simple names after the unit's own package.
    pub implicit_packages: Vec<String>,
    /// Generic superclass of every enum, instantiated with the enum itself.
    pub enum_base_type: String,
    /// Cache resolved type annotations per node.
    pub memoize: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            root_type: "java.lang.Object".to_string(),
            implicit_packages: vec!["java.lang".to_string()],
            enum_base_type: "java.lang.Enum".to_string(),
            memoize: true,
        }
    }
}

pub struct TypeDatabase {
    pub(crate) options: SolverOptions,
    pub(crate) units: Vec<NodeArena>,
    pub(crate) store: DeclarationStore,
    pub(crate) registry: TypeRegistry,
    pub(crate) provider: Arc<dyn MetadataProvider>,
    errors: Mutex<Vec<ConfigurationError>>,

    // Derived caches.
    pub(crate) type_nodes: DashMap<SyntaxRef, Type>,
    pub(crate) supertypes: DashMap<TypeDeclId, Arc<[Type]>>,
    pub(crate) type_params: DashMap<TypeDeclId, Arc<[TypeParamInfo]>>,
    pub(crate) field_types: DashMap<FieldId, Type>,
    pub(crate) method_sigs: DashMap<MethodId, Arc<MethodSignature>>,
    pub(crate) root: OnceLock<Option<TypeDeclId>>,
    pub(crate) root_method_keys: OnceLock<FxHashSet<Arc<str>>>,
}

impl TypeDatabase {
    pub fn new(options: SolverOptions, provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            options,
            units: Vec::new(),
            store: DeclarationStore::new(),
            registry: TypeRegistry::new(),
            provider,
            errors: Mutex::new(Vec::new()),
            type_nodes: DashMap::new(),
            supertypes: DashMap::new(),
            type_params: DashMap::new(),
            field_types: DashMap::new(),
            method_sigs: DashMap::new(),
            root: OnceLock::new(),
            root_method_keys: OnceLock::new(),
        }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    pub fn store(&self) -> &DeclarationStore {
        &self.store
    }

    // =========================================================================
    // Units
    // =========================================================================

    /// Register a compilation unit and every type and member it declares.
    pub fn add_unit(&mut self, arena: NodeArena) -> UnitId {
        let unit = UnitId(self.units.len() as u32);
        let package = arena.package().map(str::to_string);
        for &node in arena.top_level_types() {
            self.register_syntax_type(&arena, unit, node, package.as_deref(), None);
        }
        debug!(
            unit = unit.0,
            package = package.as_deref().unwrap_or(""),
            nodes = arena.len(),
            "TypeDatabase::add_unit"
        );
        self.units.push(arena);
        unit
    }

    fn register_syntax_type(
        &mut self,
        arena: &NodeArena,
        unit: UnitId,
        node: NodeIndex,
        prefix: Option<&str>,
        enclosing: Option<TypeDeclId>,
    ) -> Option<TypeDeclId> {
        let decl = arena.get_type_decl(node)?;
        let qualified = qualify(prefix, &decl.name);
        let id = self.store.allocate_type();
        if self.registry.register_syntax(&qualified, id).is_err() {
            self.record_error(ConfigurationError::DuplicateType {
                qualified_name: qualified,
            });
            return None;
        }

        let is_interface = decl.kind == TypeDeclKind::Interface;
        let mut fields = Vec::new();
        let mut methods = Vec::new();
        let mut member_types = Vec::new();

        for &member in &decl.members {
            let sref = SyntaxRef::new(unit, member);
            match arena.data(member) {
                Some(NodeData::Field(field)) => {
                    let mut modifiers = field.modifiers;
                    if is_interface {
                        modifiers |= Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL;
                    }
                    fields.push(self.store.register_field(FieldInfo {
                        name: Arc::from(field.name.as_str()),
                        declaring_type: id,
                        modifiers,
                        is_enum_constant: false,
                        origin: MemberOrigin::Syntax(sref),
                    }));
                }
                Some(NodeData::EnumConstant(constant)) => {
                    fields.push(self.store.register_field(FieldInfo {
                        name: Arc::from(constant.name.as_str()),
                        declaring_type: id,
                        modifiers: Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL,
                        is_enum_constant: true,
                        origin: MemberOrigin::Syntax(sref),
                    }));
                }
                Some(NodeData::Method(method)) => {
                    let mut modifiers = method.modifiers;
                    if is_interface {
                        modifiers |= Modifiers::PUBLIC;
                        if method.body.is_none()
                            && !modifiers.intersects(Modifiers::STATIC | Modifiers::DEFAULT)
                        {
                            modifiers |= Modifiers::ABSTRACT;
                        }
                    }
                    let is_varargs = method.params.last().is_some_and(|&p| {
                        matches!(arena.data(p), Some(NodeData::Parameter(param)) if param.varargs)
                    });
                    methods.push(self.store.register_method(MethodInfo {
                        name: Arc::from(method.name.as_str()),
                        declaring_type: id,
                        modifiers,
                        is_varargs,
                        param_count: method.params.len(),
                        origin: MemberOrigin::Syntax(sref),
                    }));
                }
                Some(NodeData::TypeDecl(_)) => {
                    if let Some(child) =
                        self.register_syntax_type(arena, unit, member, Some(&qualified), Some(id))
                    {
                        member_types.push(child);
                    }
                }
                _ => {}
            }
        }

        let mut modifiers = decl.modifiers;
        if enclosing.is_some() && decl.kind != TypeDeclKind::Class {
            modifiers |= Modifiers::STATIC;
        }
        self.store.insert_type(
            id,
            TypeDeclInfo {
                name: Arc::from(decl.name.as_str()),
                qualified_name: Arc::from(qualified.as_str()),
                kind: decl.kind,
                modifiers,
                enclosing,
                fields,
                methods,
                member_types,
                origin: TypeOrigin::Syntax(SyntaxRef::new(unit, node)),
            },
        );
        Some(id)
    }

    pub fn unit(&self, unit: UnitId) -> Option<&NodeArena> {
        self.units.get(unit.0 as usize)
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn units(&self) -> impl Iterator<Item = (UnitId, &NodeArena)> + '_ {
        self.units
            .iter()
            .enumerate()
            .map(|(i, arena)| (UnitId(i as u32), arena))
    }

    /// Node payload behind a session-wide node handle.
    pub fn node(&self, sref: SyntaxRef) -> Option<&NodeData> {
        self.unit(sref.unit)?.data(sref.node)
    }

    /// Checks that a node handle points into this session.
    pub fn check_node(&self, sref: SyntaxRef) -> Result<(), ConfigurationError> {
        let arena = self
            .unit(sref.unit)
            .ok_or(ConfigurationError::UnknownUnit { unit: sref.unit })?;
        if arena.get(sref.node).is_none() {
            return Err(ConfigurationError::ForeignNode {
                unit: sref.unit,
                node: sref.node,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Source types
    // =========================================================================

    /// All types declared in source, ordered by handle.
    pub fn syntax_types(&self) -> Vec<TypeDeclId> {
        let mut out: Vec<_> = self.registry.syntax_types().map(|(_, id)| id).collect();
        out.sort_unstable();
        out
    }

    // =========================================================================
    // Errors
    // =========================================================================

    /// Record a configuration error once and log it.
    pub fn record_error(&self, error: ConfigurationError) {
        let Ok(mut errors) = self.errors.lock() else {
            return;
        };
        if errors.contains(&error) {
            return;
        }
        warn!(%error, "configuration error");
        errors.push(error);
    }

    pub fn configuration_errors(&self) -> Vec<ConfigurationError> {
        self.errors
            .lock()
            .map(|errors| errors.clone())
            .unwrap_or_default()
    }

    // =========================================================================
    // Root types
    // =========================================================================

    /// The root type's handle, if it can be resolved.
    pub fn root_decl(&self) -> Option<TypeDeclId> {
        *self
            .root
            .get_or_init(|| self.lookup_qualified(&self.options.root_type))
    }

    /// The root type as a `Type`, `Unknown` if unresolvable.
    pub fn root_type(&self) -> Type {
        self.root_decl().map_or(Type::Unknown, Type::raw)
    }

    pub fn is_root(&self, decl: TypeDeclId) -> bool {
        self.root_decl() == Some(decl)
    }

    /// The `java.lang.String` reference used for string literals.
    pub fn string_type(&self) -> Type {
        self.lookup_qualified("java.lang.String")
            .map_or(Type::Unknown, Type::raw)
    }
}

#[cfg(test)]
#[path = "../tests/db_tests.rs"]
mod tests;
