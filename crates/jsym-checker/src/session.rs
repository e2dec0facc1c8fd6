//! Resolution sessions.
//!
//! A session is built in two steps. A [`SessionBuilder`] collects the
//! compilation units and the metadata provider; [`SessionBuilder::build`]
//! registers every declaration, binds the scope chains, validates the
//! hierarchy and hands back a [`Session`] that only answers queries.
//! Nothing can be added to a `Session`: a changed program needs a new one.

use crate::state::ExprResolver;
use dashmap::DashMap;
use jsym_binder::{Context, ScopeGraph};
use jsym_solver::{
    ConfigurationError, Declaration, InMemoryMetadata, LookupContext, MetadataProvider, MethodId,
    SolverOptions, SymbolReference, Type, TypeDatabase, TypeDeclId,
};
use jsym_syntax::{NodeArena, SyntaxRef, UnitId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, debug_span, info};

/// Session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    #[serde(flatten)]
    pub solver: SolverOptions,
    /// Check source types for cyclic inheritance and supertype arity when
    /// the session is built.
    pub validate_hierarchy: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            solver: SolverOptions::default(),
            validate_hierarchy: true,
        }
    }
}

impl SessionOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Lifecycle of a resolution session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// A builder without units.
    Uninitialized,
    /// A builder with at least one unit.
    Populating,
    /// A built session.
    Ready,
    Discarded,
}

/// Collects the inputs of a session.
pub struct SessionBuilder {
    options: SessionOptions,
    provider: Arc<dyn MetadataProvider>,
    units: Vec<NodeArena>,
}

impl SessionBuilder {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            provider: Arc::new(InMemoryMetadata::new()),
            units: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Add a compilation unit. Units are numbered in insertion order.
    pub fn add_unit(&mut self, arena: NodeArena) -> UnitId {
        let unit = UnitId(self.units.len() as u32);
        self.units.push(arena);
        unit
    }

    pub fn state(&self) -> SessionState {
        if self.units.is_empty() {
            SessionState::Uninitialized
        } else {
            SessionState::Populating
        }
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Register all declarations and bind all scopes.
    #[tracing::instrument(level = "debug", skip_all, fields(units = self.units.len()))]
    pub fn build(self) -> Session {
        let SessionBuilder {
            options,
            provider,
            units,
        } = self;
        let mut db = TypeDatabase::new(options.solver.clone(), provider);
        for arena in units {
            db.add_unit(arena);
        }
        let scopes = ScopeGraph::build(&db);
        if options.validate_hierarchy {
            db.validate_hierarchy();
        }
        info!(
            units = db.unit_count(),
            scopes = scopes.scope_count(),
            errors = db.configuration_errors().len(),
            "session ready"
        );
        Session {
            db,
            scopes,
            options,
            declarations: DashMap::new(),
            types: DashMap::new(),
        }
    }
}

/// Build a session over `units` with default options.
pub fn create_session(units: Vec<NodeArena>, provider: Arc<dyn MetadataProvider>) -> Session {
    let mut builder = SessionBuilder::new(SessionOptions::default()).with_metadata(provider);
    for unit in units {
        builder.add_unit(unit);
    }
    builder.build()
}

type MemoKey = (SyntaxRef, Context);

/// A ready session. Every query takes `&self`; the session is `Send + Sync`.
pub struct Session {
    db: TypeDatabase,
    scopes: ScopeGraph,
    options: SessionOptions,
    declarations: DashMap<MemoKey, SymbolReference<Declaration>>,
    types: DashMap<MemoKey, Type>,
}

impl Session {
    pub fn state(&self) -> SessionState {
        SessionState::Ready
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn db(&self) -> &TypeDatabase {
        &self.db
    }

    pub fn scopes(&self) -> &ScopeGraph {
        &self.scopes
    }

    /// End the session. All handles obtained from it become meaningless.
    pub fn discard(self) -> SessionState {
        debug!(units = self.db.unit_count(), "session discarded");
        SessionState::Discarded
    }

    // =========================================================================
    // Contexts
    // =========================================================================

    /// The context in effect at `node`.
    pub fn context_for(&self, node: SyntaxRef) -> Option<Context> {
        self.scopes.context_for(&self.db, node)
    }

    /// Like [`context_for`](Self::context_for), reporting why a node has no
    /// context.
    pub fn try_context_for(&self, node: SyntaxRef) -> Result<Context, ConfigurationError> {
        self.db.check_node(node)?;
        self.context_for(node)
            .ok_or(ConfigurationError::UnknownUnit { unit: node.unit })
    }

    /// Type-name lookup context at `ctx`.
    pub fn lookup_context(&self, ctx: &Context) -> LookupContext {
        LookupContext {
            unit: ctx.unit,
            enclosing: self.scopes.enclosing_types(*ctx),
        }
    }

    pub fn type_declaration_context(&self, ctx: &Context) -> Option<TypeDeclId> {
        self.scopes.type_declaration_context(*ctx)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The declaration a node refers to (or is).
    pub fn resolve(&self, node: SyntaxRef, ctx: &Context) -> SymbolReference<Declaration> {
        let memoize = self.options.solver.memoize;
        let key = (node, *ctx);
        if memoize && let Some(cached) = self.declarations.get(&key) {
            return cached.clone();
        }
        let _span = debug_span!("resolve", unit = node.unit.0, node = node.node.0).entered();
        let outcome = ExprResolver::new(&self.db, &self.scopes).resolve(node, *ctx);
        debug!(?outcome, "resolved");
        if memoize {
            self.declarations.insert(key, outcome.clone());
        }
        outcome
    }

    /// The static type of a node.
    pub fn type_of(&self, node: SyntaxRef, ctx: &Context) -> Type {
        let memoize = self.options.solver.memoize;
        let key = (node, *ctx);
        if memoize && let Some(cached) = self.types.get(&key) {
            return cached.clone();
        }
        let _span = debug_span!("type_of", unit = node.unit.0, node = node.node.0).entered();
        let ty = ExprResolver::new(&self.db, &self.scopes).type_of(node, *ctx);
        debug!(ty = %self.db.display_type(&ty), "typed");
        if memoize {
            self.types.insert(key, ty.clone());
        }
        ty
    }

    /// [`resolve`](Self::resolve) in the node's own context.
    pub fn resolve_node(&self, node: SyntaxRef) -> SymbolReference<Declaration> {
        match self.context_for(node) {
            Some(ctx) => self.resolve(node, &ctx),
            None => SymbolReference::Unsolved,
        }
    }

    /// [`type_of`](Self::type_of) in the node's own context.
    pub fn type_of_node(&self, node: SyntaxRef) -> Type {
        match self.context_for(node) {
            Some(ctx) => self.type_of(node, &ctx),
            None => Type::Unknown,
        }
    }

    /// A simple name as an expression would see it: variables along the
    /// scope chain first, then types.
    pub fn lookup(&self, ctx: &Context, name: &str) -> SymbolReference<Declaration> {
        ExprResolver::new(&self.db, &self.scopes).lookup_name(*ctx, name)
    }

    pub fn resolve_type_by_name(&self, name: &str, ctx: &Context) -> SymbolReference<TypeDeclId> {
        self.db.resolve_type_by_name(name, &self.lookup_context(ctx))
    }

    /// Type of a variable declaration as seen from inside its scope.
    pub fn declaration_type(&self, declaration: Declaration, ctx: &Context) -> Type {
        ExprResolver::new(&self.db, &self.scopes).declaration_type(declaration, *ctx)
    }

    pub fn functional_method(&self, decl: TypeDeclId) -> SymbolReference<MethodId> {
        self.db.functional_method(decl)
    }

    pub fn configuration_errors(&self) -> Vec<ConfigurationError> {
        self.db.configuration_errors()
    }
}

#[cfg(test)]
#[path = "../tests/session_tests.rs"]
mod tests;
