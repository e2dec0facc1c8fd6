//! Scope construction: one traversal per compilation unit.
//!
//! The traversal opens a frame for every type body, method, initializer,
//! block, local variable declaration and lambda, and records for each
//! scope-introducing node (and for each block statement) the frame in effect
//! there. Frames are never modified once the traversal has moved past them.

use crate::scope::{Scope, ScopeId, ScopeKind};
use jsym_common::limits::MAX_TREE_WALK_ITERATIONS;
use jsym_solver::store::SyntaxDecl;
use jsym_solver::{Declaration, ParamOwner, ParamRef, TypeDatabase};
use jsym_syntax::{NodeArena, NodeData, NodeIndex, SyntaxRef, UnitId};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// The frames of one compilation unit.
#[derive(Clone, Debug, Default)]
pub struct UnitScopes {
    pub scopes: Vec<Scope>,
    /// Frame in effect at a scope-introducing node or block statement.
    pub node_scope_ids: FxHashMap<NodeIndex, ScopeId>,
}

impl UnitScopes {
    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        if id.is_none() {
            None
        } else {
            self.scopes.get(id.0 as usize)
        }
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Frame in effect at `node`: the nearest recorded node among the node
    /// itself and its ancestors, or the root frame.
    pub fn find_enclosing_scope(&self, arena: &NodeArena, node: NodeIndex) -> Option<ScopeId> {
        if let Some(&scope_id) = self.node_scope_ids.get(&node) {
            return Some(scope_id);
        }
        for ancestor in arena.ancestors(node) {
            if let Some(&scope_id) = self.node_scope_ids.get(&ancestor) {
                return Some(scope_id);
            }
        }
        if !self.scopes.is_empty() {
            Some(ScopeId(0))
        } else {
            None
        }
    }
}

struct ScopeBinder<'a> {
    db: &'a TypeDatabase,
    arena: &'a NodeArena,
    unit: UnitId,
    scopes: Vec<Scope>,
    node_scope_ids: FxHashMap<NodeIndex, ScopeId>,
    current_scope_id: ScopeId,
    steps: u32,
}

/// Build the frames of one unit registered in `db`.
#[tracing::instrument(level = "debug", skip_all, fields(unit = unit.0))]
pub fn bind_unit(db: &TypeDatabase, unit: UnitId) -> UnitScopes {
    let Some(arena) = db.unit(unit) else {
        warn!(unit = unit.0, "bind_unit: unknown unit");
        return UnitScopes::default();
    };
    let mut binder = ScopeBinder {
        db,
        arena,
        unit,
        scopes: Vec::new(),
        node_scope_ids: FxHashMap::default(),
        current_scope_id: ScopeId::NONE,
        steps: 0,
    };
    binder.bind_node(arena.root());
    debug!(
        unit = unit.0,
        scopes = binder.scopes.len(),
        "bound compilation unit"
    );
    UnitScopes {
        scopes: binder.scopes,
        node_scope_ids: binder.node_scope_ids,
    }
}

impl ScopeBinder<'_> {
    fn enter_scope(&mut self, kind: ScopeKind, node: NodeIndex) -> ScopeId {
        let new_scope_id = ScopeId(self.scopes.len() as u32);
        self.scopes
            .push(Scope::new(self.current_scope_id, kind, node));
        if node.is_some() {
            self.node_scope_ids.insert(node, new_scope_id);
        }
        self.current_scope_id = new_scope_id;
        new_scope_id
    }

    fn exit_scope(&mut self) {
        if let Some(scope) = self.scopes.get(self.current_scope_id.0 as usize) {
            self.current_scope_id = scope.parent;
        }
    }

    /// First declaration of a name in a frame wins.
    fn declare(&mut self, name: &str, declaration: Declaration) {
        if let Some(scope) = self.scopes.get_mut(self.current_scope_id.0 as usize) {
            scope
                .table
                .entry(Arc::from(name))
                .or_insert(declaration);
        }
    }

    fn sref(&self, node: NodeIndex) -> SyntaxRef {
        SyntaxRef::new(self.unit, node)
    }

    fn bind_node(&mut self, idx: NodeIndex) {
        self.steps += 1;
        if self.steps > MAX_TREE_WALK_ITERATIONS.saturating_mul(100) {
            warn!(unit = self.unit.0, "scope traversal exceeded its budget");
            return;
        }
        let arena = self.arena;
        let Some(data) = arena.data(idx) else {
            return;
        };
        match data {
            NodeData::CompilationUnit(unit) => {
                self.enter_scope(ScopeKind::CompilationUnit, idx);
                for &ty in &unit.types {
                    self.bind_node(ty);
                }
                self.exit_scope();
            }
            NodeData::TypeDecl(decl) => {
                let scope = self.enter_scope(ScopeKind::Type, idx);
                if let Some(SyntaxDecl::Type(id)) = self.db.store().syntax_decl(self.sref(idx)) {
                    self.scopes[scope.0 as usize].type_decl = Some(id);
                }
                for &member in &decl.members {
                    self.bind_node(member);
                }
                self.exit_scope();
            }
            NodeData::Method(method) => {
                self.enter_scope(ScopeKind::Method, idx);
                if let Some(SyntaxDecl::Method(id)) = self.db.store().syntax_decl(self.sref(idx)) {
                    for (index, &param) in method.params.iter().enumerate() {
                        if let Some(name) = arena.identifier_text(param) {
                            let param_ref = ParamRef {
                                owner: ParamOwner::Method(id),
                                index: index as u32,
                            };
                            self.declare(name, Declaration::Parameter(param_ref));
                        }
                    }
                }
                self.bind_node(method.body);
                self.exit_scope();
            }
            NodeData::Initializer(init) => {
                self.enter_scope(ScopeKind::Initializer, idx);
                self.bind_node(init.body);
                self.exit_scope();
            }
            NodeData::Block(block) => {
                let block_scope = self.enter_scope(ScopeKind::Block, idx);
                for &stmt in &block.statements {
                    self.bind_statement(stmt);
                }
                // Locals opened frames on top of the block frame.
                self.current_scope_id = block_scope;
                self.exit_scope();
            }
            NodeData::Lambda(lambda) => {
                self.enter_scope(ScopeKind::Lambda, idx);
                let owner = ParamOwner::Lambda(self.sref(idx));
                for (index, &param) in lambda.params.iter().enumerate() {
                    if let Some(name) = arena.identifier_text(param) {
                        let param_ref = ParamRef {
                            owner,
                            index: index as u32,
                        };
                        self.declare(name, Declaration::Parameter(param_ref));
                    }
                }
                self.bind_node(lambda.body);
                self.exit_scope();
            }
            // Type annotations and leaves hold nothing to bind.
            NodeData::Import(_)
            | NodeData::ClassType(_)
            | NodeData::ArrayType { .. }
            | NodeData::WildcardType(_)
            | NodeData::PrimitiveType(_)
            | NodeData::VoidType
            | NodeData::TypeParameter(_)
            | NodeData::Literal(_)
            | NodeData::Name { .. }
            | NodeData::This => {}
            _ => {
                for child in data.children() {
                    self.bind_node(child);
                }
            }
        }
    }

    fn bind_statement(&mut self, stmt: NodeIndex) {
        match self.arena.data(stmt) {
            Some(NodeData::LocalVar(local)) => {
                self.enter_scope(ScopeKind::Local, stmt);
                let declaration = Declaration::LocalVar(self.sref(stmt));
                self.declare(&local.name, declaration);
                self.bind_node(local.initializer);
                // The frame stays open for the rest of the block.
            }
            Some(_) => {
                self.node_scope_ids.insert(stmt, self.current_scope_id);
                self.bind_node(stmt);
            }
            None => {}
        }
    }
}

#[cfg(test)]
#[path = "../tests/state_tests.rs"]
mod tests;
