//! Scope frames.

use indexmap::IndexMap;
use jsym_solver::{Declaration, TypeDeclId};
use jsym_syntax::{NodeIndex, UnitId};
use rustc_hash::FxBuildHasher;
use std::sync::Arc;

/// Index of a frame inside one unit's scope table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const NONE: ScopeId = ScopeId(u32::MAX);

    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

/// What introduced a frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The root frame; answers static imports.
    CompilationUnit,
    /// A class, interface or enum body; answers declared and inherited fields.
    Type,
    /// Method parameters.
    Method,
    /// Instance or static initializer.
    Initializer,
    Block,
    /// One local variable, visible from its own initializer to the end of
    /// the enclosing block.
    Local,
    /// Lambda parameters.
    Lambda,
}

/// One immutable frame: its own names plus a link to the enclosing frame.
#[derive(Clone, Debug)]
pub struct Scope {
    pub parent: ScopeId,
    pub kind: ScopeKind,
    /// The node that opened the frame.
    pub node: NodeIndex,
    pub table: IndexMap<Arc<str>, Declaration, FxBuildHasher>,
    /// Set for `Type` frames.
    pub type_decl: Option<TypeDeclId>,
}

impl Scope {
    pub fn new(parent: ScopeId, kind: ScopeKind, node: NodeIndex) -> Self {
        Scope {
            parent,
            kind,
            node,
            table: IndexMap::default(),
            type_decl: None,
        }
    }

    pub fn get(&self, name: &str) -> Option<Declaration> {
        self.table.get(name).copied()
    }
}

/// A lookup position: a frame of a unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Context {
    pub unit: UnitId,
    pub scope: ScopeId,
}

impl Context {
    pub const fn new(unit: UnitId, scope: ScopeId) -> Self {
        Self { unit, scope }
    }
}
