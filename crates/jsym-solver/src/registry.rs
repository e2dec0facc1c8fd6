//! Qualified-name registry.
//!
//! Two namespaces share one lookup path:
//! - source types, filled while the session is populated and frozen after;
//! - metadata imports, appended on first use by any reader.
//!
//! A qualified name maps to at most one handle for the lifetime of the
//! session, so concurrent readers always agree on identity.

use crate::types::TypeDeclId;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct TypeRegistry {
    syntax: FxHashMap<Arc<str>, TypeDeclId>,
    imported: DashMap<Arc<str>, TypeDeclId>,
    misses: DashSet<Arc<str>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source type. Returns the handle already registered under
    /// this name, if any, and keeps it.
    pub fn register_syntax(&mut self, qualified: &str, id: TypeDeclId) -> Result<(), TypeDeclId> {
        match self.syntax.get(qualified) {
            Some(&existing) => Err(existing),
            None => {
                self.syntax.insert(Arc::from(qualified), id);
                Ok(())
            }
        }
    }

    /// Source or already-imported type with this name.
    pub fn get(&self, qualified: &str) -> Option<TypeDeclId> {
        self.syntax
            .get(qualified)
            .copied()
            .or_else(|| self.imported.get(qualified).map(|r| *r.value()))
    }

    /// Return the imported handle for `qualified`, registering it with
    /// `register` if this is the first import. `register` runs at most once
    /// per name.
    pub fn import_with(
        &self,
        qualified: &str,
        register: impl FnOnce() -> TypeDeclId,
    ) -> TypeDeclId {
        match self.imported.entry(Arc::from(qualified)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => *entry.insert(register()),
        }
    }

    pub fn is_known_miss(&self, qualified: &str) -> bool {
        self.misses.contains(qualified)
    }

    pub fn record_miss(&self, qualified: &str) {
        self.misses.insert(Arc::from(qualified));
    }

    /// All source types, unordered.
    pub fn syntax_types(&self) -> impl Iterator<Item = (&str, TypeDeclId)> + '_ {
        self.syntax.iter().map(|(name, &id)| (&**name, id))
    }

    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }
}
