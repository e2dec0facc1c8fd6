//! Functional-interface detection.
//!
//! An interface is functional when, after
//! - dropping abstract methods whose signature matches a public method of
//!   the root type (`equals(Object)` and friends),
//! - collapsing override-equivalent methods, and
//! - dropping abstract methods implemented by a default method of a more
//!   derived interface,
//!
//! exactly one abstract method remains.

use crate::db::TypeDatabase;
use crate::reference::SymbolReference;
use crate::substitute::Substitution;
use crate::types::{MethodId, Type, TypeDeclId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::debug;

/// The single abstract method of a functional interface, seen through a
/// particular parameterization of that interface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionalSignature {
    pub method: MethodId,
    pub params: Vec<Type>,
    pub return_type: Type,
}

impl TypeDatabase {
    /// Signature keys of the root type's public instance methods.
    fn root_method_keys(&self) -> &FxHashSet<Arc<str>> {
        self.root_method_keys.get_or_init(|| {
            let Some(root) = self.root_decl().and_then(|id| self.type_decl(id)) else {
                return FxHashSet::default();
            };
            root.methods()
                .iter()
                .filter_map(|&m| self.method(m))
                .filter(|m| !m.is_static() && !m.is_private())
                .map(|m| m.signature_key())
                .collect()
        })
    }

    /// The single abstract method of `decl`, if it is a functional
    /// interface.
    pub fn functional_method(&self, decl: TypeDeclId) -> SymbolReference<MethodId> {
        let Some(ty) = self.type_decl(decl) else {
            return SymbolReference::Unsolved;
        };
        if !ty.is_interface() {
            return SymbolReference::Unsolved;
        }

        let root_keys = self.root_method_keys();
        // key -> (method, declaring type); the first hit of a key is the most
        // derived because the closure is breadth-first.
        let mut abstract_methods: FxHashMap<Arc<str>, (MethodId, TypeDeclId)> = FxHashMap::default();
        let mut order: Vec<Arc<str>> = Vec::new();
        let mut defaults: Vec<(Arc<str>, TypeDeclId)> = Vec::new();

        for entry in self.supertype_closure(&ty.as_type()) {
            let Some(owner) = self.type_decl(entry.decl) else {
                continue;
            };
            if !owner.is_interface() {
                continue;
            }
            for &method_id in owner.methods() {
                let Some(method) = self.method(method_id) else {
                    continue;
                };
                if method.is_static() {
                    continue;
                }
                let key = method.signature_key_with(&entry.substitution);
                if method.is_abstract() {
                    if root_keys.contains(&method.signature_key()) || root_keys.contains(&key) {
                        continue;
                    }
                    if !abstract_methods.contains_key(&key) {
                        order.push(Arc::clone(&key));
                        abstract_methods.insert(key, (method_id, entry.decl));
                    }
                } else if method.is_default() {
                    defaults.push((key, entry.decl));
                }
            }
        }

        let remaining: Vec<MethodId> = order
            .iter()
            .filter_map(|key| abstract_methods.get(key).map(|&(m, owner)| (key, m, owner)))
            .filter(|&(key, _, owner)| {
                !defaults.iter().any(|(default_key, default_owner)| {
                    default_key == key
                        && *default_owner != owner
                        && self.is_subtype_decl(*default_owner, owner)
                })
            })
            .map(|(_, m, _)| m)
            .collect();

        debug!(
            interface = %ty.qualified_name(),
            abstract_methods = remaining.len(),
            "functional_method"
        );
        match remaining.as_slice() {
            [single] => SymbolReference::Solved(*single),
            _ => SymbolReference::Unsolved,
        }
    }

    /// The functional method of `target` with the target's type arguments
    /// applied. Wildcard arguments are replaced by their bounds.
    pub fn functional_signature(&self, target: &Type) -> Option<FunctionalSignature> {
        let (decl, _) = match target {
            Type::TypeVariable { bound, .. } => return self.functional_signature(bound),
            other => other.as_reference()?,
        };
        let method_id = self.functional_method(decl).solved()?;
        let method = self.method(method_id)?;
        let entry = self
            .supertype_closure(target)
            .into_iter()
            .find(|entry| entry.decl == method.declaring_type())?;

        let mut substitution = Substitution::new();
        for (name, ty) in entry.substitution.iter() {
            substitution.insert(Arc::from(name), self.wildcard_to_bound(ty));
        }
        let signature = method.signature();
        let substitution = substitution.without(&signature.type_params);
        Some(FunctionalSignature {
            method: method_id,
            params: signature.params.iter().map(|p| substitution.apply(p)).collect(),
            return_type: substitution.apply(&signature.return_type),
        })
    }

    fn wildcard_to_bound(&self, ty: &Type) -> Type {
        match ty {
            Type::Wildcard {
                bound: Some(bound), ..
            } => (**bound).clone(),
            Type::Wildcard { bound: None, .. } => self.root_type(),
            other => other.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/functional_tests.rs"]
mod tests;
