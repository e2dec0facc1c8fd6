//! Supertype walks.
//!
//! Every walk keeps a visited set of declarations, so cyclic hierarchies
//! (which validation reports as configuration errors) still terminate. Walks
//! are breadth-first: a member found at a smaller depth is more derived.

use crate::db::TypeDatabase;
use crate::error::ConfigurationError;
use crate::recursion::RecursionProfile;
use crate::reference::SymbolReference;
use crate::store::TypeOrigin;
use crate::substitute::Substitution;
use crate::types::{FieldId, MethodId, Type, TypeDeclId};
use jsym_syntax::{NodeData, SyntaxRef};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::{trace, warn};

/// One declaration reached by a supertype walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupertypeEntry {
    pub decl: TypeDeclId,
    /// Maps the declaration's own type parameters to what the start type
    /// instantiates them with.
    pub substitution: Substitution,
    /// 0 for the start type.
    pub depth: u32,
}

/// A member found through a supertype walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberMatch<T> {
    pub member: T,
    pub substitution: Substitution,
    pub depth: u32,
}

impl TypeDatabase {
    /// The start type followed by all of its transitive supertypes, each
    /// once, nearest first. Interfaces and arrays also reach the root type.
    pub fn supertype_closure(&self, ty: &Type) -> Vec<SupertypeEntry> {
        let start = match ty {
            Type::Reference { decl, args } => SupertypeEntry {
                decl: *decl,
                substitution: Substitution::for_reference(self, *decl, args),
                depth: 0,
            },
            Type::TypeVariable { bound, .. } => return self.supertype_closure(bound),
            Type::Wildcard {
                bound: Some(bound), ..
            } => return self.supertype_closure(bound),
            Type::Array(_) => {
                return self
                    .root_decl()
                    .map(|root| SupertypeEntry {
                        decl: root,
                        substitution: Substitution::new(),
                        depth: 1,
                    })
                    .into_iter()
                    .collect();
            }
            _ => return Vec::new(),
        };

        let budget = RecursionProfile::HierarchyWalk.max_steps();
        let mut visited = FxHashSet::default();
        visited.insert(start.decl);
        let mut queue = VecDeque::from([start]);
        let mut out = Vec::new();
        let mut steps = 0u32;

        while let Some(entry) = queue.pop_front() {
            steps += 1;
            if steps > budget {
                warn!(start = ?ty, "supertype walk exceeded its iteration budget");
                break;
            }
            for supertype in self.supertypes(entry.decl).iter() {
                let Type::Reference { decl, args } = supertype else {
                    continue;
                };
                if !visited.insert(*decl) {
                    continue;
                }
                // Supertypes of a raw type are erased.
                let args: Vec<Type> = if entry.substitution.is_raw() {
                    Vec::new()
                } else {
                    args.iter().map(|arg| entry.substitution.apply(arg)).collect()
                };
                queue.push_back(SupertypeEntry {
                    decl: *decl,
                    substitution: Substitution::for_reference(self, *decl, &args),
                    depth: entry.depth + 1,
                });
            }
            out.push(entry);
        }

        if let Some(root) = self.root_decl()
            && !visited.contains(&root)
        {
            let depth = out.last().map_or(1, |e| e.depth + 1);
            out.push(SupertypeEntry {
                decl: root,
                substitution: Substitution::new(),
                depth,
            });
        }
        out
    }

    /// `true` if `sub` is `sup` or one of its transitive supertypes.
    pub fn is_subtype_decl(&self, sub: TypeDeclId, sup: TypeDeclId) -> bool {
        sub == sup
            || self
                .supertype_closure(&Type::raw(sub))
                .iter()
                .any(|entry| entry.decl == sup)
    }

    /// `true` if `decl` is reachable from its own supertypes.
    pub fn has_cyclic_hierarchy(&self, decl: TypeDeclId) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack: Vec<TypeDeclId> = self
            .supertypes(decl)
            .iter()
            .filter_map(Type::declaration)
            .collect();
        let budget = RecursionProfile::HierarchyWalk.max_steps();
        let mut steps = 0u32;
        while let Some(current) = stack.pop() {
            steps += 1;
            if current == decl {
                return true;
            }
            if steps > budget || !visited.insert(current) {
                continue;
            }
            stack.extend(self.supertypes(current).iter().filter_map(Type::declaration));
        }
        false
    }

    /// The nearest field named `name`, declared or inherited.
    pub fn find_field(&self, ty: &Type, name: &str) -> Option<MemberMatch<FieldId>> {
        for entry in self.supertype_closure(ty) {
            let Some(decl) = self.type_decl(entry.decl) else {
                continue;
            };
            if let Some(field) = decl.declared_field(name) {
                trace!(name, declaring_type = entry.decl.0, "find_field");
                return Some(MemberMatch {
                    member: field,
                    substitution: entry.substitution,
                    depth: entry.depth,
                });
            }
        }
        None
    }

    /// All methods named `name`, declared or inherited, nearest first.
    /// Overridden methods are not filtered out here.
    pub fn methods_named(&self, ty: &Type, name: &str) -> Vec<MemberMatch<MethodId>> {
        let mut out = Vec::new();
        for entry in self.supertype_closure(ty) {
            let Some(decl) = self.type_decl(entry.decl) else {
                continue;
            };
            for method in decl.declared_methods_named(name) {
                out.push(MemberMatch {
                    member: method,
                    substitution: entry.substitution.clone(),
                    depth: entry.depth,
                });
            }
        }
        out
    }

    /// A member type named `name`, declared in `decl` or inherited.
    pub fn find_member_type(&self, decl: TypeDeclId, name: &str) -> SymbolReference<TypeDeclId> {
        self.supertype_closure(&Type::raw(decl))
            .iter()
            .find_map(|entry| self.member_type(entry.decl, name))
            .into()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check every source type for cyclic inheritance and for supertype
    /// references with a wrong type-argument count. Errors are recorded and
    /// returned.
    pub fn validate_hierarchy(&self) -> Vec<ConfigurationError> {
        let mut found = Vec::new();
        for decl in self.syntax_types() {
            let Some(info) = self.store.type_info(decl) else {
                continue;
            };
            if self.has_cyclic_hierarchy(decl) {
                found.push(ConfigurationError::CyclicHierarchy {
                    type_name: info.qualified_name.to_string(),
                });
            }
            if let TypeOrigin::Syntax(sref) = &info.origin {
                self.check_supertype_arity(*sref, &info.qualified_name, &mut found);
            }
        }
        for error in &found {
            self.record_error(error.clone());
        }
        found
    }

    fn check_supertype_arity(&self, sref: SyntaxRef, type_name: &str, found: &mut Vec<ConfigurationError>) {
        let Some(data) = self.unit(sref.unit).and_then(|a| a.get_type_decl(sref.node)) else {
            return;
        };
        for &node in data.extends.iter().chain(&data.implements) {
            let Some(NodeData::ClassType(class)) = self.node(sref.with_node(node)) else {
                continue;
            };
            if class.type_args.is_empty() {
                continue;
            }
            let ctx = self.lookup_context(sref.with_node(node));
            let SymbolReference::Solved(supertype) = self.resolve_type_by_name(&class.name, &ctx) else {
                continue;
            };
            let expected = self.type_param_count(supertype);
            if expected != class.type_args.len() {
                found.push(ConfigurationError::SupertypeArityMismatch {
                    type_name: type_name.to_string(),
                    supertype: self
                        .type_decl(supertype)
                        .map_or_else(|| class.name.clone(), |d| d.qualified_name().to_string()),
                    expected,
                    found: class.type_args.len(),
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/hierarchy_tests.rs"]
mod tests;
