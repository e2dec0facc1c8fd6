//! Method call resolution.
//!
//! Candidate collection:
//! - explicit receiver: every method of that name in the receiver type's
//!   supertype closure
//! - implicit receiver: the innermost enclosing type that has a method of
//!   that name, else the static imports
//!
//! Override-equivalent candidates (same erased signature after receiver
//! substitution) collapse onto the most derived one. Applicability is
//! checked in two phases, fixed arity then variable arity, and the first
//! phase with an applicable candidate decides.
//!
//! Among applicable candidates a candidate whose every argument fits at
//! least as well as in every other candidate wins. Failing that, the
//! candidates no other candidate beats outright are compared by declaring
//! type, and a unique most derived one wins. Anything else is ambiguous.

use crate::state::{ExprResolver, Receiver};
use jsym_binder::Context;
use jsym_solver::{Compatibility, MemberMatch, MethodId, Substitution, SymbolReference, Type};
use jsym_syntax::{NodeData, NodeIndex, SyntaxRef};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, trace};

/// A selected method with the substitution of its declaring type as seen
/// from the receiver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallResolution {
    pub method: MethodId,
    pub substitution: Substitution,
    /// Argument types in order; lambdas are `Unknown`.
    pub arg_types: Vec<Type>,
    /// Selected in the variable-arity phase.
    pub varargs: bool,
}

impl CallResolution {
    /// The declared parameter type argument `index` was matched against.
    pub fn parameter_type<'p>(&self, params: &'p [Type], index: usize) -> Option<&'p Type> {
        if self.varargs && index + 1 >= params.len() {
            params.last()?.element_type()
        } else {
            params.get(index)
        }
    }
}

/// What overload selection needs to know about an argument.
#[derive(Clone, Debug, PartialEq, Eq)]
enum ArgShape {
    /// Lambdas are only matched by arity against functional parameters.
    Lambda { arity: usize },
    Typed(Type),
}

impl ArgShape {
    fn as_type(&self) -> Type {
        match self {
            ArgShape::Lambda { .. } => Type::Unknown,
            ArgShape::Typed(ty) => ty.clone(),
        }
    }
}

/// An applicable candidate and its per-argument fit.
struct Applicable {
    candidate: MemberMatch<MethodId>,
    scores: SmallVec<[Compatibility; 8]>,
}

impl Applicable {
    /// At least as good at every argument.
    fn covers(&self, other: &Applicable) -> bool {
        self.scores.iter().zip(&other.scores).all(|(a, b)| a >= b)
    }

    fn strictly_beats(&self, other: &Applicable) -> bool {
        self.covers(other) && self.scores.iter().zip(&other.scores).any(|(a, b)| a > b)
    }
}

// =============================================================================
// Call Resolution Methods
// =============================================================================

impl ExprResolver<'_> {
    /// Select the method a `MethodCall` node invokes.
    pub fn select_call(&mut self, node: SyntaxRef, ctx: Context) -> SymbolReference<CallResolution> {
        let db = self.db;
        let Some(NodeData::MethodCall(call)) = db.node(node) else {
            return SymbolReference::Unsolved;
        };
        let candidates = self.call_candidates(node, call.receiver, &call.name, ctx);
        if candidates.is_empty() {
            trace!(name = %call.name, "select_call: no candidates");
            return SymbolReference::Unsolved;
        }
        let args: Vec<ArgShape> = call
            .args
            .iter()
            .map(|&arg| self.arg_shape(node.with_node(arg), ctx))
            .collect();

        let (applicable, varargs) = match self.applicable(&candidates, &args, false) {
            found if !found.is_empty() => (found, false),
            _ => (self.applicable(&candidates, &args, true), true),
        };
        if applicable.is_empty() {
            debug!(name = %call.name, candidates = candidates.len(), args = args.len(), "select_call: nothing applicable");
            return SymbolReference::Unsolved;
        }

        let arg_types: Vec<Type> = args.iter().map(ArgShape::as_type).collect();
        self.most_specific(applicable).map(|candidate| CallResolution {
            method: candidate.member,
            substitution: candidate.substitution,
            arg_types: arg_types.clone(),
            varargs,
        })
    }

    fn arg_shape(&mut self, arg: SyntaxRef, ctx: Context) -> ArgShape {
        match self.db.node(arg) {
            Some(NodeData::Lambda(lambda)) => ArgShape::Lambda {
                arity: lambda.params.len(),
            },
            _ => ArgShape::Typed(self.type_of(arg, ctx)),
        }
    }

    /// Candidates nearest first, override-equivalent ones collapsed.
    fn call_candidates(
        &mut self,
        node: SyntaxRef,
        receiver: NodeIndex,
        name: &str,
        ctx: Context,
    ) -> Vec<MemberMatch<MethodId>> {
        let db = self.db;
        if receiver.is_none() {
            return self.implicit_receiver_candidates(name, ctx);
        }
        let found = match self.classify_receiver(node.with_node(receiver), ctx) {
            Receiver::Value(ty) => db.methods_named(&ty, name),
            Receiver::Static(owner) => db.methods_named(&Type::raw(owner), name),
            Receiver::Package(_) | Receiver::Unresolved => Vec::new(),
        };
        self.collapse_overrides(found)
    }

    /// Keep the first (most derived) of each override-equivalent group.
    /// `found` must come from one supertype closure.
    fn collapse_overrides(&self, found: Vec<MemberMatch<MethodId>>) -> Vec<MemberMatch<MethodId>> {
        let db = self.db;
        let mut seen: FxHashSet<Arc<str>> = FxHashSet::default();
        found
            .into_iter()
            .filter(|candidate| {
                db.method(candidate.member)
                    .is_some_and(|method| seen.insert(method.signature_key_with(&candidate.substitution)))
            })
            .collect()
    }

    /// The innermost enclosing type with a method of that name, else the
    /// static methods of every statically imported owner. Owners are
    /// collapsed one at a time, so equal signatures from unrelated owners
    /// stay separate candidates.
    fn implicit_receiver_candidates(&self, name: &str, ctx: Context) -> Vec<MemberMatch<MethodId>> {
        let db = self.db;
        for owner in self.scopes.enclosing_types(ctx) {
            let Some(decl) = db.type_decl(owner) else {
                continue;
            };
            let found = db.methods_named(&decl.as_type(), name);
            if !found.is_empty() {
                return self.collapse_overrides(found);
            }
        }

        let mut seen: FxHashSet<MethodId> = FxHashSet::default();
        let mut out = Vec::new();
        for owner in self.scopes.static_import_owners(db, ctx.unit, name) {
            let statics = db
                .methods_named(&Type::raw(owner), name)
                .into_iter()
                .filter(|candidate| db.method(candidate.member).is_some_and(|m| m.is_static()))
                .collect();
            out.extend(
                self.collapse_overrides(statics)
                    .into_iter()
                    .filter(|candidate| seen.insert(candidate.member)),
            );
        }
        out
    }

    /// Candidates applicable in one phase, with their scores.
    fn applicable(&self, candidates: &[MemberMatch<MethodId>], args: &[ArgShape], varargs: bool) -> Vec<Applicable> {
        let db = self.db;
        let mut out = Vec::new();
        for candidate in candidates {
            let Some(method) = db.method(candidate.member) else {
                continue;
            };
            let signature = method.signature();
            let substitution = candidate.substitution.without(&signature.type_params);
            let params: Vec<Type> = signature.params.iter().map(|p| substitution.apply(p)).collect();

            let param_for = |index: usize| -> Option<Type> {
                if varargs && index + 1 >= params.len() {
                    params.last()?.element_type().cloned()
                } else {
                    params.get(index).cloned()
                }
            };
            let arity_fits = if varargs {
                method.is_varargs() && !params.is_empty() && args.len() + 1 >= params.len()
            } else {
                args.len() == params.len()
            };
            if !arity_fits {
                continue;
            }

            let mut scores = SmallVec::new();
            for (index, arg) in args.iter().enumerate() {
                let score = param_for(index).map_or(Compatibility::Incompatible, |param| {
                    self.arg_compatibility(arg, &param)
                });
                if !score.is_compatible() {
                    break;
                }
                scores.push(score);
            }
            if scores.len() == args.len() {
                out.push(Applicable {
                    candidate: candidate.clone(),
                    scores,
                });
            }
        }
        out
    }

    fn arg_compatibility(&self, arg: &ArgShape, param: &Type) -> Compatibility {
        match arg {
            ArgShape::Typed(ty) => self.db.compatibility(ty, param),
            ArgShape::Lambda { arity } => {
                if param.is_unknown() {
                    return Compatibility::Loose;
                }
                match self.db.functional_signature(param) {
                    Some(signature) if signature.params.len() == *arity => Compatibility::Exact,
                    _ => Compatibility::Incompatible,
                }
            }
        }
    }

    fn most_specific(&self, mut applicable: Vec<Applicable>) -> SymbolReference<MemberMatch<MethodId>> {
        if applicable.len() == 1 {
            return applicable.pop().map(|a| a.candidate).into();
        }

        let dominators: Vec<usize> = (0..applicable.len())
            .filter(|&i| {
                applicable
                    .iter()
                    .enumerate()
                    .all(|(j, other)| i == j || applicable[i].covers(other))
            })
            .collect();
        if let [single] = dominators.as_slice() {
            return SymbolReference::Solved(applicable.swap_remove(*single).candidate);
        }

        let pool: Vec<usize> = if dominators.is_empty() {
            (0..applicable.len())
                .filter(|&i| !applicable.iter().any(|other| other.strictly_beats(&applicable[i])))
                .collect()
        } else {
            dominators
        };

        let db = self.db;
        let declaring = |i: usize| db.method(applicable[i].candidate.member).map(|m| m.declaring_type());
        let most_derived: Vec<usize> = pool
            .iter()
            .copied()
            .filter(|&i| {
                pool.iter().all(|&j| {
                    i == j
                        || match (declaring(i), declaring(j)) {
                            (Some(a), Some(b)) => a != b && db.is_subtype_decl(a, b),
                            _ => false,
                        }
                })
            })
            .collect();
        if let [single] = most_derived.as_slice() {
            return SymbolReference::Solved(applicable.swap_remove(*single).candidate);
        }

        debug!(candidates = pool.len(), "select_call: ambiguous");
        SymbolReference::Ambiguous(pool.iter().map(|&i| applicable[i].candidate.clone()).collect())
    }
}

#[cfg(test)]
#[path = "../tests/call_checker_tests.rs"]
mod tests;
