//! Argument-to-parameter compatibility used for overload ranking.
//!
//! This is deliberately smaller than full assignment conversion: it knows
//! identity, primitive widening, boxing and unboxing, `null`, nominal
//! subtyping with type arguments, arrays and type-variable bounds.

use crate::db::TypeDatabase;
use crate::types::Type;
use jsym_common::PrimitiveKind;
use jsym_syntax::Variance;

/// How well an argument fits a parameter. Ordered: `Exact > Loose >
/// Incompatible`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Compatibility {
    Incompatible,
    /// Needs widening, boxing, unboxing, subtyping or a bound check.
    Loose,
    /// Identical types.
    Exact,
}

impl Compatibility {
    pub fn is_compatible(self) -> bool {
        self != Self::Incompatible
    }
}

impl TypeDatabase {
    /// Type erasure: no type arguments, type variables replaced by the
    /// erasure of their bound.
    pub fn erasure(&self, ty: &Type) -> Type {
        match ty {
            Type::Reference { decl, .. } => Type::raw(*decl),
            Type::TypeVariable { bound, .. } => match bound.as_ref() {
                Type::Unknown => self.root_type(),
                bound => self.erasure(bound),
            },
            Type::Wildcard { bound, variance } => match (bound, variance) {
                (Some(bound), Variance::Extends) => self.erasure(bound),
                _ => self.root_type(),
            },
            Type::Array(element) => Type::array(self.erasure(element)),
            Type::Primitive(_) | Type::Void | Type::Null | Type::Unknown => ty.clone(),
        }
    }

    /// Name of an erased type as used in signature keys.
    pub fn erased_name(&self, ty: &Type) -> String {
        match ty {
            Type::Primitive(kind) => kind.name().to_string(),
            Type::Reference { decl, .. } => self
                .type_decl(*decl)
                .map_or_else(|| "?".to_string(), |d| d.qualified_name().to_string()),
            Type::Array(element) => format!("{}[]", self.erased_name(element)),
            Type::Void => "void".to_string(),
            Type::Null => "null".to_string(),
            Type::TypeVariable { .. } | Type::Wildcard { .. } => self.erased_name(&self.erasure(ty)),
            Type::Unknown => "?".to_string(),
        }
    }

    /// How well a value of type `arg` fits a parameter of type `param`.
    ///
    /// `Unknown` on either side is a loose match, so unresolved pieces never
    /// eliminate a candidate on their own.
    pub fn compatibility(&self, arg: &Type, param: &Type) -> Compatibility {
        use Compatibility::*;

        if arg.is_unknown() || param.is_unknown() {
            return Loose;
        }
        if arg == param {
            return Exact;
        }
        match (arg, param) {
            (Type::Void, _) | (_, Type::Void) => Incompatible,
            (_, Type::Wildcard { bound, variance }) => match (bound, variance) {
                (Some(bound), Variance::Extends) => self.compatibility(arg, bound).min(Loose),
                _ => Loose,
            },
            (_, Type::TypeVariable { bound, .. }) => {
                // A type parameter accepts anything whose erasure fits its bound.
                let bound = self.erasure(bound);
                let arg = match arg {
                    Type::Primitive(kind) => self.boxed(*kind),
                    other => self.erasure(other),
                };
                self.compatibility(&arg, &bound).min(Loose)
            }
            (Type::Primitive(a), Type::Primitive(b)) => {
                if a.widens_to(*b) {
                    Loose
                } else {
                    Incompatible
                }
            }
            (Type::Primitive(kind), _) => {
                let boxed = self.boxed(*kind);
                if boxed.is_unknown() {
                    return Incompatible;
                }
                if self.is_reference_subtype(&boxed, param) {
                    Loose
                } else {
                    Incompatible
                }
            }
            (Type::Reference { decl, .. }, Type::Primitive(target)) => {
                let unboxed = self
                    .type_decl(*decl)
                    .and_then(|d| PrimitiveKind::from_boxed_name(&d.qualified_name()));
                match unboxed {
                    Some(kind) if kind == *target || kind.widens_to(*target) => Loose,
                    _ => Incompatible,
                }
            }
            (Type::Null, param) => {
                if param.is_reference_like() {
                    Loose
                } else {
                    Incompatible
                }
            }
            (Type::TypeVariable { bound, .. }, _) => self.compatibility(bound, param).min(Loose),
            (Type::Array(a), Type::Array(b)) => {
                if a.is_primitive() || b.is_primitive() {
                    // Primitive arrays only match themselves.
                    Incompatible
                } else {
                    self.compatibility(a, b).min(Loose)
                }
            }
            (Type::Array(_), Type::Reference { decl, .. }) => {
                if self.is_root(*decl) {
                    Loose
                } else {
                    Incompatible
                }
            }
            (Type::Reference { .. }, Type::Reference { .. }) => {
                if self.is_reference_subtype(arg, param) {
                    Loose
                } else {
                    Incompatible
                }
            }
            _ => Incompatible,
        }
    }

    pub fn is_assignable(&self, arg: &Type, param: &Type) -> bool {
        self.compatibility(arg, param).is_compatible()
    }

    /// Boxed counterpart of a primitive, `Unknown` if the wrapper type
    /// cannot be resolved.
    pub fn boxed(&self, kind: PrimitiveKind) -> Type {
        self.lookup_qualified(kind.boxed_name())
            .map_or(Type::Unknown, Type::raw)
    }

    /// Nominal subtyping between references, with type-argument
    /// containment. Raw on either side skips the argument check.
    fn is_reference_subtype(&self, sub: &Type, sup: &Type) -> bool {
        let Some((target, target_args)) = sup.as_reference() else {
            return false;
        };
        let Some(entry) = self
            .supertype_closure(sub)
            .into_iter()
            .find(|entry| entry.decl == target)
        else {
            return false;
        };
        if target_args.is_empty() || entry.substitution.is_raw() {
            return true;
        }
        let actual: Vec<Type> = self
            .type_params(target)
            .iter()
            .map(|param| entry.substitution.apply(&param.as_type()))
            .collect();
        actual.len() == target_args.len()
            && target_args
                .iter()
                .zip(&actual)
                .all(|(formal, actual)| self.contains_type_arg(formal, actual))
    }

    /// Type-argument containment: `? extends B` contains subtypes of `B`,
    /// `? super B` contains supertypes of `B`, anything else needs equality.
    fn contains_type_arg(&self, formal: &Type, actual: &Type) -> bool {
        if formal == actual || formal.is_unknown() || actual.is_unknown() {
            return true;
        }
        match formal {
            Type::Wildcard { bound: None, .. } => true,
            Type::Wildcard {
                bound: Some(bound),
                variance: Variance::Extends,
            } => self.is_assignable(actual, bound),
            Type::Wildcard {
                bound: Some(bound),
                variance: Variance::Super,
            } => self.is_assignable(bound, actual),
            Type::TypeVariable { .. } => true,
            _ => matches!(actual, Type::TypeVariable { .. }),
        }
    }
}

#[cfg(test)]
#[path = "../tests/assignability_tests.rs"]
mod tests;
