//! Type-variable substitution.
//!
//! A [`Substitution`] maps type-variable names to types, in the order of the
//! formal parameters it was built from. Receivers instantiate their
//! declaration's parameters (`List<String>` maps `E` to `String`); raw
//! receivers map every parameter to `Unknown`.

use crate::db::TypeDatabase;
use crate::types::{Type, TypeDeclId, TypeParamInfo};
use smallvec::SmallVec;
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    entries: SmallVec<[(Arc<str>, Type); 4]>,
    raw: bool,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs formal parameters with actual arguments. A mismatched argument
    /// count is treated as a raw use.
    pub fn from_params(params: &[TypeParamInfo], args: &[Type]) -> Self {
        if args.len() == params.len() {
            Self {
                entries: params
                    .iter()
                    .zip(args)
                    .map(|(param, arg)| (Arc::clone(&param.name), arg.clone()))
                    .collect(),
                raw: false,
            }
        } else {
            Self {
                entries: params
                    .iter()
                    .map(|param| (Arc::clone(&param.name), Type::Unknown))
                    .collect(),
                raw: !params.is_empty(),
            }
        }
    }

    /// Substitution for a use of `decl` with `args`.
    pub fn for_reference(db: &TypeDatabase, decl: TypeDeclId, args: &[Type]) -> Self {
        Self::from_params(&db.type_params(decl), args)
    }

    /// `true` if built from a raw use of a generic declaration.
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.entries
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, ty)| ty)
    }

    /// Bind `name`, replacing an existing binding in place.
    pub fn insert(&mut self, name: Arc<str>, ty: Type) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = ty,
            None => self.entries.push((name, ty)),
        }
    }

    /// Copy without the entries shadowed by `params` (a generic method's own
    /// type parameters).
    pub fn without(&self, params: &[TypeParamInfo]) -> Self {
        if params.is_empty() {
            return self.clone();
        }
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(name, _)| params.iter().all(|p| p.name != *name))
                .cloned()
                .collect(),
            raw: self.raw,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.entries.iter().map(|(name, ty)| (&**name, ty))
    }

    /// Replace every bound type variable in `ty`.
    pub fn apply(&self, ty: &Type) -> Type {
        if self.entries.is_empty() {
            return ty.clone();
        }
        match ty {
            Type::TypeVariable { name, .. } => match self.get(name) {
                Some(replacement) => replacement.clone(),
                None => ty.clone(),
            },
            Type::Reference { decl, args } => Type::Reference {
                decl: *decl,
                args: args.iter().map(|arg| self.apply(arg)).collect(),
            },
            Type::Array(element) => Type::Array(Box::new(self.apply(element))),
            Type::Wildcard { bound, variance } => Type::Wildcard {
                bound: bound.as_deref().map(|b| Box::new(self.apply(b))),
                variance: *variance,
            },
            Type::Primitive(_) | Type::Void | Type::Null | Type::Unknown => ty.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/substitute_tests.rs"]
mod tests;
