//! Type representation.
//!
//! Types are plain structural values: two `Type`s are the same type exactly
//! when they compare equal. Declarations are referenced by handle
//! ([`TypeDeclId`]) so cyclic type graphs never produce cyclic values.

use jsym_common::PrimitiveKind;
use jsym_syntax::Variance;
use std::sync::Arc;

// =============================================================================
// Handles
// =============================================================================

/// Handle of a class, interface or enum declaration inside one session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeDeclId(pub u32);

impl TypeDeclId {
    /// Sentinel value for an invalid handle.
    pub const INVALID: Self = Self(0);

    /// First valid handle.
    pub const FIRST_VALID: u32 = 1;

    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

/// Handle of a field (enum constants included).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

/// Handle of a method.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub u32);

// =============================================================================
// Type
// =============================================================================

/// A resolved type.
///
/// `Reference` arguments are either empty (raw use) or exactly as many as the
/// declaration's formal type parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveKind),
    Reference { decl: TypeDeclId, args: Vec<Type> },
    Array(Box<Type>),
    /// A type parameter in scope. `bound` is the first declared bound, the
    /// root type when unbounded, or `Unknown` where a self-referential bound
    /// was cut.
    TypeVariable { name: Arc<str>, bound: Box<Type> },
    /// `?`, `? extends B`, `? super B`. Only appears as a type argument.
    Wildcard {
        bound: Option<Box<Type>>,
        variance: Variance,
    },
    /// Return type of a `void` method.
    Void,
    /// Type of the `null` literal.
    Null,
    /// Anything that could not be resolved.
    Unknown,
}

impl Type {
    pub fn reference(decl: TypeDeclId, args: Vec<Type>) -> Self {
        Self::Reference { decl, args }
    }

    /// Reference without type arguments.
    pub fn raw(decl: TypeDeclId) -> Self {
        Self::Reference {
            decl,
            args: Vec::new(),
        }
    }

    pub fn array(element: Type) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn type_variable(name: impl Into<Arc<str>>, bound: Type) -> Self {
        Self::TypeVariable {
            name: name.into(),
            bound: Box::new(bound),
        }
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// Types that can hold `null`.
    pub fn is_reference_like(&self) -> bool {
        matches!(
            self,
            Self::Reference { .. } | Self::Array(_) | Self::TypeVariable { .. } | Self::Null
        )
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<(TypeDeclId, &[Type])> {
        match self {
            Self::Reference { decl, args } => Some((*decl, args)),
            _ => None,
        }
    }

    /// Declaration behind a reference, or behind a type variable's bound.
    pub fn declaration(&self) -> Option<TypeDeclId> {
        match self {
            Self::Reference { decl, .. } => Some(*decl),
            Self::TypeVariable { bound, .. } => bound.declaration(),
            _ => None,
        }
    }

    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Self::Array(element) => Some(element),
            _ => None,
        }
    }

    /// `true` if this type mentions a type variable anywhere.
    pub fn has_type_variables(&self) -> bool {
        match self {
            Self::TypeVariable { .. } => true,
            Self::Reference { args, .. } => args.iter().any(Type::has_type_variables),
            Self::Array(element) => element.has_type_variables(),
            Self::Wildcard { bound, .. } => bound.as_deref().is_some_and(Type::has_type_variables),
            _ => false,
        }
    }
}

/// Formal type parameter of a generic type or method.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamInfo {
    pub name: Arc<str>,
    /// First declared bound; the root type when unbounded.
    pub bound: Type,
}

impl TypeParamInfo {
    /// The type variable that refers to this parameter.
    pub fn as_type(&self) -> Type {
        Type::TypeVariable {
            name: self.name.clone(),
            bound: Box::new(self.bound.clone()),
        }
    }
}

/// Resolved signature of a method, before receiver substitution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_params: Arc<[TypeParamInfo]>,
    /// Parameter types in order. A varargs parameter is an array type.
    pub params: Vec<Type>,
    pub return_type: Type,
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
