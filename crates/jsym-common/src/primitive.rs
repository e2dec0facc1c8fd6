//! Primitive kinds.
//!
//! Shared by syntax type annotations, metadata descriptors and the solver's
//! type model, so the widening and boxing tables live in one place.

use serde::{Deserialize, Serialize};

/// The eight primitive kinds of the language.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 8] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Char,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
    ];

    /// Keyword spelling, also used in signature keys.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Qualified name of the wrapper class used by boxing conversion.
    pub const fn boxed_name(self) -> &'static str {
        match self {
            Self::Boolean => "java.lang.Boolean",
            Self::Byte => "java.lang.Byte",
            Self::Short => "java.lang.Short",
            Self::Char => "java.lang.Character",
            Self::Int => "java.lang.Integer",
            Self::Long => "java.lang.Long",
            Self::Float => "java.lang.Float",
            Self::Double => "java.lang.Double",
        }
    }

    /// Inverse of [`boxed_name`](Self::boxed_name) (unboxing conversion).
    pub fn from_boxed_name(qualified: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.boxed_name() == qualified)
    }

    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Boolean)
    }

    /// Widening primitive conversion.
    ///
    /// `byte → short → int → long → float → double` and `char → int`.
    /// Identity is not a widening.
    pub const fn widens_to(self, target: Self) -> bool {
        match self {
            Self::Byte => matches!(
                target,
                Self::Short | Self::Int | Self::Long | Self::Float | Self::Double
            ),
            Self::Short | Self::Char => {
                matches!(target, Self::Int | Self::Long | Self::Float | Self::Double)
            }
            Self::Int => matches!(target, Self::Long | Self::Float | Self::Double),
            Self::Long => matches!(target, Self::Float | Self::Double),
            Self::Float => matches!(target, Self::Double),
            Self::Double | Self::Boolean => false,
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../tests/primitive_tests.rs"]
mod tests;
