//! Configuration errors.
//!
//! These describe inputs that do not fit together (a node from another
//! session, a metadata provider answering with the wrong type, a malformed
//! hierarchy). Ordinary lookup failures are not errors; see
//! [`SymbolReference`](crate::SymbolReference).

use jsym_syntax::{NodeIndex, UnitId};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConfigurationError {
    /// A context or node names a unit that was never added to the session.
    UnknownUnit { unit: UnitId },
    /// A node index outside of its unit's arena.
    ForeignNode { unit: UnitId, node: NodeIndex },
    /// The metadata provider answered `requested` with a descriptor for `found`.
    DescriptorNameMismatch { requested: String, found: String },
    /// A supertype reference with the wrong number of type arguments.
    SupertypeArityMismatch {
        type_name: String,
        supertype: String,
        expected: usize,
        found: usize,
    },
    /// A type that is its own (transitive) supertype.
    CyclicHierarchy { type_name: String },
    /// Two compilation units declare the same qualified name. The first
    /// declaration is kept.
    DuplicateType { qualified_name: String },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownUnit { unit } => {
                write!(f, "compilation unit #{} is not part of this session", unit.0)
            }
            Self::ForeignNode { unit, node } => write!(
                f,
                "node #{} does not belong to compilation unit #{}",
                node.0, unit.0
            ),
            Self::DescriptorNameMismatch { requested, found } => write!(
                f,
                "metadata lookup for '{requested}' returned descriptor '{found}'"
            ),
            Self::SupertypeArityMismatch {
                type_name,
                supertype,
                expected,
                found,
            } => write!(
                f,
                "'{type_name}' extends '{supertype}' with {found} type argument(s), expected {expected}"
            ),
            Self::CyclicHierarchy { type_name } => {
                write!(f, "cyclic inheritance involving '{type_name}'")
            }
            Self::DuplicateType { qualified_name } => {
                write!(f, "duplicate declaration of type '{qualified_name}'")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = ConfigurationError::SupertypeArityMismatch {
            type_name: "p.A".into(),
            supertype: "p.Box".into(),
            expected: 1,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "'p.A' extends 'p.Box' with 2 type argument(s), expected 1"
        );
        let err = ConfigurationError::UnknownUnit { unit: UnitId(4) };
        assert_eq!(err.to_string(), "compilation unit #4 is not part of this session");
    }
}
