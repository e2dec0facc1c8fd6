//! Type model and declaration tables for the jsym symbol solver.
//!
//! This crate owns everything that can be answered without looking at
//! statements and expressions:
//! - the structural [`Type`] model and [`Substitution`]s,
//! - declarations parsed from source and imported from metadata, behind one
//!   set of accessor views ([`TypeDecl`], [`MethodDecl`], ...),
//! - type-name resolution, supertype walks and hierarchy validation,
//! - argument compatibility and functional-interface detection.
//!
//! Expression typing and overload resolution live in `jsym-checker`.

pub mod assignability;
pub mod db;
pub mod decl;
pub mod error;
pub mod format;
pub mod functional;
pub mod hierarchy;
pub mod metadata;
pub mod recursion;
pub mod reference;
pub mod registry;
pub mod store;
pub mod substitute;
pub mod type_lookup;
pub mod types;

#[cfg(test)]
#[path = "../tests/test_fixtures.rs"]
pub(crate) mod test_fixtures;

pub use assignability::Compatibility;
pub use db::{SolverOptions, TypeDatabase};
pub use decl::{
    Declaration, FieldDecl, MethodDecl, ParamOwner, ParamRef, ParameterDecl, TypeDecl,
};
pub use error::ConfigurationError;
pub use format::TypeDisplay;
pub use functional::FunctionalSignature;
pub use hierarchy::{MemberMatch, SupertypeEntry};
pub use metadata::{
    FieldDescriptor, InMemoryMetadata, MetadataProvider, MethodDescriptor, ParamDescriptor,
    TypeDescriptor, TypeParamDescriptor, TypeSig,
};
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use reference::SymbolReference;
pub use store::{MemberOrigin, TypeOrigin};
pub use substitute::Substitution;
pub use type_lookup::LookupContext;
pub use types::{FieldId, MethodId, MethodSignature, Type, TypeDeclId, TypeParamInfo};
