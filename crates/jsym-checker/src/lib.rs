//! Expression resolution for the jsym symbol solver.
//!
//! The entry point is a [`Session`]: build one from compilation units with
//! [`SessionBuilder`] (or [`create_session`]), then ask it what a node
//! refers to ([`Session::resolve`]) or what its static type is
//! ([`Session::type_of`]).
//!
//! Queries run on an [`ExprResolver`], which layers expression typing,
//! overload selection and lambda target typing over the solver's
//! declaration tables and the binder's scope chains.

pub mod call_checker;
pub mod expr;
pub mod lambda;
pub mod session;
pub mod state;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
pub(crate) mod test_fixtures;

pub use call_checker::CallResolution;
pub use session::{Session, SessionBuilder, SessionOptions, SessionState, create_session};
pub use state::ExprResolver;

pub use jsym_binder::{Context, ScopeGraph};
pub use jsym_solver::{
    Compatibility, ConfigurationError, Declaration, InMemoryMetadata, MetadataProvider, MethodId,
    SolverOptions, SymbolReference, Type, TypeDatabase, TypeDeclId,
};
