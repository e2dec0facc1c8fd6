//! jsym: symbol resolution and type inference for Java-like languages.
//!
//! This crate re-exports the public surface of the workspace crates:
//!
//! - [`syntax`]: the node arena and [`UnitBuilder`] a parser fills in
//! - [`solver`]: the type and declaration model, metadata descriptors
//! - [`binder`]: scope chains
//! - [`checker`]: [`Session`] and the expression resolver
//!
//! Call [`tracing_config::init_tracing`] once at startup to see the
//! resolver's spans and events.

pub mod tracing_config;

pub use jsym_binder as binder;
pub use jsym_checker as checker;
pub use jsym_common as common;
pub use jsym_solver as solver;
pub use jsym_syntax as syntax;

pub use jsym_checker::{
    CallResolution, Compatibility, ConfigurationError, Context, Declaration, ExprResolver,
    InMemoryMetadata, MetadataProvider, MethodId, ScopeGraph, Session, SessionBuilder,
    SessionOptions, SessionState, SolverOptions, SymbolReference, Type, TypeDatabase, TypeDeclId,
    create_session,
};
pub use jsym_common::PrimitiveKind;
pub use jsym_solver::{MethodDescriptor, TypeDescriptor, TypeSig};
pub use jsym_syntax::{NodeArena, NodeIndex, SyntaxRef, UnitBuilder, UnitId};
