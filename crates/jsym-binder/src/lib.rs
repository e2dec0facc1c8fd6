//! Scope chains for the jsym symbol solver.
//!
//! Every compilation unit is traversed once after the session is populated.
//! The traversal produces immutable frames (`Scope`) linked to their
//! enclosing frame, and a map from syntax nodes to the frame in effect there.
//! Lookups walk the chain innermost first.

pub mod lookup;
pub mod scope;
pub mod state;

pub use lookup::ScopeGraph;
pub use scope::{Context, Scope, ScopeId, ScopeKind};
pub use state::{UnitScopes, bind_unit};
