//! Centralized limits and thresholds for the resolver.
//!
//! This module provides shared constants for tree walks, scope walks and name
//! lengths used throughout the workspace. Centralizing these values:
//! - Prevents duplicate definitions with inconsistent values
//! - Documents the rationale for each limit
//!
//! # Solver recursion limits
//!
//! Recursion limits for the solver (hierarchy walks, type conversion,
//! expression resolution) are centralized in
//! [`jsym_solver::recursion::RecursionProfile`] rather than here. The profiles
//! are the single source of truth for solver recursion.

// =============================================================================
// Tree and scope walks
// =============================================================================

/// Maximum number of parent links followed when walking from a node to its
/// ancestors.
///
/// Syntax trees are built by an external parser and are trusted to be acyclic,
/// but a corrupted parent link would otherwise turn every ancestor walk into an
/// infinite loop. Real trees never come close to this depth.
///
/// # Example
///
/// ```java
/// class A { void m() { if (x) { while (y) { { { /* ... */ } } } } } }
/// ```
pub const MAX_TREE_WALK_ITERATIONS: u32 = 10_000;

/// Maximum number of frames visited by a single scope-chain lookup.
///
/// Frames are created per block, local declaration, method, lambda and type,
/// so a long method body produces a long chain. The limit only guards against
/// a malformed frame table whose parent links form a loop.
pub const MAX_SCOPE_WALK_ITERATIONS: u32 = 100_000;

// =============================================================================
// Names
// =============================================================================

/// Maximum number of segments considered when resolving a dotted name
/// (`a.b.c.D.E`).
///
/// Every segment boundary is a candidate split between package prefix and
/// member-type suffix, so resolution is quadratic in the segment count.
pub const MAX_QUALIFIED_NAME_SEGMENTS: usize = 64;
