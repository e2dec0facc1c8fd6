//! Common types and utilities for the jsym symbol solver.
//!
//! This crate provides foundational types used across all jsym crates:
//! - Qualified-name helpers (`names`)
//! - Primitive kinds with widening and boxing tables (`PrimitiveKind`)
//! - Resolver limits and thresholds

// Qualified-name splitting and joining
pub mod names;

// Primitive kinds - shared by the syntax tree, metadata descriptors and the type model
pub mod primitive;
pub use primitive::PrimitiveKind;

// Centralized limits and thresholds
pub mod limits;
