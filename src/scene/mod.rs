//! Design-canvas scene tree.

/// Structural hashing for determinism checks.
pub mod fingerprint;
/// Id lookups over a built tree.
pub mod index;
/// Node model and tree operations.
pub mod node;
