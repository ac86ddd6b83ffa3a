//! Per-channel variants of a composed page.

/// Clone, offset and rewrite.
pub mod adapter;
/// Rewrite tables and the profile registry.
pub mod profile;
