//! Page assembly.

/// Configuration → prototype tree.
pub mod prototype;
