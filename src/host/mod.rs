//! Collaborators the engine talks to: the design canvas and the channel asset store.

/// Canvas host trait and the in-memory host.
pub mod canvas;
/// Key-value store for per-channel assets.
pub mod store;
