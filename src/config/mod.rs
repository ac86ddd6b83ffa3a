//! Page configuration: the serde boundary, image payloads and engine options.

/// Configuration document and module content.
pub mod model;
/// Engine-wide knobs and defaults.
pub mod options;
/// Image payload forms and normalization.
pub mod payload;
