//! Image payload insertion.

/// Direct creation vs. slicing vs. placeholder.
pub mod insert;
