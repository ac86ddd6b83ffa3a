use std::sync::{Mutex, MutexGuard};

/// A non-fatal condition observed while building or adapting a tree.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// The host refused a direct image creation; a placeholder was used.
    AssetCreationFailure {
        /// Asset name.
        asset: String,
        /// Host-provided reason.
        reason: String,
    },
    /// The slicing round trip did not complete in time.
    SlicingTimeout {
        /// Asset name.
        asset: String,
    },
    /// The rasterization collaborator failed to cut an image.
    RasterizationFailure {
        /// Asset name.
        asset: String,
        /// Collaborator-provided reason.
        reason: String,
    },
    /// Some, but not all, tiles of an oversized image were placed.
    PartialAssembly {
        /// Asset name.
        asset: String,
        /// Tiles placed.
        placed: usize,
        /// Tiles returned by the collaborator.
        total: usize,
    },
    /// A module builder failed and was replaced by an error block.
    ModuleBuildFailure {
        /// Module id.
        module: String,
        /// Error text.
        message: String,
    },
    /// A channel rewrite could not find its target node.
    StructuralLookupMiss {
        /// Channel id.
        channel: String,
        /// Module name the rule was keyed by.
        module: String,
        /// Missing node name.
        target: String,
    },
}

/// Collector for [`Diagnostic`] values produced during one build or generate call.
///
/// Shared by reference between concurrently polled builder futures; the lock is never held
/// across an await point.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }

    /// Snapshot of all recorded diagnostics in recording order.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Consume the collector.
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether a visually incomplete oversized asset was accepted.
    ///
    /// Callers that need strict output should treat this as a reportable failure.
    pub fn has_partial_assembly(&self) -> bool {
        self.lock()
            .iter()
            .any(|d| matches!(d, Diagnostic::PartialAssembly { .. }))
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
