//! Request/response types and correlation for the rasterization round trip.
//!
//! ```text
//! SlicingCoordinator ──register(name)──► SliceBroker ◄──deliver(response)── Rasterizer
//!         │                                   │
//!         └──────submit(request, cancel)──────┼──────────────────────────►  (collaborator)
//!         ◄──────────── SliceTicket ──────────┘
//! ```
//!
//! Dropping a [`SliceTicket`] deregisters it, so every exit path of the coordinator cleans up.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::foundation::error::{PromoError, PromoResult};
use crate::slicing::planner::SliceStrategy;

/// Cut request sent to the rasterization collaborator.
#[derive(Clone, Debug)]
pub struct SliceRequest {
    /// Encoded source bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Source width.
    pub width: u32,
    /// Source height.
    pub height: u32,
    /// Correlation key from [`SliceBroker::request_key`]; responses must echo it.
    pub name: String,
    /// Nominal tile width.
    pub tile_width: u32,
    /// Nominal tile height.
    pub tile_height: u32,
    /// Full tiling plan.
    pub strategy: SliceStrategy,
}

/// One cut tile, positioned relative to the source image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliceTile {
    /// Left edge in the source.
    pub x: u32,
    /// Top edge in the source.
    pub y: u32,
    /// Tile width.
    pub width: u32,
    /// Tile height.
    pub height: u32,
    /// Encoded tile bytes.
    pub bytes: Vec<u8>,
}

/// Collaborator reply, matched to a pending request by `name`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliceResponse {
    /// Correlation key.
    pub name: String,
    /// Whether cutting succeeded.
    pub success: bool,
    /// Tiles on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slices: Option<Vec<SliceTile>>,
    /// Failure text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SliceResponse {
    /// Successful reply.
    pub fn ok(name: impl Into<String>, slices: Vec<SliceTile>) -> Self {
        Self {
            name: name.into(),
            success: true,
            slices: Some(slices),
            error: None,
        }
    }

    /// Failed reply.
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: false,
            slices: None,
            error: Some(error.into()),
        }
    }
}

/// The rasterization collaborator seam.
///
/// Implementations cut the image and eventually hand a [`SliceResponse`] to the
/// [`SliceBroker`] they were built with. `cancel` fires when the requester stops waiting.
pub trait Rasterizer {
    /// Start cutting `request`. Must not block.
    fn submit(&self, request: SliceRequest, cancel: CancellationToken);
}

struct Pending {
    seq: u64,
    tx: oneshot::Sender<SliceResponse>,
}

#[derive(Default)]
struct BrokerState {
    next_seq: u64,
    next_key: u64,
    pending: HashMap<String, Pending>,
}

/// Registry of in-flight slice requests keyed by name.
#[derive(Clone, Default)]
pub struct SliceBroker {
    state: Arc<Mutex<BrokerState>>,
}

impl std::fmt::Debug for SliceBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliceBroker")
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl SliceBroker {
    /// Empty broker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Correlation key for a new request about `asset`, unique within this broker.
    ///
    /// Concurrent builders reuse node names (`"image"`, `"heroImage"`), so the asset name alone
    /// cannot key a request.
    pub fn request_key(&self, asset: &str) -> String {
        let mut state = self.lock();
        state.next_key += 1;
        format!("{asset}#{}", state.next_key)
    }

    /// Register interest in the response for `name`.
    ///
    /// A later registration under the same name supersedes this one; the superseded ticket
    /// resolves with a rasterization error.
    pub fn register(&self, name: &str) -> SliceTicket {
        let (tx, rx) = oneshot::channel();
        let mut state = self.lock();
        state.next_seq += 1;
        let seq = state.next_seq;
        if state
            .pending
            .insert(name.to_string(), Pending { seq, tx })
            .is_some()
        {
            debug!(name, "superseding pending slice request");
        }
        SliceTicket {
            name: name.to_string(),
            seq,
            rx,
            broker: self.clone(),
        }
    }

    /// Route `response` to its pending request. Returns `false` when nothing is waiting for it.
    pub fn deliver(&self, response: SliceResponse) -> bool {
        let pending = self.lock().pending.remove(&response.name);
        match pending {
            Some(p) => {
                let name = response.name.clone();
                let delivered = p.tx.send(response).is_ok();
                if !delivered {
                    debug!(name = %name, "slice response receiver already gone");
                }
                delivered
            }
            None => {
                debug!(name = %response.name, "ignoring slice response with no pending request");
                false
            }
        }
    }

    /// Number of registered, undelivered requests.
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Whether a request named `name` is waiting.
    pub fn is_pending(&self, name: &str) -> bool {
        self.lock().pending.contains_key(name)
    }

    fn deregister(&self, name: &str, seq: u64) {
        let mut state = self.lock();
        if state.pending.get(name).is_some_and(|p| p.seq == seq) {
            state.pending.remove(name);
        }
    }

    fn lock(&self) -> MutexGuard<'_, BrokerState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Handle to one pending request; deregisters on drop.
pub struct SliceTicket {
    name: String,
    seq: u64,
    rx: oneshot::Receiver<SliceResponse>,
    broker: SliceBroker,
}

impl SliceTicket {
    /// Correlation key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait for the response. Not bounded; callers apply their own timeout.
    pub async fn response(&mut self) -> PromoResult<SliceResponse> {
        (&mut self.rx).await.map_err(|_| {
            PromoError::rasterization(format!(
                "slice request '{}' was superseded or its collaborator went away",
                self.name
            ))
        })
    }
}

impl Drop for SliceTicket {
    fn drop(&mut self) {
        self.broker.deregister(&self.name, self.seq);
    }
}

/// Rasterizer that forwards requests over a channel to an external worker.
#[derive(Clone, Debug)]
pub struct ChannelRasterizer {
    tx: mpsc::UnboundedSender<(SliceRequest, CancellationToken)>,
}

impl ChannelRasterizer {
    /// Create the rasterizer and the receiving end for the worker.
    pub fn new() -> (
        Self,
        mpsc::UnboundedReceiver<(SliceRequest, CancellationToken)>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Rasterizer for ChannelRasterizer {
    fn submit(&self, request: SliceRequest, cancel: CancellationToken) {
        if self.tx.send((request, cancel)).is_err() {
            debug!("slice worker channel closed; request dropped");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slicing/protocol.rs"]
mod tests;
