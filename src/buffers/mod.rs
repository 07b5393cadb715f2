//! Buffer-swap disciplines.
//!
//! Every manager hands out a render target once per frame through
//! [`BufferManager::fetch_next_destination_buffer`]. Promotion of the previous render target to
//! scanout happens inside that call, so a buffer is only exposed after its frame finished.

use crate::foundation::core::{BufferId, SurfaceDesc};
use crate::foundation::error::{BufswapError, BufswapResult};
use crate::scanout::ScanoutSink;
use crate::surface::pixel::SurfaceRef;

pub(crate) mod always_allocate;
pub(crate) mod n_buffer;
pub(crate) mod single;

pub use always_allocate::AlwaysAllocateBufferManager;
pub use n_buffer::NBufferManager;
pub use single::SingleBufferManager;

/// Which swap discipline to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ManagerKind {
    /// One buffer, drawn and scanned out at the same time.
    Single,
    /// A fresh buffer for every frame; finished buffers are retired.
    #[default]
    AlwaysAllocate,
    /// A fixed ring of `count` buffers.
    NBuffer {
        /// Ring size.
        count: usize,
    },
}

impl std::fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::AlwaysAllocate => write!(f, "always-allocate"),
            Self::NBuffer { count } => write!(f, "{count}-buffer"),
        }
    }
}

/// Role of a buffer within its manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferRole {
    /// Currently being drawn into.
    Render,
    /// Currently being presented.
    Scanout,
    /// Drawn into and presented at once (single buffering).
    Aliased,
    /// Presented earlier and never drawn into again.
    Retired,
    /// Allocated but idle.
    Free,
}

/// Allocation and promotion counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ManagerStats {
    /// Surfaces allocated over the manager's lifetime.
    pub allocated_surfaces: u64,
    /// Bytes allocated over the manager's lifetime.
    pub allocated_bytes: u64,
    /// Calls to `fetch_next_destination_buffer`.
    pub fetches: u64,
    /// Buffers promoted to scanout.
    pub promotions: u64,
}

impl ManagerStats {
    pub(crate) fn record_alloc(&mut self, desc: SurfaceDesc) {
        self.allocated_surfaces = self.allocated_surfaces.saturating_add(1);
        self.allocated_bytes = self.allocated_bytes.saturating_add(desc.byte_len() as u64);
    }
}

/// Common contract of the swap disciplines.
pub trait BufferManager {
    /// Discipline implemented by this manager.
    fn kind(&self) -> ManagerKind;

    /// Hand out the render target for the next frame, promoting the previous one to scanout.
    ///
    /// Called once per completed draw-sequence cycle.
    fn fetch_next_destination_buffer(&mut self) -> SurfaceRef;

    /// The buffer this manager last promoted to scanout.
    fn current_scanout(&self) -> Option<SurfaceRef>;

    /// The buffer currently being drawn into.
    fn render_buffer(&self) -> Option<SurfaceRef>;

    /// Every buffer the manager holds with its role, in creation order.
    fn buffer_roles(&self) -> Vec<(BufferId, BufferRole)>;

    /// Allocation and promotion counters.
    fn stats(&self) -> ManagerStats;
}

/// Construct a manager for `kind`, optionally wired to a scanout sink.
pub fn create_buffer_manager(
    kind: ManagerKind,
    desc: SurfaceDesc,
    sink: Option<ScanoutSink>,
) -> BufswapResult<Box<dyn BufferManager>> {
    match kind {
        ManagerKind::Single => Ok(Box::new(SingleBufferManager::new(desc, sink))),
        ManagerKind::AlwaysAllocate => Ok(Box::new(AlwaysAllocateBufferManager::new(desc, sink))),
        ManagerKind::NBuffer { count } => Ok(Box::new(NBufferManager::new(count, desc, sink)?)),
    }
}

pub(crate) fn validate_kind(kind: ManagerKind) -> BufswapResult<()> {
    match kind {
        ManagerKind::NBuffer { count: 0 } => Err(BufswapError::validation(
            "n-buffer manager needs at least one buffer",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffers/kind.rs"]
mod tests;
