use std::rc::Rc;

use crate::buffers::{BufferManager, BufferRole, ManagerKind, ManagerStats};
use crate::foundation::core::{BufferId, SurfaceDesc};
use crate::scanout::ScanoutSink;
use crate::surface::pixel::{PixelSurface, SurfaceRef};

/// Allocates a brand-new buffer for every frame and never reuses one.
///
/// Finished buffers move to the scanout pile and stay there, so memory grows without bound.
pub struct AlwaysAllocateBufferManager {
    desc: SurfaceDesc,
    sink: Option<ScanoutSink>,
    // Promoted buffers, oldest first. The last one is the current scanout buffer.
    pile: Vec<SurfaceRef>,
    render: Option<SurfaceRef>,
    stats: ManagerStats,
}

impl AlwaysAllocateBufferManager {
    /// Create a manager with no buffers yet.
    pub fn new(desc: SurfaceDesc, sink: Option<ScanoutSink>) -> Self {
        Self {
            desc,
            sink,
            pile: Vec::new(),
            render: None,
            stats: ManagerStats::default(),
        }
    }

    /// Buffers already promoted, oldest first.
    pub fn scanout_pile(&self) -> &[SurfaceRef] {
        &self.pile
    }
}

impl BufferManager for AlwaysAllocateBufferManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::AlwaysAllocate
    }

    fn fetch_next_destination_buffer(&mut self) -> SurfaceRef {
        self.stats.fetches = self.stats.fetches.saturating_add(1);

        if let Some(done) = self.render.take() {
            if let Some(sink) = &self.sink {
                sink.set_scanout_buffer(&done);
            }
            tracing::debug!(
                buffer = %done.borrow().id(),
                pile = self.pile.len() + 1,
                "retired to scanout pile"
            );
            self.pile.push(done);
            self.stats.promotions = self.stats.promotions.saturating_add(1);
        }

        let fresh = PixelSurface::new_shared(self.desc);
        self.stats.record_alloc(self.desc);
        tracing::debug!(buffer = %fresh.borrow().id(), "allocated render buffer");
        self.render = Some(Rc::clone(&fresh));
        fresh
    }

    fn current_scanout(&self) -> Option<SurfaceRef> {
        self.pile.last().cloned()
    }

    fn render_buffer(&self) -> Option<SurfaceRef> {
        self.render.clone()
    }

    fn buffer_roles(&self) -> Vec<(BufferId, BufferRole)> {
        let last = self.pile.len().saturating_sub(1);
        let mut out: Vec<(BufferId, BufferRole)> = self
            .pile
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let role = if i == last {
                    BufferRole::Scanout
                } else {
                    BufferRole::Retired
                };
                (b.borrow().id(), role)
            })
            .collect();
        if let Some(r) = &self.render {
            out.push((r.borrow().id(), BufferRole::Render));
        }
        out
    }

    fn stats(&self) -> ManagerStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffers/always_allocate.rs"]
mod tests;
