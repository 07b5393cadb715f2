use std::rc::Rc;

use crate::buffers::{BufferManager, BufferRole, ManagerKind, ManagerStats, validate_kind};
use crate::foundation::core::{BufferId, SurfaceDesc};
use crate::foundation::error::BufswapResult;
use crate::scanout::ScanoutSink;
use crate::surface::pixel::{PixelSurface, SurfaceRef};

/// Fixed ring of N buffers (double buffering for N=2, triple for N=3).
///
/// Each fetch rotates the render slot and promotes the previous render buffer to scanout, so a
/// finished frame is presented up to N-1 frames later. With N=1 render and scanout alias.
pub struct NBufferManager {
    buffers: Vec<SurfaceRef>,
    sink: Option<ScanoutSink>,
    render: Option<usize>,
    scanout: Option<usize>,
    stats: ManagerStats,
}

impl NBufferManager {
    /// Allocate `count` buffers up front.
    pub fn new(count: usize, desc: SurfaceDesc, sink: Option<ScanoutSink>) -> BufswapResult<Self> {
        validate_kind(ManagerKind::NBuffer { count })?;
        let mut stats = ManagerStats::default();
        let buffers = (0..count)
            .map(|_| {
                stats.record_alloc(desc);
                PixelSurface::new_shared(desc)
            })
            .collect();
        Ok(Self {
            buffers,
            sink,
            render: None,
            scanout: None,
            stats,
        })
    }

    /// Ring size.
    pub fn count(&self) -> usize {
        self.buffers.len()
    }

    /// All buffers in ring order.
    pub fn buffers(&self) -> &[SurfaceRef] {
        &self.buffers
    }
}

impl BufferManager for NBufferManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::NBuffer {
            count: self.buffers.len(),
        }
    }

    fn fetch_next_destination_buffer(&mut self) -> SurfaceRef {
        self.stats.fetches = self.stats.fetches.saturating_add(1);

        let next = match self.render {
            None => 0,
            Some(prev) => {
                let done = &self.buffers[prev];
                if let Some(sink) = &self.sink {
                    sink.set_scanout_buffer(done);
                }
                self.scanout = Some(prev);
                self.stats.promotions = self.stats.promotions.saturating_add(1);
                tracing::debug!(buffer = %done.borrow().id(), slot = prev, "promoted to scanout");
                (prev + 1) % self.buffers.len()
            }
        };

        self.render = Some(next);
        Rc::clone(&self.buffers[next])
    }

    fn current_scanout(&self) -> Option<SurfaceRef> {
        self.scanout.map(|i| Rc::clone(&self.buffers[i]))
    }

    fn render_buffer(&self) -> Option<SurfaceRef> {
        self.render.map(|i| Rc::clone(&self.buffers[i]))
    }

    fn buffer_roles(&self) -> Vec<(BufferId, BufferRole)> {
        self.buffers
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let role = match (Some(i) == self.render, Some(i) == self.scanout) {
                    (true, true) => BufferRole::Aliased,
                    (true, false) => BufferRole::Render,
                    (false, true) => BufferRole::Scanout,
                    (false, false) => BufferRole::Free,
                };
                (b.borrow().id(), role)
            })
            .collect()
    }

    fn stats(&self) -> ManagerStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffers/n_buffer.rs"]
mod tests;
