use std::rc::Rc;

use crate::buffers::{BufferManager, BufferRole, ManagerKind, ManagerStats};
use crate::foundation::core::{BufferId, SurfaceDesc};
use crate::scanout::ScanoutSink;
use crate::surface::pixel::{PixelSurface, SurfaceRef};

/// One buffer that is both render target and scanout buffer.
///
/// The sink is pointed at the buffer once, at construction. Reads and writes hit the same
/// storage, so the presenter can see half-drawn frames.
pub struct SingleBufferManager {
    buffer: SurfaceRef,
    fetched: bool,
    stats: ManagerStats,
}

impl SingleBufferManager {
    /// Allocate the buffer and, if a sink is given, put it on scanout.
    pub fn new(desc: SurfaceDesc, sink: Option<ScanoutSink>) -> Self {
        let buffer = PixelSurface::new_shared(desc);
        let mut stats = ManagerStats::default();
        stats.record_alloc(desc);
        if let Some(sink) = &sink {
            sink.set_scanout_buffer(&buffer);
            stats.promotions = 1;
        }
        Self {
            buffer,
            fetched: false,
            stats,
        }
    }

    /// The one buffer.
    pub fn buffer(&self) -> &SurfaceRef {
        &self.buffer
    }
}

impl BufferManager for SingleBufferManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Single
    }

    fn fetch_next_destination_buffer(&mut self) -> SurfaceRef {
        self.fetched = true;
        self.stats.fetches = self.stats.fetches.saturating_add(1);
        Rc::clone(&self.buffer)
    }

    fn current_scanout(&self) -> Option<SurfaceRef> {
        Some(Rc::clone(&self.buffer))
    }

    fn render_buffer(&self) -> Option<SurfaceRef> {
        self.fetched.then(|| Rc::clone(&self.buffer))
    }

    fn buffer_roles(&self) -> Vec<(BufferId, BufferRole)> {
        let role = if self.fetched {
            BufferRole::Aliased
        } else {
            BufferRole::Scanout
        };
        vec![(self.buffer.borrow().id(), role)]
    }

    fn stats(&self) -> ManagerStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffers/single.rs"]
mod tests;
