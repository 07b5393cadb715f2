use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::foundation::core::BufferId;
use crate::surface::pixel::{PixelSurface, SurfaceRef};

#[derive(Debug, Default)]
struct ScanoutSlot {
    buffer: Option<Weak<RefCell<PixelSurface>>>,
    id: Option<BufferId>,
    promotions: u64,
}

/// The CRTC: holds a non-owning reference to the buffer currently being presented.
///
/// Clones share the same slot, so a buffer manager can write it while a presenter reads it.
/// Buffer lifetime stays with the manager that allocated it.
#[derive(Clone, Debug, Default)]
pub struct ScanoutSink {
    slot: Rc<RefCell<ScanoutSlot>>,
}

impl ScanoutSink {
    /// Create an unconnected sink with no scanout buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the sink at `buffer`.
    pub fn set_scanout_buffer(&self, buffer: &SurfaceRef) {
        let id = buffer.borrow().id();
        let mut slot = self.slot.borrow_mut();
        slot.buffer = Some(Rc::downgrade(buffer));
        slot.id = Some(id);
        slot.promotions = slot.promotions.saturating_add(1);
        tracing::debug!(buffer = %id, "scanout buffer set");
    }

    /// The buffer being presented, if one is set and still alive.
    pub fn scanout_buffer(&self) -> Option<SurfaceRef> {
        self.slot.borrow().buffer.as_ref()?.upgrade()
    }

    /// Identity of the buffer being presented.
    pub fn scanout_id(&self) -> Option<BufferId> {
        self.scanout_buffer().and(self.slot.borrow().id)
    }

    /// Number of times a buffer has been promoted to scanout.
    pub fn promotions(&self) -> u64 {
        self.slot.borrow().promotions
    }

    /// Copy of the presented pixels.
    pub fn snapshot(&self) -> Option<PixelSurface> {
        self.scanout_buffer().map(|b| b.borrow().clone())
    }
}

#[cfg(test)]
#[path = "../tests/unit/scanout.rs"]
mod tests;
