use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::buffers::SingleBufferManager;
use crate::demo::keys::{KeyAction, Keymap};
use crate::draw::operation::DrawOperation;
use crate::draw::sequence::DrawSequence;
use crate::foundation::core::SurfaceDesc;
use crate::foundation::error::BufswapResult;
use crate::scanout::ScanoutSink;
use crate::schedule::rate::RateControl;
use crate::schedule::scheduler::DrawScheduler;
use crate::surface::pixel::SurfaceRef;
use crate::surface::source::{PendingSource, Source};
use crate::vis::trail::ChunkTrailTable;

/// Title of the monitor's only draw operation.
pub const SCAN_OUT_TITLE: &str = "Scan Out Buffer";

/// Presentation loop: copies whatever the sink currently scans out onto its own screen buffer,
/// chunk by chunk, so tearing shows up as mixed frames.
pub struct Monitor {
    scheduler: DrawScheduler,
    screen: SurfaceRef,
    trail: Rc<RefCell<ChunkTrailTable>>,
    keymap: Keymap,
}

impl Monitor {
    /// Monitor reading from `sink` into a private `desc` screen buffer.
    pub fn new(
        desc: SurfaceDesc,
        chunk_size: u32,
        sink: ScanoutSink,
        rate: RateControl,
        keymap: Keymap,
    ) -> BufswapResult<Self> {
        let op = DrawOperation::with_chunk_size(SCAN_OUT_TITLE, desc.bounds(), chunk_size, move || {
            match sink.scanout_buffer() {
                Some(buf) => PendingSource::ready(Source::Surface(buf)),
                None => PendingSource::unavailable(),
            }
        })?;

        let manager = SingleBufferManager::new(desc, None);
        let screen = Rc::clone(manager.buffer());
        let mut scheduler =
            DrawScheduler::new(Box::new(manager), DrawSequence::new(vec![op]), rate);
        let trail = Rc::new(RefCell::new(ChunkTrailTable::new()));
        scheduler.set_observer(Rc::clone(&trail));

        Ok(Self {
            scheduler,
            screen,
            trail,
            keymap,
        })
    }

    /// Handle a key press; returns whether the key is bound.
    pub fn handle_key(&mut self, key: char) -> bool {
        match self.keymap.action(key) {
            Some(KeyAction::Command(cmd)) => self.scheduler.apply(cmd),
            Some(KeyAction::ToggleTrail) => self.trail.borrow_mut().toggle(),
            None => return false,
        }
        true
    }

    /// Advance presentation and fade the chunk trail.
    pub fn tick(&mut self, dt: Duration) {
        self.scheduler.tick(dt);
        self.trail.borrow_mut().advance(dt);
    }

    /// What the monitor currently shows.
    pub fn screen(&self) -> &SurfaceRef {
        &self.screen
    }

    /// The scheduler driving this monitor.
    pub fn scheduler(&self) -> &DrawScheduler {
        &self.scheduler
    }

    /// Recently modified chunks of the screen.
    pub fn trail(&self) -> std::cell::Ref<'_, ChunkTrailTable> {
        self.trail.borrow()
    }

    /// Key bindings.
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }
}

#[cfg(test)]
#[path = "../../tests/unit/demo/monitor.rs"]
mod tests;
