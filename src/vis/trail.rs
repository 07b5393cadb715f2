use std::collections::HashMap;
use std::time::Duration;

use crate::draw::blit::ChunkObserver;
use crate::foundation::core::{BufferId, Rect};

/// Seconds a freshly written chunk takes to fade out completely.
pub const TRAIL_FADE_SECS: f64 = 0.2;
/// Entries fainter than this are dropped.
pub const TRAIL_MIN_ALPHA: f64 = 0.01;

/// One recently modified chunk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailEntry {
    /// Chunk rectangle in buffer coordinates.
    pub rect: Rect,
    /// Highlight strength in `[0, 1]`.
    pub alpha: f64,
}

/// Fading record of modified chunks, kept per buffer.
///
/// Kept beside the buffers rather than inside them, so surfaces stay plain pixel storage.
#[derive(Clone, Debug)]
pub struct ChunkTrailTable {
    enabled: bool,
    entries: HashMap<BufferId, Vec<TrailEntry>>,
}

impl Default for ChunkTrailTable {
    fn default() -> Self {
        Self {
            enabled: true,
            entries: HashMap::new(),
        }
    }
}

impl ChunkTrailTable {
    /// Empty, enabled table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether new chunks are recorded.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip recording; disabling also clears the table.
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.entries.clear();
        }
        tracing::debug!(enabled = self.enabled, "chunk trail toggled");
    }

    /// Fade every entry by `dt` and drop the ones that faded out.
    pub fn advance(&mut self, dt: Duration) {
        let fade = dt.as_secs_f64() / TRAIL_FADE_SECS;
        for list in self.entries.values_mut() {
            for e in list.iter_mut() {
                e.alpha -= fade;
            }
            list.retain(|e| e.alpha >= TRAIL_MIN_ALPHA);
        }
        self.entries.retain(|_, list| !list.is_empty());
    }

    /// Live entries for `buffer`, oldest first.
    pub fn entries(&self, buffer: BufferId) -> &[TrailEntry] {
        self.entries.get(&buffer).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total live entries across all buffers.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Return `true` when nothing is highlighted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ChunkObserver for ChunkTrailTable {
    fn chunk_modified(&mut self, buffer: BufferId, rect: Rect) {
        if !self.enabled {
            return;
        }
        tracing::trace!(%buffer, ?rect, "chunk modified");
        self.entries
            .entry(buffer)
            .or_default()
            .push(TrailEntry { rect, alpha: 1.0 });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/vis/trail.rs"]
mod tests;
