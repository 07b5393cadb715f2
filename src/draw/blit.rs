use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::core::{BufferId, Rect};
use crate::foundation::error::{BufswapError, BufswapResult};
use crate::surface::pixel::SurfaceRef;
use crate::surface::source::Source;

/// Receives a notification for every chunk a blit writes.
pub trait ChunkObserver {
    /// `rect` is in destination-surface coordinates.
    fn chunk_modified(&mut self, buffer: BufferId, rect: Rect);
}

impl<T: ChunkObserver + ?Sized> ChunkObserver for Rc<RefCell<T>> {
    fn chunk_modified(&mut self, buffer: BufferId, rect: Rect) {
        self.borrow_mut().chunk_modified(buffer, rect);
    }
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ChunkObserver for NoopObserver {
    fn chunk_modified(&mut self, _buffer: BufferId, _rect: Rect) {}
}

/// Square-chunk tiling of a `w` x `h` region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkGrid {
    chunk_size: u32,
    cols: u32,
    rows: u32,
}

impl ChunkGrid {
    /// Tile a region, rejecting sizes the chunk size does not evenly divide.
    pub fn new(w: u32, h: u32, chunk_size: u32) -> BufswapResult<Self> {
        if chunk_size == 0 {
            return Err(BufswapError::geometry("chunk size must be > 0"));
        }
        if w == 0 || h == 0 {
            return Err(BufswapError::geometry(format!(
                "draw region {w}x{h} is empty"
            )));
        }
        if w % chunk_size != 0 || h % chunk_size != 0 {
            return Err(BufswapError::geometry(format!(
                "draw region {w}x{h} is not a multiple of chunk size {chunk_size}"
            )));
        }
        Ok(Self {
            chunk_size,
            cols: w / chunk_size,
            rows: h / chunk_size,
        })
    }

    /// Edge length of one chunk.
    pub fn chunk_size(self) -> u32 {
        self.chunk_size
    }

    /// Chunks per row.
    pub fn cols(self) -> u32 {
        self.cols
    }

    /// Chunk rows.
    pub fn rows(self) -> u32 {
        self.rows
    }

    /// Total number of chunks.
    pub fn total(self) -> u32 {
        self.cols * self.rows
    }

    /// Region-local rectangle of chunk `index`, scanline order.
    pub fn chunk_rect(self, index: u32) -> Rect {
        let s = self.chunk_size;
        let cx = index % self.cols;
        let cy = index / self.cols;
        Rect::new(cx * s, cy * s, s, s)
    }
}

enum BlitSource {
    Resolved(Source),
    Lazy(Box<dyn FnMut() -> Option<Source>>),
}

/// Rectangular copy from a source to a destination surface, performed a few chunks at a time.
///
/// The source region is read from `(0, 0)` of the source and written at the blit's origin in
/// the destination. Each [`ChunkedBlit::advance`] call copies at most `budget` chunks.
pub struct ChunkedBlit {
    source: BlitSource,
    dest: SurfaceRef,
    region: Rect,
    grid: ChunkGrid,
    current: u32,
}

impl std::fmt::Debug for ChunkedBlit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkedBlit")
            .field("dest", &self.dest_id())
            .field("region", &self.region)
            .field("current", &self.current)
            .field("total", &self.grid.total())
            .finish_non_exhaustive()
    }
}

impl ChunkedBlit {
    /// Build a blit of `region` (destination coordinates) from an already resolved source.
    pub fn new(
        source: Source,
        dest: SurfaceRef,
        region: Rect,
        chunk_size: u32,
    ) -> BufswapResult<Self> {
        let grid = Self::validate(&dest, region, chunk_size)?;
        check_source_covers(&source, region)?;
        Ok(Self {
            source: BlitSource::Resolved(source),
            dest,
            region,
            grid,
            current: 0,
        })
    }

    /// Build a blit whose source is looked up on each advance until one is available.
    ///
    /// While the supplier yields nothing (or a source too small for the region), advancing is a
    /// no-op and the chunk position is kept.
    pub fn with_lazy_source(
        supplier: impl FnMut() -> Option<Source> + 'static,
        dest: SurfaceRef,
        region: Rect,
        chunk_size: u32,
    ) -> BufswapResult<Self> {
        let grid = Self::validate(&dest, region, chunk_size)?;
        Ok(Self {
            source: BlitSource::Lazy(Box::new(supplier)),
            dest,
            region,
            grid,
            current: 0,
        })
    }

    fn validate(dest: &SurfaceRef, region: Rect, chunk_size: u32) -> BufswapResult<ChunkGrid> {
        let grid = ChunkGrid::new(region.w, region.h, chunk_size)?;
        let d = dest.borrow();
        if !region.fits_within(d.width(), d.height()) {
            return Err(BufswapError::geometry(format!(
                "draw region {}x{}+{}+{} exceeds {}x{} destination {}",
                region.w,
                region.h,
                region.x,
                region.y,
                d.width(),
                d.height(),
                d.id()
            )));
        }
        Ok(grid)
    }

    /// Copy up to `budget` more chunks. Returns `true` while work remains.
    pub fn advance(&mut self, budget: u32) -> bool {
        self.advance_observed(budget, &mut NoopObserver)
    }

    /// Like [`ChunkedBlit::advance`], reporting each written chunk to `observer`.
    pub fn advance_observed(&mut self, budget: u32, observer: &mut dyn ChunkObserver) -> bool {
        let total = self.grid.total();
        if self.current >= total {
            return false;
        }
        if budget == 0 {
            return true;
        }
        let Some(source) = self.resolve_source() else {
            tracing::trace!(dest = %self.dest_id(), "blit source not available yet");
            return true;
        };

        let end = self.current.saturating_add(budget).min(total);
        let aliased = source.aliases(&self.dest);
        let dest_id = self.dest_id();

        for index in self.current..end {
            let local = self.grid.chunk_rect(index);
            let target = local.offset(self.region.x, self.region.y);
            let copied = if aliased {
                copy_chunk_staged(&self.dest, local, target)
            } else {
                let src = source.read();
                self.dest
                    .borrow_mut()
                    .copy_rect(&src, local.x, local.y, local.w, local.h, target.x, target.y)
            };
            if let Err(err) = copied {
                // Geometry was validated up front, so this means the source shrank under us.
                tracing::warn!(dest = %dest_id, %err, "chunk copy failed");
                self.current = index;
                return true;
            }
            observer.chunk_modified(dest_id, target);
        }

        tracing::trace!(dest = %dest_id, from = self.current, to = end, total, "advanced blit");
        self.current = end;
        end < total
    }

    fn resolve_source(&mut self) -> Option<Source> {
        match &mut self.source {
            BlitSource::Resolved(src) => Some(src.clone()),
            BlitSource::Lazy(supplier) => {
                let src = supplier()?;
                if let Err(err) = check_source_covers(&src, self.region) {
                    tracing::warn!(%err, "lazy blit source rejected");
                    return None;
                }
                self.source = BlitSource::Resolved(src.clone());
                Some(src)
            }
        }
    }

    /// Index of the next chunk to copy.
    pub fn current_chunk(&self) -> u32 {
        self.current
    }

    /// Number of chunks in the region.
    pub fn total_chunks(&self) -> u32 {
        self.grid.total()
    }

    /// Return `true` once every chunk has been copied.
    pub fn is_complete(&self) -> bool {
        self.current >= self.grid.total()
    }

    /// Fraction of chunks copied, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        f64::from(self.current) / f64::from(self.grid.total())
    }

    /// Destination region.
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Chunk tiling of the region.
    pub fn grid(&self) -> ChunkGrid {
        self.grid
    }

    /// Identity of the destination surface.
    pub fn dest_id(&self) -> BufferId {
        self.dest.borrow().id()
    }

    /// Destination surface handle.
    pub fn dest(&self) -> &SurfaceRef {
        &self.dest
    }
}

fn check_source_covers(source: &Source, region: Rect) -> BufswapResult<()> {
    let (w, h) = source.size();
    if region.w > w || region.h > h {
        return Err(BufswapError::geometry(format!(
            "source {} is {w}x{h}, smaller than draw region {}x{}",
            source.id(),
            region.w,
            region.h
        )));
    }
    Ok(())
}

fn copy_chunk_staged(dest: &SurfaceRef, from: Rect, to: Rect) -> BufswapResult<()> {
    let staged = dest.borrow().read_rect(from)?;
    dest.borrow_mut().write_rect(to, &staged)
}

#[cfg(test)]
#[path = "../../tests/unit/draw/blit.rs"]
mod tests;
