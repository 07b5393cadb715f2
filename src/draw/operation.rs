use crate::draw::blit::{ChunkGrid, ChunkedBlit};
use crate::foundation::core::{DEFAULT_CHUNK_SIZE, Rect};
use crate::foundation::error::BufswapResult;
use crate::surface::pixel::SurfaceRef;
use crate::surface::source::{PendingSource, Source, SourcePoll, SurfaceSupplier};

/// A named region plus a deferred source; activating it against a buffer yields a blit.
pub struct DrawOperation {
    title: String,
    rect: Rect,
    chunk_size: u32,
    supplier: Box<dyn SurfaceSupplier>,
}

impl std::fmt::Debug for DrawOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawOperation")
            .field("title", &self.title)
            .field("rect", &self.rect)
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}

impl DrawOperation {
    /// Create an operation using the default chunk size.
    ///
    /// Fails when the chunk size does not evenly divide `rect`.
    pub fn new(
        title: impl Into<String>,
        rect: Rect,
        supplier: impl SurfaceSupplier + 'static,
    ) -> BufswapResult<Self> {
        Self::with_chunk_size(title, rect, DEFAULT_CHUNK_SIZE, supplier)
    }

    /// Create an operation with an explicit chunk size.
    pub fn with_chunk_size(
        title: impl Into<String>,
        rect: Rect,
        chunk_size: u32,
        supplier: impl SurfaceSupplier + 'static,
    ) -> BufswapResult<Self> {
        ChunkGrid::new(rect.w, rect.h, chunk_size)?;
        Ok(Self {
            title: title.into(),
            rect,
            chunk_size,
            supplier: Box::new(supplier),
        })
    }

    /// Operation that always draws the same source.
    pub fn from_source(
        title: impl Into<String>,
        rect: Rect,
        chunk_size: u32,
        source: Source,
    ) -> BufswapResult<Self> {
        Self::with_chunk_size(title, rect, chunk_size, move || {
            PendingSource::ready(source.clone())
        })
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Destination rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Chunk edge length.
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Number of chunks one activation copies.
    pub fn total_chunks(&self) -> u32 {
        (self.rect.w / self.chunk_size) * (self.rect.h / self.chunk_size)
    }

    /// Ask the supplier for a source and bind the eventual blit to `dest`.
    pub fn activate(&mut self, dest: SurfaceRef) -> Activation {
        Activation {
            title: self.title.clone(),
            rect: self.rect,
            chunk_size: self.chunk_size,
            dest,
            pending: self.supplier.request_source(),
        }
    }
}

/// Outcome of polling an [`Activation`].
#[derive(Debug)]
pub enum ActivationPoll {
    /// Source still resolving.
    Pending,
    /// Resolution finished; `None` when the source was unavailable or unusable.
    Ready(Option<ChunkedBlit>),
}

/// A draw operation whose source is being resolved.
#[derive(Debug)]
pub struct Activation {
    title: String,
    rect: Rect,
    chunk_size: u32,
    dest: SurfaceRef,
    pending: PendingSource,
}

impl Activation {
    /// Title of the operation being activated.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Advance source resolution by one turn.
    pub fn poll(&mut self) -> ActivationPoll {
        match self.pending.poll() {
            SourcePoll::Pending => ActivationPoll::Pending,
            SourcePoll::Ready(None) => ActivationPoll::Ready(None),
            SourcePoll::Ready(Some(source)) => {
                match ChunkedBlit::new(source, self.dest.clone(), self.rect, self.chunk_size) {
                    Ok(blit) => ActivationPoll::Ready(Some(blit)),
                    Err(err) => {
                        tracing::warn!(op = %self.title, %err, "resolved source cannot be drawn");
                        ActivationPoll::Ready(None)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/operation.rs"]
mod tests;
