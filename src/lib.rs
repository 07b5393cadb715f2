//! bufswap simulates a display pipeline one chunk at a time.
//!
//! A producer draws a [`DrawSequence`] into buffers handed out by a [`BufferManager`]; a
//! [`DrawScheduler`] spreads the copying over ticks at a configurable chunk rate, and finished
//! buffers are promoted to a [`ScanoutSink`]. Swap disciplines differ only in which buffer they
//! hand out next:
//!
//! - [`SingleBufferManager`]: one buffer, drawn and scanned out at once (tearing)
//! - [`AlwaysAllocateBufferManager`]: a fresh buffer every frame
//! - [`NBufferManager`]: a fixed ring of `N` buffers
//!
//! The [`demo`] module wires a video player and a monitor to one sink to make tearing visible.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod buffers;
pub(crate) mod config;
pub mod demo;
pub(crate) mod draw;
pub(crate) mod scanout;
pub(crate) mod schedule;
pub(crate) mod surface;
pub(crate) mod vis;

pub use crate::foundation::core::{
    BufferId, DEFAULT_BUFFER_HEIGHT, DEFAULT_BUFFER_WIDTH, DEFAULT_CHUNK_SIZE, Rect, Rgba8,
    SurfaceDesc,
};
pub use crate::foundation::error::{BufswapError, BufswapResult};

pub use crate::buffers::{
    AlwaysAllocateBufferManager, BufferManager, BufferRole, ManagerKind, ManagerStats,
    NBufferManager, SingleBufferManager, create_buffer_manager,
};
pub use crate::config::SimConfig;
pub use crate::draw::blit::{ChunkGrid, ChunkObserver, ChunkedBlit, NoopObserver};
pub use crate::draw::operation::{Activation, ActivationPoll, DrawOperation};
pub use crate::draw::sequence::DrawSequence;
pub use crate::scanout::ScanoutSink;
pub use crate::schedule::clock::{FixedStepSource, FrameClock, ScriptedSource, TickSource};
pub use crate::schedule::rate::{RateControl, RateMode};
pub use crate::schedule::scheduler::{
    Command, DrawProgress, DrawScheduler, SchedulerState, SchedulerStats, TickOutcome,
};
pub use crate::surface::pixel::{PixelSurface, SurfaceRef};
pub use crate::surface::source::{
    PendingSource, Source, SourcePoll, SourceResolver, SurfaceSupplier,
};
pub use crate::vis::trail::{ChunkTrailTable, TRAIL_FADE_SECS, TRAIL_MIN_ALPHA, TrailEntry};
