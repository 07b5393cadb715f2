use std::time::Duration;

use crate::buffers::BufferManager;
use crate::draw::blit::{ChunkObserver, ChunkedBlit, NoopObserver};
use crate::draw::operation::{Activation, ActivationPoll};
use crate::draw::sequence::DrawSequence;
use crate::schedule::rate::RateControl;
use crate::surface::pixel::SurfaceRef;

/// Observable scheduler state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// Nothing in flight.
    Idle,
    /// A draw operation's source is being resolved; ticks do no chunk work.
    Activating,
    /// A blit is live and advances on every tick.
    Drawing,
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Scheduler was idle.
    Idle,
    /// Source still resolving.
    Activating,
    /// Chunks were copied (possibly zero at rate 0); the blit still has work.
    Drawing {
        /// Chunks copied this tick.
        chunks: u32,
    },
    /// The current draw operation finished this tick.
    OpCompleted {
        /// Chunks copied this tick.
        chunks: u32,
    },
    /// The current draw operation's source was unavailable and it was skipped.
    OpSkipped,
}

/// The four logical commands the scheduler accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Flip auto-replay.
    ToggleAuto,
    /// Start one draw operation.
    DrawOnce,
    /// Raise the chunk rate by a step.
    IncRate(u32),
    /// Lower the chunk rate by a step, clamping at zero.
    DecRate(u32),
}

/// Counters kept across the scheduler's life.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct SchedulerStats {
    /// Ticks received.
    pub ticks: u64,
    /// Chunks copied.
    pub chunks_drawn: u64,
    /// Draw operations run to their last chunk.
    pub ops_completed: u64,
    /// Draw operations skipped because their source was unavailable.
    pub ops_skipped: u64,
    /// Full traversals of the draw sequence.
    pub frames_completed: u64,
    /// Destination buffers requested from the manager.
    pub buffers_fetched: u64,
}

/// Progress of the draw operation in flight.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DrawProgress {
    /// Index in the draw sequence.
    pub op_index: usize,
    /// Operation title.
    pub title: String,
    /// Chunks copied so far.
    pub chunks_done: u32,
    /// Chunks in the operation.
    pub chunks_total: u32,
}

enum Phase {
    Idle,
    Activating(Activation),
    Drawing(ChunkedBlit),
}

/// Drives a draw sequence into buffers handed out by a buffer manager, tick by tick.
///
/// `Idle --draw_once--> Activating --source resolved--> Drawing --last chunk--> Idle`.
/// Activation is deferred: `draw_once` only starts it, and the source is polled on the next
/// tick. A tick that resolves the source also starts drawing in that same tick.
pub struct DrawScheduler {
    manager: Box<dyn BufferManager>,
    sequence: DrawSequence,
    rate: RateControl,
    auto: bool,
    phase: Phase,
    dest: Option<SurfaceRef>,
    observer: Box<dyn ChunkObserver>,
    stats: SchedulerStats,
}

impl DrawScheduler {
    /// Create an idle scheduler.
    pub fn new(manager: Box<dyn BufferManager>, sequence: DrawSequence, rate: RateControl) -> Self {
        Self {
            manager,
            sequence,
            rate,
            auto: false,
            phase: Phase::Idle,
            dest: None,
            observer: Box::new(NoopObserver),
            stats: SchedulerStats::default(),
        }
    }

    /// Receive a notification for every chunk written.
    pub fn set_observer(&mut self, observer: impl ChunkObserver + 'static) {
        self.observer = Box::new(observer);
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        match self.phase {
            Phase::Idle => SchedulerState::Idle,
            Phase::Activating(_) => SchedulerState::Activating,
            Phase::Drawing(_) => SchedulerState::Drawing,
        }
    }

    /// Whether a finished draw immediately starts the next one.
    pub fn is_auto(&self) -> bool {
        self.auto
    }

    /// Current chunk rate.
    pub fn rate(&self) -> u32 {
        self.rate.rate()
    }

    /// Counters.
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// The buffer manager.
    pub fn manager(&self) -> &dyn BufferManager {
        self.manager.as_ref()
    }

    /// The draw sequence.
    pub fn sequence(&self) -> &DrawSequence {
        &self.sequence
    }

    /// Buffer the current frame is drawn into.
    pub fn destination(&self) -> Option<&SurfaceRef> {
        self.dest.as_ref()
    }

    /// Progress of the operation being drawn, if any.
    pub fn progress(&self) -> Option<DrawProgress> {
        let Phase::Drawing(blit) = &self.phase else {
            return None;
        };
        let op_index = self.sequence.current_index()?;
        let op = self.sequence.current()?;
        Some(DrawProgress {
            op_index,
            title: op.title().to_owned(),
            chunks_done: blit.current_chunk(),
            chunks_total: blit.total_chunks(),
        })
    }

    /// Start the next draw operation. Only effective when idle; returns whether it started.
    ///
    /// Advances the sequence; on a wrap (or before the very first frame) a new destination
    /// buffer is fetched from the manager, which is where the previous one gets promoted.
    #[tracing::instrument(level = "debug", skip(self), fields(manager = %self.manager.kind()))]
    pub fn draw_once(&mut self) -> bool {
        if !matches!(self.phase, Phase::Idle) {
            tracing::debug!(state = ?self.state(), "draw_once ignored while busy");
            return false;
        }
        if self.sequence.is_empty() {
            return false;
        }

        let wrapped = self.sequence.advance();
        if wrapped {
            self.stats.frames_completed = self.stats.frames_completed.saturating_add(1);
            tracing::debug!(frames = self.stats.frames_completed, "frame completed");
        }

        let dest = match (&self.dest, wrapped) {
            (Some(dest), false) => dest.clone(),
            _ => {
                let fresh = self.manager.fetch_next_destination_buffer();
                self.stats.buffers_fetched = self.stats.buffers_fetched.saturating_add(1);
                self.dest = Some(fresh.clone());
                fresh
            }
        };

        let Some(activation) = self.sequence.activate_current(dest) else {
            return false;
        };
        tracing::debug!(
            op = activation.title(),
            index = ?self.sequence.current_index(),
            "activating"
        );
        self.phase = Phase::Activating(activation);
        true
    }

    /// Handle one tick `dt` after the previous one.
    pub fn tick(&mut self, dt: Duration) -> TickOutcome {
        self.stats.ticks = self.stats.ticks.saturating_add(1);
        let budget = self.rate.budget(dt);

        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => TickOutcome::Idle,
            Phase::Activating(mut activation) => match activation.poll() {
                ActivationPoll::Pending => {
                    self.phase = Phase::Activating(activation);
                    TickOutcome::Activating
                }
                ActivationPoll::Ready(None) => {
                    tracing::warn!(op = activation.title(), "source unavailable, skipping");
                    self.stats.ops_skipped = self.stats.ops_skipped.saturating_add(1);
                    self.finish_op();
                    TickOutcome::OpSkipped
                }
                ActivationPoll::Ready(Some(blit)) => self.draw(blit, budget),
            },
            Phase::Drawing(blit) => self.draw(blit, budget),
        }
    }

    fn draw(&mut self, mut blit: ChunkedBlit, budget: u32) -> TickOutcome {
        let before = blit.current_chunk();
        let more = blit.advance_observed(budget, self.observer.as_mut());
        let chunks = blit.current_chunk() - before;
        self.stats.chunks_drawn = self.stats.chunks_drawn.saturating_add(u64::from(chunks));

        if more {
            self.phase = Phase::Drawing(blit);
            return TickOutcome::Drawing { chunks };
        }

        self.stats.ops_completed = self.stats.ops_completed.saturating_add(1);
        self.finish_op();
        TickOutcome::OpCompleted { chunks }
    }

    fn finish_op(&mut self) {
        self.phase = Phase::Idle;
        if self.auto {
            self.draw_once();
        }
    }

    /// Flip auto-replay; turning it on while idle starts a draw right away.
    pub fn toggle_auto(&mut self) {
        self.set_auto(!self.auto);
    }

    /// Set auto-replay; enabling it while idle starts a draw right away.
    pub fn set_auto(&mut self, auto: bool) {
        self.auto = auto;
        if auto {
            self.draw_once();
        }
    }

    /// Raise the chunk rate.
    pub fn inc_rate(&mut self, step: u32) {
        self.rate.increase(step);
    }

    /// Lower the chunk rate, clamping at zero.
    pub fn dec_rate(&mut self, step: u32) {
        self.rate.decrease(step);
    }

    /// Apply one logical command.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::ToggleAuto => self.toggle_auto(),
            Command::DrawOnce => {
                self.draw_once();
            }
            Command::IncRate(step) => self.inc_rate(step),
            Command::DecRate(step) => self.dec_rate(step),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
