use std::collections::VecDeque;
use std::time::Duration;

use crate::foundation::error::{BufswapError, BufswapResult};

/// External tick driver: yields monotonically non-decreasing timestamps.
///
/// `None` means the source has stopped.
pub trait TickSource {
    /// Timestamp of the next tick.
    fn next_timestamp(&mut self) -> Option<Duration>;
}

/// Evenly spaced ticks, e.g. a 60 Hz display refresh.
#[derive(Clone, Debug)]
pub struct FixedStepSource {
    step: Duration,
    now: Duration,
    remaining: Option<u64>,
}

impl FixedStepSource {
    /// Unbounded source ticking every `step`.
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            now: Duration::ZERO,
            remaining: None,
        }
    }

    /// Unbounded source at `hz` ticks per second.
    pub fn from_hz(hz: u32) -> BufswapResult<Self> {
        if hz == 0 {
            return Err(BufswapError::validation("tick rate must be > 0 Hz"));
        }
        Ok(Self::new(Duration::from_secs(1) / hz))
    }

    /// Stop after `ticks` more ticks.
    pub fn limited(mut self, ticks: u64) -> Self {
        self.remaining = Some(ticks);
        self
    }
}

impl TickSource for FixedStepSource {
    fn next_timestamp(&mut self) -> Option<Duration> {
        if let Some(left) = &mut self.remaining {
            if *left == 0 {
                return None;
            }
            *left -= 1;
        }
        let t = self.now;
        self.now = self.now.saturating_add(self.step);
        Some(t)
    }
}

/// Replays a fixed list of timestamps; handy for irregular cadences.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    stamps: VecDeque<Duration>,
}

impl ScriptedSource {
    /// Source yielding `stamps` in order.
    pub fn new(stamps: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            stamps: stamps.into_iter().collect(),
        }
    }
}

impl TickSource for ScriptedSource {
    fn next_timestamp(&mut self) -> Option<Duration> {
        self.stamps.pop_front()
    }
}

/// Turns tick timestamps into per-tick deltas.
///
/// The first tick has a zero delta. A timestamp that goes backwards also yields zero.
#[derive(Clone, Debug)]
pub struct FrameClock<S> {
    source: S,
    last: Option<Duration>,
}

impl<S: TickSource> FrameClock<S> {
    /// Wrap a tick source.
    pub fn new(source: S) -> Self {
        Self { source, last: None }
    }

    /// Delta since the previous tick, or `None` once the source stops.
    pub fn next_dt(&mut self) -> Option<Duration> {
        let now = self.source.next_timestamp()?;
        let dt = match self.last {
            None => Duration::ZERO,
            Some(prev) => now.saturating_sub(prev),
        };
        self.last = Some(self.last.map_or(now, |prev| prev.max(now)));
        Some(dt)
    }

    /// Drive `on_tick` for up to `max_ticks` ticks; returns how many ran.
    pub fn drive(&mut self, max_ticks: u64, mut on_tick: impl FnMut(Duration)) -> u64 {
        let mut ran = 0;
        while ran < max_ticks {
            let Some(dt) = self.next_dt() else {
                break;
            };
            on_tick(dt);
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/clock.rs"]
mod tests;
