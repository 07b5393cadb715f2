use std::time::Duration;

/// How the configured rate turns into a per-tick chunk budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateMode {
    /// `rate` chunks every tick, whatever the time between ticks (playback speed follows the
    /// tick cadence).
    #[default]
    ChunksPerTick,
    /// `rate` chunks per second of elapsed tick time; fractional chunks carry over.
    ChunksPerSecond,
}

/// Chunk budget control. The rate never goes below zero; zero means live but paused.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateControl {
    rate: u32,
    mode: RateMode,
    carry: f64,
}

impl Default for RateControl {
    fn default() -> Self {
        Self::new(20, RateMode::default())
    }
}

impl RateControl {
    /// Create a rate control.
    pub fn new(rate: u32, mode: RateMode) -> Self {
        Self {
            rate,
            mode,
            carry: 0.0,
        }
    }

    /// Current rate.
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Budget interpretation.
    pub fn mode(&self) -> RateMode {
        self.mode
    }

    /// Raise the rate by `step`.
    pub fn increase(&mut self, step: u32) {
        self.rate = self.rate.saturating_add(step);
    }

    /// Lower the rate by `step`, clamping at zero.
    pub fn decrease(&mut self, step: u32) {
        self.rate = self.rate.saturating_sub(step);
    }

    /// Chunk budget for a tick `dt` after the previous one.
    pub fn budget(&mut self, dt: Duration) -> u32 {
        match self.mode {
            RateMode::ChunksPerTick => self.rate,
            RateMode::ChunksPerSecond => {
                let exact = self.carry + f64::from(self.rate) * dt.as_secs_f64();
                let whole = exact.floor();
                self.carry = exact - whole;
                whole.min(f64::from(u32::MAX)) as u32
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/rate.rs"]
mod tests;
