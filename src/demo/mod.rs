//! The tearing demo: a video player producing frames into a swap chain and a monitor scanning
//! the sink out, both ticked by one clock.

use std::time::Duration;

use crate::buffers::ManagerStats;
use crate::config::SimConfig;
use crate::foundation::error::BufswapResult;
use crate::scanout::ScanoutSink;
use crate::schedule::clock::{FrameClock, TickSource};
use crate::schedule::rate::RateControl;
use crate::schedule::scheduler::SchedulerStats;

pub(crate) mod image_sequence;
pub(crate) mod keys;
pub(crate) mod monitor;
pub(crate) mod player;

pub use image_sequence::ImageSequence;
pub use keys::{KeyAction, KeyScript, Keymap};
pub use monitor::Monitor;
pub use player::{OverlayElement, VideoPlayer, overlay_layout};

/// Counters of a demo run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DemoStats {
    /// Ticks delivered to both components.
    pub ticks: u64,
    /// Video player scheduler counters.
    pub player: SchedulerStats,
    /// Video player buffer manager counters.
    pub player_buffers: ManagerStats,
    /// Monitor scheduler counters.
    pub monitor: SchedulerStats,
    /// Times the sink switched scanout buffers.
    pub scanout_promotions: u64,
}

/// Player and monitor sharing one scanout sink.
pub struct Demo {
    sink: ScanoutSink,
    player: VideoPlayer,
    monitor: Monitor,
    ticks: u64,
}

impl Demo {
    /// Build a demo from `cfg` playing `frames`.
    pub fn new(cfg: &SimConfig, frames: ImageSequence) -> BufswapResult<Self> {
        cfg.validate()?;
        let desc = cfg.surface_desc()?;
        let sink = ScanoutSink::new();

        let player = VideoPlayer::new(
            cfg.manager,
            desc,
            cfg.chunk_size,
            Some(sink.clone()),
            frames,
            RateControl::new(cfg.player_rate, cfg.rate_mode),
            Keymap::player(cfg.player_rate_step),
        )?;
        let monitor = Monitor::new(
            desc,
            cfg.chunk_size,
            sink.clone(),
            RateControl::new(cfg.monitor_rate, cfg.rate_mode),
            Keymap::monitor(cfg.monitor_rate_step),
        )?;
        tracing::info!(
            manager = %cfg.manager,
            width = desc.width,
            height = desc.height,
            chunk = cfg.chunk_size,
            "demo ready"
        );

        Ok(Self {
            sink,
            player,
            monitor,
            ticks: 0,
        })
    }

    /// Build a demo from `cfg` with generated frames.
    pub fn synthetic(cfg: &SimConfig) -> BufswapResult<Self> {
        let frames = ImageSequence::synthetic("rr", cfg.frame_count, cfg.surface_desc()?)?;
        Self::new(cfg, frames)
    }

    /// Route a key press to every component; returns whether anything handled it.
    pub fn handle_key(&mut self, key: char) -> bool {
        let player = self.player.handle_key(key);
        let monitor = self.monitor.handle_key(key);
        player || monitor
    }

    /// Tick the player, then the monitor.
    pub fn tick(&mut self, dt: Duration) {
        self.ticks = self.ticks.saturating_add(1);
        self.player.tick(dt);
        self.monitor.tick(dt);
    }

    /// Drive the demo from `clock` for up to `max_ticks`, pressing `script` keys as scheduled.
    ///
    /// Returns the number of ticks run.
    pub fn run<S: TickSource>(
        &mut self,
        clock: &mut FrameClock<S>,
        max_ticks: u64,
        script: &KeyScript,
    ) -> u64 {
        let mut tick = 0u64;
        clock.drive(max_ticks, |dt| {
            for &key in script.keys_at(tick) {
                if !self.handle_key(key) {
                    tracing::warn!(%key, tick, "unbound key");
                }
            }
            self.tick(dt);
            tick += 1;
        })
    }

    /// The scanout sink shared by player and monitor.
    pub fn sink(&self) -> &ScanoutSink {
        &self.sink
    }

    /// The video player.
    pub fn player(&self) -> &VideoPlayer {
        &self.player
    }

    /// The monitor.
    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    /// Counters so far.
    pub fn stats(&self) -> DemoStats {
        DemoStats {
            ticks: self.ticks,
            player: self.player.scheduler().stats(),
            player_buffers: self.player.scheduler().manager().stats(),
            monitor: self.monitor.scheduler().stats(),
            scanout_promotions: self.sink.promotions(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/demo/demo.rs"]
mod tests;
