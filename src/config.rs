use std::path::Path;

use anyhow::Context as _;

use crate::buffers::{ManagerKind, validate_kind};
use crate::foundation::core::{
    DEFAULT_BUFFER_HEIGHT, DEFAULT_BUFFER_WIDTH, DEFAULT_CHUNK_SIZE, SurfaceDesc,
};
use crate::foundation::error::{BufswapError, BufswapResult};
use crate::schedule::rate::RateMode;

fn default_width() -> u32 {
    DEFAULT_BUFFER_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_BUFFER_HEIGHT
}

fn default_chunk_size() -> u32 {
    DEFAULT_CHUNK_SIZE
}

fn default_rate() -> u32 {
    20
}

fn default_player_step() -> u32 {
    33
}

fn default_monitor_step() -> u32 {
    27
}

fn default_tick_hz() -> u32 {
    60
}

fn default_frame_count() -> u32 {
    38
}

/// Simulation settings; every field falls back to its default when absent from JSON.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimConfig {
    /// Buffer width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Buffer height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Chunk edge length for every draw operation.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,
    /// Swap discipline of the player.
    #[serde(default)]
    pub manager: ManagerKind,
    /// Player chunk rate.
    #[serde(default = "default_rate")]
    pub player_rate: u32,
    /// Monitor chunk rate.
    #[serde(default = "default_rate")]
    pub monitor_rate: u32,
    /// Player rate adjustment step.
    #[serde(default = "default_player_step")]
    pub player_rate_step: u32,
    /// Monitor rate adjustment step.
    #[serde(default = "default_monitor_step")]
    pub monitor_rate_step: u32,
    /// How rates turn into per-tick budgets.
    #[serde(default)]
    pub rate_mode: RateMode,
    /// Tick frequency of the driving clock.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Frames in the synthetic image sequence.
    #[serde(default = "default_frame_count")]
    pub frame_count: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            chunk_size: default_chunk_size(),
            manager: ManagerKind::default(),
            player_rate: default_rate(),
            monitor_rate: default_rate(),
            player_rate_step: default_player_step(),
            monitor_rate_step: default_monitor_step(),
            rate_mode: RateMode::default(),
            tick_hz: default_tick_hz(),
            frame_count: default_frame_count(),
        }
    }
}

impl SimConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json_str(s: &str) -> BufswapResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| BufswapError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: &Path) -> BufswapResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Buffer geometry.
    pub fn surface_desc(&self) -> BufswapResult<SurfaceDesc> {
        SurfaceDesc::new(self.width, self.height)
    }

    /// Check that the settings describe a runnable simulation.
    pub fn validate(&self) -> BufswapResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BufswapError::config("buffer width/height must be > 0"));
        }
        if self.chunk_size == 0 {
            return Err(BufswapError::config("chunk_size must be > 0"));
        }
        if self.width % self.chunk_size != 0 || self.height % self.chunk_size != 0 {
            return Err(BufswapError::config(format!(
                "buffer {}x{} is not a multiple of chunk_size {}",
                self.width, self.height, self.chunk_size
            )));
        }
        if self.tick_hz == 0 {
            return Err(BufswapError::config("tick_hz must be > 0"));
        }
        if self.frame_count == 0 {
            return Err(BufswapError::config("frame_count must be > 0"));
        }
        validate_kind(self.manager)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
