use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;

use crate::foundation::core::{Rect, Rgba8, SurfaceDesc};
use crate::foundation::error::{BufswapError, BufswapResult};
use crate::surface::pixel::PixelSurface;
use crate::surface::source::Source;

/// Cyclic list of video frames, numbered `1..=len`.
#[derive(Clone, Debug)]
pub struct ImageSequence {
    name: String,
    frames: Vec<Rc<PixelSurface>>,
    current: u32,
}

impl ImageSequence {
    /// Wrap decoded frames; frame 1 is `frames[0]`.
    pub fn new(name: impl Into<String>, frames: Vec<PixelSurface>) -> BufswapResult<Self> {
        if frames.is_empty() {
            return Err(BufswapError::validation("image sequence needs at least one frame"));
        }
        if u32::try_from(frames.len()).is_err() {
            return Err(BufswapError::validation("image sequence has too many frames"));
        }
        Ok(Self {
            name: name.into(),
            frames: frames.into_iter().map(Rc::new).collect(),
            current: 1,
        })
    }

    /// Generated frames: a color wash with a bright bar sweeping left to right.
    ///
    /// Consecutive frames differ everywhere, so a half-drawn frame is easy to spot.
    pub fn synthetic(
        name: impl Into<String>,
        count: u32,
        desc: SurfaceDesc,
    ) -> BufswapResult<Self> {
        let frames = (1..=count)
            .map(|i| synthetic_frame(i, count, desc))
            .collect::<BufswapResult<Vec<_>>>()?;
        Self::new(name, frames)
    }

    /// Path of frame `i` of sequence `name` under `dir`.
    pub fn frame_path(dir: &Path, name: &str, i: u32) -> PathBuf {
        dir.join(format!("{name}_{i}.png"))
    }

    /// Decode `<dir>/<name>_<i>.png` for `i` in `1..=count`, resized to `desc`.
    pub fn from_dir(
        dir: &Path,
        name: &str,
        count: u32,
        desc: SurfaceDesc,
    ) -> BufswapResult<Self> {
        let mut frames = Vec::with_capacity(count as usize);
        for i in 1..=count {
            let path = Self::frame_path(dir, name, i);
            let img = image::open(&path)
                .with_context(|| format!("decode frame '{}'", path.display()))?;
            let img = img
                .resize_exact(desc.width, desc.height, image::imageops::FilterType::Triangle)
                .to_rgba8();
            frames.push(PixelSurface::from_rgba_image(img)?);
        }
        tracing::debug!(name, count, dir = %dir.display(), "loaded image sequence");
        Self::new(name, frames)
    }

    /// Sequence name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of frames.
    pub fn len(&self) -> u32 {
        self.frames.len() as u32
    }

    /// Always `false`; construction rejects empty sequences.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of the frame the next [`ImageSequence::next_frame`] returns.
    pub fn current_frame(&self) -> u32 {
        self.current
    }

    /// `current / len`, in `(0, 1]`.
    pub fn progress(&self) -> f64 {
        f64::from(self.current) / f64::from(self.len())
    }

    /// Return the current frame and step to the next one, wrapping after the last.
    pub fn next_frame(&mut self) -> Source {
        let frame = Rc::clone(&self.frames[(self.current - 1) as usize]);
        self.current = if self.current >= self.len() {
            1
        } else {
            self.current + 1
        };
        Source::Image(frame)
    }
}

fn synthetic_frame(i: u32, count: u32, desc: SurfaceDesc) -> BufswapResult<PixelSurface> {
    let mut s = PixelSurface::new(desc);
    let t = f64::from(i - 1) / f64::from(count.max(1));
    let wash = Rgba8::opaque(
        (40.0 + 180.0 * t) as u8,
        (200.0 - 150.0 * t) as u8,
        (90.0 + 120.0 * (1.0 - (2.0 * t - 1.0).abs())) as u8,
    );
    s.fill_rect(desc.bounds(), wash)?;

    let bar_w = (desc.width / 12).max(1);
    let bar_x = ((f64::from(desc.width - bar_w)) * t) as u32;
    s.fill_rect(Rect::new(bar_x, 0, bar_w, desc.height), Rgba8::WHITE)?;
    Ok(s)
}

#[cfg(test)]
#[path = "../../tests/unit/demo/image_sequence.rs"]
mod tests;
