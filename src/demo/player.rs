use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::buffers::{ManagerKind, create_buffer_manager};
use crate::demo::image_sequence::ImageSequence;
use crate::demo::keys::{KeyAction, Keymap};
use crate::draw::operation::DrawOperation;
use crate::draw::sequence::DrawSequence;
use crate::foundation::core::{Rect, Rgba8, SurfaceDesc};
use crate::foundation::error::BufswapResult;
use crate::scanout::ScanoutSink;
use crate::schedule::rate::RateControl;
use crate::schedule::scheduler::DrawScheduler;
use crate::surface::pixel::PixelSurface;
use crate::surface::source::{PendingSource, Source};
use crate::vis::trail::ChunkTrailTable;

const PANEL: Rgba8 = Rgba8::opaque(24, 24, 28);
const TROUGH: Rgba8 = Rgba8::opaque(0x66, 0x66, 0x66);

/// Player controls drawn over each video frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayElement {
    /// Background panel.
    Panel,
    /// "Previous" icon.
    Prev,
    /// "Pause" icon.
    Pause,
    /// "Next" icon.
    Next,
    /// Seek bar filled to the sequence progress.
    SeekBar,
}

impl OverlayElement {
    /// Draw operation title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Panel => "Overlay Panel",
            Self::Prev => "Prev Button",
            Self::Pause => "Pause Button",
            Self::Next => "Next Button",
            Self::SeekBar => "Seek Bar",
        }
    }
}

fn snap(v: u32, chunk: u32) -> u32 {
    (v / chunk * chunk).max(chunk)
}

/// Overlay placement for a `desc` buffer, with every size a multiple of `chunk`.
///
/// Elements that do not fit the buffer are left out; a buffer too small for the panel gets no
/// overlay at all.
pub fn overlay_layout(desc: SurfaceDesc, chunk: u32) -> Vec<(OverlayElement, Rect)> {
    if chunk == 0 {
        return Vec::new();
    }
    let margin = 20;
    let panel_h = snap(40, chunk);
    let icon = snap(16, chunk);
    let (Some(panel_w), Some(panel_y)) = (
        desc.width.checked_sub(2 * margin),
        desc.height.checked_sub(panel_h + margin),
    ) else {
        return Vec::new();
    };
    let panel_w = panel_w / chunk * chunk;
    if panel_w == 0 || icon > panel_h {
        return Vec::new();
    }
    let pad = (panel_h - icon) / 2;

    let mut out = vec![(
        OverlayElement::Panel,
        Rect::new(margin, panel_y, panel_w, panel_h),
    )];
    let mut x = margin + pad;
    for el in [OverlayElement::Prev, OverlayElement::Pause, OverlayElement::Next] {
        out.push((el, Rect::new(x, panel_y + pad, icon, icon)));
        x += icon + pad;
    }

    let seek_h = snap(8, chunk);
    let seek_end = margin + panel_w - pad;
    if seek_end > x && seek_h <= panel_h {
        let seek_w = (seek_end - x) / chunk * chunk;
        if seek_w > 0 {
            let seek_y = panel_y + (panel_h - seek_h) / 2;
            out.push((OverlayElement::SeekBar, Rect::new(x, seek_y, seek_w, seek_h)));
        }
    }

    out.retain(|(_, r)| r.fits_within(desc.width, desc.height));
    out
}

fn icon_surface(el: OverlayElement, size: u32) -> BufswapResult<PixelSurface> {
    let mut s = PixelSurface::new(SurfaceDesc::new(size, size)?);
    s.fill_rect(Rect::from_size(size, size), PANEL)?;
    let half = size / 2;
    match el {
        OverlayElement::Pause => {
            let bar = (size * 3 / 8).max(1);
            s.fill_rect(Rect::new(0, 0, bar, size), Rgba8::WHITE)?;
            s.fill_rect(Rect::new(size - bar, 0, bar, size), Rgba8::WHITE)?;
        }
        OverlayElement::Prev | OverlayElement::Next => {
            // Arrow head: each row spans further the closer it is to the middle.
            for y in 0..size {
                let reach = if y < half { y + 1 } else { size - y };
                let w = (reach * 2).min(size);
                let x = match el {
                    OverlayElement::Prev => size - w,
                    _ => 0,
                };
                s.fill_rect(Rect::new(x, y, w, 1), Rgba8::WHITE)?;
            }
        }
        OverlayElement::Panel | OverlayElement::SeekBar => {}
    }
    Ok(s)
}

fn seek_bar_surface(w: u32, h: u32, progress: f64) -> BufswapResult<PixelSurface> {
    let mut s = PixelSurface::new(SurfaceDesc::new(w, h)?);
    s.fill_rect(Rect::from_size(w, h), TROUGH)?;
    let filled = ((f64::from(w) * progress.clamp(0.0, 1.0)) as u32).min(w);
    if filled > 0 {
        s.fill_rect(Rect::from_size(filled, h), Rgba8::WHITE)?;
    }
    Ok(s)
}

/// Video producer: draws each frame of an image sequence plus its controls, chunk by chunk,
/// into buffers from its buffer manager.
pub struct VideoPlayer {
    scheduler: DrawScheduler,
    frames: Rc<RefCell<ImageSequence>>,
    trail: Rc<RefCell<ChunkTrailTable>>,
    keymap: Keymap,
}

impl VideoPlayer {
    /// Build the player's draw sequence: the video frame first, then the overlay.
    pub fn new(
        kind: ManagerKind,
        desc: SurfaceDesc,
        chunk_size: u32,
        sink: Option<ScanoutSink>,
        frames: ImageSequence,
        rate: RateControl,
        keymap: Keymap,
    ) -> BufswapResult<Self> {
        let frames = Rc::new(RefCell::new(frames));
        let mut seq = DrawSequence::default();

        let video = Rc::clone(&frames);
        seq.push(DrawOperation::with_chunk_size(
            "Video Frame",
            desc.bounds(),
            chunk_size,
            move || PendingSource::ready(video.borrow_mut().next_frame()),
        )?);

        for (el, rect) in overlay_layout(desc, chunk_size) {
            let op = match el {
                OverlayElement::SeekBar => {
                    let progress = Rc::clone(&frames);
                    DrawOperation::with_chunk_size(el.title(), rect, chunk_size, move || {
                        let p = progress.borrow().progress();
                        match seek_bar_surface(rect.w, rect.h, p) {
                            Ok(bar) => PendingSource::ready(Source::image(bar)),
                            Err(err) => {
                                tracing::warn!(%err, "seek bar unavailable");
                                PendingSource::unavailable()
                            }
                        }
                    })?
                }
                OverlayElement::Panel => {
                    let mut panel = PixelSurface::new(SurfaceDesc::new(rect.w, rect.h)?);
                    panel.fill_rect(Rect::from_size(rect.w, rect.h), PANEL)?;
                    DrawOperation::from_source(el.title(), rect, chunk_size, Source::image(panel))?
                }
                _ => {
                    let icon = icon_surface(el, rect.w)?;
                    DrawOperation::from_source(el.title(), rect, chunk_size, Source::image(icon))?
                }
            };
            seq.push(op);
        }

        let manager = create_buffer_manager(kind, desc, sink)?;
        let mut scheduler = DrawScheduler::new(manager, seq, rate);
        let trail = Rc::new(RefCell::new(ChunkTrailTable::new()));
        scheduler.set_observer(Rc::clone(&trail));
        tracing::debug!(%kind, ops = scheduler.sequence().len(), "video player ready");

        Ok(Self {
            scheduler,
            frames,
            trail,
            keymap,
        })
    }

    /// Handle a key press; returns whether the key is bound.
    pub fn handle_key(&mut self, key: char) -> bool {
        match self.keymap.action(key) {
            Some(KeyAction::Command(cmd)) => self.scheduler.apply(cmd),
            Some(KeyAction::ToggleTrail) => self.trail.borrow_mut().toggle(),
            None => return false,
        }
        true
    }

    /// Advance drawing and fade the chunk trail.
    pub fn tick(&mut self, dt: Duration) {
        self.scheduler.tick(dt);
        self.trail.borrow_mut().advance(dt);
    }

    /// The scheduler driving this player.
    pub fn scheduler(&self) -> &DrawScheduler {
        &self.scheduler
    }

    /// Image sequence the player reads from.
    pub fn frames(&self) -> std::cell::Ref<'_, ImageSequence> {
        self.frames.borrow()
    }

    /// Recently modified chunks of the player's buffers.
    pub fn trail(&self) -> std::cell::Ref<'_, ChunkTrailTable> {
        self.trail.borrow()
    }

    /// Key bindings.
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }
}

#[cfg(test)]
#[path = "../../tests/unit/demo/player.rs"]
mod tests;
