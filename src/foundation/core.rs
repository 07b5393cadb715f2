use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::error::{BufswapError, BufswapResult};

/// Default buffer width in pixels.
pub const DEFAULT_BUFFER_WIDTH: u32 = 480;
/// Default buffer height in pixels.
pub const DEFAULT_BUFFER_HEIGHT: u32 = 360;
/// Default edge length of a square chunk, in pixels.
pub const DEFAULT_CHUNK_SIZE: u32 = 8;

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a [`PixelSurface`](crate::PixelSurface).
///
/// Ids are handed out in creation order, so comparing two ids tells which surface was
/// allocated first.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct BufferId(pub u64);

impl BufferId {
    pub(crate) fn next() -> Self {
        Self(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for BufferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "buf#{}", self.0)
    }
}

/// Integer-aligned rectangle in pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub w: u32,
    /// Height in pixels.
    pub h: u32,
}

impl Rect {
    /// Build a rectangle from its origin and size.
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle anchored at the origin.
    pub const fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    /// Exclusive right edge.
    pub fn right(self) -> u64 {
        u64::from(self.x) + u64::from(self.w)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u64 {
        u64::from(self.y) + u64::from(self.h)
    }

    /// Number of pixels covered.
    pub fn area(self) -> u64 {
        u64::from(self.w) * u64::from(self.h)
    }

    /// Return `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Return `true` when the rectangle lies fully inside a `width` x `height` surface.
    pub fn fits_within(self, width: u32, height: u32) -> bool {
        self.right() <= u64::from(width) && self.bottom() <= u64::from(height)
    }

    /// Translate by a non-negative offset.
    pub fn offset(self, dx: u32, dy: u32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }
}

/// Dimensions of the surfaces a buffer manager allocates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for SurfaceDesc {
    fn default() -> Self {
        Self {
            width: DEFAULT_BUFFER_WIDTH,
            height: DEFAULT_BUFFER_HEIGHT,
        }
    }
}

impl SurfaceDesc {
    /// Create a validated descriptor with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> BufswapResult<Self> {
        if width == 0 || height == 0 {
            return Err(BufswapError::validation(
                "surface width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Size of one RGBA8 surface in bytes.
    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }

    /// Full-surface rectangle.
    pub fn bounds(self) -> Rect {
        Rect::from_size(self.width, self.height)
    }
}

/// Straight RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, the color every fresh surface starts as.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Opaque color from RGB.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color as a byte quad.
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
