use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::core::{BufferId, Rect, Rgba8, SurfaceDesc};
use crate::foundation::error::{BufswapError, BufswapResult};

/// Shared handle to a surface owned by a buffer manager.
///
/// The render slot writes through it; scanout sinks and monitors read through it.
pub type SurfaceRef = Rc<RefCell<PixelSurface>>;

/// Fixed-size RGBA8 pixel store, row-major, 4 bytes per pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelSurface {
    id: BufferId,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelSurface")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PixelSurface {
    /// Allocate a surface cleared to opaque black.
    pub fn new(desc: SurfaceDesc) -> Self {
        let mut data = vec![0u8; desc.byte_len()];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            id: BufferId::next(),
            width: desc.width,
            height: desc.height,
            data,
        }
    }

    /// Allocate a surface and wrap it in a shared handle.
    pub fn new_shared(desc: SurfaceDesc) -> SurfaceRef {
        Rc::new(RefCell::new(Self::new(desc)))
    }

    /// Adopt existing RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> BufswapResult<Self> {
        let desc = SurfaceDesc::new(width, height)?;
        if data.len() != desc.byte_len() {
            return Err(BufswapError::validation(format!(
                "rgba8 buffer has {} bytes, expected {} for {width}x{height}",
                data.len(),
                desc.byte_len()
            )));
        }
        Ok(Self {
            id: BufferId::next(),
            width,
            height,
            data,
        })
    }

    /// Convert a decoded `image` buffer into a surface.
    pub fn from_rgba_image(img: image::RgbaImage) -> BufswapResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_rgba8(w, h, img.into_raw())
    }

    /// Copy the pixels out as an `image` buffer.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        // Length always matches width*height*4.
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    /// Identity of this surface.
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as a descriptor.
    pub fn desc(&self) -> SurfaceDesc {
        SurfaceDesc {
            width: self.width,
            height: self.height,
        }
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read one pixel, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some(Rgba8 {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        })
    }

    /// Fill a rectangle with a solid color.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) -> BufswapResult<()> {
        self.check_bounds(rect, "fill")?;
        let px = color.to_bytes();
        for row in rect.y..rect.y + rect.h {
            let start = self.offset(rect.x, row);
            let end = start + rect.w as usize * 4;
            for dst in self.data[start..end].chunks_exact_mut(4) {
                dst.copy_from_slice(&px);
            }
        }
        Ok(())
    }

    /// Copy a rectangle of pixels out, row-major.
    pub fn read_rect(&self, rect: Rect) -> BufswapResult<Vec<u8>> {
        self.check_bounds(rect, "read")?;
        let row_bytes = rect.w as usize * 4;
        let mut out = Vec::with_capacity(row_bytes * rect.h as usize);
        for row in rect.y..rect.y + rect.h {
            let start = self.offset(rect.x, row);
            out.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        Ok(out)
    }

    /// Write row-major pixels produced by [`PixelSurface::read_rect`].
    pub fn write_rect(&mut self, rect: Rect, pixels: &[u8]) -> BufswapResult<()> {
        self.check_bounds(rect, "write")?;
        let row_bytes = rect.w as usize * 4;
        if pixels.len() != row_bytes * rect.h as usize {
            return Err(BufswapError::geometry(format!(
                "write of {}x{} needs {} bytes, got {}",
                rect.w,
                rect.h,
                row_bytes * rect.h as usize,
                pixels.len()
            )));
        }
        for (i, row) in (rect.y..rect.y + rect.h).enumerate() {
            let start = self.offset(rect.x, row);
            self.data[start..start + row_bytes]
                .copy_from_slice(&pixels[i * row_bytes..(i + 1) * row_bytes]);
        }
        Ok(())
    }

    /// Copy a `w` x `h` rectangle from `src` at `(src_x, src_y)` to `(dst_x, dst_y)` here.
    #[allow(clippy::too_many_arguments)]
    pub fn copy_rect(
        &mut self,
        src: &PixelSurface,
        src_x: u32,
        src_y: u32,
        w: u32,
        h: u32,
        dst_x: u32,
        dst_y: u32,
    ) -> BufswapResult<()> {
        let src_rect = Rect::new(src_x, src_y, w, h);
        let dst_rect = Rect::new(dst_x, dst_y, w, h);
        src.check_bounds(src_rect, "copy source")?;
        self.check_bounds(dst_rect, "copy destination")?;

        let row_bytes = w as usize * 4;
        for row in 0..h {
            let s = src.offset(src_x, src_y + row);
            let d = self.offset(dst_x, dst_y + row);
            self.data[d..d + row_bytes].copy_from_slice(&src.data[s..s + row_bytes]);
        }
        Ok(())
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn check_bounds(&self, rect: Rect, what: &str) -> BufswapResult<()> {
        if rect.fits_within(self.width, self.height) {
            return Ok(());
        }
        Err(BufswapError::geometry(format!(
            "{what} rect {}x{}+{}+{} exceeds {}x{} surface {}",
            rect.w, rect.h, rect.x, rect.y, self.width, self.height, self.id
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/pixel.rs"]
mod tests;
