use crate::foundation::core::{Point, Rgba};
use crate::foundation::error::{EraseWarpError, EraseWarpResult};

/// Dense, row-major RGBA image with normalized float channels (origin top-left).
///
/// This is the storage unit shared by the erase and warp kernels. The erase
/// kernel mutates it in place; the warp kernel always produces a fresh one.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// Allocate a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> EraseWarpResult<Self> {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    /// Allocate a buffer with every pixel set to `color` (clamped).
    pub fn filled(width: u32, height: u32, color: Rgba) -> EraseWarpResult<Self> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![color.clamped(); len],
        })
    }

    /// Build from a flat `[r, g, b, a, r, g, b, a, ...]` float slice.
    ///
    /// Channel order is the caller's concern; values are clamped to `[0, 1]`.
    pub fn from_rgba_f32(width: u32, height: u32, data: &[f32]) -> EraseWarpResult<Self> {
        let len = checked_len(width, height)?;
        if data.len() != len * 4 {
            return Err(EraseWarpError::validation(format!(
                "expected {} floats for a {width}x{height} buffer, got {}",
                len * 4,
                data.len()
            )));
        }
        let pixels = data
            .chunks_exact(4)
            .map(|px| Rgba::new(px[0], px[1], px[2], px[3]).clamped())
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from straight 8-bit RGBA bytes.
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> EraseWarpResult<Self> {
        let len = checked_len(width, height)?;
        if data.len() != len * 4 {
            return Err(EraseWarpError::validation(format!(
                "expected {} bytes for a {width}x{height} buffer, got {}",
                len * 4,
                data.len()
            )));
        }
        let pixels = data
            .chunks_exact(4)
            .map(|px| Rgba::from_rgba8([px[0], px[1], px[2], px[3]]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// Row-major index of `(x, y)`, or `None` outside the buffer.
    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Read a pixel; `None` outside the buffer.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index_of(x, y).map(|i| self.pixels[i])
    }

    /// Write a pixel (clamped). Writes outside the buffer are ignored.
    pub fn put(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.index_of(x, y) {
            self.pixels[i] = color.clamped();
        }
    }

    /// Whether an image-space point lies on the buffer, right/bottom edges inclusive.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= f64::from(self.width) && p.y <= f64::from(self.height)
    }

    /// Export as straight 8-bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|px| px.to_rgba8()).collect()
    }

    /// Export as a flat float slice in `r, g, b, a` order.
    pub fn to_rgba_f32(&self) -> Vec<f32> {
        self.pixels.iter().flat_map(|px| px.to_array()).collect()
    }
}

fn checked_len(width: u32, height: u32) -> EraseWarpResult<usize> {
    if width == 0 || height == 0 {
        return Err(EraseWarpError::invalid_geometry(format!(
            "pixel buffer dimensions must be >= 1, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| {
            EraseWarpError::invalid_geometry(format!(
                "pixel buffer {width}x{height} overflows addressable memory"
            ))
        })
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
