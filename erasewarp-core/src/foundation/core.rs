use crate::foundation::error::{EraseWarpError, EraseWarpResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Straight RGBA color with normalized `f32` channels.
///
/// Channels are conceptually in `[0, 1]`; kernels clamp on write.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black, the value left behind by a full erase.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Build a color from raw channels (not clamped).
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Copy with every channel clamped into `[0, 1]`. NaN becomes `0`.
    pub fn clamped(self) -> Self {
        fn c(v: f32) -> f32 {
            if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
        }
        Self::new(c(self.r), c(self.g), c(self.b), c(self.a))
    }

    /// Multiply all four channels (alpha included) by `k`.
    pub fn scaled(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k, self.a * k)
    }

    /// Convert from 8-bit straight RGBA.
    pub fn from_rgba8(px: [u8; 4]) -> Self {
        Self::new(
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
            f32::from(px[3]) / 255.0,
        )
    }

    /// Convert to 8-bit straight RGBA (clamped, rounded to nearest).
    pub fn to_rgba8(self) -> [u8; 4] {
        let c = self.clamped();
        let q = |v: f32| (v * 255.0 + 0.5) as u8;
        [q(c.r), q(c.g), q(c.b), q(c.a)]
    }

    /// Channels as an array in `r, g, b, a` order.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Mapping between display space and image pixel space.
///
/// `display = image * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DisplayTransform {
    /// Display pixels per image pixel (> 0).
    pub scale: f64,
    /// Top-left corner of the displayed image in display space.
    pub offset: Vec2,
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl DisplayTransform {
    /// Display space equals image space.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: Vec2::ZERO,
    };

    /// Build a transform, rejecting non-positive or non-finite scales.
    pub fn new(scale: f64, offset: Vec2) -> EraseWarpResult<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(EraseWarpError::invalid_geometry(format!(
                "display scale must be finite and > 0, got {scale}"
            )));
        }
        if !(offset.x.is_finite() && offset.y.is_finite()) {
            return Err(EraseWarpError::invalid_geometry(
                "display offset must be finite",
            ));
        }
        Ok(Self { scale, offset })
    }

    /// Letterbox an image of `width × height` pixels into `viewport`, centered.
    pub fn fit(viewport: Size, width: u32, height: u32) -> EraseWarpResult<Self> {
        if !(viewport.width.is_finite()
            && viewport.height.is_finite()
            && viewport.width > 0.0
            && viewport.height > 0.0)
        {
            return Err(EraseWarpError::invalid_geometry(format!(
                "viewport must be finite and non-empty, got {}x{}",
                viewport.width, viewport.height
            )));
        }
        if width == 0 || height == 0 {
            return Err(EraseWarpError::invalid_geometry(
                "image dimensions must be >= 1",
            ));
        }

        let (w, h) = (f64::from(width), f64::from(height));
        let scale = (viewport.width / w).min(viewport.height / h);
        let offset = Vec2::new(
            (viewport.width - w * scale) / 2.0,
            (viewport.height - h * scale) / 2.0,
        );
        Self::new(scale, offset)
    }

    /// Map a display-space point into image pixel space.
    pub fn to_image(self, display: Point) -> Point {
        ((display - self.offset).to_vec2() / self.scale).to_point()
    }

    /// Map an image-space point into display space.
    pub fn to_display(self, image: Point) -> Point {
        (image.to_vec2() * self.scale + self.offset).to_point()
    }

    /// Convert a display-space length into image pixels.
    pub fn len_to_image(self, display_len: f64) -> f64 {
        display_len / self.scale
    }

    /// Rectangle covered by a `width × height` image in display space.
    pub fn image_rect(self, width: u32, height: u32) -> Rect {
        Rect::from_origin_size(
            self.offset.to_point(),
            Size::new(f64::from(width) * self.scale, f64::from(height) * self.scale),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
