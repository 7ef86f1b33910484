use rayon::prelude::*;

use crate::foundation::core::{Point, Rgba};
use crate::foundation::error::{EraseWarpError, EraseWarpResult};
use crate::foundation::math::saturate;
use crate::raster::buffer::PixelBuffer;

/// Parameters of a single erase application, in image pixel space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EraseStamp {
    /// Disk center.
    pub center: Point,
    /// Outer radius (> 0).
    pub radius: f64,
    /// Width of the soft band inside the outer radius. `0` is a hard edge.
    pub feather: f64,
}

impl EraseStamp {
    /// Build and validate a stamp.
    pub fn new(center: Point, radius: f64, feather: f64) -> EraseWarpResult<Self> {
        let stamp = Self {
            center,
            radius,
            feather,
        };
        stamp.validate()?;
        Ok(stamp)
    }

    /// Reject stamps the kernel cannot apply meaningfully.
    ///
    /// Feather is never rejected: negative or non-finite feather is a hard edge.
    pub fn validate(&self) -> EraseWarpResult<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(EraseWarpError::invalid_geometry(format!(
                "erase radius must be finite and > 0, got {}",
                self.radius
            )));
        }
        if !(self.center.x.is_finite() && self.center.y.is_finite()) {
            return Err(EraseWarpError::invalid_geometry(
                "erase center must be finite",
            ));
        }
        Ok(())
    }

    /// Feather actually used by the kernel.
    pub fn effective_feather(&self) -> f64 {
        if self.feather.is_finite() && self.feather > 0.0 {
            self.feather
        } else {
            0.0
        }
    }

    /// Fraction of a pixel's color removed at `distance` from the center.
    ///
    /// `None` outside the disk, `Some(1.0)` for a full erase.
    pub fn erase_factor(&self, distance: f64) -> Option<f64> {
        if !(distance < self.radius) {
            return None;
        }
        let feather = self.effective_feather();
        if feather == 0.0 {
            return Some(1.0);
        }
        let inner = self.radius - feather;
        if distance < inner {
            return Some(1.0);
        }
        let t = saturate((distance - inner) / feather);
        Some(1.0 - t)
    }
}

/// Apply one stamp to `buffer` in place.
///
/// Only the clipped bounding box of the disk is visited; rows are processed
/// in parallel. Stamps that miss the buffer entirely are no-ops.
pub fn apply_erase(buffer: &mut PixelBuffer, stamp: &EraseStamp) -> EraseWarpResult<()> {
    stamp.validate()?;

    let Some(bounds) = stamp_bounds(stamp, buffer.width(), buffer.height()) else {
        return Ok(());
    };

    let width = buffer.width() as usize;
    let rows = &mut buffer.pixels_mut()[bounds.y0 * width..(bounds.y1 + 1) * width];
    rows.par_chunks_mut(width)
        .enumerate()
        .for_each(|(dy, row)| {
            let y = (bounds.y0 + dy) as f64;
            for x in bounds.x0..=bounds.x1 {
                let distance = (Point::new(x as f64, y) - stamp.center).hypot();
                if let Some(factor) = stamp.erase_factor(distance) {
                    row[x] = attenuate(row[x], factor);
                }
            }
        });
    Ok(())
}

/// Apply stamps strictly in order.
///
/// Order matters: overlapping stamps compound their attenuation.
pub fn apply_erase_path(
    buffer: &mut PixelBuffer,
    centers: &[Point],
    radius: f64,
    feather: f64,
) -> EraseWarpResult<()> {
    let stamps = centers
        .iter()
        .map(|&c| EraseStamp::new(c, radius, feather))
        .collect::<EraseWarpResult<Vec<_>>>()?;
    for stamp in &stamps {
        apply_erase(buffer, stamp)?;
    }
    Ok(())
}

fn attenuate(color: Rgba, factor: f64) -> Rgba {
    if factor >= 1.0 {
        Rgba::TRANSPARENT
    } else {
        color.scaled((1.0 - factor) as f32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PixelBounds {
    x0: usize,
    y0: usize,
    x1: usize, // inclusive
    y1: usize, // inclusive
}

fn stamp_bounds(stamp: &EraseStamp, width: u32, height: u32) -> Option<PixelBounds> {
    let max_x = f64::from(width - 1);
    let max_y = f64::from(height - 1);

    let x0 = (stamp.center.x - stamp.radius).floor();
    let y0 = (stamp.center.y - stamp.radius).floor();
    let x1 = (stamp.center.x + stamp.radius).ceil();
    let y1 = (stamp.center.y + stamp.radius).ceil();
    if x1 < 0.0 || y1 < 0.0 || x0 > max_x || y0 > max_y {
        return None;
    }

    Some(PixelBounds {
        x0: x0.max(0.0) as usize,
        y0: y0.max(0.0) as usize,
        x1: x1.min(max_x) as usize,
        y1: y1.min(max_y) as usize,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/erase/kernel.rs"]
mod tests;
