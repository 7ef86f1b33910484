use rayon::prelude::*;

use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{EraseWarpError, EraseWarpResult};
use crate::foundation::math::normalized_index;
use crate::grid::control::ControlGrid;
use crate::raster::buffer::PixelBuffer;

/// Spline evaluated over the current and baseline grids at one `(u, v)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplacementSample {
    /// Point on the deformed surface.
    pub warped: Point,
    /// Point on the undeformed surface.
    pub original: Point,
}

impl DisplacementSample {
    /// Sample the displacement field at normalized `(u, v)`.
    pub fn at(current: &ControlGrid, baseline: &ControlGrid, u: f64, v: f64) -> Self {
        Self {
            warped: current.evaluate(u, v),
            original: baseline.evaluate(u, v),
        }
    }

    /// Display-space displacement `warped - original`.
    pub fn delta(&self) -> Vec2 {
        self.warped - self.original
    }
}

/// Resample `source` through the grid displacement into a new buffer.
///
/// Backward mapping: each destination pixel `(x, y)` reads the source pixel
/// nearest to `(x, y) - delta / scale`, clamped to the source edges, so every
/// destination pixel is written. `scale` is display pixels per image pixel.
/// The source is never modified; on error nothing is allocated for the caller.
#[tracing::instrument(
    level = "debug",
    skip(source, current, baseline),
    fields(src_w = source.width(), src_h = source.height())
)]
pub fn commit_warp(
    source: &PixelBuffer,
    current: &ControlGrid,
    baseline: &ControlGrid,
    scale: f64,
    target_width: u32,
    target_height: u32,
) -> EraseWarpResult<PixelBuffer> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(EraseWarpError::invalid_geometry(format!(
            "warp scale must be finite and > 0, got {scale}"
        )));
    }
    let mut out = PixelBuffer::new(target_width, target_height)?;

    let max_x = f64::from(source.width() - 1);
    let max_y = f64::from(source.height() - 1);
    let row_len = target_width as usize;

    out.pixels_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            let v = normalized_index(y, target_height);
            for (x, px) in (0u32..).zip(row.iter_mut()) {
                let u = normalized_index(x, target_width);
                let delta = DisplacementSample::at(current, baseline, u, v).delta();
                let sx = (f64::from(x) - delta.x / scale).clamp(0.0, max_x);
                let sy = (f64::from(y) - delta.y / scale).clamp(0.0, max_y);
                // `as` saturates NaN to 0, keeping the read in bounds.
                let ix = (sx + 0.5).floor() as u32;
                let iy = (sy + 0.5).floor() as u32;
                if let Some(color) = source.get(ix, iy) {
                    *px = color;
                }
            }
        });

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/warp/kernel.rs"]
mod tests;
