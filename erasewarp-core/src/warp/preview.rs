//! Coarse preview of a pending warp.
//!
//! Instead of resampling every pixel, the unit square is cut into
//! `cells × cells` quads. Each quad maps a source rectangle (image pixels)
//! onto the bounding box of its deformed corners (display space), which a
//! compositor can draw as a stretched sub-image.

use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{EraseWarpError, EraseWarpResult};
use crate::grid::control::ControlGrid;

/// One source-to-destination rectangle pair of the preview mesh.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PreviewQuad {
    /// Region of the source image, in image pixels.
    pub source: Rect,
    /// Axis-aligned bounds of the deformed quad, in display space.
    pub dest: Rect,
}

/// Preview mesh built from the current grid.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PreviewMesh {
    /// Subdivisions per axis.
    pub cells: usize,
    /// Quads in row-major order.
    pub quads: Vec<PreviewQuad>,
}

impl PreviewMesh {
    /// Subdivide a `source_width × source_height` image into `cells × cells` quads.
    pub fn build(
        current: &ControlGrid,
        source_width: u32,
        source_height: u32,
        cells: usize,
    ) -> EraseWarpResult<Self> {
        if cells == 0 {
            return Err(EraseWarpError::validation("preview cells must be >= 1"));
        }
        if source_width == 0 || source_height == 0 {
            return Err(EraseWarpError::invalid_geometry(
                "preview source dimensions must be >= 1",
            ));
        }

        let step = 1.0 / cells as f64;
        let stride = cells + 1;
        // Shared corners are evaluated once.
        let mut corners = Vec::<Point>::with_capacity(stride * stride);
        for j in 0..stride {
            for i in 0..stride {
                corners.push(current.evaluate(i as f64 * step, j as f64 * step));
            }
        }

        let (w, h) = (f64::from(source_width), f64::from(source_height));
        let mut quads = Vec::with_capacity(cells * cells);
        for j in 0..cells {
            for i in 0..cells {
                let (u0, v0) = (i as f64 * step, j as f64 * step);
                let (u1, v1) = ((i + 1) as f64 * step, (j + 1) as f64 * step);
                let source = Rect::new(u0 * w, v0 * h, u1 * w, v1 * h);

                let p00 = corners[j * stride + i];
                let p10 = corners[j * stride + i + 1];
                let p01 = corners[(j + 1) * stride + i];
                let p11 = corners[(j + 1) * stride + i + 1];
                let dest = Rect::from_points(p00, p11)
                    .union_pt(p10)
                    .union_pt(p01);

                quads.push(PreviewQuad { source, dest });
            }
        }

        Ok(Self { cells, quads })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/warp/preview.rs"]
mod tests;
