use crate::foundation::core::{Point, Rect, Vec2};
use crate::foundation::error::{EraseWarpError, EraseWarpResult};
use crate::spline::bicubic::{LATTICE_DIM, LATTICE_LEN, Lattice, evaluate_spline, lattice_index};

/// A 3×3 lattice of anchor points in display space, stored row-major.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlGrid {
    points: Lattice,
}

impl ControlGrid {
    /// Wrap nine row-major points.
    pub fn from_points(points: Lattice) -> Self {
        Self { points }
    }

    /// Corners, edge midpoints and center of `rect`.
    pub fn uniform(rect: Rect) -> Self {
        let mut points = [Point::ZERO; LATTICE_LEN];
        for row in 0..LATTICE_DIM {
            for col in 0..LATTICE_DIM {
                let nx = col as f64 / (LATTICE_DIM - 1) as f64;
                let ny = row as f64 / (LATTICE_DIM - 1) as f64;
                points[lattice_index(row, col)] =
                    Point::new(rect.x0 + nx * rect.width(), rect.y0 + ny * rect.height());
            }
        }
        Self { points }
    }

    /// Row-major view of all nine points.
    pub fn points(&self) -> &Lattice {
        &self.points
    }

    /// Point at `(row, col)`, or `None` for an out-of-range cell.
    pub fn get(&self, row: usize, col: usize) -> Option<Point> {
        checked_index(row, col).map(|i| self.points[i])
    }

    /// Overwrite the point at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, p: Point) -> EraseWarpResult<()> {
        let i = checked_index(row, col).ok_or_else(|| {
            EraseWarpError::validation(format!("control point ({row},{col}) out of range"))
        })?;
        if !(p.x.is_finite() && p.y.is_finite()) {
            return Err(EraseWarpError::validation(format!(
                "control point ({row},{col}) must be finite"
            )));
        }
        self.points[i] = p;
        Ok(())
    }

    /// Spline-interpolated point at normalized `(u, v)`.
    pub fn evaluate(&self, u: f64, v: f64) -> Point {
        evaluate_spline(&self.points, u, v)
    }

    /// Draggable handle location: outer rows/columns are pushed outward by `offset`.
    pub fn handle_position(&self, row: usize, col: usize, offset: f64) -> Option<Point> {
        let p = self.get(row, col)?;
        let last = LATTICE_DIM - 1;
        let push = |i: usize| -> f64 {
            if i == 0 {
                -offset
            } else if i == last {
                offset
            } else {
                0.0
            }
        };
        Some(p + Vec2::new(push(col), push(row)))
    }
}

/// Whether every `current` point equals its `baseline` counterpart exactly.
pub fn is_grid_at_baseline(current: &ControlGrid, baseline: &ControlGrid) -> bool {
    current.points == baseline.points
}

/// The warp intent: an editable grid plus the baseline it started from.
///
/// `baseline` only changes through [`GridModel::reset`].
#[derive(Clone, Debug, PartialEq)]
pub struct GridModel {
    current: ControlGrid,
    baseline: ControlGrid,
}

impl GridModel {
    /// Both grids laid uniformly over `image_rect` (display space).
    pub fn new(image_rect: Rect) -> Self {
        let grid = ControlGrid::uniform(image_rect);
        Self {
            current: grid,
            baseline: grid,
        }
    }

    /// Re-lay both grids over `image_rect`, discarding any edit.
    pub fn reset(&mut self, image_rect: Rect) {
        *self = Self::new(image_rect);
        tracing::debug!(
            x0 = image_rect.x0,
            y0 = image_rect.y0,
            x1 = image_rect.x1,
            y1 = image_rect.y1,
            "control grid reset"
        );
    }

    /// Editable grid.
    pub fn current(&self) -> &ControlGrid {
        &self.current
    }

    /// Reference grid fixed at the last reset.
    pub fn baseline(&self) -> &ControlGrid {
        &self.baseline
    }

    /// Move one point of the current grid.
    pub fn set_point(&mut self, row: usize, col: usize, p: Point) -> EraseWarpResult<()> {
        self.current.set(row, col, p)
    }

    /// Undo every edit, restoring `current` to `baseline`.
    pub fn revert(&mut self) {
        self.current = self.baseline;
    }

    /// Whether the warp would be the identity.
    pub fn is_at_baseline(&self) -> bool {
        is_grid_at_baseline(&self.current, &self.baseline)
    }

    /// Nearest handle strictly within `radius` of `display`, as `(row, col)`.
    pub fn pick_handle(&self, display: Point, offset: f64, radius: f64) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), f64)> = None;
        for row in 0..LATTICE_DIM {
            for col in 0..LATTICE_DIM {
                let Some(h) = self.current.handle_position(row, col, offset) else {
                    continue;
                };
                let d = (h - display).hypot();
                if d < radius && best.is_none_or(|(_, bd)| d < bd) {
                    best = Some(((row, col), d));
                }
            }
        }
        best.map(|(cell, _)| cell)
    }
}

fn checked_index(row: usize, col: usize) -> Option<usize> {
    (row < LATTICE_DIM && col < LATTICE_DIM).then(|| lattice_index(row, col))
}

#[cfg(test)]
#[path = "../../tests/unit/grid/control.rs"]
mod tests;
