//! Bicubic interpolation over the fixed 3×3 control lattice.
//!
//! The lattice is stored row-major as nine points; lattice point `(row, col)`
//! sits at normalized position `(u, v) = (col / 2, row / 2)`. Neighbours beyond
//! the lattice edge are replicated edge points (index clamping), which gives a
//! virtual 4×4 neighbourhood for every evaluation.

use crate::foundation::core::Point;
use crate::foundation::math::{cubic, saturate};

/// Points per lattice axis.
pub const LATTICE_DIM: usize = 3;
/// Total lattice points.
pub const LATTICE_LEN: usize = LATTICE_DIM * LATTICE_DIM;

/// Row-major 3×3 point lattice.
pub type Lattice = [Point; LATTICE_LEN];

/// Row-major index of lattice cell `(row, col)`.
#[inline]
pub const fn lattice_index(row: usize, col: usize) -> usize {
    row * LATTICE_DIM + col
}

/// Evaluate the interpolated point at normalized `(u, v)`.
///
/// `u` runs along columns, `v` along rows; both are clamped to `[0, 1]`.
/// The result passes through every lattice point at its nominal position.
pub fn evaluate_spline(lattice: &Lattice, u: f64, v: f64) -> Point {
    let (base_x, u_frac) = segment(u);
    let (base_y, v_frac) = segment(v);

    let mut col_x = [0.0; 4];
    let mut col_y = [0.0; 4];
    for (j, dj) in (-1isize..=2).enumerate() {
        let row = clamp_index(base_y + dj);
        let mut px = [0.0; 4];
        let mut py = [0.0; 4];
        for (i, di) in (-1isize..=2).enumerate() {
            let p = lattice[lattice_index(row, clamp_index(base_x + di))];
            px[i] = p.x;
            py[i] = p.y;
        }
        col_x[j] = cubic(px, u_frac);
        col_y[j] = cubic(py, u_frac);
    }

    Point::new(cubic(col_x, v_frac), cubic(col_y, v_frac))
}

/// Split a normalized coordinate into a base lattice index and local parameter.
///
/// `t = 1` folds into the last segment at parameter 1 so the base index never
/// leaves `0..LATTICE_DIM - 1`.
#[inline]
fn segment(t: f64) -> (isize, f64) {
    let pos = saturate(t) * (LATTICE_DIM - 1) as f64;
    let base = (pos.floor() as isize).min(LATTICE_DIM as isize - 2);
    (base, pos - base as f64)
}

#[inline]
fn clamp_index(i: isize) -> usize {
    i.clamp(0, LATTICE_DIM as isize - 1) as usize
}

#[cfg(test)]
#[path = "../../tests/unit/spline/bicubic.rs"]
mod tests;
