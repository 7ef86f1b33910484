//! Erasewarp is an interactive raster manipulation engine.
//!
//! It provides two pixel kernels and the plumbing a UI host needs to drive them:
//!
//! 1. **Erase**: a radial, optionally feathered stamp that attenuates pixels in place.
//!    [`StrokeInterpolator`] turns a pointer drag into a gap-free sequence of stamps.
//! 2. **Warp**: a backward-mapping resampler driven by a 3×3 control grid. The
//!    displacement field is the difference between the bicubic surfaces through the
//!    edited grid and its baseline ([`evaluate_spline`]).
//!
//! [`EditSession`] wraps both behind an explicit-command API: the host forwards
//! display-space pointer events and receives a mutated or replaced [`PixelBuffer`].
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No IO in kernels**: decoding and presentation belong to the host.
//! - **Deterministic**: kernels are data-parallel with disjoint writes, so results
//!   do not depend on the thread count.
//! - **Straight RGBA, normalized `f32`** channels throughout.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod erase;
mod foundation;
mod grid;
mod raster;
mod session;
mod spline;
mod warp;

pub use erase::kernel::{EraseStamp, apply_erase, apply_erase_path};
pub use erase::stroke::{StrokeInterpolator, StrokeStamps, interpolate_stroke};
pub use foundation::core::{DisplayTransform, Point, Rect, Rgba, Size, Vec2};
pub use foundation::error::{EraseWarpError, EraseWarpResult};
pub use grid::control::{ControlGrid, GridModel, is_grid_at_baseline};
pub use raster::buffer::PixelBuffer;
pub use session::config::{EraseSettings, SessionConfig, WarpSettings};
pub use session::editor::{EditSession, PointerOutcome, ToolMode};
pub use spline::bicubic::{LATTICE_DIM, LATTICE_LEN, Lattice, evaluate_spline, lattice_index};
pub use warp::kernel::{DisplacementSample, commit_warp};
pub use warp::preview::{PreviewMesh, PreviewQuad};
