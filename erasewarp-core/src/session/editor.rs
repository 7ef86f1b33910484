use crate::erase::kernel::apply_erase_path;
use crate::erase::stroke::StrokeInterpolator;
use crate::foundation::core::{DisplayTransform, Point, Size};
use crate::foundation::error::{EraseWarpError, EraseWarpResult};
use crate::grid::control::GridModel;
use crate::raster::buffer::PixelBuffer;
use crate::session::config::SessionConfig;
use crate::warp::kernel::commit_warp;
use crate::warp::preview::PreviewMesh;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Which tool pointer input drives.
pub enum ToolMode {
    /// Pointer drags erase along their path.
    #[default]
    Erase,
    /// Pointer drags move control-grid handles.
    Warp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What a pointer event changed, so the host knows what to redraw.
pub enum PointerOutcome {
    /// Nothing changed.
    Ignored,
    /// Erase stamps were applied to the image.
    Erased {
        /// Number of stamps applied, in path order.
        stamps: usize,
    },
    /// A handle was grabbed.
    Selected {
        /// Grid row of the handle.
        row: usize,
        /// Grid column of the handle.
        col: usize,
    },
    /// The grabbed control point moved.
    Moved {
        /// Grid row of the point.
        row: usize,
        /// Grid column of the point.
        col: usize,
    },
}

/// Host-facing driver that owns the current image and all edit state.
///
/// The host feeds pointer events in display space and receives either an
/// in-place erased image or, after [`EditSession::commit_warp`], a replaced one.
/// Kernels run on the session's own thread pool and block until complete.
pub struct EditSession {
    image: PixelBuffer,
    viewport: Size,
    transform: DisplayTransform,
    grid: GridModel,
    mode: ToolMode,
    stroke: StrokeInterpolator,
    pointer_down: bool,
    selected: Option<(usize, usize)>,
    config: SessionConfig,
    pool: rayon::ThreadPool,
}

impl EditSession {
    /// Start a session on `image` displayed inside `viewport`.
    pub fn new(image: PixelBuffer, viewport: Size, config: SessionConfig) -> EraseWarpResult<Self> {
        config.validate()?;
        let transform = DisplayTransform::fit(viewport, image.width(), image.height())?;
        let grid = GridModel::new(transform.image_rect(image.width(), image.height()));
        let pool = build_thread_pool(config.threads)?;
        Ok(Self {
            image,
            viewport,
            transform,
            grid,
            mode: ToolMode::default(),
            stroke: StrokeInterpolator::new(),
            pointer_down: false,
            selected: None,
            config,
            pool,
        })
    }

    /// The current image.
    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    /// Consume the session, returning the current image.
    pub fn into_image(self) -> PixelBuffer {
        self.image
    }

    /// Display/image mapping for the current viewport.
    pub fn transform(&self) -> DisplayTransform {
        self.transform
    }

    /// Current viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Control grid state.
    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    /// Active tool.
    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Grabbed handle, if any.
    pub fn selected(&self) -> Option<(usize, usize)> {
        self.selected
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Swap in a newly loaded image; the grid is re-laid over it.
    pub fn replace_image(&mut self, image: PixelBuffer) -> EraseWarpResult<()> {
        let transform = DisplayTransform::fit(self.viewport, image.width(), image.height())?;
        self.image = image;
        self.transform = transform;
        self.reset_grid();
        self.end_gesture();
        Ok(())
    }

    /// Refit to a new viewport. Discards any pending warp edit.
    pub fn resize_viewport(&mut self, viewport: Size) -> EraseWarpResult<()> {
        let transform = DisplayTransform::fit(viewport, self.image.width(), self.image.height())?;
        self.viewport = viewport;
        self.transform = transform;
        self.reset_grid();
        self.end_gesture();
        Ok(())
    }

    /// Switch tools. Entering warp mode starts from a fresh grid.
    pub fn set_mode(&mut self, mode: ToolMode) {
        self.mode = mode;
        self.end_gesture();
        if mode == ToolMode::Warp {
            self.reset_grid();
        }
        tracing::debug!(?mode, "tool mode");
    }

    /// Pointer went down at `display`.
    pub fn pointer_pressed(&mut self, display: Point) -> EraseWarpResult<PointerOutcome> {
        self.pointer_down = true;
        match self.mode {
            ToolMode::Erase => {
                self.stroke.reset();
                self.stroke_to(display)
            }
            ToolMode::Warp => {
                let warp = self.config.warp;
                self.selected = self
                    .grid
                    .pick_handle(display, warp.handle_offset, warp.pick_radius);
                Ok(match self.selected {
                    Some((row, col)) => PointerOutcome::Selected { row, col },
                    None => PointerOutcome::Ignored,
                })
            }
        }
    }

    /// Pointer moved to `display`.
    pub fn pointer_moved(&mut self, display: Point) -> EraseWarpResult<PointerOutcome> {
        match (self.mode, self.pointer_down, self.selected) {
            (ToolMode::Erase, true, _) => self.stroke_to(display),
            (ToolMode::Warp, true, Some((row, col))) => {
                self.grid.set_point(row, col, display)?;
                Ok(PointerOutcome::Moved { row, col })
            }
            _ => {
                self.stroke.reset();
                Ok(PointerOutcome::Ignored)
            }
        }
    }

    /// Pointer released: ends any stroke or drag.
    pub fn pointer_released(&mut self) {
        self.end_gesture();
    }

    /// Bake the pending warp into a new image.
    ///
    /// Returns `false` without touching the image when the grid is at baseline.
    /// The replacement is fully built before the old image is dropped.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn commit_warp(&mut self) -> EraseWarpResult<bool> {
        if self.grid.is_at_baseline() {
            return Ok(false);
        }
        let (w, h) = (self.image.width(), self.image.height());
        let warped = self.pool.install(|| {
            commit_warp(
                &self.image,
                self.grid.current(),
                self.grid.baseline(),
                self.transform.scale,
                w,
                h,
            )
        })?;
        self.image = warped;
        self.reset_grid();
        tracing::debug!(width = w, height = h, "warp committed");
        Ok(true)
    }

    /// Coarse preview of the pending warp, or `None` when there is nothing to warp.
    pub fn preview(&self) -> EraseWarpResult<Option<PreviewMesh>> {
        if self.grid.is_at_baseline() {
            return Ok(None);
        }
        let warp = &self.config.warp;
        let cells = if self.pointer_down && self.selected.is_some() {
            warp.drag_preview_cells
        } else {
            warp.preview_cells
        };
        PreviewMesh::build(
            self.grid.current(),
            self.image.width(),
            self.image.height(),
            cells,
        )
        .map(Some)
    }

    /// Eraser radius converted to image pixels.
    pub fn erase_radius_px(&self) -> f64 {
        self.transform.len_to_image(self.config.erase.radius)
    }

    fn stroke_to(&mut self, display: Point) -> EraseWarpResult<PointerOutcome> {
        let radius = self.erase_radius_px();
        let feather = self.transform.len_to_image(self.config.erase.feather);
        let centers = self
            .stroke
            .advance(display, &self.transform, radius, &self.image);
        if centers.is_empty() {
            return Ok(PointerOutcome::Ignored);
        }

        let image = &mut self.image;
        self.pool
            .install(|| apply_erase_path(image, &centers, radius, feather))?;
        tracing::debug!(stamps = centers.len(), radius, "erase stroke");
        Ok(PointerOutcome::Erased {
            stamps: centers.len(),
        })
    }

    fn reset_grid(&mut self) {
        let rect = self
            .transform
            .image_rect(self.image.width(), self.image.height());
        self.grid.reset(rect);
    }

    fn end_gesture(&mut self) {
        self.pointer_down = false;
        self.selected = None;
        self.stroke.reset();
    }
}

fn build_thread_pool(threads: Option<usize>) -> EraseWarpResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(EraseWarpError::validation(
            "kernel 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build kernel thread pool: {e}").into())
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
