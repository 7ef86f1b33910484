use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{EraseWarpError, EraseWarpResult};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Tunables for an [`crate::EditSession`].
///
/// Every field has a default, so `{}` is a valid configuration.
pub struct SessionConfig {
    /// Eraser brush settings.
    pub erase: EraseSettings,
    /// Warp handle and preview settings.
    pub warp: WarpSettings,
    /// Worker threads for kernel dispatch. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Eraser brush, measured in display pixels.
pub struct EraseSettings {
    /// Brush radius.
    pub radius: f64,
    /// Soft edge width; `0` is a hard edge.
    pub feather: f64,
}

impl Default for EraseSettings {
    fn default() -> Self {
        Self {
            radius: 17.0,
            feather: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Warp handle hit-testing and preview density.
pub struct WarpSettings {
    /// Outward push of rim handles, in display pixels.
    pub handle_offset: f64,
    /// Handle hit-test radius, in display pixels.
    pub pick_radius: f64,
    /// Preview mesh subdivisions per axis when idle.
    pub preview_cells: usize,
    /// Preview mesh subdivisions per axis while a handle is dragged.
    pub drag_preview_cells: usize,
}

impl Default for WarpSettings {
    fn default() -> Self {
        Self {
            handle_offset: 10.0,
            pick_radius: 15.0,
            preview_cells: 50,
            drag_preview_cells: 50,
        }
    }
}

impl SessionConfig {
    /// Parse JSON and validate.
    pub fn from_json_str(json: &str) -> EraseWarpResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| EraseWarpError::serde(format!("parse session config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: &Path) -> EraseWarpResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read session config '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> EraseWarpResult<()> {
        let e = &self.erase;
        if !(e.radius.is_finite() && e.radius > 0.0) {
            return Err(EraseWarpError::validation(format!(
                "erase.radius must be finite and > 0, got {}",
                e.radius
            )));
        }
        if !(e.feather.is_finite() && e.feather >= 0.0) {
            return Err(EraseWarpError::validation(format!(
                "erase.feather must be finite and >= 0, got {}",
                e.feather
            )));
        }

        let w = &self.warp;
        if !(w.handle_offset.is_finite() && w.handle_offset >= 0.0) {
            return Err(EraseWarpError::validation(
                "warp.handle_offset must be finite and >= 0",
            ));
        }
        if !(w.pick_radius.is_finite() && w.pick_radius > 0.0) {
            return Err(EraseWarpError::validation(
                "warp.pick_radius must be finite and > 0",
            ));
        }
        if w.preview_cells == 0 || w.drag_preview_cells == 0 {
            return Err(EraseWarpError::validation(
                "warp preview cell counts must be >= 1",
            ));
        }

        if let Some(n) = self.threads
            && n == 0
        {
            return Err(EraseWarpError::validation(
                "threads must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
