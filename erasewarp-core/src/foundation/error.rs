/// Convenience result type used across the engine.
pub type EraseWarpResult<T> = Result<T, EraseWarpError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Out-of-bounds pointer positions are not errors; kernels skip them.
#[derive(thiserror::Error, Debug)]
pub enum EraseWarpError {
    /// Non-positive or non-finite dimensions, radii or scale factors.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Invalid user-provided data (grid indices, pixel slices, configuration).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EraseWarpError {
    /// Build a [`EraseWarpError::InvalidGeometry`] value.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Build a [`EraseWarpError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`EraseWarpError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
