/// Convenience result type used across bufswap.
pub type BufswapResult<T> = Result<T, BufswapError>;

/// Top-level error taxonomy used by construction and IO paths.
///
/// The tick-driven core (chunk advance, scheduler ticks, buffer fetches) never returns these;
/// it only observes "more work" flags and present/absent buffers.
#[derive(thiserror::Error, Debug)]
pub enum BufswapError {
    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Draw region geometry that cannot be chunked or does not fit its surfaces.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Problems loading or interpreting a simulation config.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BufswapError {
    /// Build a [`BufswapError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BufswapError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`BufswapError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`BufswapError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
