use thiserror::Error;

use crate::PixelFormat;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while rendering a frame.
///
/// None of these errors escapes [`Engine::render()`](crate::Engine::render) -
/// they are turned into a degraded frame (usually a target cleared to a
/// sentinel color) and reported through [`FrameReport`](crate::FrameReport).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The backend cannot trace rays; latched after the first occurrence.
    #[error("hardware ray tracing is not supported")]
    UnsupportedHardware,

    /// The acceleration structure could not be built this frame.
    #[error("couldn't build acceleration structure: {0}")]
    BuildFailure(String),

    /// A kernel, texture or other input required by a pass is not present.
    #[error("missing resource: {0}")]
    MissingResource(String),

    /// A buffer or texture was accessed before it got allocated.
    #[error("resource accessed before allocation: {0}")]
    UninitializedResource(&'static str),

    /// The camera's target cannot back an accumulation texture (e.g. it's
    /// zero-sized).
    #[error(
        "invalid camera descriptor: width={width}, height={height}, \
         format={format:?}"
    )]
    InvalidDescriptor {
        width: u32,
        height: u32,
        format: PixelFormat,
    },
}

impl Error {
    pub fn missing(what: impl ToString) -> Self {
        Self::MissingResource(what.to_string())
    }

    /// Returns whether this error persists across frames, i.e. whether
    /// retrying it next frame is pointless.
    pub fn is_latched(&self) -> bool {
        matches!(self, Error::UnsupportedHardware)
    }
}
