//! Error types for the Galaxy3D occlusion culling crate
//!
//! This module defines the error type returned by culling bins and by
//! backend implementations of the GraphicsDevice trait.

use std::fmt;

/// Result type for Galaxy3D culling operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D culling errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (Vulkan, DirectX, etc.), also used for poisoned locks
    BackendError(String),

    /// Operation called out of order in the per-frame protocol
    /// (e.g. `draw` before `finish_cull`)
    InvalidState(String),

    /// An occlusion query could not be issued or resolved
    QueryFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::QueryFailed(msg) => write!(f, "Occlusion query failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR (with file:line) and build an `Error::BackendError` from the message.
///
/// # Example
///
/// ```ignore
/// let node = nodes.get(id).ok_or_else(|| engine_err!("galaxy3d::Octree", "Unknown node {}", id))?;
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log an ERROR (with file:line) and return early with `Error::BackendError`.
///
/// # Example
///
/// ```ignore
/// if size == 0 {
///     engine_bail!("galaxy3d::mock", "Buffer size must be > 0");
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

/// Log an ERROR (with file:line) and return early with `Error::InvalidState`.
///
/// Used for violations of the per-frame call order.
#[macro_export]
macro_rules! engine_bail_state {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        return Err($crate::galaxy3d::Error::InvalidState(message));
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
