//! Error types for the gfx_bridge layer
//!
//! Two classes of failure exist:
//! - resource-creation failures reported by the device (returned as `Err`)
//! - contract violations (out-of-order protocol calls, invalid attachments),
//!   which abort in debug builds and surface as `Error::ContractViolation` otherwise

use std::fmt;

/// Result type for gfx_bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// gfx_bridge errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend-specific error (device, queue, swapchain)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource or descriptor (zero dimensions, unknown format, ...)
    InvalidResource(String),

    /// Initialization failed (device, swapchain, command list)
    InitializationFailed(String),

    /// Caller broke the drawing protocol (programmer error)
    ContractViolation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::ContractViolation(msg) => write!(f, "Contract violation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR and build an `Error::BackendError` with the same message
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("gfx_bridge::Device", "queue lost after {} frames", frames);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::error::Error::BackendError(message)
    }};
}

/// Log an ERROR and return an `Error::BackendError` from the current function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

/// Check a protocol precondition
///
/// On failure the violation is logged, debug builds panic, and release builds
/// return `Error::ContractViolation` from the current function.
#[macro_export]
macro_rules! engine_ensure {
    ($cond:expr, $source:expr, $($arg:tt)*) => {
        if !$cond {
            let message = format!($($arg)*);
            $crate::engine_error!($source, "contract violation: {}", message);
            if cfg!(debug_assertions) {
                panic!("{}: {}", $source, message);
            }
            return Err($crate::error::Error::ContractViolation(message));
        }
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
