// src/error.rs
//! Error types for the engine binding, with the conversions needed to plug into
//! `std::io`, `anyhow`, and the host application's own error handling.

use std::fmt;

/// Errors that can occur while driving the engine or its resource handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A native engine call failed; carries the engine's numeric errno.
    EngineError {
        /// The engine's raw error code (e.g. `EAGAIN`, `ETERM`, `EFSM`).
        code: i32,
        /// The engine's own rendering of `code`, captured at the call site.
        message: String,
    },
    /// Operation attempted on a resource that has already been released.
    AlreadyDisposed,
    /// A host-language precondition was violated (null pointer, negative size,
    /// empty multipart send, poller at capacity, bucket index out of range, ...).
    InvalidArgument(String),
    /// An async polling helper observed a cancellation signal.
    Cancelled,
    /// `data`/`size` accessed on a Message that was never initialised.
    NotInitialised,
}

impl Error {
    /// Constructs an [`Error::EngineError`] from a raw errno, rendering the engine's
    /// own description via the supplied `strerror`-style function.
    pub fn from_engine(code: i32, message: impl Into<String>) -> Self {
        Error::EngineError {
            code,
            message: message.into(),
        }
    }

    /// `true` for the engine's "would block" code (EAGAIN). Callers use this to
    /// distinguish a non-fatal retry signal from a real failure.
    pub fn is_would_block(&self) -> bool {
        matches!(self, Error::EngineError { code, .. } if *code == crate::ffi::constants::EAGAIN)
    }

    /// The raw engine error code, if this is an [`Error::EngineError`].
    pub fn raw_code(&self) -> Option<i32> {
        match self {
            Error::EngineError { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EngineError { code, message } => write!(f, "engine error {code}: {message}"),
            Self::AlreadyDisposed => write!(f, "operation on an already-disposed resource"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::NotInitialised => write!(f, "message was never initialised"),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// ERROR CONVERSION
// ============================================================================

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;
        match err {
            Error::Cancelled => std::io::Error::new(ErrorKind::Interrupted, err),
            Error::AlreadyDisposed | Error::InvalidArgument(_) | Error::NotInitialised => {
                std::io::Error::new(ErrorKind::InvalidInput, err)
            }
            Error::EngineError { .. } => std::io::Error::other(err),
        }
    }
}

/// Convert an engine error into `anyhow::Error` (for application-level call sites).
#[cfg(feature = "anyhow")]
impl From<Error> for anyhow::Error {
    fn from(err: Error) -> Self {
        anyhow::anyhow!("{}", err)
    }
}

#[cfg(feature = "anyhow")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::InvalidArgument(err.to_string())
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// EXTENSION TRAIT FOR EASY CONVERSION
// ============================================================================

/// Extension trait for converting [`Result`]s between error types.
pub trait ResultExt<T> {
    /// Convert to `anyhow::Result`.
    #[cfg(feature = "anyhow")]
    fn into_anyhow(self) -> anyhow::Result<T>;

    /// Convert to `std::io::Result`.
    fn into_io(self) -> std::io::Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    #[cfg(feature = "anyhow")]
    fn into_anyhow(self) -> anyhow::Result<T> {
        self.map_err(|e| e.into())
    }

    fn into_io(self) -> std::io::Result<T> {
        self.map_err(|e| e.into())
    }
}

/// Convenience macro for converting an engine operation's `Result` to any target
/// error type. Requires an explicit target type since `anyhow::Error` and similar
/// have several overlapping `From` impls.
#[macro_export]
macro_rules! engine_op {
    ($expr:expr, $target:ty) => {
        $expr.map_err(|e: $crate::Error| -> $target { e.into() })
    };
    ($expr:expr) => {
        $expr.map_err(|e: $crate::Error| -> std::io::Error { e.into() })
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_io() {
        let err = Error::InvalidArgument("bad size".into());
        let io_err: std::io::Error = err.into();
        assert_eq!(io_err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_result_ext() {
        let result: Result<u32> = Ok(42);
        assert_eq!(result.into_io().unwrap(), 42);
    }

    #[test]
    fn test_is_would_block() {
        let err = Error::from_engine(crate::ffi::constants::EAGAIN, "resource unavailable");
        assert!(err.is_would_block());
        assert!(!Error::AlreadyDisposed.is_would_block());
    }

    #[cfg(feature = "anyhow")]
    #[test]
    fn test_anyhow_conversion() {
        let err = Error::NotInitialised;
        let anyhow_err: anyhow::Error = err.into();
        assert!(anyhow_err.to_string().contains("never initialised"));
    }
}
