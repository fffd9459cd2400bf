//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Server Process Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Java runtime not found. Ensure '{binary}' is in your PATH.")]
    JavaNotFound { binary: String },

    #[error("Server jar not found: {path}")]
    NoServerJar { path: PathBuf },

    #[error("Server working directory not found: {path}")]
    NoWorkingDir { path: PathBuf },

    #[error("Server process error: {message}")]
    Process { message: String },

    #[error("Failed to spawn server process: {reason}")]
    ProcessSpawn { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    // ─────────────────────────────────────────────────────────────
    // Control Surface Errors
    // ─────────────────────────────────────────────────────────────
    #[error("HTTP server error: {message}")]
    Http { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn java_not_found(binary: impl Into<String>) -> Self {
        Self::JavaNotFound {
            binary: binary.into(),
        }
    }

    pub fn no_server_jar(path: impl Into<PathBuf>) -> Self {
        Self::NoServerJar { path: path.into() }
    }

    pub fn no_working_dir(path: impl Into<PathBuf>) -> Self {
        Self::NoWorkingDir { path: path.into() }
    }

    pub fn process(message: impl Into<String>) -> Self {
        Self::Process {
            message: message.into(),
        }
    }

    pub fn spawn(reason: impl Into<String>) -> Self {
        Self::ProcessSpawn {
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Process { .. } | Error::ChannelSend { .. })
    }

    /// Check if this error should fail the whole start attempt
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::JavaNotFound { .. }
                | Error::NoServerJar { .. }
                | Error::NoWorkingDir { .. }
                | Error::ProcessSpawn { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for logging context at the point an error surfaces.
///
/// The error value passes through unchanged (the enum already carries its
/// own message); `context` only emits a log line naming the operation that
/// failed, so call sites stay on `?`.
pub trait ResultExt<T> {
    /// Log `context` against the error, then propagate it
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Like [`context`](Self::context) but the message is built lazily,
    /// only on the error path
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
