//! Error types for hapctl.
//!
//! This module defines the error taxonomy for the runtime control client.
//! Transport faults are always fatal and never retried; only the convergence
//! poll loop retries, and only for status convergence.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for hapctl operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for hapctl.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Failed to connect to the control socket.
    #[error("Failed to connect to control socket '{path}': {source}")]
    Connect {
        /// Socket path that was attempted
        path: PathBuf,
        /// OS-level error
        #[source]
        source: std::io::Error,
    },

    /// Socket I/O failed after the connection was established.
    #[error("Control socket I/O failed while running '{command}': {source}")]
    Transport {
        /// Command that was in flight
        command: String,
        /// OS-level error
        #[source]
        source: std::io::Error,
    },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// The requested backend/server pair is absent from the stat table.
    /// Raised only when `fail_on_missing` is set.
    #[error("No server named '{server}' in backend '{backend}'")]
    ServerNotFound {
        /// Backend pool name (pxname)
        backend: String,
        /// Server name (svname)
        server: String,
    },

    // ========================================================================
    // Convergence Errors
    // ========================================================================
    /// The target status was not observed within the retry budget.
    #[error(
        "Server {backend}/{server} did not reach status '{target}' within a budget of {retries} retries"
    )]
    WaitTimeout {
        /// Backend pool name
        backend: String,
        /// Server name
        server: String,
        /// Status string that was polled for
        target: String,
        /// Retry budget that was exhausted
        retries: u32,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Unrecognized desired-state value. Raised before any network I/O.
    #[error("Invalid state '{0}'. Valid states: enabled, disabled, drain")]
    InvalidState(String),

    /// Weight value outside the accepted ranges.
    #[error("Invalid weight '{value}': {message}")]
    InvalidWeight {
        /// Value as supplied by the caller
        value: String,
        /// What was wrong with it
        message: String,
    },

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new connect error.
    pub fn connect(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Connect {
            path: path.into(),
            source,
        }
    }

    /// Creates a new transport error for an in-flight command.
    pub fn transport(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Transport {
            command: command.into(),
            source,
        }
    }

    /// Creates a new server-not-found error.
    pub fn server_not_found(backend: impl Into<String>, server: impl Into<String>) -> Self {
        Self::ServerNotFound {
            backend: backend.into(),
            server: server.into(),
        }
    }

    /// Creates a new invalid-weight error.
    pub fn invalid_weight(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidWeight {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::WaitTimeout { .. } => 2,
            Error::Connect { .. } | Error::Transport { .. } => 3,
            Error::InvalidState(_) | Error::InvalidWeight { .. } => 4,
            Error::ServerNotFound { .. } => 5,
            Error::Io(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_the_taxonomy() {
        let timeout = Error::WaitTimeout {
            backend: "www".into(),
            server: "web1".into(),
            target: "MAINT".into(),
            retries: 25,
        };
        assert_eq!(timeout.exit_code(), 2);

        let connect = Error::connect(
            "/var/run/haproxy.sock",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(connect.exit_code(), 3);

        assert_eq!(Error::InvalidState("draining".into()).exit_code(), 4);
        assert_eq!(Error::server_not_found("www", "web9").exit_code(), 5);
    }

    #[test]
    fn wait_timeout_names_all_diagnostics() {
        let err = Error::WaitTimeout {
            backend: "pool1".into(),
            server: "app1".into(),
            target: "DRAIN".into(),
            retries: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("pool1"));
        assert!(msg.contains("app1"));
        assert!(msg.contains("DRAIN"));
        assert!(msg.contains("10"));
    }
}
