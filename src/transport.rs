//! Socket transport for the runtime control socket.
//!
//! Each command opens a fresh connection, writes one newline-terminated
//! line, and reads the response until the peer closes the connection. There
//! is no pooling and no retry at this layer; a single connect/write/read
//! failure is fatal for the whole invocation.

use crate::error::{Error, Result};
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, trace};

/// Default location of the administrative socket.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/haproxy.sock";

/// Default deadline for each socket read and write.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(10);

/// Response read chunk size.
const RECV_SIZE: usize = 1024;

/// One request/response exchange with the control plane.
///
/// The trait is the seam the convergence loop and the orchestrator are
/// tested against.
pub trait Transport {
    /// Sends `command` and returns the complete response text.
    fn execute(&mut self, command: &str) -> Result<String>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn execute(&mut self, command: &str) -> Result<String> {
        (**self).execute(command)
    }
}

/// Blocking Unix-domain-socket transport.
///
/// Constructed once per invocation with an explicit path; holds no open
/// connection between calls.
#[derive(Debug, Clone)]
pub struct UnixSocket {
    path: PathBuf,
    io_timeout: Duration,
}

impl UnixSocket {
    /// Creates a transport for the socket at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }

    /// Sets the per-operation read/write deadline.
    ///
    /// The deadline guards against a control plane that accepts the
    /// connection but never responds or never closes it.
    pub fn with_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout = io_timeout;
        self
    }
}

impl Transport for UnixSocket {
    fn execute(&mut self, command: &str) -> Result<String> {
        debug!(command = %command, socket = %self.path.display(), "sending control command");

        let mut stream = UnixStream::connect(&self.path)
            .map_err(|e| Error::connect(self.path.clone(), e))?;
        stream
            .set_read_timeout(Some(self.io_timeout))
            .map_err(|e| Error::transport(command, e))?;
        stream
            .set_write_timeout(Some(self.io_timeout))
            .map_err(|e| Error::transport(command, e))?;

        stream
            .write_all(format!("{}\n", command).as_bytes())
            .map_err(|e| Error::transport(command, e))?;

        // The peer signals end-of-response by closing the connection.
        let mut raw = Vec::new();
        let mut chunk = [0u8; RECV_SIZE];
        loop {
            let n = stream
                .read(&mut chunk)
                .map_err(|e| Error::transport(command, e))?;
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);
        }

        let response = String::from_utf8_lossy(&raw).into_owned();
        trace!(command = %command, bytes = raw.len(), "control response received");
        Ok(response)
    }
}
