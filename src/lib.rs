//! # hapctl - HAProxy runtime control client
//!
//! A client for the administrative Unix domain socket exposed by HAProxy.
//! It issues line-oriented runtime commands (enable/disable/drain backend
//! servers, adjust weights, query state) and can poll until a requested
//! transition is observed.
//!
//! ## Layout
//!
//! - [`transport`]: per-command blocking socket exchange behind the
//!   [`transport::Transport`] trait seam
//! - [`stat`]: `show stat` CSV parsing, lookups and pool discovery
//! - [`probe`]: version extraction from `show info`, gating newer verbs
//! - [`command`]: desired-state and weight value types plus the command
//!   templates
//! - [`client`]: the orchestrator and the poll-until-converged loop
//! - [`report`]: transcript and before/after result shaping
//!
//! ## Example
//!
//! ```no_run
//! use hapctl::{ApplyRequest, DesiredState, RuntimeClient};
//! use hapctl::transport::UnixSocket;
//! use std::time::Duration;
//!
//! let transport = UnixSocket::new("/var/run/haproxy.sock");
//! let mut client = RuntimeClient::new(transport);
//! let report = client.apply(&ApplyRequest {
//!     desired: DesiredState::Disabled,
//!     backend: Some("www".to_string()),
//!     server: "web1".to_string(),
//!     weight: None,
//!     shutdown_sessions: false,
//!     fail_on_missing: true,
//!     wait: true,
//!     wait_interval: Duration::from_secs(5),
//!     wait_retries: 25,
//! })?;
//! println!("changed: {}", report.changed);
//! # Ok::<(), hapctl::Error>(())
//! ```

pub mod cli;
pub mod client;
pub mod command;
pub mod error;
pub mod probe;
pub mod report;
pub mod stat;
pub mod transport;

pub use client::{ApplyRequest, RuntimeClient};
pub use command::{DesiredState, Weight};
pub use error::{Error, Result};
pub use report::{CommandRecord, Report};
pub use stat::{Lookup, ServerState};
