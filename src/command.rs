//! Command vocabulary for the HAProxy runtime socket.
//!
//! Each administrative verb is rendered by its own template function so a
//! transition's command sequence can be tested in isolation, instead of
//! string concatenation scattered across the orchestrator branches.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lists every proxy and server with its full stat row.
pub const SHOW_STAT: &str = "show stat";

/// Free-text process information, including the `Version:` line.
pub const SHOW_INFO: &str = "show info";

/// Target transition for a backend server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    /// Return the server to rotation.
    Enabled,
    /// Put the server into maintenance.
    Disabled,
    /// Stop accepting new non-persistent connections, let existing ones finish.
    Drain,
}

impl DesiredState {
    /// The stat-table status string this transition converges to.
    pub fn target_status(&self) -> &'static str {
        match self {
            DesiredState::Enabled => "UP",
            DesiredState::Disabled => "MAINT",
            DesiredState::Drain => "DRAIN",
        }
    }
}

impl FromStr for DesiredState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enabled" => Ok(DesiredState::Enabled),
            "disabled" => Ok(DesiredState::Disabled),
            "drain" => Ok(DesiredState::Drain),
            _ => Err(Error::InvalidState(s.to_string())),
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesiredState::Enabled => write!(f, "enabled"),
            DesiredState::Disabled => write!(f, "disabled"),
            DesiredState::Drain => write!(f, "drain"),
        }
    }
}

/// A server weight, either absolute or relative to the configured weight.
///
/// The value is sent to the control plane verbatim; relative weights are
/// never pre-computed into absolute ones on this side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    /// Absolute weight, 0 to 256.
    Absolute(u16),
    /// Percentage of the originally configured weight, 0 to 100.
    Relative(u8),
}

impl FromStr for Weight {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(percent) = s.strip_suffix('%') {
            let value: u8 = percent.parse().map_err(|_| {
                Error::invalid_weight(s, "relative weight must be an integer percentage")
            })?;
            if value > 100 {
                return Err(Error::invalid_weight(s, "relative weight must be 0-100%"));
            }
            Ok(Weight::Relative(value))
        } else {
            let value: u16 = s
                .parse()
                .map_err(|_| Error::invalid_weight(s, "weight must be an integer"))?;
            if value > 256 {
                return Err(Error::invalid_weight(s, "absolute weight must be 0-256"));
            }
            Ok(Weight::Absolute(value))
        }
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Absolute(value) => write!(f, "{}", value),
            Weight::Relative(percent) => write!(f, "{}%", percent),
        }
    }
}

/// `get weight <pxname>/<svname>` - reads the current weight string.
pub fn get_weight(backend: &str, server: &str) -> String {
    format!("get weight {}/{}", backend, server)
}

/// `enable server <pxname>/<svname>`
pub fn enable_server(backend: &str, server: &str) -> String {
    format!("enable server {}/{}", backend, server)
}

/// `disable server <pxname>/<svname>`
pub fn disable_server(backend: &str, server: &str) -> String {
    format!("disable server {}/{}", backend, server)
}

/// `set weight <pxname>/<svname> <value>[%]`
pub fn set_weight(backend: &str, server: &str, weight: Weight) -> String {
    format!("set weight {}/{} {}", backend, server, weight)
}

/// `shutdown sessions server <pxname>/<svname>` - forcibly terminates
/// established connections bound to the server.
pub fn shutdown_sessions(backend: &str, server: &str) -> String {
    format!("shutdown sessions server {}/{}", backend, server)
}

/// `set server <pxname>/<svname> state drain` - only understood by control
/// planes at version 1.5 or newer.
pub fn set_state_drain(backend: &str, server: &str) -> String {
    format!("set server {}/{} state drain", backend, server)
}
