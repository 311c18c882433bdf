//! Command line interface definition.

use crate::client::ApplyRequest;
use crate::command::{DesiredState, Weight};
use crate::transport;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Control a backend server over the HAProxy runtime socket.
#[derive(Parser, Debug)]
#[command(
    name = "hapctl",
    version,
    about = "HAProxy runtime control client",
    long_about = "Enable, disable or drain a backend server over the local admin socket, \
                  optionally polling until the transition is observed."
)]
pub struct Cli {
    /// Server (svname) to act on
    pub server: String,

    /// Target state: enabled, disabled or drain
    #[arg(long, default_value = "enabled")]
    pub state: DesiredState,

    /// Backend pool (pxname); acts on every discovered pool when omitted
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Weight to assign on enable: absolute 0-256, or relative "NN%"
    #[arg(short, long)]
    pub weight: Option<Weight>,

    /// Forcibly terminate established sessions when disabling
    #[arg(long)]
    pub shutdown_sessions: bool,

    /// Fail when the backend/server pair is absent instead of skipping it
    #[arg(long)]
    pub fail_on_missing: bool,

    /// Poll until the target status is observed
    #[arg(long)]
    pub wait: bool,

    /// Seconds between status polls
    #[arg(long, default_value_t = 5)]
    pub wait_interval: u64,

    /// Status poll budget
    #[arg(long, default_value_t = 25)]
    pub wait_retries: u32,

    /// Control socket path
    #[arg(
        long,
        env = "HAPCTL_SOCKET",
        default_value = transport::DEFAULT_SOCKET_PATH
    )]
    pub socket: PathBuf,

    /// Socket read/write deadline in seconds
    #[arg(long, default_value_t = 10)]
    pub io_timeout: u64,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbosity: u8,
}

impl Cli {
    /// Translates the parsed arguments into an apply request.
    pub fn to_request(&self) -> ApplyRequest {
        ApplyRequest {
            desired: self.state,
            backend: self.backend.clone(),
            server: self.server.clone(),
            weight: self.weight,
            shutdown_sessions: self.shutdown_sessions,
            fail_on_missing: self.fail_on_missing,
            wait: self.wait,
            wait_interval: Duration::from_secs(self.wait_interval),
            wait_retries: self.wait_retries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let cli = Cli::parse_from(["hapctl", "web1"]);
        assert_eq!(cli.server, "web1");
        assert_eq!(cli.state, DesiredState::Enabled);
        assert_eq!(cli.backend, None);
        assert_eq!(cli.wait_interval, 5);
        assert_eq!(cli.wait_retries, 25);
        assert_eq!(cli.socket, PathBuf::from(transport::DEFAULT_SOCKET_PATH));
        assert!(!cli.wait);
        assert!(!cli.fail_on_missing);
    }

    #[test]
    fn full_invocation_parses() {
        let cli = Cli::parse_from([
            "hapctl",
            "web1",
            "--state",
            "disabled",
            "--backend",
            "www",
            "--shutdown-sessions",
            "--fail-on-missing",
            "--wait",
            "--wait-interval",
            "1",
            "--wait-retries",
            "3",
            "--socket",
            "/tmp/admin.sock",
        ]);
        let request = cli.to_request();
        assert_eq!(request.desired, DesiredState::Disabled);
        assert_eq!(request.backend.as_deref(), Some("www"));
        assert!(request.shutdown_sessions);
        assert!(request.fail_on_missing);
        assert!(request.wait);
        assert_eq!(request.wait_interval, Duration::from_secs(1));
        assert_eq!(request.wait_retries, 3);
    }

    #[test]
    fn weight_values_are_validated_at_parse_time() {
        let cli = Cli::parse_from(["hapctl", "web1", "--weight", "50%"]);
        assert_eq!(cli.weight, Some(Weight::Relative(50)));
        assert!(Cli::try_parse_from(["hapctl", "web1", "--weight", "300"]).is_err());
    }

    #[test]
    fn unknown_state_is_rejected_before_any_io() {
        assert!(Cli::try_parse_from(["hapctl", "web1", "--state", "draining"]).is_err());
    }
}
