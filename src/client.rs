//! Runtime control client: command orchestration and convergence polling.
//!
//! The client drives one invocation end to end: snapshot current state,
//! fan the requested transition out across the target pools, optionally
//! poll until the transition is observed, and assemble the report.

use crate::command::{self, DesiredState, Weight};
use crate::error::{Error, Result};
use crate::probe;
use crate::report::{CommandRecord, Report};
use crate::stat::{self, Lookup, ServerState, StatRow};
use crate::transport::Transport;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Everything one `apply` invocation needs to know.
#[derive(Debug, Clone)]
pub struct ApplyRequest {
    /// Target transition
    pub desired: DesiredState,
    /// Backend pool to act on; every discovered pool when `None`
    pub backend: Option<String>,
    /// Server name to act on
    pub server: String,
    /// Weight to assign after enabling; ignored for other transitions
    pub weight: Option<Weight>,
    /// Forcibly terminate established sessions when disabling
    pub shutdown_sessions: bool,
    /// Fail when the backend/server pair is absent, instead of skipping
    pub fail_on_missing: bool,
    /// Poll until the target status is observed
    pub wait: bool,
    /// Sleep between status polls
    pub wait_interval: Duration,
    /// Status poll budget; see [`RuntimeClient::wait_until_status`]
    pub wait_retries: u32,
}

/// Synchronous client over a [`Transport`].
///
/// Holds no remote state; every stat read is a full re-query of the
/// control plane. The only local state is the command transcript.
pub struct RuntimeClient<T: Transport> {
    transport: T,
    transcript: Vec<CommandRecord>,
}

impl<T: Transport> RuntimeClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            transcript: Vec::new(),
        }
    }

    /// The command/response pairs captured so far.
    pub fn transcript(&self) -> &[CommandRecord] {
        &self.transcript
    }

    /// Sends a command and records it in the transcript.
    fn execute_captured(&mut self, command: &str) -> Result<String> {
        let response = self.transport.execute(command)?;
        self.transcript
            .push(CommandRecord::new(command, response.trim()));
        Ok(response)
    }

    /// Sends a command without recording it. Used for stat polls and the
    /// version probe, which would otherwise drown the transcript.
    fn execute_quiet(&mut self, command: &str) -> Result<String> {
        self.transport.execute(command)
    }

    fn query_stat(&mut self) -> Result<Vec<StatRow>> {
        let raw = self.execute_quiet(command::SHOW_STAT)?;
        Ok(stat::parse_stat_table(&raw))
    }

    /// Fresh lookup of `server`, optionally pinned to one backend pool.
    pub fn get_state(&mut self, backend: Option<&str>, server: &str) -> Result<Lookup> {
        let rows = self.query_stat()?;
        Ok(stat::server_states(&rows, backend, server))
    }

    /// Pool names discovered from the stat table's aggregate rows.
    pub fn discover_backends(&mut self) -> Result<Vec<String>> {
        let rows = self.query_stat()?;
        Ok(stat::backend_names(&rows))
    }

    /// Probes the control-plane version; `None` when it cannot be parsed.
    pub fn discover_version(&mut self) -> Result<Option<(u32, u32)>> {
        let info = self.execute_quiet(command::SHOW_INFO)?;
        Ok(probe::parse_version(&info))
    }

    /// Polls until `server` in `backend` reports a status containing
    /// `target`, or the budget is exhausted.
    ///
    /// The loop performs `retries - 1` poll/sleep cycles; callers size
    /// their budgets around that observable count, so the bound is part of
    /// the contract. The match is a plain substring test: composite
    /// statuses like `MAINT (via pool/srv)` qualify, but so would any
    /// unrelated status that happens to contain the target text.
    ///
    /// With `require_zero_sessions` set, convergence additionally requires
    /// the current session count to read `0` - a drain is only complete
    /// once no active sessions remain.
    pub fn wait_until_status(
        &mut self,
        backend: &str,
        server: &str,
        target: &str,
        retries: u32,
        interval: Duration,
        require_zero_sessions: bool,
    ) -> Result<()> {
        for attempt in 1..retries {
            if let Lookup::Found(states) = self.get_state(Some(backend), server)? {
                let converged = states.iter().all(|state| {
                    state.status.contains(target)
                        && (!require_zero_sessions || state.current_sessions == "0")
                });
                if converged {
                    debug!(
                        backend = %backend,
                        server = %server,
                        target = %target,
                        attempt,
                        "status converged"
                    );
                    return Ok(());
                }
            }
            thread::sleep(interval);
        }
        Err(Error::WaitTimeout {
            backend: backend.to_string(),
            server: server.to_string(),
            target: target.to_string(),
            retries,
        })
    }

    /// Applies the requested transition and assembles the report.
    ///
    /// Mutations already issued to earlier pools in the fan-out stay
    /// applied when a later pool fails; there is no rollback.
    pub fn apply(&mut self, request: &ApplyRequest) -> Result<Report> {
        if request.weight.is_some() && request.desired != DesiredState::Enabled {
            warn!(
                desired = %request.desired,
                "weight only applies when enabling, ignoring"
            );
        }

        let before = self.snapshot(request)?;

        let backends = match &request.backend {
            Some(backend) => vec![backend.clone()],
            None => self.discover_backends()?,
        };

        // Drain needs the runtime version before any command goes out.
        let drain_supported = if request.desired == DesiredState::Drain {
            probe::supports_drain(self.discover_version()?)
        } else {
            false
        };

        let mut touched: Vec<String> = Vec::new();
        let mut skipped: Vec<String> = Vec::new();
        for backend in &backends {
            match self.get_state(Some(backend), &request.server)? {
                Lookup::Found(_) => {}
                Lookup::NotFound => {
                    if request.fail_on_missing {
                        return Err(Error::server_not_found(backend, &request.server));
                    }
                    debug!(
                        backend = %backend,
                        server = %request.server,
                        "server not present in backend, skipping"
                    );
                    skipped.push(backend.clone());
                    continue;
                }
            }

            match request.desired {
                DesiredState::Enabled => {
                    // The current weight lands in the transcript for the
                    // operator's benefit before it gets touched.
                    self.execute_captured(&command::get_weight(backend, &request.server))?;
                    self.execute_captured(&command::enable_server(backend, &request.server))?;
                    if let Some(weight) = request.weight {
                        self.execute_captured(&command::set_weight(
                            backend,
                            &request.server,
                            weight,
                        ))?;
                    }
                }
                DesiredState::Disabled => {
                    self.execute_captured(&command::disable_server(backend, &request.server))?;
                    if request.shutdown_sessions {
                        self.execute_captured(&command::shutdown_sessions(
                            backend,
                            &request.server,
                        ))?;
                    }
                }
                DesiredState::Drain => {
                    if !drain_supported {
                        // Older control planes do not understand the verb;
                        // there is also no transition to wait on.
                        warn!(
                            backend = %backend,
                            "control plane below 1.5 does not support drain, skipping"
                        );
                        skipped.push(backend.clone());
                        continue;
                    }
                    self.execute_captured(&command::set_state_drain(backend, &request.server))?;
                }
            }

            info!(
                backend = %backend,
                server = %request.server,
                desired = %request.desired,
                "transition requested"
            );
            touched.push(backend.clone());

            if request.wait {
                self.wait_until_status(
                    backend,
                    &request.server,
                    request.desired.target_status(),
                    request.wait_retries,
                    request.wait_interval,
                    request.desired == DesiredState::Drain,
                )?;
            }
        }

        let after = self.snapshot(request)?;
        let changed = transition_changed(&before, &after);
        let msg = summarize(request, &touched, &skipped);

        Ok(Report {
            changed,
            msg,
            commands: self.transcript.clone(),
            before,
            after,
        })
    }

    fn snapshot(&mut self, request: &ApplyRequest) -> Result<Vec<ServerState>> {
        match self.get_state(request.backend.as_deref(), &request.server)? {
            Lookup::Found(states) => Ok(states),
            Lookup::NotFound => Ok(Vec::new()),
        }
    }
}

/// Session counts fluctuate independently of the requested transition, so
/// only status and weight feed the change comparison.
fn transition_changed(before: &[ServerState], after: &[ServerState]) -> bool {
    fn key(state: &ServerState) -> (&str, &str, &str, &str) {
        (
            &state.backend,
            &state.server,
            &state.status,
            &state.weight,
        )
    }
    before.iter().map(key).ne(after.iter().map(key))
}

fn summarize(request: &ApplyRequest, touched: &[String], skipped: &[String]) -> String {
    let mut msg = if touched.is_empty() {
        format!(
            "no backend applied '{}' to server '{}'",
            request.desired, request.server
        )
    } else {
        format!(
            "'{}' applied to server '{}' in backend(s): {}",
            request.desired,
            request.server,
            touched.join(", ")
        )
    };
    if !skipped.is_empty() {
        msg.push_str(&format!("; skipped: {}", skipped.join(", ")));
    }
    msg
}
