//! Shared test utilities for the hapctl test suite.
//!
//! Provides a scripted [`MockTransport`] that stands in for the control
//! socket at the `Transport` trait seam, plus a stat-table builder.
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::MockTransport;
//! ```

#![allow(dead_code)]

use hapctl::error::Result;
use hapctl::transport::Transport;
use std::collections::{HashMap, VecDeque};

/// A transport that replays scripted responses and logs every command.
///
/// Responses are queued per command; the last queued response repeats once
/// the queue runs dry, so a settled state can be polled any number of
/// times. An unscripted command panics the test - that is the assertion
/// that no unexpected verb was ever sent.
#[derive(Default)]
pub struct MockTransport {
    responses: HashMap<String, VecDeque<String>>,
    pub issued: Vec<String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a single sticky response for `command`.
    pub fn respond(self, command: &str, response: &str) -> Self {
        self.respond_sequence(command, &[response])
    }

    /// Scripts a sequence of responses for `command`; the last one repeats.
    pub fn respond_sequence(mut self, command: &str, responses: &[&str]) -> Self {
        let queue = self.responses.entry(command.to_string()).or_default();
        queue.extend(responses.iter().map(|r| r.to_string()));
        self
    }

    /// How many times `command` was sent.
    pub fn count(&self, command: &str) -> usize {
        self.issued.iter().filter(|c| c.as_str() == command).count()
    }
}

impl Transport for MockTransport {
    fn execute(&mut self, command: &str) -> Result<String> {
        self.issued.push(command.to_string());
        let queue = self
            .responses
            .get_mut(command)
            .unwrap_or_else(|| panic!("unscripted command sent: '{}'", command));
        let response = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap_or_default()
        };
        Ok(response)
    }
}

/// Renders a stat table with the standard header from
/// `(pxname, svname, status, weight, scur)` rows.
pub fn stat_table(rows: &[(&str, &str, &str, &str, &str)]) -> String {
    let mut out = String::from("# pxname,svname,status,weight,scur\n");
    for (pxname, svname, status, weight, scur) in rows {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            pxname, svname, status, weight, scur
        ));
    }
    out
}
