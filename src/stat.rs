//! Stat table parsing for `show stat` output.
//!
//! The control plane renders its status table as CSV with a `# `-prefixed
//! header line. Every column is preserved as-is so callers can filter on
//! any field without this parser needing foreknowledge of consumer needs.
//! Rows are produced fresh on every query and never cached.

use indexmap::IndexMap;
use serde::Serialize;

/// Pseudo-server name carried by a pool's aggregate row.
pub const BACKEND_PSEUDO_SERVER: &str = "BACKEND";

/// One row of the stat table, keyed by header-derived column names.
///
/// Column order is preserved, and field values are kept byte-for-byte as
/// they appeared in the CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    fields: IndexMap<String, String>,
}

impl StatRow {
    /// Returns the value of a column, if the table carried it.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    fn field(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// Backend pool name.
    pub fn pxname(&self) -> &str {
        self.field("pxname")
    }

    /// Server name, or [`BACKEND_PSEUDO_SERVER`] for a pool aggregate row.
    pub fn svname(&self) -> &str {
        self.field("svname")
    }

    /// Status string, e.g. `UP`, `MAINT`, `DRAIN`, `MAINT (via pool/srv)`.
    pub fn status(&self) -> &str {
        self.field("status")
    }

    /// Weight string; may carry a `%` suffix for relative weights.
    pub fn weight(&self) -> &str {
        self.field("weight")
    }

    /// Current session count, as the table renders it.
    pub fn scur(&self) -> &str {
        self.field("scur")
    }
}

/// Immutable snapshot of one server inside one backend pool.
///
/// All fields keep the raw strings from the stat table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerState {
    /// Backend pool name (pxname)
    pub backend: String,
    /// Server name (svname)
    pub server: String,
    /// Status string
    pub status: String,
    /// Weight string
    pub weight: String,
    /// Current session count (scur)
    pub current_sessions: String,
}

impl ServerState {
    fn from_row(row: &StatRow) -> Self {
        Self {
            backend: row.pxname().to_string(),
            server: row.svname().to_string(),
            status: row.status().to_string(),
            weight: row.weight().to_string(),
            current_sessions: row.scur().to_string(),
        }
    }
}

/// Result of a stat-table lookup.
///
/// Distinguishes "no rows at all" from "rows exist but none match", so
/// callers never have to read meaning into an empty collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// At least one matching row.
    Found(Vec<ServerState>),
    /// No row matched the requested pair.
    NotFound,
}

impl Lookup {
    /// Returns the matched states, or `None` when nothing matched.
    pub fn found(self) -> Option<Vec<ServerState>> {
        match self {
            Lookup::Found(states) => Some(states),
            Lookup::NotFound => None,
        }
    }

    /// Whether the lookup matched anything.
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Parses the raw `show stat` response into structured rows.
///
/// The first non-empty line is the header; its leading comment marker is
/// stripped before column names are derived. Lines without any field are
/// skipped.
pub fn parse_stat_table(raw: &str) -> Vec<StatRow> {
    let mut lines = raw.lines().filter(|line| !line.trim().is_empty());

    let header = match lines.next() {
        Some(line) => line.trim_start_matches('#').trim_start(),
        None => return Vec::new(),
    };
    let columns: Vec<&str> = header.split(',').collect();

    lines
        .map(|line| {
            let fields = columns
                .iter()
                .zip(line.split(','))
                .map(|(column, value)| (column.to_string(), value.to_string()))
                .collect();
            StatRow { fields }
        })
        .collect()
}

/// Filters rows down to states for `server`, optionally pinned to one
/// backend pool. An unspecified backend means "across all pools".
pub fn server_states(rows: &[StatRow], backend: Option<&str>, server: &str) -> Lookup {
    let states: Vec<ServerState> = rows
        .iter()
        .filter(|row| row.svname() == server)
        .filter(|row| backend.map_or(true, |pxname| row.pxname() == pxname))
        .map(ServerState::from_row)
        .collect();

    if states.is_empty() {
        Lookup::NotFound
    } else {
        Lookup::Found(states)
    }
}

/// The distinct pool names, taken from the pool aggregate rows.
///
/// Order follows first appearance in the table; duplicates are dropped.
pub fn backend_names(rows: &[StatRow]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        if row.svname() == BACKEND_PSEUDO_SERVER && !names.iter().any(|n| n == row.pxname()) {
            names.push(row.pxname().to_string());
        }
    }
    names
}
