use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

mod classify;
mod error;
mod store;

pub use classify::{classify, resolve_targets, verdict, UnknownHostPolicy, GOOD_STATUS_THRESHOLD};
pub use error::{Error, Result};
pub use store::{ReportStore, SqliteReportStore, REPORTED_AT_FORMAT};

/// A single health-check result of a host, as read from the report store.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub id: i64,
    pub status: i64,
}

impl Report {
    #[must_use]
    pub fn new(id: i64, status: i64) -> Self {
        Self { id, status }
    }
}

/// Reports inside the query window, grouped by host name.
///
/// Each host's reports keep the store's descending-id order. Hosts without any
/// report in the window have no entry at all.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportWindows {
    by_host: BTreeMap<String, Vec<Report>>,
}

impl ReportWindows {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, host: String, report: Report) {
        self.by_host.entry(host).or_default().push(report);
    }

    #[must_use]
    pub fn get(&self, host: &str) -> Option<&[Report]> {
        self.by_host.get(host).map(Vec::as_slice)
    }

    /// Number of hosts with at least one report.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_host.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_host.is_empty()
    }
}

impl FromIterator<(String, Report)> for ReportWindows {
    fn from_iter<T: IntoIterator<Item = (String, Report)>>(iter: T) -> Self {
        let mut windows = Self::new();
        for (host, report) in iter {
            windows.push(host, report);
        }
        windows
    }
}

/// Name to id lookup of every registered host, loaded once per run.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HostRegistry {
    hosts: BTreeMap<String, u32>,
}

impl HostRegistry {
    /// Id of a registered host.
    pub fn id(&self, name: &str) -> Result<u32> {
        self.hosts
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownHost(name.to_string()))
    }

    /// Registered names, in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for HostRegistry {
    fn from_iter<T: IntoIterator<Item = (S, u32)>>(iter: T) -> Self {
        Self {
            hosts: iter.into_iter().map(|(name, id)| (name.into(), id)).collect(),
        }
    }
}

/// The classification of a host over one window.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Missing,
    Error,
    Good,
}

/// Sorted host names per `Verdict`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub missing: Vec<String>,
    pub error: Vec<String>,
    pub good: Vec<String>,
}

impl Summary {
    #[must_use]
    pub fn hosts(&self, verdict: Verdict) -> &[String] {
        match verdict {
            Verdict::Missing => &self.missing,
            Verdict::Error => &self.error,
            Verdict::Good => &self.good,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.missing.len() + self.error.len() + self.good.len()
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (title, hosts) in [
            ("Missing", &self.missing),
            ("Error", &self.error),
            ("Good", &self.good),
        ] {
            writeln!(f, "{title} Hosts({}):", hosts.len())?;
            for host in hosts {
                writeln!(f, "{host}")?;
            }
        }
        Ok(())
    }
}
