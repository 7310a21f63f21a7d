use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{HostRegistry, Report, ReportWindows, Result, Summary, Verdict};

/// Status codes below this value carry no critical flag.
pub const GOOD_STATUS_THRESHOLD: i64 = 4096;

/// What to do with an explicitly requested host that is not registered.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownHostPolicy {
    /// Keep the host; it has no reports, so it ends up missing.
    #[default]
    Missing,
    /// Fail with `Error::UnknownHost`.
    Reject,
}

/// Verdict for one host given its window, scanned most recent id first.
#[must_use]
pub fn verdict(window: Option<&[Report]>) -> Verdict {
    match window {
        None => Verdict::Missing,
        Some(reports) if reports.iter().any(|r| r.status < GOOD_STATUS_THRESHOLD) => Verdict::Good,
        Some(_) => Verdict::Error,
    }
}

/// Partitions `targets` into sorted missing, error and good lists.
///
/// Repeated target names are classified once.
pub fn classify<'a, I>(windows: &ReportWindows, targets: I) -> Summary
where
    I: IntoIterator<Item = &'a str>,
{
    let mut missing = BTreeSet::new();
    let mut error = BTreeSet::new();
    let mut good = BTreeSet::new();

    for host in targets {
        let bucket = match verdict(windows.get(host)) {
            Verdict::Missing => &mut missing,
            Verdict::Error => &mut error,
            Verdict::Good => &mut good,
        };
        bucket.insert(host.to_string());
    }

    Summary {
        missing: missing.into_iter().collect(),
        error: error.into_iter().collect(),
        good: good.into_iter().collect(),
    }
}

/// Host names a run should classify.
///
/// Without a filter that is every registered host; with one, the filter's
/// names in order, first occurrence kept.
pub fn resolve_targets<'a>(
    registry: &'a HostRegistry,
    filter: Option<&'a [String]>,
    policy: UnknownHostPolicy,
) -> Result<Vec<&'a str>> {
    let Some(filter) = filter else {
        return Ok(registry.names().collect());
    };

    let mut seen = HashSet::new();
    let mut targets = Vec::with_capacity(filter.len());
    for name in filter {
        if !seen.insert(name.as_str()) {
            continue;
        }
        if let Err(err) = registry.id(name) {
            match policy {
                UnknownHostPolicy::Reject => return Err(err),
                UnknownHostPolicy::Missing => warn!(host = %name, "host is not registered"),
            }
        }
        targets.push(name.as_str());
    }
    Ok(targets)
}
