use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use rusqlite::{params, Connection, OpenFlags};
use tracing::debug;

use crate::{Error, HostRegistry, Report, ReportWindows, Result};

/// How `reports.reported_at` is stored: UTC, second precision.
pub const REPORTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Read access to hosts and their reports.
pub trait ReportStore {
    /// Every registered host.
    fn hosts(&self) -> Result<HostRegistry>;

    /// Reports newer than `start`, grouped by host, newest id first.
    fn fetch_since(&self, start: DateTime<Utc>) -> Result<ReportWindows>;

    /// Reports of the last `duration`.
    fn fetch_window(&self, duration: TimeDelta) -> Result<ReportWindows> {
        let start = Utc::now()
            .checked_sub_signed(duration)
            .ok_or_else(|| Error::InvalidDuration(format!("{duration} reaches out of range")))?;
        self.fetch_since(start)
    }
}

pub struct SqliteReportStore {
    conn: Connection,
}

impl std::fmt::Debug for SqliteReportStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteReportStore").finish_non_exhaustive()
    }
}

impl SqliteReportStore {
    /// Opens an existing database read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(Error::StoreUnavailable)?;
        Ok(Self::from_connection(conn))
    }

    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl ReportStore for SqliteReportStore {
    fn hosts(&self) -> Result<HostRegistry> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, id FROM hosts ORDER BY name")
            .map_err(Error::StoreUnavailable)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))
            .map_err(Error::StoreUnavailable)?;

        let mut hosts = Vec::new();
        for host in rows {
            hosts.push(host?);
        }
        debug!(count = hosts.len(), "loaded host registry");
        Ok(hosts.into_iter().collect())
    }

    fn fetch_since(&self, start: DateTime<Utc>) -> Result<ReportWindows> {
        let start = start.format(REPORTED_AT_FORMAT).to_string();
        debug!(%start, "querying reports");

        let mut stmt = self
            .conn
            .prepare(
                r"
                SELECT hosts.name, reports.id, reports.status
                FROM reports
                INNER JOIN hosts ON hosts.id = reports.host_id
                WHERE reports.reported_at > ?1
                ORDER BY reports.id DESC
                ",
            )
            .map_err(Error::StoreUnavailable)?;
        let rows = stmt
            .query_map(params![start], |row| {
                let status: i64 = row.get(2)?;
                if status < 0 {
                    return Err(rusqlite::Error::IntegralValueOutOfRange(2, status));
                }
                Ok((row.get::<_, String>(0)?, Report::new(row.get(1)?, status)))
            })
            .map_err(Error::StoreUnavailable)?;

        let mut windows = ReportWindows::new();
        let mut count = 0usize;
        for row in rows {
            let (host, report) = row?;
            windows.push(host, report);
            count += 1;
        }
        debug!(reports = count, hosts = windows.len(), "fetched report window");
        Ok(windows)
    }
}
