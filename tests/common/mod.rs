#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::{TimeDelta, Utc};
use foreman::REPORTED_AT_FORMAT;
use rusqlite::{params, Connection};
use tempfile::TempDir;

pub const SCHEMA: &str = r"
    CREATE TABLE hosts (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE reports (
        id INTEGER PRIMARY KEY,
        host_id INTEGER NOT NULL REFERENCES hosts(id),
        status INTEGER NOT NULL,
        reported_at TEXT NOT NULL
    );
";

/// An on-disk report store seeded through a writable connection.
pub struct Fixture {
    pub dir: TempDir,
    pub path: PathBuf,
    conn: Connection,
}

impl Fixture {
    pub fn new(hosts: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("foreman.db");
        let conn = Connection::open(&path).expect("open fixture db");
        conn.execute_batch(SCHEMA).expect("create schema");
        for (id, name) in (1..).zip(hosts) {
            conn.execute(
                "INSERT INTO hosts (id, name) VALUES (?1, ?2)",
                params![id, name],
            )
            .expect("insert host");
        }
        Self { dir, path, conn }
    }

    /// Adds a report for `host` dated `age` ago.
    pub fn report(&self, id: i64, host: &str, status: i64, age: TimeDelta) -> &Self {
        let reported_at = (Utc::now() - age).format(REPORTED_AT_FORMAT).to_string();
        self.conn
            .execute(
                "INSERT INTO reports (id, host_id, status, reported_at)
                 SELECT ?1, id, ?2, ?3 FROM hosts WHERE name = ?4",
                params![id, status, reported_at, host],
            )
            .expect("insert report");
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
