#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use rworklog::models::LogRecord;
use rworklog::storage::{StorageKind, Stores};
use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated HOME plus a data directory inside it.
pub struct Sandbox {
    pub home: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.home.path().join("data")
    }

    pub fn config_file(&self) -> PathBuf {
        self.home.path().join(".rworklog").join("rworklog.conf")
    }

    /// Binary with HOME pointed at the sandbox and `--data-dir` set.
    pub fn rwl(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("rworklog");
        cmd.env("HOME", self.home.path())
            .env("APPDATA", self.home.path())
            .env("NO_COLOR", "1")
            .env("RUST_LOG", "warn")
            .env_remove("RWORKLOG_OWNER")
            .arg("--data-dir")
            .arg(self.data_dir());
        cmd
    }

    pub fn init(&self, kind: &str, owner: i64) {
        self.rwl()
            .args(["--test", "--storage", kind, "--owner", &owner.to_string(), "init"])
            .assert()
            .success();
    }

    pub fn stores(&self, kind: StorageKind) -> Stores {
        Stores::open(kind, &self.data_dir()).expect("open stores")
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(d: NaiveDate, h: u32, m: u32) -> DateTime<Local> {
    Local
        .from_local_datetime(&d.and_hms_opt(h, m, 0).unwrap())
        .unwrap()
}

/// Two records on 2025-09-01 stored out of chronological order.
pub fn seed_day(stores: &Stores) -> NaiveDate {
    let d = day(2025, 9, 1);
    stores
        .logs
        .insert(d, &LogRecord::new(at(d, 10, 0), at(d, 11, 30), "code review"))
        .unwrap();
    stores
        .logs
        .insert(d, &LogRecord::new(at(d, 8, 15), at(d, 9, 0), "mail"))
        .unwrap();
    d
}
