//! SQLite backend for the settings record and the log buckets.
//!
//! Buckets are rows of `log_navigation`; their records live in `log_records`
//! tagged with the bucket id. Creation and deletion are audited in `log`.

pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod queries;

use crate::errors::AppResult;
use crate::models::{LogRecord, UserSettings};
use crate::storage::{BucketHandle, BucketId, LogStore, SettingsStore};
use crate::utils::date::{format_date, parse_date};
use chrono::NaiveDate;
use pool::DbPool;
use rusqlite::Connection;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn open(path: &Path) -> AppResult<Self> {
        Self::from_pool(DbPool::new(path)?)
    }

    pub fn in_memory() -> AppResult<Self> {
        Self::from_pool(DbPool::in_memory()?)
    }

    fn from_pool(pool: DbPool) -> AppResult<Self> {
        pool.with_conn(|conn| initialize::init_db(conn))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Navigation lookup that creates the bucket row when missing.
fn resolve(conn: &Connection, date: &NaiveDate) -> AppResult<BucketHandle> {
    if let Some(id) = queries::find_bucket(conn, date)? {
        return Ok(BucketHandle { id, created: false });
    }

    let id = queries::create_bucket(conn, date)?;
    if let Err(e) = log::ttlog(conn, "bucket_created", id.as_str(), &format_date(date)) {
        warn!("failed to write internal log: {e}");
    }
    debug!(bucket = %id, "created log bucket");
    Ok(BucketHandle { id, created: true })
}

impl SettingsStore for SqliteStore {
    fn load(&self) -> AppResult<Option<UserSettings>> {
        self.pool.with_conn(|conn| queries::load_settings(conn))
    }

    fn save(&self, settings: &UserSettings) -> AppResult<()> {
        self.pool
            .with_conn(|conn| queries::save_settings(conn, settings))
    }
}

impl LogStore for SqliteStore {
    fn bucket_for(&self, date: NaiveDate) -> AppResult<Option<BucketId>> {
        self.pool.with_conn(|conn| queries::find_bucket(conn, &date))
    }

    fn get_or_create_bucket(&self, date: NaiveDate) -> AppResult<BucketHandle> {
        self.pool.with_conn(|conn| {
            let tx = conn.transaction()?;
            let handle = resolve(&tx, &date)?;
            tx.commit()?;
            Ok(handle)
        })
    }

    fn insert(&self, date: NaiveDate, record: &LogRecord) -> AppResult<()> {
        self.pool.with_conn(|conn| {
            let tx = conn.transaction()?;
            let bucket = resolve(&tx, &date)?;
            queries::insert_record(&tx, &bucket.id, record)?;
            tx.commit()?;
            Ok(())
        })
    }

    fn update_end_time(&self, record: &LogRecord) -> AppResult<bool> {
        self.pool.with_conn(|conn| {
            let tx = conn.transaction()?;
            let bucket = resolve(&tx, &record.start_date())?;
            let touched = queries::update_end_time(&tx, &bucket.id, record)?;
            tx.commit()?;
            Ok(touched > 0)
        })
    }

    fn list_by_date(&self, date: NaiveDate) -> AppResult<Vec<LogRecord>> {
        self.pool.with_conn(|conn| {
            let tx = conn.transaction()?;
            let bucket = resolve(&tx, &date)?;
            let records = queries::load_records(&tx, &bucket.id)?;
            tx.commit()?;
            Ok(records)
        })
    }

    fn list_dates_with_logs(&self) -> AppResult<BTreeSet<NaiveDate>> {
        let raw = self.pool.with_conn(|conn| queries::list_dates(conn))?;
        Ok(raw
            .iter()
            .filter_map(|d| {
                let parsed = parse_date(d);
                if parsed.is_none() {
                    warn!(date = %d, "skipping malformed navigation row");
                }
                parsed
            })
            .collect())
    }

    fn delete_by_date(&self, date: NaiveDate) -> AppResult<bool> {
        self.pool.with_conn(|conn| {
            let tx = conn.transaction()?;
            let Some(bucket) = queries::find_bucket(&tx, &date)? else {
                return Ok(false);
            };
            queries::delete_bucket(&tx, &bucket)?;
            if let Err(e) = log::ttlog(&tx, "bucket_deleted", bucket.as_str(), &format_date(&date)) {
                warn!("failed to write internal log: {e}");
            }
            tx.commit()?;
            Ok(true)
        })
    }
}
