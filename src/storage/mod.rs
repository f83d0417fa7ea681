//! Persistence contracts for the settings record and the date-bucketed logs.
//!
//! Two backends implement both traits: [`JsonStore`] (one file per bucket plus
//! a navigation index) and [`crate::db::SqliteStore`]. Callers hold them as
//! `Arc<dyn ...>` handles so the conversation core never knows which one runs.

pub mod json;

use crate::db::SqliteStore;
use crate::errors::{AppError, AppResult};
use crate::models::{LogRecord, UserSettings};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub use json::JsonStore;

/// Identifier of the physical storage unit holding one date's records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketId(pub String);

impl BucketId {
    pub fn for_date(date: &NaiveDate) -> Self {
        BucketId(format!("logs_{}", crate::utils::date::format_date(date)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a get-or-create lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketHandle {
    pub id: BucketId,
    /// `true` when this call materialized the bucket.
    pub created: bool,
}

pub trait SettingsStore: Send + Sync {
    /// `None` until the record has been created once.
    fn load(&self) -> AppResult<Option<UserSettings>>;

    fn save(&self, settings: &UserSettings) -> AppResult<()>;

    fn get(&self) -> AppResult<UserSettings> {
        self.load()?.ok_or(AppError::SettingsMissing)
    }

    /// Re-read, mutate and write back in one call.
    fn update(&self, apply: &mut dyn FnMut(&mut UserSettings)) -> AppResult<UserSettings> {
        let mut settings = self.get()?;
        apply(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }

    /// Create the record for `owner_id`, or reset it when a different owner
    /// was stored before.
    fn ensure_owner(&self, owner_id: i64) -> AppResult<UserSettings> {
        match self.load()? {
            Some(existing) if existing.user_id == owner_id => Ok(existing),
            _ => {
                let fresh = UserSettings::new(owner_id);
                self.save(&fresh)?;
                Ok(fresh)
            }
        }
    }
}

pub trait LogStore: Send + Sync {
    /// Navigation lookup that never creates anything.
    fn bucket_for(&self, date: NaiveDate) -> AppResult<Option<BucketId>>;

    /// Navigation lookup that materializes an empty bucket and its index entry
    /// on first use.
    fn get_or_create_bucket(&self, date: NaiveDate) -> AppResult<BucketHandle>;

    /// Append `record` to the bucket resolved from `date`.
    fn insert(&self, date: NaiveDate, record: &LogRecord) -> AppResult<()>;

    /// Overwrite `end_time` of the stored record with the same id, looked up in
    /// the bucket of `record.start_time`'s date. Returns `false` when no such
    /// record exists there.
    fn update_end_time(&self, record: &LogRecord) -> AppResult<bool>;

    /// All records of the date's bucket, in store order.
    fn list_by_date(&self, date: NaiveDate) -> AppResult<Vec<LogRecord>>;

    fn list_dates_with_logs(&self) -> AppResult<BTreeSet<NaiveDate>>;

    /// Remove the bucket and its index entry. Returns `false` for unknown dates.
    fn delete_by_date(&self, date: NaiveDate) -> AppResult<bool>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Json,
    Sqlite,
}

/// Both store handles, opened on the same backend.
#[derive(Clone)]
pub struct Stores {
    pub settings: Arc<dyn SettingsStore>,
    pub logs: Arc<dyn LogStore>,
}

impl Stores {
    pub fn open(kind: StorageKind, data_dir: &Path) -> AppResult<Self> {
        match kind {
            StorageKind::Json => {
                let store = Arc::new(JsonStore::open(data_dir)?);
                Ok(Self {
                    settings: store.clone(),
                    logs: store,
                })
            }
            StorageKind::Sqlite => {
                std::fs::create_dir_all(data_dir)?;
                let store = Arc::new(SqliteStore::open(&data_dir.join("rworklog.sqlite"))?);
                Ok(Self {
                    settings: store.clone(),
                    logs: store,
                })
            }
        }
    }
}
