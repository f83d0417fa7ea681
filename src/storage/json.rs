//! File-backed store: `user.json`, `logs_navigation.json` and one
//! `logs_YYYY-MM-DD.json` array per bucket, all inside one data directory.

use super::{BucketHandle, BucketId, LogStore, SettingsStore};
use crate::errors::AppResult;
use crate::models::{LogRecord, UserSettings};
use crate::utils::date::{format_date, parse_date};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

const NAVIGATION_FILE: &str = "logs_navigation.json";
const SETTINGS_FILE: &str = "user.json";

/// date string → bucket file name
#[derive(Debug, Default, Serialize, Deserialize)]
struct Navigation {
    #[serde(default)]
    date: BTreeMap<String, String>,
}

pub struct JsonStore {
    dir: PathBuf,
    // serializes each read-modify-write against the files
    lock: Mutex<()>,
}

impl JsonStore {
    /// Open (and if needed initialize) a store rooted at `dir`.
    pub fn open(dir: &Path) -> AppResult<Self> {
        fs::create_dir_all(dir)?;

        let store = Self {
            dir: dir.to_path_buf(),
            lock: Mutex::new(()),
        };

        if !store.navigation_path().exists() {
            store.write_navigation(&Navigation::default())?;
        }

        Ok(store)
    }

    fn navigation_path(&self) -> PathBuf {
        self.dir.join(NAVIGATION_FILE)
    }

    fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    fn bucket_path(&self, id: &BucketId) -> PathBuf {
        self.dir.join(format!("{}.json", id.as_str()))
    }

    fn read_navigation(&self) -> AppResult<Navigation> {
        match read_json(&self.navigation_path()) {
            Ok(nav) => Ok(nav),
            Err(crate::errors::AppError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                Ok(Navigation::default())
            }
            Err(e) => Err(e),
        }
    }

    fn write_navigation(&self, nav: &Navigation) -> AppResult<()> {
        write_json_atomic(&self.navigation_path(), nav)
    }

    fn read_bucket(&self, id: &BucketId) -> AppResult<Vec<LogRecord>> {
        match read_json(&self.bucket_path(id)) {
            Ok(records) => Ok(records),
            Err(crate::errors::AppError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                warn!(bucket = %id, "bucket file missing, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn write_bucket(&self, id: &BucketId, records: &[LogRecord]) -> AppResult<()> {
        write_json_atomic(&self.bucket_path(id), &records)
    }

    /// Caller must hold `self.lock`.
    fn resolve_locked(&self, date: NaiveDate) -> AppResult<BucketHandle> {
        let mut nav = self.read_navigation()?;
        let key = format_date(&date);

        if let Some(file) = nav.date.get(&key) {
            return Ok(BucketHandle {
                id: BucketId(file.trim_end_matches(".json").to_string()),
                created: false,
            });
        }

        // bucket first, then the index entry pointing at it
        let id = BucketId::for_date(&date);
        self.write_bucket(&id, &[])?;
        nav.date.insert(key, format!("{}.json", id.as_str()));
        self.write_navigation(&nav)?;

        debug!(bucket = %id, "created log bucket");
        Ok(BucketHandle { id, created: true })
    }
}

impl SettingsStore for JsonStore {
    fn load(&self) -> AppResult<Option<UserSettings>> {
        let _guard = self.lock.lock()?;
        let path = self.settings_path();
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(read_json(&path)?))
    }

    fn save(&self, settings: &UserSettings) -> AppResult<()> {
        let _guard = self.lock.lock()?;
        write_json_atomic(&self.settings_path(), settings)
    }
}

impl LogStore for JsonStore {
    fn bucket_for(&self, date: NaiveDate) -> AppResult<Option<BucketId>> {
        let _guard = self.lock.lock()?;
        let nav = self.read_navigation()?;
        Ok(nav
            .date
            .get(&format_date(&date))
            .map(|file| BucketId(file.trim_end_matches(".json").to_string())))
    }

    fn get_or_create_bucket(&self, date: NaiveDate) -> AppResult<BucketHandle> {
        let _guard = self.lock.lock()?;
        self.resolve_locked(date)
    }

    fn insert(&self, date: NaiveDate, record: &LogRecord) -> AppResult<()> {
        let _guard = self.lock.lock()?;
        let bucket = self.resolve_locked(date)?;

        let mut records = self.read_bucket(&bucket.id)?;
        records.push(record.clone());
        self.write_bucket(&bucket.id, &records)
    }

    fn update_end_time(&self, record: &LogRecord) -> AppResult<bool> {
        let _guard = self.lock.lock()?;
        let bucket = self.resolve_locked(record.start_date())?;

        let mut records = self.read_bucket(&bucket.id)?;
        let Some(stored) = records.iter_mut().find(|r| r.id == record.id) else {
            debug!(id = %record.id, bucket = %bucket.id, "no record to update");
            return Ok(false);
        };

        stored.end_time = record.end_time;
        self.write_bucket(&bucket.id, &records)?;
        Ok(true)
    }

    fn list_by_date(&self, date: NaiveDate) -> AppResult<Vec<LogRecord>> {
        let _guard = self.lock.lock()?;
        let bucket = self.resolve_locked(date)?;
        self.read_bucket(&bucket.id)
    }

    fn list_dates_with_logs(&self) -> AppResult<BTreeSet<NaiveDate>> {
        let _guard = self.lock.lock()?;
        let nav = self.read_navigation()?;

        Ok(nav
            .date
            .keys()
            .filter_map(|k| {
                let parsed = parse_date(k);
                if parsed.is_none() {
                    warn!(key = %k, "skipping malformed navigation entry");
                }
                parsed
            })
            .collect())
    }

    fn delete_by_date(&self, date: NaiveDate) -> AppResult<bool> {
        let _guard = self.lock.lock()?;
        let mut nav = self.read_navigation()?;

        let Some(file) = nav.date.remove(&format_date(&date)) else {
            return Ok(false);
        };

        match fs::remove_file(self.dir.join(&file)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        self.write_navigation(&nav)?;
        Ok(true)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Persist `value` using a temporary file and an atomic rename so a failed
/// write never truncates the previous content.
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(value)?;
    let temp = path.with_extension("tmp");
    let mut f = File::create(&temp)?;
    f.write_all(content.as_bytes())?;
    f.sync_all()?;
    fs::rename(temp, path)?;
    Ok(())
}
