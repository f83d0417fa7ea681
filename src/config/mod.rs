use crate::core::BotOptions;
use crate::errors::{AppError, AppResult};
use crate::storage::StorageKind;
use crate::utils::path::expand_tilde;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Chat identity allowed to talk to the bot (0 = unset).
    #[serde(default)]
    pub owner_id: i64,
    #[serde(default)]
    pub storage: StorageKind,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_tick_minutes")]
    pub tick_minutes: u64,
    #[serde(default = "default_checkpoint_step")]
    pub checkpoint_step_minutes: i64,
    #[serde(default = "default_round_minutes")]
    pub round_minutes: i64,
    #[serde(default = "default_delete_choices_limit")]
    pub delete_choices_limit: usize,
}

fn default_data_dir() -> String {
    Config::config_dir()
        .join("data")
        .to_string_lossy()
        .to_string()
}
fn default_tick_minutes() -> u64 {
    60
}
fn default_checkpoint_step() -> i64 {
    10
}
fn default_round_minutes() -> i64 {
    5
}
fn default_delete_choices_limit() -> usize {
    5
}

/// Upper bound for every minute-valued setting (one week).
const MAX_MINUTES: i64 = 7 * 24 * 60;

/// Keys every config file is expected to spell out.
const REQUIRED_FIELDS: [&str; 7] = [
    "owner_id",
    "storage",
    "data_dir",
    "tick_minutes",
    "checkpoint_step_minutes",
    "round_minutes",
    "delete_choices_limit",
];

impl Default for Config {
    fn default() -> Self {
        Self {
            owner_id: 0,
            storage: StorageKind::default(),
            data_dir: default_data_dir(),
            tick_minutes: default_tick_minutes(),
            checkpoint_step_minutes: default_checkpoint_step(),
            round_minutes: default_round_minutes(),
            delete_choices_limit: default_delete_choices_limit(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rworklog")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rworklog")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rworklog.conf")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config = serde_yaml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn validate(&self) -> AppResult<()> {
        if self.tick_minutes == 0 || self.tick_minutes > MAX_MINUTES as u64 {
            return Err(AppError::Config(format!(
                "tick_minutes must be between 1 and {MAX_MINUTES}"
            )));
        }
        if !(1..=MAX_MINUTES).contains(&self.checkpoint_step_minutes) {
            return Err(AppError::Config(format!(
                "checkpoint_step_minutes must be between 1 and {MAX_MINUTES}"
            )));
        }
        if !(0..=MAX_MINUTES).contains(&self.round_minutes) {
            return Err(AppError::Config(format!(
                "round_minutes must be between 0 and {MAX_MINUTES}"
            )));
        }
        Ok(())
    }

    /// Keys from [`REQUIRED_FIELDS`] absent in `content`.
    pub fn missing_fields(content: &str) -> AppResult<Vec<&'static str>> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        let Some(map) = value.as_mapping() else {
            return Ok(REQUIRED_FIELDS.to_vec());
        };

        Ok(REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|k| !map.contains_key(*k))
            .collect())
    }

    /// Storage directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        expand_tilde(&self.data_dir)
    }

    pub fn bot_options(&self) -> BotOptions {
        BotOptions {
            tick: Duration::from_secs(self.tick_minutes * 60),
            checkpoint_step: TimeDelta::minutes(self.checkpoint_step_minutes),
            round_minutes: self.round_minutes,
            delete_choices_limit: self.delete_choices_limit,
        }
    }

    /// Create the config directory and write `self` as the config file.
    /// In test mode the file is left alone.
    pub fn init_all(&self, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let path = Self::config_file();
        if !is_test {
            let yaml = self.to_yaml()?;
            let mut file = fs::File::create(&path)?;
            file.write_all(yaml.as_bytes())?;
        }

        fs::create_dir_all(self.data_path())?;
        Ok(path)
    }
}
