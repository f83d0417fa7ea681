//! Handles shared by the state machine and the scheduler.

use crate::core::clock::Clock;
use crate::errors::AppResult;
use crate::models::{ConversationState, LogRecord, Notification, UserSettings};
use crate::storage::{LogStore, SettingsStore, Stores};
use crate::transport::Notifier;
use chrono::TimeDelta;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotOptions {
    /// Scheduler period.
    pub tick: Duration,
    /// Spacing of offered checkpoints.
    pub checkpoint_step: TimeDelta,
    /// Grid applied to the end of a continued record.
    pub round_minutes: i64,
    /// Dates offered at once by the delete prompt.
    pub delete_choices_limit: usize,
}

impl Default for BotOptions {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(60 * 60),
            checkpoint_step: TimeDelta::minutes(10),
            round_minutes: 5,
            delete_choices_limit: 5,
        }
    }
}

#[derive(Clone)]
pub struct BotContext {
    pub settings: Arc<dyn SettingsStore>,
    pub logs: Arc<dyn LogStore>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
    pub options: BotOptions,
}

impl BotContext {
    pub fn new(
        stores: Stores,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        options: BotOptions,
    ) -> Self {
        Self {
            settings: stores.settings,
            logs: stores.logs,
            notifier,
            clock,
            options,
        }
    }

    /// Deliver a notification. A failed send is logged and swallowed: the
    /// transition that produced it has already been persisted.
    pub fn notify(&self, notification: Notification) {
        if let Err(e) = self.notifier.send(notification) {
            error!("failed to send notification: {e}");
        }
    }

    pub fn say(&self, chat_id: i64, body: impl Into<String>) {
        self.notify(Notification::text(chat_id, body));
    }

    pub fn set_state(&self, state: ConversationState) -> AppResult<UserSettings> {
        self.settings.update(&mut |s| s.current_state = state)
    }

    /// Records of the running workday, falling back to today's bucket when no
    /// workday was ever started.
    pub fn workday_records(&self, settings: &UserSettings) -> AppResult<Vec<LogRecord>> {
        let date = settings
            .workday_date()
            .unwrap_or_else(|| self.clock.today());
        self.logs.list_by_date(date)
    }
}
