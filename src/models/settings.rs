use super::state::ConversationState;
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// The single per-deployment session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub user_id: i64,
    /// `None` means no workday has ever been started.
    #[serde(default)]
    pub work_started: Option<DateTime<Local>>,
    #[serde(default)]
    pub current_state: ConversationState,
    #[serde(default)]
    pub need_work_log_to: Option<DateTime<Local>>,
}

impl UserSettings {
    /// Fresh record for `user_id`, resting in `Idle`.
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            work_started: None,
            current_state: ConversationState::Idle,
            need_work_log_to: None,
        }
    }

    /// Date of the current (or last) workday, if any.
    pub fn workday_date(&self) -> Option<NaiveDate> {
        self.work_started.map(|t| t.date_naive())
    }

    pub fn workday_started_on(&self, day: NaiveDate) -> bool {
        self.workday_date() == Some(day)
    }
}
