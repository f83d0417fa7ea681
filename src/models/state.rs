use serde::{Deserialize, Serialize};

/// Where the owner currently is inside a logging dialogue.
///
/// `Idle` is both the initial state and the rest state between dialogues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Idle,
    SelectLogType,
    SelectOldLogDate,
    SelectNewLogMessage,
    SelectNewLogDate,
    SelectLogDateForReport,
    SelectLogsToDelete,
}

impl ConversationState {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ConversationState::Idle => "idle",
            ConversationState::SelectLogType => "select_log_type",
            ConversationState::SelectOldLogDate => "select_old_log_date",
            ConversationState::SelectNewLogMessage => "select_new_log_message",
            ConversationState::SelectNewLogDate => "select_new_log_date",
            ConversationState::SelectLogDateForReport => "select_log_date_for_report",
            ConversationState::SelectLogsToDelete => "select_logs_to_delete",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(ConversationState::Idle),
            "select_log_type" => Some(ConversationState::SelectLogType),
            "select_old_log_date" => Some(ConversationState::SelectOldLogDate),
            "select_new_log_message" => Some(ConversationState::SelectNewLogMessage),
            "select_new_log_date" => Some(ConversationState::SelectNewLogDate),
            "select_log_date_for_report" => Some(ConversationState::SelectLogDateForReport),
            "select_logs_to_delete" => Some(ConversationState::SelectLogsToDelete),
            _ => None,
        }
    }
}
