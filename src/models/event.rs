use crate::errors::{AppError, AppResult};

/// Abstract commands, bound to a concrete syntax by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartWorkday,
    EndWorkday,
    GetTodayLogs,
    GetAllLogs,
    DeleteLogs,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::StartWorkday,
        Command::EndWorkday,
        Command::GetTodayLogs,
        Command::GetAllLogs,
        Command::DeleteLogs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::StartWorkday => "start_work_day",
            Command::EndWorkday => "end_work_day",
            Command::GetTodayLogs => "get_today_logs",
            Command::GetAllLogs => "get_all_logs",
            Command::DeleteLogs => "delete_logs",
        }
    }

    /// Accepts `start_work_day`, `/start_work_day`, `/Start_Work_Day`.
    pub fn from_name(s: &str) -> AppResult<Self> {
        let wanted = s.trim().trim_start_matches('/').to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| AppError::UnknownCommand(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Command(Command),
    Callback(String),
    Text(String),
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Command(_) => "command",
            EventKind::Callback(_) => "callback",
            EventKind::Text(_) => "text",
        }
    }
}

/// An event delivered by the transport binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub chat_id: i64,
    pub kind: EventKind,
}

impl InboundEvent {
    pub fn command(chat_id: i64, command: Command) -> Self {
        Self {
            chat_id,
            kind: EventKind::Command(command),
        }
    }

    pub fn callback(chat_id: i64, payload: impl Into<String>) -> Self {
        Self {
            chat_id,
            kind: EventKind::Callback(payload.into()),
        }
    }

    pub fn text(chat_id: i64, body: impl Into<String>) -> Self {
        Self {
            chat_id,
            kind: EventKind::Text(body.into()),
        }
    }
}
