use chrono::{DateTime, Local, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One labeled, bounded interval of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub id: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub message: String,
}

impl LogRecord {
    /// Build a record with a freshly generated id.
    pub fn new(start_time: DateTime<Local>, end_time: DateTime<Local>, message: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start_time,
            end_time,
            message: message.to_string(),
        }
    }

    pub fn elapsed(&self) -> TimeDelta {
        self.end_time - self.start_time
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_time.date_naive()
    }
}

/// Record with the earliest `start_time`; first one wins on ties.
pub fn first_record(records: &[LogRecord]) -> Option<&LogRecord> {
    records.iter().reduce(|best, r| {
        if r.start_time < best.start_time {
            r
        } else {
            best
        }
    })
}

/// Record with the latest `end_time`; first one wins on ties.
pub fn last_record(records: &[LogRecord]) -> Option<&LogRecord> {
    records
        .iter()
        .reduce(|best, r| if r.end_time > best.end_time { r } else { best })
}
