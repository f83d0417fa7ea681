use crate::errors::{AppError, AppResult};
use crate::models::{ConversationState, LogRecord, UserSettings};
use crate::storage::BucketId;
use crate::utils::date::format_date;
use chrono::{DateTime, Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn parse_instant(idx: usize, raw: &str) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Local))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(AppError::InvalidInstant(raw.to_string())),
            )
        })
}

fn parse_optional_instant(idx: usize, raw: Option<String>) -> Result<Option<DateTime<Local>>> {
    raw.map(|s| parse_instant(idx, &s)).transpose()
}

pub fn map_record_row(row: &Row) -> Result<LogRecord> {
    let start: String = row.get("start_time")?;
    let end: String = row.get("end_time")?;

    Ok(LogRecord {
        id: row.get("id")?,
        start_time: parse_instant(1, &start)?,
        end_time: parse_instant(2, &end)?,
        message: row.get("message")?,
    })
}

pub fn map_settings_row(row: &Row) -> Result<UserSettings> {
    let state_str: String = row.get("current_state")?;
    let current_state = ConversationState::from_db_str(&state_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidState(state_str.clone())),
        )
    })?;

    Ok(UserSettings {
        user_id: row.get("user_id")?,
        work_started: parse_optional_instant(1, row.get("work_started")?)?,
        current_state,
        need_work_log_to: parse_optional_instant(3, row.get("need_work_log_to")?)?,
    })
}

pub fn load_settings(conn: &Connection) -> AppResult<Option<UserSettings>> {
    let settings = conn
        .query_row(
            "SELECT user_id, work_started, current_state, need_work_log_to
             FROM settings WHERE id = 1",
            [],
            map_settings_row,
        )
        .optional()?;
    Ok(settings)
}

pub fn save_settings(conn: &Connection, s: &UserSettings) -> AppResult<()> {
    conn.execute(
        "INSERT INTO settings (id, user_id, work_started, current_state, need_work_log_to)
         VALUES (1, ?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            user_id = excluded.user_id,
            work_started = excluded.work_started,
            current_state = excluded.current_state,
            need_work_log_to = excluded.need_work_log_to",
        params![
            s.user_id,
            s.work_started.map(|t| t.to_rfc3339()),
            s.current_state.to_db_str(),
            s.need_work_log_to.map(|t| t.to_rfc3339()),
        ],
    )?;
    Ok(())
}

pub fn find_bucket(conn: &Connection, date: &NaiveDate) -> AppResult<Option<BucketId>> {
    let bucket: Option<String> = conn
        .query_row(
            "SELECT bucket FROM log_navigation WHERE date = ?1",
            [format_date(date)],
            |row| row.get(0),
        )
        .optional()?;
    Ok(bucket.map(BucketId))
}

pub fn create_bucket(conn: &Connection, date: &NaiveDate) -> AppResult<BucketId> {
    let id = BucketId::for_date(date);
    conn.execute(
        "INSERT INTO log_navigation (date, bucket) VALUES (?1, ?2)",
        params![format_date(date), id.as_str()],
    )?;
    Ok(id)
}

pub fn load_records(conn: &Connection, bucket: &BucketId) -> AppResult<Vec<LogRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, start_time, end_time, message FROM log_records
         WHERE bucket = ?1
         ORDER BY seq ASC",
    )?;

    let rows = stmt.query_map([bucket.as_str()], map_record_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_record(conn: &Connection, bucket: &BucketId, rec: &LogRecord) -> AppResult<()> {
    conn.execute(
        "INSERT INTO log_records (id, bucket, seq, start_time, end_time, message)
         VALUES (?1, ?2,
                 (SELECT IFNULL(MAX(seq), 0) + 1 FROM log_records WHERE bucket = ?2),
                 ?3, ?4, ?5)",
        params![
            rec.id,
            bucket.as_str(),
            rec.start_time.to_rfc3339(),
            rec.end_time.to_rfc3339(),
            rec.message,
        ],
    )?;
    Ok(())
}

/// Returns the number of rows touched (0 or 1).
pub fn update_end_time(conn: &Connection, bucket: &BucketId, rec: &LogRecord) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE log_records SET end_time = ?1 WHERE bucket = ?2 AND id = ?3",
        params![rec.end_time.to_rfc3339(), bucket.as_str(), rec.id],
    )?;
    Ok(n)
}

pub fn list_dates(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT date FROM log_navigation ORDER BY date ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn delete_bucket(conn: &Connection, bucket: &BucketId) -> AppResult<()> {
    conn.execute("DELETE FROM log_records WHERE bucket = ?1", [bucket.as_str()])?;
    conn.execute(
        "DELETE FROM log_navigation WHERE bucket = ?1",
        [bucket.as_str()],
    )?;
    Ok(())
}
