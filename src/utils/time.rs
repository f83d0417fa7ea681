//! Time utilities: checkpoint generation, grid rounding, clock labels and
//! the millisecond payload used by instant choices.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, DurationRound, Local, TimeDelta, TimeZone};

/// Checkpoints `start, start+step, start+2*step, ...` up to and including `end`.
///
/// Empty when `start > end`. A non-positive `step` yields at most `start`.
pub fn generate_intervals<Tz: TimeZone>(
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    step: TimeDelta,
) -> Vec<DateTime<Tz>> {
    let mut out = Vec::new();

    if step <= TimeDelta::zero() {
        if start <= end {
            out.push(start);
        }
        return out;
    }

    let mut current = start;
    while current <= end {
        let next = current.clone() + step;
        out.push(current);
        current = next;
    }

    out
}

/// Round to the nearest multiple of `minutes` (ties go up).
pub fn round_to_minutes(t: DateTime<Local>, minutes: i64) -> AppResult<DateTime<Local>> {
    if minutes <= 0 {
        return Ok(t);
    }
    t.duration_round(TimeDelta::minutes(minutes))
        .map_err(|e| AppError::Other(format!("cannot round {t} to {minutes}m: {e}")))
}

/// `HH:MM` label shown to the user.
pub fn clock_label(t: &DateTime<Local>) -> String {
    t.format("%H:%M").to_string()
}

/// Encode an instant as a callback payload (Unix milliseconds).
pub fn instant_payload(t: &DateTime<Local>) -> String {
    t.timestamp_millis().to_string()
}

/// Decode a callback payload produced by [`instant_payload`].
pub fn parse_instant_payload(payload: &str) -> AppResult<DateTime<Local>> {
    let millis: i64 = payload
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInstant(payload.to_string()))?;

    Local
        .timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| AppError::InvalidInstant(payload.to_string()))
}

/// Compare two instants at second granularity.
pub fn same_or_after_second(a: &DateTime<Local>, b: &DateTime<Local>) -> bool {
    a.timestamp() >= b.timestamp()
}
