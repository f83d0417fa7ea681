//! Formatting utilities used for reports and CLI output.

use chrono::TimeDelta;

/// Render an elapsed interval as `<H>h <M>m`, omitting zero units.
///
/// 45 minutes → `" 45m"`, 90 minutes → `"1h 30m"`, 0 → `""`.
pub fn format_elapsed(delta: TimeDelta) -> String {
    let hours = delta.num_hours();
    let minutes = delta.num_minutes() % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if minutes > 0 {
        out.push_str(&format!(" {}m", minutes));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_omits_zero_units() {
        assert_eq!(format_elapsed(TimeDelta::zero()), "");
        assert_eq!(format_elapsed(TimeDelta::minutes(30)), " 30m");
        assert_eq!(format_elapsed(TimeDelta::minutes(45)), " 45m");
        assert_eq!(format_elapsed(TimeDelta::minutes(60)), "1h");
        assert_eq!(format_elapsed(TimeDelta::minutes(65)), "1h 5m");
        assert_eq!(format_elapsed(TimeDelta::minutes(90)), "1h 30m");
    }

    #[test]
    fn seconds_below_a_minute_do_not_show() {
        assert_eq!(format_elapsed(TimeDelta::seconds(59)), "");
        assert_eq!(format_elapsed(TimeDelta::seconds(125)), " 2m");
    }
}
