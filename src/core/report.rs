use crate::models::LogRecord;
use crate::models::log_record::{first_record, last_record};
use crate::utils::formatting::format_elapsed;
use crate::utils::time::clock_label;

/// Render the time report for a set of records.
///
/// The header spans the earliest start to the latest end (by `end_time`),
/// while the body keeps store order. `None` for an empty set.
pub fn render_report(title: &str, records: &[LogRecord]) -> Option<String> {
    let first = first_record(records)?;
    let last = last_record(records)?;

    let mut out = format!(
        "Time report for {} {}-{}:",
        title,
        clock_label(&first.start_time),
        clock_label(&last.end_time)
    );

    for r in records {
        out.push_str(&format!(
            "\nTask: {}, Start: {}, End: {}, Spent: {}",
            r.message,
            clock_label(&r.start_time),
            clock_label(&r.end_time),
            format_elapsed(r.elapsed())
        ));
    }

    Some(out)
}
