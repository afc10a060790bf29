// src/report.rs

//! Human-readable rendering of schedule announcements.

use crate::schedule::ScheduleEntry;

const BAR_WIDTH: usize = 40;

/// Fixed-width section banner, e.g. `================ START =================`.
pub fn section_bar(label: &str) -> String {
    let label = label.trim();
    let pad = BAR_WIDTH.saturating_sub(label.len() + 2);
    let left = pad / 2;
    let right = pad - left;
    format!("{} {} {}", "=".repeat(left), label, "=".repeat(right))
}

/// Two-column table of the flattened schedule, in display order.
///
/// Disabled entries render with `-` in the schedule column so turned-off
/// scripts stay visible in the announcement.
pub fn schedule_table(entries: &[ScheduleEntry]) -> String {
    let display_raw = |e: &ScheduleEntry| -> String {
        let raw = e.raw.trim();
        if raw.is_empty() {
            "-".to_string()
        } else {
            raw.to_string()
        }
    };

    let name_w = entries
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(0)
        .max("Script".len());
    let spec_w = entries
        .iter()
        .map(|e| display_raw(e).len())
        .max()
        .unwrap_or(0)
        .max("Schedule".len());

    let sep = format!("+-{}-+-{}-+", "-".repeat(name_w), "-".repeat(spec_w));

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&format!("| {:<name_w$} | {:<spec_w$} |", "Script", "Schedule"));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for entry in entries {
        out.push_str(&format!(
            "| {:<name_w$} | {:<spec_w$} |",
            entry.name,
            display_raw(entry)
        ));
        out.push('\n');
    }
    out.push_str(&sep);
    out
}
