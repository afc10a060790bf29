use scriptherd::report::{schedule_table, section_bar};
use scriptherd::schedule::ScheduleEntry;

#[test]
fn section_bars_have_a_fixed_width() {
    let start = section_bar("START");
    let schedule = section_bar("SCHEDULE");

    assert_eq!(start.len(), schedule.len());
    assert!(start.contains(" START "));
    assert!(start.starts_with('='));
    assert!(start.ends_with('='));
}

#[test]
fn schedule_table_aligns_columns_and_shows_disabled_entries() {
    let entries = vec![
        ScheduleEntry::new("sync_assets".to_string(), "daily(09:00)"),
        ScheduleEntry::new("archive_media_collection".to_string(), "weekly(monday@02:30)"),
        ScheduleEntry::new("off".to_string(), ""),
    ];

    let table = schedule_table(&entries);
    let lines: Vec<&str> = table.lines().collect();

    // Border, header, border, three rows, border.
    assert_eq!(lines.len(), 7);
    assert!(lines[1].contains("Script"));
    assert!(lines[1].contains("Schedule"));

    // Every line is the same width.
    let width = lines[0].len();
    assert!(lines.iter().all(|l| l.len() == width));

    // Entries keep their order; a disabled entry renders as "-".
    assert!(lines[3].contains("sync_assets"));
    assert!(lines[4].contains("archive_media_collection"));
    assert!(lines[5].contains("| off"));
    assert!(lines[5].contains(" - "));
}
