use std::error::Error;

use scriptherd::config::model::ConfigFile;
use scriptherd::registry::ScriptRegistry;
use scriptherd::schedule::{ScheduleIssue, SpecStatus, flatten, validate_entries};

type TestResult = Result<(), Box<dyn Error>>;

fn config(toml_src: &str) -> Result<ConfigFile, Box<dyn Error>> {
    Ok(toml::from_str(toml_src)?)
}

#[test]
fn flat_mapping_flattens_to_itself() -> TestResult {
    let cfg = config(
        r#"
        [scripts]
        direct = ["prune_cache", "sync_assets"]

        [schedule]
        sync_assets = "daily(09:00)"
        prune_cache = "hourly(30)"
        "#,
    )?;

    let entries = flatten(&cfg.schedule);
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

    assert_eq!(names, vec!["prune_cache", "sync_assets"]);
    assert_eq!(entries[0].raw, "hourly(30)");
    assert_eq!(entries[1].raw, "daily(09:00)");
    assert!(matches!(entries[0].spec, SpecStatus::Active(_)));

    Ok(())
}

#[test]
fn grouped_mapping_flattens_to_inner_keys() -> TestResult {
    let cfg = config(
        r#"
        [scripts]
        family = ["archive"]
        runner = "run_family"

        [schedule.archive]
        archive_media = "weekly(monday@06:00)"
        archive_books = "weekly(tuesday@07:00)"
        "#,
    )?;

    let entries = flatten(&cfg.schedule);
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

    // One entry per leaf, named by the inner key; the family key is gone.
    assert_eq!(names, vec!["archive_books", "archive_media"]);
    assert!(!names.contains(&"archive"));

    Ok(())
}

#[test]
fn blank_value_disables_an_entry() -> TestResult {
    let cfg = config(
        r#"
        [scripts]
        direct = ["sync_assets"]

        [schedule]
        sync_assets = ""
        "#,
    )?;

    let entries = flatten(&cfg.schedule);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].spec, SpecStatus::Disabled);

    let registry = ScriptRegistry::from_config(&cfg.scripts)?;
    let (eligible, issues) = validate_entries(&entries, &registry);
    assert!(eligible.is_empty());
    assert!(issues.is_empty());

    Ok(())
}

#[test]
fn invalid_spec_is_reported_and_never_eligible() -> TestResult {
    let cfg = config(
        r#"
        [scripts]
        direct = ["sync_assets"]

        [schedule]
        sync_assets = "whenever"
        "#,
    )?;

    let entries = flatten(&cfg.schedule);
    assert_eq!(entries[0].spec, SpecStatus::Invalid);

    let registry = ScriptRegistry::from_config(&cfg.scripts)?;
    let (eligible, issues) = validate_entries(&entries, &registry);
    assert!(eligible.is_empty());
    assert_eq!(
        issues,
        vec![ScheduleIssue::InvalidSpec {
            name: "sync_assets".to_string(),
            raw: "whenever".to_string(),
        }]
    );

    Ok(())
}

#[test]
fn duplicate_flattened_names_keep_the_first() -> TestResult {
    // "sync_assets" appears both as a flat entry and inside a group. The
    // group key "archive" sorts before "sync_assets", so its inner entry is
    // flattened first and wins.
    let cfg = config(
        r#"
        [scripts]
        direct = ["sync_assets"]
        family = ["archive"]
        runner = "run_family"

        [schedule]
        sync_assets = "daily(09:00)"

        [schedule.archive]
        sync_assets = "daily(10:00)"
        "#,
    )?;

    let entries = flatten(&cfg.schedule);
    assert_eq!(entries.len(), 2);

    let registry = ScriptRegistry::from_config(&cfg.scripts)?;
    let (eligible, issues) = validate_entries(&entries, &registry);

    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].raw, "daily(10:00)");
    assert_eq!(
        issues,
        vec![ScheduleIssue::Duplicate {
            name: "sync_assets".to_string(),
        }]
    );

    Ok(())
}

#[test]
fn name_outside_the_registry_is_reported() -> TestResult {
    let cfg = config(
        r#"
        [scripts]
        direct = ["sync_assets"]

        [schedule]
        ghost = "daily(09:00)"
        "#,
    )?;

    let entries = flatten(&cfg.schedule);
    let registry = ScriptRegistry::from_config(&cfg.scripts)?;
    let (eligible, issues) = validate_entries(&entries, &registry);

    assert!(eligible.is_empty());
    assert_eq!(
        issues,
        vec![ScheduleIssue::UnknownScript {
            name: "ghost".to_string(),
        }]
    );
    assert_eq!(issues[0].to_string(), "Script: ghost does not exist");

    Ok(())
}

#[test]
fn changing_one_grouped_instance_changes_the_snapshot() -> TestResult {
    let before = config(
        r#"
        [scripts]
        family = ["job"]
        runner = "run_family"

        [schedule.job]
        job_x = "06:00"
        job_y = "07:00"
        "#,
    )?;
    let after = config(
        r#"
        [scripts]
        family = ["job"]
        runner = "run_family"

        [schedule.job]
        job_x = "06:00"
        job_y = "08:00"
        "#,
    )?;

    let old = flatten(&before.schedule);
    let new = flatten(&after.schedule);

    // The snapshot comparison that drives re-announcement.
    assert_ne!(old, new);
    // Only the changed instance differs.
    assert_eq!(old[0], new[0]);
    assert_ne!(old[1], new[1]);

    Ok(())
}
