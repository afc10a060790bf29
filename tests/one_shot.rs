#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;

use scriptherd::config::model::ScriptsSection;
use scriptherd::exec::Dispatcher;
use scriptherd::registry::ScriptRegistry;
use scriptherd::run_once;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn write_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut perms = fs::metadata(&path).expect("stat script").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod script");
}

async fn wait_for_file(path: &Path) -> bool {
    for _ in 0..200 {
        if path.exists() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    false
}

fn registry(direct: &[&str]) -> ScriptRegistry {
    ScriptRegistry::from_config(&ScriptsSection {
        dir: "scripts".to_string(),
        direct: direct.iter().map(|s| s.to_string()).collect(),
        family: Vec::new(),
        runner: None,
    })
    .expect("valid registry")
}

#[tokio::test]
async fn known_name_dispatches_once_without_the_polling_loop() -> TestResult {
    let tmp = TempDir::new()?;
    let marker = tmp.path().join("ran");
    write_script(tmp.path(), "beta", &format!("touch {}", marker.display()));

    let registry = registry(&["beta"]);
    let dispatcher = Dispatcher::new(tmp.path());

    let report = run_once(&registry, &dispatcher, &["beta".to_string()]);

    assert_eq!(report.dispatched, vec!["beta".to_string()]);
    assert!(report.unknown.is_empty());
    assert!(report.failed.is_empty());
    assert!(wait_for_file(&marker).await, "script never ran");

    Ok(())
}

#[tokio::test]
async fn unknown_name_is_reported_without_aborting_the_others() -> TestResult {
    let tmp = TempDir::new()?;
    let marker = tmp.path().join("ran");
    write_script(tmp.path(), "beta", &format!("touch {}", marker.display()));

    let registry = registry(&["beta"]);
    let dispatcher = Dispatcher::new(tmp.path());

    let report = run_once(
        &registry,
        &dispatcher,
        &["ghost".to_string(), "beta".to_string()],
    );

    assert_eq!(report.unknown, vec!["ghost".to_string()]);
    assert_eq!(report.dispatched, vec!["beta".to_string()]);
    assert!(wait_for_file(&marker).await, "script never ran");

    Ok(())
}

#[tokio::test]
async fn missing_entry_point_counts_as_failed_not_unknown() -> TestResult {
    let tmp = TempDir::new()?;

    let registry = registry(&["beta"]);
    let dispatcher = Dispatcher::new(tmp.path());

    let report = run_once(&registry, &dispatcher, &["beta".to_string()]);

    assert!(report.dispatched.is_empty());
    assert!(report.unknown.is_empty());
    assert_eq!(report.failed, vec!["beta".to_string()]);

    Ok(())
}
