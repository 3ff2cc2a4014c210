use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use relaunch::engine::MonitorEvent;
use relaunch::watch::{IgnoreRule, WatchRegistry};
use relaunch_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn two_dirs() -> std::io::Result<(tempfile::TempDir, tempfile::TempDir)> {
    Ok((tempfile::tempdir()?, tempfile::tempdir()?))
}

#[test]
fn starting_twice_creates_no_duplicates() -> TestResult {
    init_tracing();

    let (a, b) = two_dirs()?;
    let dirs = vec![a.path().to_path_buf(), b.path().to_path_buf()];
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut registry = WatchRegistry::new(tx);
    let ignore = IgnoreRule::default();

    assert_eq!(registry.start_watching(&dirs, &ignore), 2);
    let first: Vec<PathBuf> = registry.watched_dirs().iter().map(|p| p.to_path_buf()).collect();

    assert_eq!(registry.start_watching(&dirs, &ignore), 2);
    let second: Vec<PathBuf> = registry.watched_dirs().iter().map(|p| p.to_path_buf()).collect();

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn reset_empties_the_set_and_watching_again_restores_it() -> TestResult {
    let (a, b) = two_dirs()?;
    let dirs = vec![a.path().to_path_buf(), b.path().to_path_buf()];
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut registry = WatchRegistry::new(tx);
    let ignore = IgnoreRule::default();

    registry.start_watching(&dirs, &ignore);
    registry.stop_watching();
    assert_eq!(registry.active_count(), 0);
    assert!(registry.is_empty());

    registry.stop_watching();
    assert_eq!(registry.active_count(), 0);

    assert_eq!(registry.start_watching(&dirs, &ignore), 2);
    Ok(())
}

#[test]
fn unwatchable_directory_does_not_block_the_others() -> TestResult {
    init_tracing();

    let good = tempfile::tempdir()?;
    let missing = good.path().join("does-not-exist");
    let dirs = vec![missing, good.path().to_path_buf()];

    let (tx, _rx) = mpsc::unbounded_channel();
    let mut registry = WatchRegistry::new(tx);

    assert_eq!(registry.start_watching(&dirs, &IgnoreRule::default()), 1);
    assert_eq!(
        registry.watched_dirs()[0],
        good.path().canonicalize()?.as_path()
    );
    Ok(())
}

#[tokio::test]
async fn user_ignore_patterns_are_dropped_in_the_watcher() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    fs::create_dir_all(dir.path().join("build/nested"))?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut registry = WatchRegistry::new(tx);
    let ignore = IgnoreRule::from_patterns(&["build/**", "*.{tmp,swp}"])?;
    assert_eq!(registry.start_watching(&[dir.path().to_path_buf()], &ignore), 1);

    sleep(Duration::from_millis(250)).await;
    fs::write(dir.path().join("build/nested/out.js"), "x")?;
    fs::write(dir.path().join("scratch.tmp"), "x")?;
    fs::write(dir.path().join("app.js.swp"), "x")?;
    fs::write(dir.path().join("app.js"), "x")?;

    let mut forwarded: Vec<PathBuf> = Vec::new();
    while let Ok(Some(event)) = timeout(Duration::from_millis(500), rx.recv()).await {
        if let MonitorEvent::Changed(payload) = event {
            forwarded.extend(payload.into_paths());
        }
    }

    let names: Vec<String> = forwarded
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();

    assert!(names.iter().any(|n| n == "app.js"), "got {names:?}");
    assert!(!names.iter().any(|n| n == "out.js"), "got {names:?}");
    assert!(!names.iter().any(|n| n.ends_with(".tmp") || n.ends_with(".swp")), "got {names:?}");
    Ok(())
}
