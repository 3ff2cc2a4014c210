use std::path::PathBuf;
use std::sync::Arc;

use relaunch::engine::MonitorState;
use relaunch::types::PathStyle;
use relaunch::watch::{ChangeFilter, ChangePayload, Matcher};
use relaunch_test_utils::{capture_logs, find_line, init_tracing};

fn rules(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn js_filter(state: Arc<MonitorState>) -> ChangeFilter {
    ChangeFilter::from_rules(&rules(&["*.js"]), &[], state)
        .unwrap()
        .with_path_style(PathStyle::Posix)
        .with_cwd("/proj")
}

#[test]
fn non_matching_change_logs_one_before_zero_after() {
    let state = Arc::new(MonitorState::new());
    let filter = js_filter(Arc::clone(&state));

    let (pass, logs) = capture_logs(|| filter.apply(ChangePayload::from("/proj/app.coffee")));
    let pass = pass.expect("filter pass should run");

    assert_eq!(pass.considered, 1);
    assert!(pass.matched.is_empty());

    let line = find_line(&logs, "changes after filters (before/after):")
        .unwrap_or_else(|| panic!("summary line missing from logs:\n{logs}"));
    assert_eq!(line.trim_end().rsplit(' ').next(), Some("1/0"));
    assert!(find_line(&logs, "app.coffee").is_some(), "considered files are logged");
}

#[test]
fn matching_batch_logs_its_count_pair() {
    let state = Arc::new(MonitorState::new());
    let filter = js_filter(state);

    let (_, logs) = capture_logs(|| {
        filter.apply(ChangePayload::Batch(vec![
            PathBuf::from("/proj/a.js"),
            PathBuf::from("/proj/b.css"),
            PathBuf::from("/proj/c.js"),
        ]))
    });

    let line = find_line(&logs, "changes after filters").expect("summary line");
    assert!(line.trim_end().ends_with(" 3/2"), "unexpected summary: {line}");
}

#[test]
fn matching_batch_keeps_input_order() {
    let state = Arc::new(MonitorState::new());
    let payload = ChangePayload::Batch(vec![
        PathBuf::from("/proj/z.js"),
        PathBuf::from("/proj/readme.md"),
        PathBuf::from("/proj/a.js"),
    ]);

    let pass = js_filter(state).apply(payload).unwrap();
    assert_eq!(
        pass.matched.result,
        vec![PathBuf::from("/proj/z.js"), PathBuf::from("/proj/a.js")]
    );
    assert_eq!(pass.matched.ignored, 1);
}

#[test]
fn empty_notification_is_dropped_without_touching_state() {
    let state = Arc::new(MonitorState::new());
    let out = js_filter(Arc::clone(&state)).apply(ChangePayload::Batch(Vec::new()));

    assert!(out.is_none());
    assert!(state.last_started().is_none());
}

#[test]
fn last_started_advances_even_without_matches() {
    let state = Arc::new(MonitorState::new());
    let filter = js_filter(Arc::clone(&state));

    filter.apply("/proj/style.css".into()).unwrap();
    let first = state.last_started().expect("advanced after a non-matching pass");

    filter.apply("/proj/app.js".into()).unwrap();
    let second = state.last_started().unwrap();
    assert!(second >= first);
}

#[test]
fn broken_rule_is_rejected_before_any_pass_runs() {
    init_tracing();

    let state = Arc::new(MonitorState::new());
    let filter = ChangeFilter::from_rules(&rules(&["src/[broken"]), &[], Arc::clone(&state));

    assert!(filter.is_err());
    assert!(state.last_started().is_none());
}

#[test]
fn prebuilt_matcher_is_reused_across_passes() {
    let state = Arc::new(MonitorState::new());
    let matcher = Matcher::new(&rules(&["*.rb"]), &[]).unwrap();
    let filter = ChangeFilter::new(matcher, state).with_path_style(PathStyle::Posix);

    for _ in 0..3 {
        let pass = filter.apply("/proj/app.rb".into()).unwrap();
        assert_eq!(pass.matched.len(), 1);
    }
    assert!(filter.apply("/proj/app.py".into()).unwrap().matched.is_empty());
}

#[test]
fn drive_letter_style_normalizes_before_matching() {
    let state = Arc::new(MonitorState::new());
    let filter = ChangeFilter::from_rules(&[], &rules(&["js"]), state)
        .unwrap()
        .with_path_style(PathStyle::DriveLetter);

    let pass = filter.apply(r"c:\foo\bar.js".into()).unwrap();
    assert_eq!(pass.matched.result, vec![PathBuf::from(r"C:\foo\bar.js")]);
}

#[test]
fn extension_list_applies_on_top_of_rules() {
    let state = Arc::new(MonitorState::new());
    let filter = ChangeFilter::from_rules(&rules(&["src"]), &rules(&["rs"]), state)
        .unwrap()
        .with_path_style(PathStyle::Posix);

    let pass = filter
        .apply(ChangePayload::Batch(vec![
            PathBuf::from("/proj/src/main.rs"),
            PathBuf::from("/proj/src/notes.txt"),
            PathBuf::from("/proj/build.rs"),
        ]))
        .unwrap();

    assert_eq!(pass.matched.result, vec![PathBuf::from("/proj/src/main.rs")]);
}
