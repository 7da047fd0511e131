use std::sync::Once;
use std::time::Duration;

use pretty_assertions::assert_eq;
use sct_core::{
    ConsoleEntry, Message, Msg, Slice, SliceUpdate, StateStore, SystemStatus, TestRecord,
};
use sct_feed::{MessageSource, MonitorSession, SourceSettings};
use serde_json::json;

const WAIT: Duration = Duration::from_secs(5);

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(sct_logging::initialize_for_tests);
}

fn session() -> MonitorSession {
    init_logging();
    let source = MessageSource::new(SourceSettings::default()).unwrap();
    MonitorSession::new(StateStore::new(), source)
}

fn record(id: u32) -> TestRecord {
    TestRecord(json!({ "id": id }))
}

#[test]
fn test_results_converge_to_count_then_reset() {
    let mut session = session();
    session.source().set_messages(vec![Message::TestResults(vec![
        vec![record(1), record(2)],
        vec![record(3)],
    ])]);
    assert!(session.wait_until(WAIT, |state| state.record_count() == 3));

    session
        .source()
        .set_messages(vec![Message::TestResults(Vec::new())]);
    assert!(session.wait_until(WAIT, |state| state.record_count() == 0));
}

#[test]
fn logged_entry_is_visible_until_cleared() {
    let mut session = session();
    let console = session.subscribe(Slice::Console);
    let entry = ConsoleEntry::new("2024-01-01", "INFO", "x");

    session
        .source()
        .set_messages(vec![Message::Logs(vec![entry.clone()])]);
    assert!(session.wait_until(WAIT, |state| state.console().contains(&entry)));
    assert_eq!(
        console.recv_timeout(WAIT).unwrap(),
        SliceUpdate::Console(vec![entry.clone()])
    );

    session.dispatch(Msg::ClearConsoleClicked);
    assert!(!session.state().console().contains(&entry));
    assert_eq!(
        console.recv_timeout(WAIT).unwrap(),
        SliceUpdate::Console(Vec::new())
    );
}

#[test]
fn mixed_stream_is_reconciled_in_order() {
    let mut session = session();
    let status_rx = session.subscribe(Slice::Status);
    session.source().set_messages(vec![
        Message::Status(SystemStatus(json!({ "state": "initialized" }))),
        Message::TestResults(vec![vec![record(1)]]),
        Message::Unknown {
            kind: "yield".to_string(),
            payload: json!([]),
        },
        Message::Logs(vec![ConsoleEntry::new("d", "INFO", "a")]),
        Message::Status(SystemStatus(json!({ "state": "ready" }))),
    ]);

    let processed = session.run_until_idle(Duration::from_millis(200));
    assert_eq!(processed, 5);
    assert_eq!(session.turn(), 5);

    let state = session.state();
    assert_eq!(state.status().state(), Some("ready"));
    assert_eq!(state.record_count(), 1);
    assert_eq!(state.console().len(), 1);

    let states: Vec<_> = status_rx
        .try_iter()
        .map(|update| match update {
            SliceUpdate::Status(status) => status.state().map(str::to_owned),
            other => panic!("unexpected update {other:?}"),
        })
        .collect();
    assert_eq!(
        states,
        vec![Some("initialized".to_string()), Some("ready".to_string())]
    );
}

#[test]
fn wait_until_times_out_without_messages() {
    let mut session = session();
    assert!(!session.wait_until(Duration::from_millis(50), |state| state.record_count() > 0));
    assert_eq!(session.turn(), 0);
}

#[test]
fn wait_until_accepts_unbounded_timeout() {
    let mut session = session();
    assert!(session.wait_until(Duration::MAX, |state| state.record_count() == 0));

    session
        .source()
        .set_messages(vec![Message::TestResults(vec![vec![record(1), record(2)]])]);
    assert!(session.wait_until(Duration::MAX, |state| state.record_count() == 2));
}

#[test]
fn injected_state_is_kept() {
    init_logging();
    let source = MessageSource::new(SourceSettings::default()).unwrap();
    let (seeded, _) = sct_core::update(
        StateStore::new(),
        Msg::Server(Message::TestResults(vec![vec![record(1), record(2)]])),
    );
    let mut session = MonitorSession::new(seeded, source);

    session
        .source()
        .set_messages(vec![Message::TestResults(vec![vec![record(3)]])]);
    assert!(session.wait_until(WAIT, |state| state.record_count() == 3));
    assert_eq!(session.into_state().record_count(), 3);
}
