use pretty_assertions::assert_eq;
use sct_core::{decode_message, ConsoleEntry, Message, MessageDecodeError, SystemStatus};
use serde_json::json;

#[test]
fn decodes_recognized_kinds() {
    let status = decode_message(r#"{"type":"status","payload":{"state":"ready","error_message":""}}"#)
        .unwrap();
    assert_eq!(
        status,
        Message::Status(SystemStatus(json!({ "state": "ready", "error_message": "" })))
    );

    let results = decode_message(r#"{"type":"testresults","payload":[[{"a":1},{"a":2}],[{"a":3}]]}"#)
        .unwrap();
    match results {
        Message::TestResults(batches) => {
            assert_eq!(batches.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 1]);
        }
        other => panic!("expected test results, got {other:?}"),
    }

    let logs = decode_message(
        r#"{"type":"logs","payload":[{"date":"2024-01-01","type":"INFO","description":"x"}]}"#,
    )
    .unwrap();
    assert_eq!(
        logs,
        Message::Logs(vec![ConsoleEntry::new("2024-01-01", "INFO", "x")])
    );
}

#[test]
fn unrecognized_kind_decodes_to_unknown() {
    let message = decode_message(r#"{"type":"usersettings","payload":{"x":1}}"#).unwrap();
    assert_eq!(message.kind(), "usersettings");
    assert!(matches!(message, Message::Unknown { .. }));

    // Tags are case-sensitive.
    let message = decode_message(r#"{"type":"Status","payload":{}}"#).unwrap();
    assert!(matches!(message, Message::Unknown { .. }));
}

#[test]
fn status_payload_is_not_validated() {
    let message = decode_message(r#"{"type":"status","payload":"garbage"}"#).unwrap();
    assert_eq!(message, Message::Status(SystemStatus(json!("garbage"))));

    let message = decode_message(r#"{"type":"status"}"#).unwrap();
    assert_eq!(message, Message::Status(SystemStatus(json!(null))));
}

#[test]
fn partially_malformed_batches_are_rejected() {
    let err = decode_message(r#"{"type":"testresults","payload":[[{"a":1}],{"a":2}]}"#)
        .unwrap_err();
    assert!(matches!(err, MessageDecodeError::Payload { ref kind, .. } if kind == "testresults"));

    let err = decode_message(r#"{"type":"logs","payload":{"date":"d"}}"#).unwrap_err();
    assert!(matches!(err, MessageDecodeError::Payload { .. }));
}

#[test]
fn envelope_errors() {
    assert!(matches!(
        decode_message("not json"),
        Err(MessageDecodeError::NotJson(_))
    ));
    assert!(matches!(
        decode_message("[1,2]"),
        Err(MessageDecodeError::NotAnObject)
    ));
    assert!(matches!(
        decode_message(r#"{"payload":[]}"#),
        Err(MessageDecodeError::MissingType)
    ));
    assert!(matches!(
        decode_message(r#"{"type":7,"payload":[]}"#),
        Err(MessageDecodeError::MissingType)
    ));
}

#[test]
fn wire_value_uses_type_and_payload() {
    let message = Message::Logs(vec![ConsoleEntry::new("d", "INFO", "x")]);
    assert_eq!(
        message.to_value(),
        json!({ "type": "logs", "payload": [{ "date": "d", "type": "INFO", "description": "x" }] })
    );
}
