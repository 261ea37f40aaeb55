use serde_json::json;

use opsdeck_core::{DetailKind, Status};
use opsdeck_net::wire::{self, ClientFrame, ServerFrame, ServerPush, WireError};

#[test]
fn replies_and_pushes_are_told_apart() {
    let reply = wire::decode(r#"{"ack":3,"data":[1,2]}"#).unwrap();
    match reply {
        ServerFrame::Reply { ack, data } => {
            assert_eq!(ack, 3);
            assert_eq!(data, json!([1, 2]));
        }
        ServerFrame::Push { .. } => panic!("classified a reply as a push"),
    }

    let push = wire::decode(r#"{"event":"log","data":"L1"}"#).unwrap();
    match push {
        ServerFrame::Push { event, data } => {
            assert_eq!(event, "log");
            assert_eq!(data, json!("L1"));
        }
        ServerFrame::Reply { .. } => panic!("classified a push as a reply"),
    }
}

#[test]
fn reply_data_defaults_to_null() {
    match wire::decode(r#"{"ack":1}"#).unwrap() {
        ServerFrame::Reply { data, .. } => assert!(data.is_null()),
        ServerFrame::Push { .. } => panic!("not a reply"),
    }
}

#[test]
fn group_pushes_parse_into_typed_payloads() {
    let push = wire::parse_push(
        "add group",
        json!({
            "id": "g1",
            "name": "Base system",
            "status": "todo",
            "instructions": [{ "id": "i1", "command": "apt install" }],
        }),
    )
    .unwrap();
    match push {
        ServerPush::AddGroup(group) => {
            assert_eq!(group.id, "g1");
            assert_eq!(group.instructions.len(), 1);
        }
        other => panic!("expected AddGroup, got {other:?}"),
    }

    // The remove payload is a bare id.
    match wire::parse_push("remove group", json!("g1")).unwrap() {
        ServerPush::RemoveGroup(id) => assert_eq!(id, "g1"),
        other => panic!("expected RemoveGroup, got {other:?}"),
    }
}

#[test]
fn status_push_tolerates_missing_optional_fields() {
    let push = wire::parse_push(
        "status",
        json!({ "instruction": "i7", "status": "failed", "info": "boom" }),
    )
    .unwrap();
    match push {
        ServerPush::Status(update) => {
            assert_eq!(update.instruction, "i7");
            assert_eq!(update.status, Status::Failed);
            assert_eq!(update.info, "boom");
            assert!(update.detail_type.is_none());
            assert!(update.detail.is_none());
        }
        other => panic!("expected Status, got {other:?}"),
    }

    let push = wire::parse_push(
        "status",
        json!({
            "instruction": "i7",
            "status": "failed",
            "info": "boom",
            "detail_type": "error",
            "detail": { "output": "exit 1" },
        }),
    )
    .unwrap();
    match push {
        ServerPush::Status(update) => {
            assert_eq!(update.detail_type, Some(DetailKind::Error));
            assert_eq!(update.detail, Some(json!({ "output": "exit 1" })));
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[test]
fn group_status_push_parses() {
    match wire::parse_push("group status", json!({ "group": "g2", "status": "applied" })).unwrap() {
        ServerPush::GroupStatus { group, status } => {
            assert_eq!(group, "g2");
            assert_eq!(status, Status::Applied);
        }
        other => panic!("expected GroupStatus, got {other:?}"),
    }
}

#[test]
fn log_push_keeps_the_entry_opaque() {
    let entry = json!({ "ts": "2024-03-01T12:00:00", "msg": "Added group \"Base\"" });
    match wire::parse_push("log", entry.clone()).unwrap() {
        ServerPush::Log(log) => assert_eq!(log, entry),
        other => panic!("expected Log, got {other:?}"),
    }
}

#[test]
fn unknown_push_names_are_an_explicit_error() {
    match wire::parse_push("rewind time", json!(null)) {
        Err(WireError::UnknownEvent(name)) => assert_eq!(name, "rewind time"),
        other => panic!("expected UnknownEvent, got {other:?}"),
    }
}

#[test]
fn client_frames_omit_absent_id_and_data() {
    let request = ClientFrame {
        id: Some(7),
        event: wire::GROUPS,
        data: None,
    };
    assert_eq!(
        serde_json::to_string(&request).unwrap(),
        r#"{"id":7,"event":"groups"}"#
    );

    let fire_and_forget = ClientFrame {
        id: None,
        event: wire::APPLY_GROUP,
        data: Some(json!("g1")),
    };
    assert_eq!(
        serde_json::to_string(&fire_and_forget).unwrap(),
        r#"{"event":"apply group","data":"g1"}"#
    );
}

#[test]
fn logs_response_parses_with_defaults() {
    let response: wire::LogsResponse =
        serde_json::from_value(json!({ "logs": ["a"], "reached_the_end": true })).unwrap();
    assert_eq!(response.logs, vec![json!("a")]);
    assert!(response.reached_the_end);

    let empty: wire::LogsResponse = serde_json::from_value(json!({})).unwrap();
    assert!(empty.logs.is_empty());
    assert!(!empty.reached_the_end);
}
