use serde_json::json;

use opsdeck_core::{DetailKind, Group, Instruction, ParamType, Status};

#[test]
fn statuses_decode_from_their_wire_names() {
    assert_eq!(serde_json::from_value::<Status>(json!("applied")).unwrap(), Status::Applied);
    assert_eq!(serde_json::from_value::<Status>(json!("failed")).unwrap(), Status::Failed);
    assert_eq!(serde_json::from_value::<Status>(json!("")).unwrap(), Status::None);
}

#[test]
fn unrecognized_status_decodes_as_unknown() {
    assert_eq!(
        serde_json::from_value::<Status>(json!("exploded")).unwrap(),
        Status::Unknown
    );
}

#[test]
fn unrecognized_detail_tag_falls_back_to_raw() {
    assert_eq!(
        serde_json::from_value::<DetailKind>(json!("terminal")).unwrap(),
        DetailKind::Terminal
    );
    assert_eq!(
        serde_json::from_value::<DetailKind>(json!("hologram")).unwrap(),
        DetailKind::Raw
    );
}

#[test]
fn param_types_decode_including_the_list_form() {
    assert_eq!(
        serde_json::from_value::<ParamType>(json!("[string]")).unwrap(),
        ParamType::StringArray
    );
    assert_eq!(
        serde_json::from_value::<ParamType>(json!("filepath")).unwrap(),
        ParamType::Filepath
    );
    assert_eq!(
        serde_json::from_value::<ParamType>(json!("widget")).unwrap(),
        ParamType::Unknown
    );
}

#[test]
fn minimal_instruction_decodes_with_defaults() {
    let instruction: Instruction = serde_json::from_value(json!({ "id": "i1" })).unwrap();
    assert_eq!(instruction.id, "i1");
    assert_eq!(instruction.status, Status::Unknown);
    assert!(instruction.info.is_empty());
    assert!(instruction.detail_type.is_none());
    assert!(instruction.detail.is_none());
}

#[test]
fn group_preserves_instruction_order() {
    let group: Group = serde_json::from_value(json!({
        "id": "g1",
        "name": "Base system",
        "status": "todo",
        "instructions": [
            { "id": "i1", "command": "apt update" },
            { "id": "i2", "command": "apt install" },
            { "id": "i3", "command": "file content" },
        ],
    }))
    .unwrap();

    let ids: Vec<&str> = group.instructions.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["i1", "i2", "i3"]);
    assert_eq!(group.status, Status::Todo);
}
