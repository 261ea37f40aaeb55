//! JSON frames exchanged with the dashboard server.
//!
//! Every frame is one WebSocket text message. Client frames carry an
//! `id` iff a reply is expected; the server answers with a matching
//! `ack`. Server pushes carry an `event` name and are parsed into the
//! typed [`ServerPush`] sum so the event table stays exhaustive.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use opsdeck_core::{DetailKind, Group, GroupId, InstructionId, LogEntry, Status};

// Request names understood by the server.
pub const GROUPS: &str = "groups";
pub const COMMANDS: &str = "commands";
pub const LOGS: &str = "logs";
pub const USERS: &str = "users";
pub const GLOBAL_VARIABLES: &str = "global variables";

// Fire-and-forget names.
pub const APPLY_GROUP: &str = "apply group";
pub const APPLY_INSTRUCTION: &str = "apply instruction";

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown push event {0:?}")]
    UnknownEvent(String),
}

/// Outbound frame.
#[derive(Debug, Serialize)]
pub struct ClientFrame<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Inbound frame: a reply to a pending request, or a push.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ServerFrame {
    Reply {
        ack: u64,
        #[serde(default)]
        data: Value,
    },
    Push {
        event: String,
        #[serde(default)]
        data: Value,
    },
}

pub fn decode(text: &str) -> Result<ServerFrame, WireError> {
    Ok(serde_json::from_str(text)?)
}

/// Payload of a `status` push: one instruction's new run state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionStatus {
    pub instruction: InstructionId,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub info: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_type: Option<DetailKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

/// Server-originated state change, keyed by event name.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerPush {
    AddGroup(Group),
    ModifyGroup(Group),
    RemoveGroup(GroupId),
    Status(InstructionStatus),
    GroupStatus { group: GroupId, status: Status },
    Log(LogEntry),
}

pub fn parse_push(event: &str, data: Value) -> Result<ServerPush, WireError> {
    match event {
        "add group" => Ok(ServerPush::AddGroup(serde_json::from_value(data)?)),
        "modify group" => Ok(ServerPush::ModifyGroup(serde_json::from_value(data)?)),
        "remove group" => Ok(ServerPush::RemoveGroup(serde_json::from_value(data)?)),
        "status" => Ok(ServerPush::Status(serde_json::from_value(data)?)),
        "group status" => {
            let payload: GroupStatusPayload = serde_json::from_value(data)?;
            Ok(ServerPush::GroupStatus {
                group: payload.group,
                status: payload.status,
            })
        }
        "log" => Ok(ServerPush::Log(data)),
        other => Err(WireError::UnknownEvent(other.to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct GroupStatusPayload {
    group: GroupId,
    #[serde(default)]
    status: Status,
}

/// Reply payload of a `logs` request. `logs` is oldest-first on the
/// wire; the synchronization core reverses it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub reached_the_end: bool,
}
