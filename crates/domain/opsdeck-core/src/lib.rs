use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod command;
pub mod field;

pub use command::{Command, ParamDesc, ParamType};
pub use field::{make_field, Field, FieldError, FieldValue};

pub type GroupId = String;
pub type InstructionId = String;

/// Append-only log record. The core keeps it opaque; ordering is the only
/// structure it relies on.
pub type LogEntry = Value;

/// Run state shared by groups and instructions. Always server-computed;
/// the client never derives one status from another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// May appear in details (eg. cell color), but not in messages.
    #[serde(rename = "")]
    None,
    Applied,
    Running,
    Todo,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Tag selecting how an instruction's detail payload is interpreted.
/// Tags this client does not know fall back to the raw rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    Error,
    Table,
    Terminal,
    #[serde(other)]
    Raw,
}

/// A single executable step inside a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Unique across the whole system, not just within its group.
    pub id: InstructionId,
    /// Name of the command template this instruction instantiates.
    #[serde(default)]
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub info: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_type: Option<DetailKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

/// A named, ordered collection of instructions with its own status.
/// Instruction order is display/execution order and must be preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub status: Status,
}
