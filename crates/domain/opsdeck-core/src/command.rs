use serde::{Deserialize, Serialize};

/// Parameter type in a command template. Unrecognized types decode as
/// `Unknown` and yield inert fields with no validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Bool,
    String,
    Text,
    Filepath,
    Username,
    #[serde(rename = "[string]")]
    StringArray,
    #[serde(other)]
    Unknown,
}

/// One typed parameter slot in a command template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDesc {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ParamType,
}

/// Template describing an instruction's invocable form: a unique name
/// plus the parameter schema used to create or edit an instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ParamDesc>,
}
