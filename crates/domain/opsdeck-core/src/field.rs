//! Form-field construction and validation for command parameters.
//!
//! `make_field` turns a parameter descriptor plus an optional initial
//! value into an editable field with the validator set its type calls
//! for. Validation short-circuits: only the first failing rule is
//! reported. Everything here is a pure function of its inputs.

use serde_json::Value;

use crate::command::{ParamDesc, ParamType};

/// Maximum accepted username length.
const USERNAME_MAX_LEN: usize = 30;

/// Symbolic validation failure. The `Display` impl carries the
/// human-readable message shown next to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Cannot be empty")]
    Required,
    #[error("Must be an absolute path: /.../...")]
    Filepath,
    #[error("Invalid username (0-9, a-z, A-Z, \".\", \"-\", \"_\")")]
    Username,
}

/// Current value of a form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
    /// Inert value for parameter types this client does not know.
    Null,
}

impl FieldValue {
    fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }
}

/// An editable parameter field: the current value plus the validator
/// set selected by the parameter type.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub id: String,
    pub value: FieldValue,
    kind: ParamType,
}

/// Build a field for `param`, seeded from `initial` when present and of
/// the right shape, falling back to the type's default otherwise.
pub fn make_field(param: &ParamDesc, initial: Option<&Value>) -> Field {
    let value = match param.kind {
        ParamType::Bool => FieldValue::Bool(initial.and_then(Value::as_bool).unwrap_or(false)),
        ParamType::String | ParamType::Text | ParamType::Filepath | ParamType::Username => {
            FieldValue::Text(
                initial
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            )
        }
        ParamType::StringArray => FieldValue::List(
            initial
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .map(|item| item.as_str().unwrap_or_default().to_string())
                        .collect()
                })
                .unwrap_or_else(|| vec![String::new()]),
        ),
        ParamType::Unknown => FieldValue::Null,
    };

    Field {
        id: param.id.clone(),
        value,
        kind: param.kind,
    }
}

impl Field {
    /// Run the field's validators against its current value, stopping at
    /// the first failure.
    pub fn validate(&self) -> Result<(), FieldError> {
        match self.kind {
            ParamType::Bool | ParamType::Unknown => Ok(()),
            ParamType::String | ParamType::Text => required_text(self.value.as_text()),
            ParamType::Filepath => {
                let text = self.value.as_text();
                required_text(text)?;
                filepath(text)
            }
            ParamType::Username => {
                let text = self.value.as_text();
                required_text(text)?;
                username(text)
            }
            ParamType::StringArray => match &self.value {
                FieldValue::List(items) => required_list(items),
                _ => Err(FieldError::Required),
            },
        }
    }
}

fn required_text(value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        Err(FieldError::Required)
    } else {
        Ok(())
    }
}

fn required_list(items: &[String]) -> Result<(), FieldError> {
    if items.is_empty() || items.iter().any(|item| item.is_empty()) {
        Err(FieldError::Required)
    } else {
        Ok(())
    }
}

fn filepath(value: &str) -> Result<(), FieldError> {
    if value.starts_with('/') && !value.ends_with('/') {
        Ok(())
    } else {
        Err(FieldError::Filepath)
    }
}

fn username(value: &str) -> Result<(), FieldError> {
    if value.len() > USERNAME_MAX_LEN {
        return Err(FieldError::Username);
    }

    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return Err(FieldError::Username),
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_')) {
        Ok(())
    } else {
        Err(FieldError::Username)
    }
}
