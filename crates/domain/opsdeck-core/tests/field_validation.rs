use serde_json::json;

use opsdeck_core::{make_field, FieldError, FieldValue, ParamDesc, ParamType};

fn param(id: &str, kind: ParamType) -> ParamDesc {
    ParamDesc {
        id: id.to_string(),
        title: String::new(),
        kind,
    }
}

#[test]
fn defaults_follow_the_parameter_type() {
    assert_eq!(
        make_field(&param("flag", ParamType::Bool), None).value,
        FieldValue::Bool(false)
    );
    assert_eq!(
        make_field(&param("name", ParamType::String), None).value,
        FieldValue::Text(String::new())
    );
    assert_eq!(
        make_field(&param("items", ParamType::StringArray), None).value,
        FieldValue::List(vec![String::new()])
    );
    assert_eq!(
        make_field(&param("mystery", ParamType::Unknown), None).value,
        FieldValue::Null
    );
}

#[test]
fn initial_values_seed_the_field() {
    let field = make_field(&param("flag", ParamType::Bool), Some(&json!(true)));
    assert_eq!(field.value, FieldValue::Bool(true));

    let field = make_field(&param("name", ParamType::String), Some(&json!("joe")));
    assert_eq!(field.value, FieldValue::Text("joe".to_string()));

    let initial = json!(["a", "b"]);
    let field = make_field(&param("items", ParamType::StringArray), Some(&initial));
    assert_eq!(
        field.value,
        FieldValue::List(vec!["a".to_string(), "b".to_string()])
    );
}

#[test]
fn wrong_shaped_initial_falls_back_to_the_default() {
    let field = make_field(&param("flag", ParamType::Bool), Some(&json!("yes")));
    assert_eq!(field.value, FieldValue::Bool(false));

    let field = make_field(&param("name", ParamType::String), Some(&json!(42)));
    assert_eq!(field.value, FieldValue::Text(String::new()));

    let field = make_field(&param("items", ParamType::StringArray), Some(&json!("a")));
    assert_eq!(field.value, FieldValue::List(vec![String::new()]));
}

#[test]
fn bool_and_unknown_fields_have_no_validators() {
    assert_eq!(make_field(&param("flag", ParamType::Bool), None).validate(), Ok(()));
    assert_eq!(
        make_field(&param("mystery", ParamType::Unknown), None).validate(),
        Ok(())
    );
}

#[test]
fn required_is_reported_before_type_specific_rules() {
    // An empty username is "required", not "username".
    let field = make_field(&param("user", ParamType::Username), None);
    assert_eq!(field.validate(), Err(FieldError::Required));

    let field = make_field(&param("path", ParamType::Filepath), None);
    assert_eq!(field.validate(), Err(FieldError::Required));
}

#[test]
fn filepath_must_be_absolute_without_trailing_slash() {
    let mut field = make_field(&param("path", ParamType::Filepath), None);

    field.value = FieldValue::Text("etc/x".to_string());
    assert_eq!(field.validate(), Err(FieldError::Filepath));

    field.value = FieldValue::Text("/etc/x/".to_string());
    assert_eq!(field.validate(), Err(FieldError::Filepath));

    field.value = FieldValue::Text("/".to_string());
    assert_eq!(field.validate(), Err(FieldError::Filepath));

    field.value = FieldValue::Text("/etc/x".to_string());
    assert_eq!(field.validate(), Ok(()));
}

#[test]
fn username_rules() {
    let mut field = make_field(&param("user", ParamType::Username), None);

    field.value = FieldValue::Text("1joe".to_string());
    assert_eq!(field.validate(), Err(FieldError::Username));

    field.value = FieldValue::Text("joe smith".to_string());
    assert_eq!(field.validate(), Err(FieldError::Username));

    field.value = FieldValue::Text("j".repeat(31));
    assert_eq!(field.validate(), Err(FieldError::Username));

    field.value = FieldValue::Text("j".repeat(30));
    assert_eq!(field.validate(), Ok(()));

    field.value = FieldValue::Text("joe.smith-2_test".to_string());
    assert_eq!(field.validate(), Ok(()));
}

#[test]
fn string_list_needs_at_least_one_nonempty_element() {
    let mut field = make_field(&param("items", ParamType::StringArray), None);

    // The default [""] is editable but not yet valid.
    assert_eq!(field.validate(), Err(FieldError::Required));

    field.value = FieldValue::List(vec![]);
    assert_eq!(field.validate(), Err(FieldError::Required));

    field.value = FieldValue::List(vec!["a".to_string(), String::new()]);
    assert_eq!(field.validate(), Err(FieldError::Required));

    field.value = FieldValue::List(vec!["a".to_string(), "b".to_string()]);
    assert_eq!(field.validate(), Ok(()));
}

#[test]
fn failure_messages_are_human_readable() {
    assert_eq!(FieldError::Required.to_string(), "Cannot be empty");
    assert_eq!(
        FieldError::Filepath.to_string(),
        "Must be an absolute path: /.../..."
    );
    assert_eq!(
        FieldError::Username.to_string(),
        "Invalid username (0-9, a-z, A-Z, \".\", \"-\", \"_\")"
    );
}
