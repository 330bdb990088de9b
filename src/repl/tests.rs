use std::fs;
use std::path::Path;

use super::*;
use crate::config::{Config, OutputFormat};
use crate::schema::{LoadedSchema, fixtures, load_schema};

const SCHEMA: &str = r#"
name = "foos"

[[fields]]
name = "string"

[[fields]]
name = "explicit"
explicit_only = true
complete_value = true
values = ["baz"]
"#;

fn plain_config() -> Config {
    let mut config = Config::default();
    config.display.color_output = false;
    config
}

fn fixture_state() -> SharedState {
    SharedState::with_schema(
        Some(LoadedSchema {
            registry: fixtures::foos(),
            values: Default::default(),
            path: "foos.toml".into(),
        }),
        &plain_config(),
    )
}

fn file_state(path: &Path) -> SharedState {
    let mut config = plain_config();
    config.schema.path = Some(path.to_path_buf());
    SharedState::from_config(&config).unwrap()
}

#[test]
fn test_parse_input() {
    assert_eq!(Input::parse("   ").unwrap(), Input::Empty);
    assert_eq!(Input::parse("exit").unwrap(), Input::Meta(MetaCommand::Quit));
    assert_eq!(Input::parse(" :fields ").unwrap(), Input::Meta(MetaCommand::Fields));
    assert_eq!(
        Input::parse("int = 4 ").unwrap(),
        Input::Query("int = 4".to_string())
    );
    assert!(Input::parse(":drop").is_err());
}

#[test]
fn test_evaluate_query() {
    let state = fixture_state();

    assert_eq!(
        evaluate(&state, "alias = x int > 3"),
        Evaluation::Print("another = x and int > 3".to_string())
    );
    assert_eq!(evaluate(&state, "and"), Evaluation::Nothing);
    assert_eq!(evaluate(&state, ":quit"), Evaluation::Quit);
}

#[test]
fn test_evaluate_reports_errors() {
    let state = fixture_state();

    assert_eq!(
        evaluate(&state, "unknown = 10"),
        Evaluation::Fail("Error: Query error: Field 'unknown' not recognized".to_string())
    );
    assert!(matches!(evaluate(&state, ":nope"), Evaluation::Fail(_)));
}

#[test]
fn test_evaluate_json_output() {
    let state = fixture_state();
    state.set_format(OutputFormat::Json);

    let Evaluation::Print(output) = evaluate(&state, "has string") else {
        panic!("expected output");
    };
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["clauses"][0]["kind"], "presence");
}

#[test]
fn test_fields_and_help() {
    let state = fixture_state();

    let Evaluation::Print(fields) = evaluate(&state, ":fields") else {
        panic!("expected output");
    };
    assert!(fields.starts_with("foos (10 fields)"));
    assert!(matches!(evaluate(&state, ":help"), Evaluation::Print(text) if text.contains(":reload")));
}

#[test]
fn test_reload_without_schema_file() {
    let state = SharedState::with_schema(None, &plain_config());
    assert!(!state.has_schema());
    assert!(matches!(evaluate(&state, ":reload"), Evaluation::Fail(_)));
}

#[test]
fn test_reload_publishes_new_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foos.toml");
    fs::write(&path, SCHEMA).unwrap();

    let state = file_state(&path);
    let observer = state.clone();
    assert_eq!(state.engine().complete("explicit = ").unwrap(), ["explicit =  baz "]);
    assert_eq!(observer.schema_name(), "foos");

    fs::write(
        &path,
        SCHEMA
            .replace("name = \"foos\"", "name = \"infoos\"")
            .replace("\"baz\"", "\"qux\""),
    )
    .unwrap();

    assert_eq!(
        evaluate(&state, ":reload"),
        Evaluation::Print("Reloaded schema 'infoos' (2 fields)".to_string())
    );
    assert_eq!(observer.schema_name(), "infoos");
    assert_eq!(
        observer.engine().complete("explicit = ").unwrap(),
        ["explicit =  qux "]
    );
}

#[test]
fn test_failed_reload_keeps_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foos.toml");
    fs::write(&path, SCHEMA).unwrap();
    let state = file_state(&path);

    fs::write(&path, "[[fields]]\nname = \"x\"\ntype = \"blob\"\n").unwrap();

    assert!(matches!(evaluate(&state, ":reload"), Evaluation::Fail(_)));
    assert_eq!(state.schema_name(), "foos");
    assert_eq!(state.registry().len(), 2);
    assert!(load_schema(&path).is_err());
}
