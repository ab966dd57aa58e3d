use dashtable::{AppConfig, SelectionMode, TableConfig, TableOptions, DEFAULT_PAGE_SIZE};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_json(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn partial_table_config_keeps_defaults() {
    let file = write_json(r#"{ "search_column": "city", "page_size": 25 }"#);
    let config = TableConfig::load(file.path()).unwrap();
    assert_eq!(
        config,
        TableConfig {
            search_column: "city".into(),
            page_size: 25,
            ..TableConfig::default()
        }
    );

    let options: TableOptions<()> = config.into_options();
    assert_eq!(options.pagination.page_size(), 25);
    assert!(options.on_bulk_delete.is_none());
}

#[test]
fn app_config_defaults_enable_selection() {
    let config = AppConfig::default();
    assert_eq!(config.table.selection, SelectionMode::Multi);
    assert_eq!(config.table.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(config.delete_latency_ms, 400);
}

#[test]
fn app_config_loads_nested_table_section() {
    let file = write_json(
        r#"{
            "delete_latency_ms": 0,
            "table": { "selection": "multi", "empty_title": "Nothing here" }
        }"#,
    );
    let config = AppConfig::load(file.path()).unwrap();
    assert_eq!(config.delete_latency_ms, 0);
    assert_eq!(config.tick_rate_ms, 50);
    assert_eq!(config.table.selection, SelectionMode::Multi);
    assert_eq!(config.table.empty_title, "Nothing here");
    assert_eq!(config.table.search_column, "name");
}

#[test]
fn malformed_config_is_a_json_error() {
    let file = write_json("{ \"page_size\": \"ten\" }");
    let err = TableConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, dashtable::DashtableError::JsonError(_)));
    assert!(!err.is_configuration());
}
