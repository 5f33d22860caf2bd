use tvs_model::{
    ColumnDef, ControlledState, ExpandedRows, FilterTerm, SortDirection, SortTerm, TableConfig,
    TableError,
};

#[test]
fn config_round_trips_through_json() {
    let config = TableConfig::new()
        .with_columns(vec![ColumnDef::new("age").with_header("Age")])
        .with_default_sorted(vec![SortTerm::desc("age")])
        .with_controlled(ControlledState {
            filtered: Some(vec![FilterTerm::new("age", "4")]),
            ..ControlledState::default()
        });

    let text = serde_json::to_string(&config).expect("serialize config");
    let parsed: TableConfig = serde_json::from_str(&text).expect("parse config");

    assert_eq!(parsed.defaults, config.defaults);
    assert_eq!(parsed.controlled, config.controlled);
    assert_eq!(parsed.source.columns[0].header(), "Age");
    // A parsed source is a fresh allocation.
    assert!(!parsed.source.same_columns(&config.source));
}

#[test]
fn sort_direction_is_lowercase_on_the_wire() {
    let text = serde_json::to_string(&SortTerm::desc("name")).expect("serialize term");
    assert_eq!(text, r#"{"key":"name","direction":"desc"}"#);
    assert_eq!(SortDirection::Asc.to_string(), "asc");
}

#[test]
fn expanded_rows_serialize_as_a_plain_map() {
    let expanded: ExpandedRows = [("1", true), ("0.2", false)].into_iter().collect();
    let text = serde_json::to_string(&expanded).expect("serialize expanded");
    assert_eq!(text, r#"{"0.2":false,"1":true}"#);
}

#[test]
fn header_falls_back_to_key() {
    assert_eq!(ColumnDef::new("city").header(), "city");
}

#[test]
fn invalid_json_maps_to_table_error() {
    let err: TableError = serde_json::from_str::<TableConfig>("{ nope")
        .map_err(TableError::from)
        .expect_err("config should not parse");
    assert!(err.to_string().starts_with("invalid JSON"));
}
