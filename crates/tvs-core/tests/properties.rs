//! Property tests over random interaction sequences.

use proptest::prelude::*;
use serde_json::json;
use tvs_core::{Table, filter_rows, pivot_rows, reconcile};
use tvs_model::{ColumnDef, Record, TableConfig};

const COLUMNS: [&str; 3] = ["id", "name", "group"];

#[derive(Debug, Clone)]
enum Action {
    Page(usize),
    PageSize(usize),
    Next,
    Previous,
    Sort(usize, bool),
    Filter(usize, String),
    Expand(usize),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0usize..12).prop_map(Action::Page),
        (1usize..15).prop_map(Action::PageSize),
        Just(Action::Next),
        Just(Action::Previous),
        (0usize..3, any::<bool>()).prop_map(|(column, additive)| Action::Sort(column, additive)),
        (0usize..3, "[a-z0-9]{0,2}").prop_map(|(column, value)| Action::Filter(column, value)),
        (0usize..20).prop_map(Action::Expand),
    ]
}

fn records(count: usize) -> Vec<Record> {
    let words = ["apple", "berry", "cherry", "apricot", "banana"];
    (0..count)
        .map(|i| {
            let mut record = Record::new();
            record.insert("id".to_string(), json!(i));
            record.insert(
                "name".to_string(),
                json!(format!("{}{i}", words[i % words.len()])),
            );
            record.insert("group".to_string(), json!(format!("g{}", i % 3)));
            record
        })
        .collect()
}

fn config(count: usize, page_size: usize) -> TableConfig {
    TableConfig::new()
        .with_rows(records(count))
        .with_columns(COLUMNS.iter().map(|key| ColumnDef::new(*key)).collect())
        .with_filterable(true)
        .with_default_page_size(page_size)
}

fn apply(table: &mut Table, action: &Action) {
    match action {
        Action::Page(page) => table.set_page(*page),
        Action::PageSize(size) => table.set_page_size(*size),
        Action::Next => {
            table.next_page();
        }
        Action::Previous => {
            table.previous_page();
        }
        Action::Sort(column, additive) => table.sort_column(COLUMNS[*column], *additive),
        Action::Filter(column, value) => table.filter_column(COLUMNS[*column], value),
        Action::Expand(row) => table.toggle_expanded(&row.to_string()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn page_stays_within_computed_bounds(
        count in 0usize..60,
        page_size in 1usize..12,
        actions in prop::collection::vec(action(), 0..24),
    ) {
        let mut table = Table::local(config(count, page_size));
        for action in &actions {
            apply(&mut table, action);
            let state = table.state();
            let rows = state.row_count().unwrap_or_default();
            prop_assert_eq!(state.pages, rows.div_ceil(state.page_size));
            if state.pages == 0 {
                prop_assert_eq!(state.page, 0);
            } else {
                prop_assert!(state.page < state.pages);
            }
        }
    }

    #[test]
    fn view_matches_active_filters(
        count in 0usize..40,
        actions in prop::collection::vec(action(), 0..16),
    ) {
        let mut table = Table::local(config(count, 5));
        for action in &actions {
            apply(&mut table, action);
        }
        let state = table.state();
        let expected = filter_rows(&pivot_rows(&state.source.rows, &[]), &state.filtered);
        prop_assert_eq!(state.row_count(), Some(expected.len()));
    }

    #[test]
    fn filter_edits_reset_to_first_page(
        page in 0usize..8,
        column in 0usize..3,
        value in "[a-z]{1,2}",
    ) {
        let mut table = Table::local(config(50, 5));
        table.set_page(page);
        let before = table.state().filtered.clone();
        table.filter_column(COLUMNS[column], &value);
        prop_assert_ne!(&table.state().filtered, &before);
        prop_assert_eq!(table.state().page, 0);
    }

    #[test]
    fn settled_state_reconciles_to_itself(
        actions in prop::collection::vec(action(), 0..16),
    ) {
        let mut table = Table::local(config(30, 4).with_freeze_when_expanded(true));
        for action in &actions {
            apply(&mut table, action);
        }
        let state = table.state().clone();
        let result = reconcile(&state, state.clone(), table.config(), &tvs_core::LocalRowModel);
        prop_assert!(!result.fetch_requested);
        prop_assert!(!result.recomputed);
        prop_assert_eq!(result.state.page, state.page);
        prop_assert_eq!(&result.state.sorted, &state.sorted);
        prop_assert_eq!(&result.state.expanded, &state.expanded);
        prop_assert_eq!(result.state.frozen, state.frozen);
    }

    #[test]
    fn frozen_view_survives_sort_and_filter(
        edits in prop::collection::vec((0usize..3, any::<bool>(), "[a-z0-9]{0,2}"), 1..8),
    ) {
        let mut table = Table::local(config(30, 5).with_freeze_when_expanded(true));
        table.toggle_expanded("1");
        let pinned = table.state().view.clone();
        for (column, sort, value) in &edits {
            if *sort {
                table.sort_column(COLUMNS[*column], false);
            } else {
                table.filter_column(COLUMNS[*column], value);
            }
            let state = table.state();
            prop_assert!(state.frozen);
            prop_assert!(state.expanded.is_expanded("1"));
            let same = pinned
                .as_ref()
                .zip(state.view.as_ref())
                .is_some_and(|(a, b)| a.is_same(b));
            prop_assert!(same);
        }
    }
}
