//! Row-model capability and the default local implementation.
//!
//! The engine only decides *when* a row view is recomputed; a `RowModel`
//! decides *how*. `LocalRowModel` pivots, filters and sorts JSON records in
//! memory, which is enough for client-side tables and for tests.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::debug;
use tvs_model::{
    FilterTerm, GroupInfo, Record, ResolvedState, RowView, SortDirection, SortTerm, ViewRow,
};

/// Computes the derived row view for a resolved snapshot.
///
/// `data_changed` is true when the raw rows were replaced since the previous
/// snapshot; implementations that cache resolved rows can use it to skip
/// re-resolving them.
pub trait RowModel {
    fn compute_row_view(&self, state: &ResolvedState, data_changed: bool) -> RowView;
}

impl<F> RowModel for F
where
    F: Fn(&ResolvedState, bool) -> RowView,
{
    fn compute_row_view(&self, state: &ResolvedState, data_changed: bool) -> RowView {
        self(state, data_changed)
    }
}

/// In-memory pivot → filter → sort over the configured records.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRowModel;

impl RowModel for LocalRowModel {
    fn compute_row_view(&self, state: &ResolvedState, data_changed: bool) -> RowView {
        let resolved = pivot_rows(&state.source.rows, &state.source.pivot_by);
        let filtered = filter_rows(&resolved, &state.filtered);
        let sorted = sort_rows(filtered, &state.sorted);
        debug!(
            data_changed,
            rows = state.source.rows.len(),
            resolved = resolved.len(),
            visible = sorted.len(),
            "computed row view"
        );
        RowView::new(resolved, sorted)
    }
}

/// Group records by the pivot keys, in first-seen order.
///
/// Without pivot keys every record becomes a leaf whose path is its index.
/// Group paths are dot-joined sibling positions (`"1"`, `"1.0"`).
pub fn pivot_rows(rows: &[Record], pivot_by: &[String]) -> Vec<ViewRow> {
    let leaves = rows
        .iter()
        .enumerate()
        .map(|(index, values)| ViewRow::leaf(index, values.clone()))
        .collect();
    group_level(leaves, pivot_by, None)
}

fn group_level(rows: Vec<ViewRow>, keys: &[String], parent: Option<&str>) -> Vec<ViewRow> {
    let Some((key, rest)) = keys.split_first() else {
        return match parent {
            Some(parent) => rows
                .into_iter()
                .enumerate()
                .map(|(position, row)| ViewRow {
                    path: child_path(Some(parent), position),
                    ..row
                })
                .collect(),
            None => rows,
        };
    };

    let mut groups: Vec<(Value, Vec<ViewRow>)> = Vec::new();
    for row in rows {
        let value = row.values.get(key).cloned().unwrap_or(Value::Null);
        match groups.iter_mut().find(|(existing, _)| *existing == value) {
            Some((_, members)) => members.push(row),
            None => groups.push((value, vec![row])),
        }
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(position, (value, members))| {
            let path = child_path(parent, position);
            let sub_rows = group_level(members, rest, Some(&path));
            let mut values = Record::new();
            values.insert(key.clone(), value.clone());
            ViewRow {
                index: position,
                path,
                values,
                group: Some(GroupInfo {
                    key: key.clone(),
                    value,
                }),
                sub_rows,
            }
        })
        .collect()
}

fn child_path(parent: Option<&str>, position: usize) -> String {
    match parent {
        Some(parent) => format!("{parent}.{position}"),
        None => position.to_string(),
    }
}

/// Keep rows matching every filter term.
///
/// Group rows survive when any sub row survives, and keep only those.
pub fn filter_rows(rows: &[ViewRow], filtered: &[FilterTerm]) -> Vec<ViewRow> {
    if filtered.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter_map(|row| {
            if row.is_group() {
                let sub_rows = filter_rows(&row.sub_rows, filtered);
                (!sub_rows.is_empty()).then(|| ViewRow {
                    sub_rows,
                    ..row.clone()
                })
            } else {
                filtered
                    .iter()
                    .all(|term| matches_filter(&row.values, term))
                    .then(|| row.clone())
            }
        })
        .collect()
}

/// Case-insensitive prefix match; rows without the cell pass.
pub fn matches_filter(values: &Record, term: &FilterTerm) -> bool {
    match values.get(&term.key) {
        None | Some(Value::Null) => true,
        Some(value) => cell_text(value)
            .to_lowercase()
            .starts_with(&term.value.to_lowercase()),
    }
}

/// Stable multi-key sort, applied recursively to sub rows.
pub fn sort_rows(mut rows: Vec<ViewRow>, sorted: &[SortTerm]) -> Vec<ViewRow> {
    if sorted.is_empty() {
        return rows;
    }
    rows.sort_by(|a, b| compare_rows(&a.values, &b.values, sorted));
    for row in &mut rows {
        if !row.sub_rows.is_empty() {
            row.sub_rows = sort_rows(std::mem::take(&mut row.sub_rows), sorted);
        }
    }
    rows
}

fn compare_rows(a: &Record, b: &Record, sorted: &[SortTerm]) -> Ordering {
    for term in sorted {
        let ordering = compare_cells(a.get(&term.key), b.get(&term.key));
        let ordering = match term.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Missing and null first, then booleans, numbers, and text (case-insensitive).
pub fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    SortKey::from_cell(a).compare(&SortKey::from_cell(b))
}

enum SortKey {
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl SortKey {
    fn from_cell(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Missing,
            Some(Value::Bool(flag)) => Self::Bool(*flag),
            Some(Value::Number(number)) => number
                .as_f64()
                .map_or_else(|| Self::Text(number.to_string()), Self::Number),
            Some(other) => Self::Text(cell_text(other).to_lowercase()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Bool(_) => 1,
            Self::Number(_) => 2,
            Self::Text(_) => 3,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Display text of a cell.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => Record::new(),
        }
    }

    fn people() -> Vec<Record> {
        vec![
            record(json!({ "name": "carol", "age": 41, "city": "Berlin" })),
            record(json!({ "name": "Alice", "age": 29, "city": "Paris" })),
            record(json!({ "name": "bob", "age": null, "city": "Berlin" })),
            record(json!({ "name": "Dave", "age": 29, "city": "Bern" })),
        ]
    }

    fn names(rows: &[ViewRow]) -> Vec<String> {
        rows.iter()
            .map(|row| cell_text(row.values.get("name").unwrap_or(&Value::Null)))
            .collect()
    }

    #[test]
    fn flat_rows_keep_index_paths() {
        let rows = pivot_rows(&people(), &[]);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2].path, "2");
        assert!(!rows[2].is_group());
    }

    #[test]
    fn text_sort_is_case_insensitive() {
        let rows = sort_rows(pivot_rows(&people(), &[]), &[SortTerm::asc("name")]);
        assert_eq!(names(&rows), vec!["Alice", "bob", "carol", "Dave"]);
    }

    #[test]
    fn multi_key_sort_with_nulls_first() {
        let rows = sort_rows(
            pivot_rows(&people(), &[]),
            &[SortTerm::asc("age"), SortTerm::desc("name")],
        );
        assert_eq!(names(&rows), vec!["bob", "Dave", "Alice", "carol"]);
    }

    #[test]
    fn filter_is_prefix_and_case_insensitive() {
        let rows = filter_rows(
            &pivot_rows(&people(), &[]),
            &[FilterTerm::new("city", "ber")],
        );
        assert_eq!(names(&rows), vec!["carol", "bob", "Dave"]);
    }

    #[test]
    fn missing_cells_pass_filters() {
        let rows = filter_rows(&pivot_rows(&people(), &[]), &[FilterTerm::new("age", "2")]);
        assert_eq!(names(&rows), vec!["Alice", "bob", "Dave"]);
    }

    #[test]
    fn pivot_groups_in_first_seen_order() {
        let rows = pivot_rows(&people(), &["city".to_string()]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].group.as_ref().map(|g| g.value.clone()), Some(json!("Berlin")));
        assert_eq!(rows[0].sub_rows.len(), 2);
        assert_eq!(rows[0].sub_rows[1].path, "0.1");
        assert_eq!(rows[0].sub_rows[1].index, 2);
        assert_eq!(rows[2].path, "2");
    }

    #[test]
    fn filtering_groups_prunes_sub_rows() {
        let grouped = pivot_rows(&people(), &["city".to_string()]);
        let rows = filter_rows(&grouped, &[FilterTerm::new("name", "b")]);
        assert_eq!(rows.len(), 1);
        assert_eq!(names(&rows[0].sub_rows), vec!["bob"]);
    }

    #[test]
    fn sorting_recurses_into_groups() {
        let grouped = pivot_rows(&people(), &["city".to_string()]);
        let rows = sort_rows(grouped, &[SortTerm::asc("name")]);
        let berlin = rows
            .iter()
            .find(|row| row.values.get("city") == Some(&json!("Berlin")))
            .expect("berlin group");
        assert_eq!(names(&berlin.sub_rows), vec!["bob", "carol"]);
    }

    #[test]
    fn closures_are_row_models() {
        let model = |_: &ResolvedState, _: bool| RowView::default();
        let state = crate::resolver::resolve(
            &tvs_model::TableConfig::default(),
            &tvs_model::InternalState::default(),
        );
        assert!(model.compute_row_view(&state, true).is_empty());
    }
}
