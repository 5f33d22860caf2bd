//! State snapshots.
//!
//! `InternalState` is what the table owns itself (the uncontrolled values).
//! `ResolvedState` is the authoritative snapshot for one cycle: internal
//! values with controlled values merged over them, plus the configuration
//! parts that reconciliation compares between cycles.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{Capabilities, DEFAULT_PAGE_SIZE, DataSource, Record, TableDefaults};
use crate::terms::{ExpandedRows, FilterTerm, ResizeTerm, SortTerm};

/// Stateful options that can be controlled by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    Page,
    PageSize,
    Pages,
    Sorted,
    Filtered,
    Expanded,
    Resized,
}

impl StateField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::PageSize => "page_size",
            Self::Pages => "pages",
            Self::Sorted => "sorted",
            Self::Filtered => "filtered",
            Self::Expanded => "expanded",
            Self::Resized => "resized",
        }
    }
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pivot group carried by a group row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupInfo {
    pub key: String,
    pub value: serde_json::Value,
}

/// A row of the derived view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow {
    /// Position of the row among its siblings in the resolved (unsorted) data.
    pub index: usize,
    /// Stable path used as the key of the expanded mapping.
    pub path: String,
    pub values: Record,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_rows: Vec<ViewRow>,
}

impl ViewRow {
    /// A plain data row whose path is its index.
    pub fn leaf(index: usize, values: Record) -> Self {
        Self {
            index,
            path: index.to_string(),
            values,
            group: None,
            sub_rows: Vec::new(),
        }
    }

    pub fn is_group(&self) -> bool {
        self.group.is_some()
    }
}

/// Derived row view produced by a row model.
#[derive(Debug, Clone)]
pub struct RowView {
    /// Rows after pivoting, before filtering and sorting.
    pub resolved_data: Arc<[ViewRow]>,
    /// Rows after filtering and sorting; pagination slices this.
    pub sorted_data: Arc<[ViewRow]>,
}

impl Default for RowView {
    fn default() -> Self {
        Self {
            resolved_data: Arc::from(Vec::new()),
            sorted_data: Arc::from(Vec::new()),
        }
    }
}

impl RowView {
    pub fn new(resolved_data: Vec<ViewRow>, sorted_data: Vec<ViewRow>) -> Self {
        Self {
            resolved_data: Arc::from(resolved_data),
            sorted_data: Arc::from(sorted_data),
        }
    }

    /// Number of top-level rows pagination works over.
    pub fn len(&self) -> usize {
        self.sorted_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_data.is_empty()
    }

    /// Rows of one page; empty when the page lies past the end.
    pub fn page_rows(&self, page: usize, page_size: usize) -> &[ViewRow] {
        let page_size = page_size.max(1);
        let start = page.saturating_mul(page_size).min(self.sorted_data.len());
        let end = start.saturating_add(page_size).min(self.sorted_data.len());
        &self.sorted_data[start..end]
    }

    /// True when both views share the same computed allocation.
    pub fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resolved_data, &other.resolved_data)
            && Arc::ptr_eq(&self.sorted_data, &other.sorted_data)
    }
}

/// Uncontrolled state owned by the table.
#[derive(Debug, Clone)]
pub struct InternalState {
    pub page: usize,
    pub page_size: usize,
    pub pages: usize,
    pub sorted: Vec<SortTerm>,
    pub filtered: Vec<FilterTerm>,
    pub expanded: ExpandedRows,
    pub resized: Vec<ResizeTerm>,
    pub currently_resizing: bool,
    pub skip_next_sort: bool,
    pub frozen: bool,
    pub view: Option<RowView>,
}

impl Default for InternalState {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            pages: 0,
            sorted: Vec::new(),
            filtered: Vec::new(),
            expanded: ExpandedRows::default(),
            resized: Vec::new(),
            currently_resizing: false,
            skip_next_sort: false,
            frozen: false,
            view: None,
        }
    }
}

impl InternalState {
    /// Initial state seeded from the configured defaults.
    pub fn from_defaults(defaults: &TableDefaults) -> Self {
        Self {
            page: defaults.page,
            page_size: defaults.page_size,
            sorted: defaults.sorted.clone(),
            filtered: defaults.filtered.clone(),
            expanded: defaults.expanded.clone(),
            resized: defaults.resized.clone(),
            ..Self::default()
        }
    }

    /// Store a committed snapshot as the new internal state.
    pub fn capture(state: &ResolvedState) -> Self {
        Self {
            page: state.page,
            page_size: state.page_size,
            pages: state.pages,
            sorted: state.sorted.clone(),
            filtered: state.filtered.clone(),
            expanded: state.expanded.clone(),
            resized: state.resized.clone(),
            currently_resizing: state.currently_resizing,
            skip_next_sort: state.skip_next_sort,
            frozen: state.frozen,
            view: state.view.clone(),
        }
    }
}

/// Authoritative snapshot for one reconciliation cycle.
#[derive(Debug, Clone)]
pub struct ResolvedState {
    pub page: usize,
    pub page_size: usize,
    pub pages: usize,
    pub sorted: Vec<SortTerm>,
    pub filtered: Vec<FilterTerm>,
    pub expanded: ExpandedRows,
    pub resized: Vec<ResizeTerm>,
    /// A column drag is in progress.
    pub currently_resizing: bool,
    /// The next sort click is swallowed (it ends a resize drag).
    pub skip_next_sort: bool,
    /// The row view is pinned because rows are expanded.
    pub frozen: bool,
    pub defaults: TableDefaults,
    pub capabilities: Capabilities,
    pub show_filters: bool,
    pub source: DataSource,
    pub view: Option<RowView>,
}

impl ResolvedState {
    /// Number of rows in the derived view, if one has been computed.
    pub fn row_count(&self) -> Option<usize> {
        self.view.as_ref().map(RowView::len)
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> &[ViewRow] {
        self.view
            .as_ref()
            .map(|view| view.page_rows(self.page, self.page_size))
            .unwrap_or_default()
    }

    pub fn resized_width(&self, column: &str) -> Option<f32> {
        self.resized
            .iter()
            .find(|term| term.column == column)
            .map(|term| term.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(count: usize) -> Vec<ViewRow> {
        (0..count).map(|i| ViewRow::leaf(i, Record::new())).collect()
    }

    #[test]
    fn page_rows_slices_sorted_data() {
        let view = RowView::new(rows(7), rows(7));
        assert_eq!(view.page_rows(0, 3).len(), 3);
        assert_eq!(view.page_rows(2, 3).len(), 1);
        assert_eq!(view.page_rows(2, 3)[0].path, "6");
        assert!(view.page_rows(5, 3).is_empty());
        // Zero page size is treated as one.
        assert_eq!(view.page_rows(1, 0).len(), 1);
    }

    #[test]
    fn from_defaults_seeds_values() {
        let defaults = TableDefaults {
            page: 2,
            page_size: 5,
            sorted: vec![SortTerm::asc("age")],
            ..TableDefaults::default()
        };
        let internal = InternalState::from_defaults(&defaults);
        assert_eq!(internal.page, 2);
        assert_eq!(internal.page_size, 5);
        assert_eq!(internal.sorted, vec![SortTerm::asc("age")]);
        assert!(internal.view.is_none());
    }
}
