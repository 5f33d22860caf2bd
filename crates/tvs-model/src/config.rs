//! Table configuration.
//!
//! `TableConfig` is everything the host application owns: defaults,
//! capability and behavior flags, controlled values, and the data source.
//! It is treated as immutable for the duration of one reconciliation cycle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::column::ColumnDef;
use crate::terms::{ExpandedRows, FilterTerm, ResizeTerm, SortTerm};

/// Page size used when the host does not pick one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// One input row, keyed by column key.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Initial values of the uncontrolled state, and the targets of cascade resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDefaults {
    pub page: usize,
    pub page_size: usize,
    pub sorted: Vec<SortTerm>,
    pub filtered: Vec<FilterTerm>,
    pub expanded: ExpandedRows,
    pub resized: Vec<ResizeTerm>,
}

impl Default for TableDefaults {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sorted: Vec::new(),
            filtered: Vec::new(),
            expanded: ExpandedRows::default(),
            resized: Vec::new(),
        }
    }
}

/// Table-level capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub sortable: bool,
    pub filterable: bool,
    pub resizable: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            sortable: true,
            filterable: false,
            resizable: true,
        }
    }
}

/// Flags that shape how the reconciliation cascades behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Behavior {
    /// Pin the row view while any row is expanded.
    pub freeze_when_expanded: bool,
    /// Collapse expanded rows when the sort spec changes.
    pub collapse_on_sorting_change: bool,
    /// Collapse expanded rows when the underlying data changes.
    pub collapse_on_data_change: bool,
    /// Collapse expanded rows when the user changes page.
    pub collapse_on_page_change: bool,
    /// Pagination is owned by the host (server-side data).
    pub manual: bool,
    /// Whether the filter row is visible.
    pub show_filters: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            freeze_when_expanded: false,
            collapse_on_sorting_change: true,
            collapse_on_data_change: true,
            collapse_on_page_change: true,
            manual: false,
            show_filters: false,
        }
    }
}

/// Externally controlled values. `Some` always wins over internal state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlledState {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    /// Page count, only meaningful in manual mode.
    pub pages: Option<usize>,
    pub sorted: Option<Vec<SortTerm>>,
    pub filtered: Option<Vec<FilterTerm>>,
    pub expanded: Option<ExpandedRows>,
    pub resized: Option<Vec<ResizeTerm>>,
}

/// Raw rows, column definitions and pivot keys.
///
/// Each part is shared and compared by identity: replacing `rows` with an
/// equal but freshly allocated slice still counts as a data change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSource {
    pub rows: Arc<[Record]>,
    pub columns: Arc<[ColumnDef]>,
    pub pivot_by: Arc<[String]>,
}

impl Default for DataSource {
    fn default() -> Self {
        Self {
            rows: Arc::from(Vec::new()),
            columns: Arc::from(Vec::new()),
            pivot_by: Arc::from(Vec::new()),
        }
    }
}

impl DataSource {
    pub fn same_rows(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows)
    }

    pub fn same_columns(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.columns, &other.columns)
    }

    pub fn same_pivot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pivot_by, &other.pivot_by)
    }

    /// True when all three parts are the same allocations.
    pub fn is_same(&self, other: &Self) -> bool {
        self.same_rows(other) && self.same_columns(other) && self.same_pivot(other)
    }
}

/// Full host-side configuration of a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub defaults: TableDefaults,
    pub capabilities: Capabilities,
    pub behavior: Behavior,
    pub controlled: ControlledState,
    pub source: DataSource,
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rows(mut self, rows: Vec<Record>) -> Self {
        self.source.rows = Arc::from(rows);
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: Vec<ColumnDef>) -> Self {
        self.source.columns = Arc::from(columns);
        self
    }

    #[must_use]
    pub fn with_pivot_by(mut self, keys: Vec<String>) -> Self {
        self.source.pivot_by = Arc::from(keys);
        self
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: TableDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use]
    pub fn with_default_sorted(mut self, sorted: Vec<SortTerm>) -> Self {
        self.defaults.sorted = sorted;
        self
    }

    #[must_use]
    pub fn with_default_filtered(mut self, filtered: Vec<FilterTerm>) -> Self {
        self.defaults.filtered = filtered;
        self
    }

    #[must_use]
    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.defaults.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_sortable(mut self, enable: bool) -> Self {
        self.capabilities.sortable = enable;
        self
    }

    #[must_use]
    pub fn with_filterable(mut self, enable: bool) -> Self {
        self.capabilities.filterable = enable;
        self
    }

    #[must_use]
    pub fn with_resizable(mut self, enable: bool) -> Self {
        self.capabilities.resizable = enable;
        self
    }

    #[must_use]
    pub fn with_freeze_when_expanded(mut self, enable: bool) -> Self {
        self.behavior.freeze_when_expanded = enable;
        self
    }

    #[must_use]
    pub fn with_collapse_on_sorting_change(mut self, enable: bool) -> Self {
        self.behavior.collapse_on_sorting_change = enable;
        self
    }

    #[must_use]
    pub fn with_collapse_on_data_change(mut self, enable: bool) -> Self {
        self.behavior.collapse_on_data_change = enable;
        self
    }

    #[must_use]
    pub fn with_collapse_on_page_change(mut self, enable: bool) -> Self {
        self.behavior.collapse_on_page_change = enable;
        self
    }

    #[must_use]
    pub fn with_manual(mut self, enable: bool) -> Self {
        self.behavior.manual = enable;
        self
    }

    #[must_use]
    pub fn with_show_filters(mut self, enable: bool) -> Self {
        self.behavior.show_filters = enable;
        self
    }

    #[must_use]
    pub fn with_controlled(mut self, controlled: ControlledState) -> Self {
        self.controlled = controlled;
        self
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDef> {
        self.source.columns.iter().find(|column| column.key == key)
    }

    /// Column override first, then the table-level capability.
    pub fn is_column_sortable(&self, key: &str) -> bool {
        self.column(key)
            .and_then(|column| column.sortable)
            .unwrap_or(self.capabilities.sortable)
    }

    pub fn is_column_filterable(&self, key: &str) -> bool {
        self.column(key)
            .and_then(|column| column.filterable)
            .unwrap_or(self.capabilities.filterable)
    }

    pub fn is_column_resizable(&self, key: &str) -> bool {
        self.column(key)
            .and_then(|column| column.resizable)
            .unwrap_or(self.capabilities.resizable)
    }
}
