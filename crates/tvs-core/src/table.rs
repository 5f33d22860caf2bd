//! Table lifecycle: creation, mount, configuration updates and local
//! interactions.
//!
//! # Cycle
//!
//! Every entry point builds a candidate snapshot through [`resolve`], runs it
//! through [`reconcile`] against the current snapshot, and commits the
//! result as the new internal state. `&mut self` serializes cycles.
//!
//! # Controlled options
//!
//! Interactions always update the internal value and notify the listener.
//! When the host controls an option, the resolved snapshot keeps showing the
//! controlled value until the host passes the new one back through
//! [`Table::update_config`].

use tracing::debug;
use tvs_model::{
    ExpandedRows, FilterTerm, InternalState, ResizeTerm, ResolvedState, SortTerm, TableConfig,
    ViewRow,
};

use crate::engine::{Reconciliation, initialize, reconcile};
use crate::interaction::{page_for_new_size, set_filter, set_width, toggle_sort};
use crate::resolver::resolve;
use crate::row_model::{LocalRowModel, RowModel};

/// Host callbacks. Every method defaults to doing nothing.
pub trait TableListener {
    /// Data for the current page, sort and filter should be (re)loaded.
    fn fetch_requested(&mut self) {}
    fn page_changed(&mut self, _page: usize) {}
    fn page_size_changed(&mut self, _page_size: usize, _page: usize) {}
    fn sorted_changed(&mut self, _sorted: &[SortTerm]) {}
    fn filtered_changed(&mut self, _filtered: &[FilterTerm]) {}
    fn expanded_changed(&mut self, _expanded: &ExpandedRows) {}
    fn resized_changed(&mut self, _resized: &[ResizeTerm]) {}
}

/// Listener that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl TableListener for NoopListener {}

/// A table instance: configuration, internal state and the current snapshot.
pub struct Table<M = LocalRowModel, L = NoopListener> {
    config: TableConfig,
    internal: InternalState,
    state: ResolvedState,
    row_model: M,
    listener: L,
    mounted: bool,
}

impl Table {
    /// Table backed by the in-memory row model, without callbacks.
    pub fn local(config: TableConfig) -> Self {
        Self::new(config, LocalRowModel, NoopListener)
    }
}

impl<M: RowModel, L: TableListener> Table<M, L> {
    /// Resolve defaults, compute the initial row view and store it.
    pub fn new(config: TableConfig, row_model: M, listener: L) -> Self {
        let internal = InternalState::from_defaults(&config.defaults);
        let state = initialize(resolve(&config, &internal), &config, &row_model);
        debug!(
            rows = state.row_count().unwrap_or_default(),
            pages = state.pages,
            "table created"
        );
        Self {
            config,
            internal: InternalState::capture(&state),
            state,
            row_model,
            listener,
            mounted: false,
        }
    }

    /// Fire the initial fetch. Only the first call has an effect.
    pub fn mount(&mut self) {
        if self.mounted {
            debug!("table already mounted");
            return;
        }
        self.mounted = true;
        self.listener.fetch_requested();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Current resolved snapshot.
    pub fn state(&self) -> &ResolvedState {
        &self.state
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Rows of the current page.
    pub fn page_rows(&self) -> &[ViewRow] {
        self.state.page_rows()
    }

    /// Apply a new host configuration.
    ///
    /// Returns whether a reconciliation cycle ran; nothing runs when the
    /// new configuration resolves to the same snapshot.
    pub fn update_config(&mut self, config: TableConfig) -> bool {
        let previous = resolve(&self.config, &self.internal);
        let current = resolve(&config, &self.internal);
        if !snapshot_differs(&previous, &current) && self.config.behavior == config.behavior {
            debug!("configuration update changes nothing");
            self.config = config;
            return false;
        }
        let result = reconcile(&previous, current, &config, &self.row_model);
        self.config = config;
        self.commit(result);
        true
    }

    pub fn set_page(&mut self, page: usize) {
        if page == self.state.page {
            return;
        }
        debug!(page, "page selected");
        self.listener.page_changed(page);
        let collapse = self.config.behavior.collapse_on_page_change;
        self.apply_local(|internal| {
            internal.page = page;
            if collapse {
                internal.expanded = ExpandedRows::default();
            }
        });
    }

    /// Resized width, else the configured width raised to the column minimum.
    pub fn column_width(&self, key: &str) -> Option<f32> {
        self.state.resized_width(key).or_else(|| {
            let column = self.config.column(key)?;
            column.width.map(|width| width.max(column.min_width))
        })
    }

    pub fn can_next_page(&self) -> bool {
        self.state.page.saturating_add(1) < self.state.pages
    }

    pub fn can_previous_page(&self) -> bool {
        self.state.page > 0
    }

    /// Returns false when already on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.can_next_page() {
            return false;
        }
        self.set_page(self.state.page.saturating_add(1));
        true
    }

    /// Returns false when already on the first page.
    pub fn previous_page(&mut self) -> bool {
        if !self.can_previous_page() {
            return false;
        }
        self.set_page(self.state.page - 1);
        true
    }

    /// Change the page size, keeping the first visible row on screen.
    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        let page = page_for_new_size(self.state.page, self.state.page_size, page_size);
        debug!(page_size, page, "page size selected");
        self.listener.page_size_changed(page_size, page);
        self.apply_local(|internal| {
            internal.page_size = page_size;
            internal.page = page;
        });
    }

    /// Header click on a column.
    pub fn sort_column(&mut self, key: &str, additive: bool) {
        if !self.config.is_column_sortable(key) {
            debug!(key, "column is not sortable");
            return;
        }
        if self.state.skip_next_sort {
            debug!(key, "click ends a column resize, not sorting");
            self.apply_local(|_| {});
            return;
        }
        let sorted = toggle_sort(&self.state.sorted, key, self.config.column(key), additive);
        debug!(key, additive, "sort requested");
        self.listener.sorted_changed(&sorted);
        self.apply_local(|internal| internal.sorted = sorted);
    }

    /// Edit one column's filter; an empty value clears it.
    pub fn filter_column(&mut self, key: &str, value: &str) {
        if !self.config.is_column_filterable(key) {
            debug!(key, "column is not filterable");
            return;
        }
        let filtered = set_filter(&self.state.filtered, key, value);
        debug!(key, "filter requested");
        self.listener.filtered_changed(&filtered);
        self.apply_local(|internal| internal.filtered = filtered);
    }

    pub fn toggle_expanded(&mut self, path: &str) {
        let mut expanded = self.state.expanded.clone();
        let now = expanded.toggle(path);
        debug!(path, expanded = now, "row toggled");
        self.listener.expanded_changed(&expanded);
        self.apply_local(|internal| internal.expanded = expanded);
    }

    pub fn resize_start(&mut self, column: &str) {
        if !self.config.is_column_resizable(column) {
            debug!(column, "column is not resizable");
            return;
        }
        self.apply_local(|internal| internal.currently_resizing = true);
    }

    /// Drag a column edge; ignored unless a resize is in progress.
    pub fn resize_move(&mut self, column: &str, width: f32) {
        if !self.state.currently_resizing || !self.config.is_column_resizable(column) {
            return;
        }
        let min_width = self
            .config
            .column(column)
            .map_or(tvs_model::DEFAULT_MIN_WIDTH, |def| def.min_width);
        let resized = set_width(&self.state.resized, column, width, min_width);
        self.listener.resized_changed(&resized);
        self.apply_local(|internal| internal.resized = resized);
    }

    /// Finish a drag. The click that releases it must not sort the column.
    pub fn resize_end(&mut self) {
        if !self.state.currently_resizing {
            return;
        }
        self.apply_local(|internal| {
            internal.currently_resizing = false;
            internal.skip_next_sort = true;
        });
    }

    fn apply_local(&mut self, change: impl FnOnce(&mut InternalState)) {
        let mut internal = self.internal.clone();
        change(&mut internal);
        let candidate = resolve(&self.config, &internal);
        let result = reconcile(&self.state, candidate, &self.config, &self.row_model);
        self.commit(result);
    }

    fn commit(&mut self, result: Reconciliation) {
        self.internal = InternalState::capture(&result.state);
        self.state = result.state;
        if result.fetch_requested {
            self.listener.fetch_requested();
        }
    }
}

/// Whether two snapshots differ in anything reconciliation looks at.
fn snapshot_differs(previous: &ResolvedState, current: &ResolvedState) -> bool {
    !previous.source.is_same(&current.source)
        || previous.page != current.page
        || previous.page_size != current.page_size
        || previous.pages != current.pages
        || previous.sorted != current.sorted
        || previous.filtered != current.filtered
        || previous.expanded != current.expanded
        || previous.resized != current.resized
        || previous.defaults != current.defaults
        || previous.capabilities != current.capabilities
        || previous.show_filters != current.show_filters
}
