//! Scenario replay against a local table.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{Level, debug, info, info_span, trace};
use tvs_core::{LocalRowModel, Table, TableListener};
use tvs_model::{ColumnDef, FilterTerm, SortTerm, ViewRow};

use crate::logging::redact_value;
use crate::scenario::{Scenario, ScenarioEvent};

/// Listener that counts fetch requests.
#[derive(Debug, Default)]
pub struct FetchCounter {
    pub fetches: usize,
}

impl TableListener for FetchCounter {
    fn fetch_requested(&mut self) {
        self.fetches += 1;
    }
}

/// State after one replayed event.
#[derive(Debug, Clone, Serialize)]
pub struct CycleSummary {
    pub step: usize,
    pub event: String,
    pub page: usize,
    pub pages: usize,
    pub page_size: usize,
    pub rows: usize,
    pub sorted: Vec<SortTerm>,
    pub filtered: Vec<FilterTerm>,
    pub expanded: usize,
    pub frozen: bool,
    pub fetched: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub cycles: Vec<CycleSummary>,
    pub fetches: usize,
    pub columns: Vec<ColumnDef>,
    /// Final width of every column that has one.
    pub widths: BTreeMap<String, f32>,
    /// Rows of the final page.
    pub page_rows: Vec<ViewRow>,
}

type ReplayTable = Table<LocalRowModel, FetchCounter>;

/// Mount a table for the scenario and apply its events in order.
///
/// Step 0 is the mount itself.
pub fn replay(scenario: &Scenario) -> ReplayReport {
    let span = info_span!("replay", events = scenario.events.len());
    let _guard = span.enter();

    let mut table = Table::new(
        scenario.config.clone(),
        LocalRowModel,
        FetchCounter::default(),
    );
    let mut cycles = Vec::with_capacity(scenario.events.len() + 1);

    table.mount();
    cycles.push(summarize(&table, 0, "mount".to_string(), true));

    for (index, event) in scenario.events.iter().enumerate() {
        let before = table.listener().fetches;
        apply_event(&mut table, event);
        let fetched = table.listener().fetches > before;
        let summary = summarize(&table, index + 1, event.label(), fetched);
        debug!(
            step = summary.step,
            page = summary.page,
            pages = summary.pages,
            fetched,
            "event applied"
        );
        cycles.push(summary);
    }

    let widths = table
        .config()
        .source
        .columns
        .iter()
        .filter_map(|column| Some((column.key.clone(), table.column_width(&column.key)?)))
        .collect();
    let report = ReplayReport {
        fetches: table.listener().fetches,
        widths,
        columns: table.config().source.columns.to_vec(),
        page_rows: table.page_rows().to_vec(),
        cycles,
    };
    info!(
        cycles = report.cycles.len(),
        fetches = report.fetches,
        "replay finished"
    );
    report
}

fn apply_event(table: &mut ReplayTable, event: &ScenarioEvent) {
    match event {
        ScenarioEvent::SetPage { page } => table.set_page(*page),
        ScenarioEvent::SetPageSize { page_size } => table.set_page_size(*page_size),
        ScenarioEvent::NextPage => {
            if !table.next_page() {
                debug!("already on the last page");
            }
        }
        ScenarioEvent::PreviousPage => {
            if !table.previous_page() {
                debug!("already on the first page");
            }
        }
        ScenarioEvent::Sort { key, additive } => table.sort_column(key, *additive),
        ScenarioEvent::Filter { key, value } => {
            trace!(key, value = redact_value(value), "filter edit");
            table.filter_column(key, value);
        }
        ScenarioEvent::ToggleExpanded { path } => table.toggle_expanded(path),
        ScenarioEvent::ResizeStart { column } => table.resize_start(column),
        ScenarioEvent::ResizeMove { column, width } => table.resize_move(column, *width),
        ScenarioEvent::ResizeEnd => table.resize_end(),
        ScenarioEvent::Configure { patch } => {
            let next = patch.apply(table.config());
            table.update_config(next);
        }
        ScenarioEvent::ReplaceRows { rows } => {
            if tracing::enabled!(Level::TRACE) {
                for (index, row) in rows.iter().enumerate() {
                    let text = serde_json::Value::Object(row.clone()).to_string();
                    trace!(index, values = redact_value(&text), "replacement row");
                }
            }
            let next = table.config().clone().with_rows(rows.clone());
            table.update_config(next);
        }
    }
}

fn summarize(table: &ReplayTable, step: usize, event: String, fetched: bool) -> CycleSummary {
    let state = table.state();
    CycleSummary {
        step,
        event,
        page: state.page,
        pages: state.pages,
        page_size: state.page_size,
        rows: state.row_count().unwrap_or_default(),
        sorted: state.sorted.clone(),
        filtered: state.filtered.clone(),
        expanded: state.expanded.expanded_count(),
        frozen: state.frozen,
        fetched,
    }
}
