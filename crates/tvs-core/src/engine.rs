//! Reconciliation engine.
//!
//! `reconcile` is a pure transition `(previous, candidate, config) ->
//! (next, fetch?)`. It runs these steps in order:
//!
//! 1. clear a `skip_next_sort` flag armed by the previous cycle
//! 2. default-drift reset
//! 3. capability-toggle reset
//! 4. recompute trigger (suppressed while frozen)
//! 5. collapse cascade, then recompute through the row model
//! 6. page reset on filter change
//! 7. pagination clamp (skipped in manual mode)
//! 8. fetch decision against the previous snapshot
//!
//! The engine never fails. Out-of-range pages are clamped, never rejected.

use tracing::{debug, debug_span};
use tvs_model::{ExpandedRows, ResolvedState, TableConfig};

use crate::cascade::{apply_capability_resets, apply_default_drift};
use crate::row_model::RowModel;

/// Result of one reconciliation cycle.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub state: ResolvedState,
    /// The caller should notify its fetch collaborator.
    pub fetch_requested: bool,
    /// The row model was invoked this cycle.
    pub recomputed: bool,
}

/// What differs between the previous snapshot and the candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Changes {
    rows: bool,
    columns: bool,
    pivot_by: bool,
    sorted: bool,
    filtered: bool,
    show_filters: bool,
}

impl Changes {
    fn between(previous: &ResolvedState, candidate: &ResolvedState) -> Self {
        Self {
            rows: !previous.source.same_rows(&candidate.source),
            columns: !previous.source.same_columns(&candidate.source),
            pivot_by: !previous.source.same_pivot(&candidate.source),
            sorted: previous.sorted != candidate.sorted,
            filtered: previous.filtered != candidate.filtered,
            show_filters: previous.show_filters != candidate.show_filters,
        }
    }

    /// Rows, columns or pivot keys were replaced.
    fn source(&self) -> bool {
        self.rows || self.columns || self.pivot_by
    }

    fn any(&self) -> bool {
        self.source() || self.sorted || self.filtered || self.show_filters
    }
}

/// Frozen iff freezing is enabled and some row is expanded.
pub fn is_frozen(config: &TableConfig, expanded: &ExpandedRows) -> bool {
    config.behavior.freeze_when_expanded && expanded.any_expanded()
}

/// Reconcile a candidate snapshot against the previous one.
pub fn reconcile<M>(
    previous: &ResolvedState,
    candidate: ResolvedState,
    config: &TableConfig,
    row_model: &M,
) -> Reconciliation
where
    M: RowModel + ?Sized,
{
    let span = debug_span!("reconcile", page = candidate.page);
    let _guard = span.enter();

    let mut next = candidate;

    // One-shot: armed by one cycle, consumed by the next whatever it changes.
    if previous.skip_next_sort && next.skip_next_sort {
        debug!("clearing consumed skip_next_sort");
        next.skip_next_sort = false;
    }

    apply_default_drift(previous, &mut next);
    apply_capability_resets(previous, &mut next);

    let changes = Changes::between(previous, &next);
    next.frozen = is_frozen(config, &next.expanded);

    let recompute = !next.frozen
        && (changes.any() || previous.frozen || next.view.is_none());
    if recompute {
        if should_collapse(previous, &next, &changes, config) {
            debug!(
                expanded = next.expanded.expanded_count(),
                "collapsing expanded rows"
            );
            next.expanded = ExpandedRows::default();
        }
        next.view = Some(row_model.compute_row_view(&next, changes.rows));
    } else if next.frozen && changes.any() {
        debug!("rows are expanded, keeping frozen row view");
    }

    if changes.filtered {
        debug!("filters changed, returning to first page");
        next.page = 0;
    }

    clamp_pagination(&mut next, config);

    let fetch_requested = fetch_needed(previous, &next);
    if fetch_requested {
        debug!(
            page = next.page,
            page_size = next.page_size,
            "fetch requested"
        );
    }

    Reconciliation {
        state: next,
        fetch_requested,
        recomputed: recompute,
    }
}

/// Build the very first snapshot: compute the row view and clamp.
///
/// No fetch decision is made here; mounting fires one unconditionally.
pub fn initialize<M>(candidate: ResolvedState, config: &TableConfig, row_model: &M) -> ResolvedState
where
    M: RowModel + ?Sized,
{
    let span = debug_span!("initialize");
    let _guard = span.enter();

    let mut state = candidate;
    state.frozen = is_frozen(config, &state.expanded);
    state.view = Some(row_model.compute_row_view(&state, true));
    clamp_pagination(&mut state, config);
    state
}

/// Evaluated only when a recompute is about to happen.
fn should_collapse(
    previous: &ResolvedState,
    next: &ResolvedState,
    changes: &Changes,
    config: &TableConfig,
) -> bool {
    (changes.sorted && config.behavior.collapse_on_sorting_change)
        || changes.filtered
        || changes.show_filters
        || (previous.view.is_some()
            && !next.frozen
            && changes.source()
            && config.behavior.collapse_on_data_change)
}

fn clamp_pagination(state: &mut ResolvedState, config: &TableConfig) {
    let Some(view) = &state.view else {
        return;
    };
    if config.behavior.manual {
        return;
    }
    let pages = view.len().div_ceil(state.page_size.max(1));
    state.pages = pages;
    if state.page >= pages {
        let clamped = pages.saturating_sub(1);
        if clamped != state.page {
            debug!(from = state.page, to = clamped, pages, "clamping page");
        }
        state.page = clamped;
    }
}

fn fetch_needed(previous: &ResolvedState, next: &ResolvedState) -> bool {
    previous.page != next.page
        || previous.page_size != next.page_size
        || previous.sorted != next.sorted
        || previous.filtered != next.filtered
}
