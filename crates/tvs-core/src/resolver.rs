//! Controlled/uncontrolled state resolution.

use std::fmt::Debug;

use tracing::trace;
use tvs_model::{InternalState, ResolvedState, StateField, TableConfig};

/// Merge controlled values over the internal state.
///
/// Total over its inputs: `TableConfig::default()` and
/// `InternalState::default()` are both valid, and a zero page size is
/// normalized to one.
pub fn resolve(config: &TableConfig, internal: &InternalState) -> ResolvedState {
    let controlled = &config.controlled;
    ResolvedState {
        page: prefer_controlled(StateField::Page, controlled.page.as_ref(), &internal.page),
        page_size: prefer_controlled(
            StateField::PageSize,
            controlled.page_size.as_ref(),
            &internal.page_size,
        )
        .max(1),
        pages: prefer_controlled(StateField::Pages, controlled.pages.as_ref(), &internal.pages),
        sorted: prefer_controlled(
            StateField::Sorted,
            controlled.sorted.as_ref(),
            &internal.sorted,
        ),
        filtered: prefer_controlled(
            StateField::Filtered,
            controlled.filtered.as_ref(),
            &internal.filtered,
        ),
        expanded: prefer_controlled(
            StateField::Expanded,
            controlled.expanded.as_ref(),
            &internal.expanded,
        ),
        resized: prefer_controlled(
            StateField::Resized,
            controlled.resized.as_ref(),
            &internal.resized,
        ),
        currently_resizing: internal.currently_resizing,
        skip_next_sort: internal.skip_next_sort,
        frozen: internal.frozen,
        defaults: config.defaults.clone(),
        capabilities: config.capabilities,
        show_filters: config.behavior.show_filters,
        source: config.source.clone(),
        view: internal.view.clone(),
    }
}

/// The controlled value when the host supplies one, else the internal value.
pub fn prefer_controlled<T: Clone + Debug>(
    field: StateField,
    controlled: Option<&T>,
    internal: &T,
) -> T {
    match controlled {
        Some(value) => {
            trace!(field = %field, value = ?value, "using controlled value");
            value.clone()
        }
        None => internal.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvs_model::{ControlledState, SortTerm, TableDefaults};

    #[test]
    fn controlled_values_win() {
        let config = TableConfig::new().with_controlled(ControlledState {
            page: Some(3),
            sorted: Some(vec![SortTerm::desc("age")]),
            ..ControlledState::default()
        });
        let internal = InternalState {
            page: 1,
            sorted: vec![SortTerm::asc("name")],
            ..InternalState::default()
        };
        let resolved = resolve(&config, &internal);
        assert_eq!(resolved.page, 3);
        assert_eq!(resolved.sorted, vec![SortTerm::desc("age")]);
        assert_eq!(resolved.page_size, internal.page_size);
    }

    #[test]
    fn uncontrolled_values_come_from_internal_state() {
        let config = TableConfig::new().with_defaults(TableDefaults {
            page_size: 50,
            ..TableDefaults::default()
        });
        let internal = InternalState::from_defaults(&config.defaults);
        let resolved = resolve(&config, &internal);
        assert_eq!(resolved.page_size, 50);
        assert_eq!(resolved.defaults, config.defaults);
        assert!(resolved.view.is_none());
    }

    #[test]
    fn empty_inputs_resolve() {
        let resolved = resolve(&TableConfig::default(), &InternalState::default());
        assert_eq!(resolved.page, 0);
        assert!(resolved.page_size >= 1);
        assert!(resolved.sorted.is_empty());
        assert!(!resolved.frozen);
    }

    #[test]
    fn zero_page_size_is_normalized() {
        let config = TableConfig::new().with_controlled(ControlledState {
            page_size: Some(0),
            ..ControlledState::default()
        });
        let resolved = resolve(&config, &InternalState::default());
        assert_eq!(resolved.page_size, 1);
    }
}
