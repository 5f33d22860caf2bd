//! Default-drift and capability-toggle cascades.
//!
//! Both cascades walk the same static table. A rule names the option that is
//! reset and, when there is one, the capability flag that drives it.

use tracing::debug;
use tvs_model::{Capabilities, ResolvedState, TableDefaults};

/// Options whose live value can be forced back to its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultableOption {
    Sorted,
    Filtered,
    Resized,
    Expanded,
}

impl DefaultableOption {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sorted => "sorted",
            Self::Filtered => "filtered",
            Self::Resized => "resized",
            Self::Expanded => "expanded",
        }
    }

    /// Structural comparison of this option's default in two configurations.
    fn default_differs(self, previous: &TableDefaults, candidate: &TableDefaults) -> bool {
        match self {
            Self::Sorted => previous.sorted != candidate.sorted,
            Self::Filtered => previous.filtered != candidate.filtered,
            Self::Resized => previous.resized != candidate.resized,
            Self::Expanded => previous.expanded != candidate.expanded,
        }
    }

    fn reset_to_default(self, state: &mut ResolvedState) {
        match self {
            Self::Sorted => state.sorted = state.defaults.sorted.clone(),
            Self::Filtered => state.filtered = state.defaults.filtered.clone(),
            Self::Resized => {
                state.resized = state.defaults.resized.clone();
                state.currently_resizing = false;
            }
            Self::Expanded => state.expanded = state.defaults.expanded.clone(),
        }
    }
}

/// Table-level capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Sortable,
    Filterable,
    Resizable,
}

impl Capability {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sortable => "sortable",
            Self::Filterable => "filterable",
            Self::Resizable => "resizable",
        }
    }

    pub fn is_enabled(self, capabilities: &Capabilities) -> bool {
        match self {
            Self::Sortable => capabilities.sortable,
            Self::Filterable => capabilities.filterable,
            Self::Resizable => capabilities.resizable,
        }
    }
}

/// One row of the cascade table.
#[derive(Debug, Clone, Copy)]
pub struct CascadeRule {
    pub option: DefaultableOption,
    pub capability: Option<Capability>,
}

pub const CASCADE_RULES: [CascadeRule; 4] = [
    CascadeRule {
        option: DefaultableOption::Sorted,
        capability: Some(Capability::Sortable),
    },
    CascadeRule {
        option: DefaultableOption::Filtered,
        capability: Some(Capability::Filterable),
    },
    CascadeRule {
        option: DefaultableOption::Resized,
        capability: Some(Capability::Resizable),
    },
    CascadeRule {
        option: DefaultableOption::Expanded,
        capability: None,
    },
];

/// Reset every option whose default changed between the two snapshots.
pub fn apply_default_drift(previous: &ResolvedState, candidate: &mut ResolvedState) {
    for rule in &CASCADE_RULES {
        if rule
            .option
            .default_differs(&previous.defaults, &candidate.defaults)
        {
            debug!(option = rule.option.name(), "default changed, resetting");
            rule.option.reset_to_default(candidate);
        }
    }
}

/// Reset every option whose driving capability flag was toggled.
pub fn apply_capability_resets(previous: &ResolvedState, candidate: &mut ResolvedState) {
    for rule in &CASCADE_RULES {
        let Some(capability) = rule.capability else {
            continue;
        };
        if capability.is_enabled(&previous.capabilities)
            != capability.is_enabled(&candidate.capabilities)
        {
            debug!(
                option = rule.option.name(),
                capability = capability.name(),
                enabled = capability.is_enabled(&candidate.capabilities),
                "capability toggled, resetting"
            );
            rule.option.reset_to_default(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use tvs_model::{
        ExpandedRows, FilterTerm, InternalState, ResizeTerm, SortTerm, TableConfig,
    };

    fn snapshot(config: &TableConfig, internal: &InternalState) -> ResolvedState {
        resolve(config, internal)
    }

    fn user_state() -> InternalState {
        InternalState {
            sorted: vec![SortTerm::desc("name")],
            filtered: vec![FilterTerm::new("city", "ber")],
            resized: vec![ResizeTerm::new("name", 240.0)],
            expanded: [("0", true)].into_iter().collect(),
            currently_resizing: true,
            ..InternalState::default()
        }
    }

    #[test]
    fn unchanged_defaults_leave_state_alone() {
        let config = TableConfig::new();
        let internal = user_state();
        let previous = snapshot(&config, &internal);
        let mut candidate = snapshot(&config, &internal);
        apply_default_drift(&previous, &mut candidate);
        apply_capability_resets(&previous, &mut candidate);
        assert_eq!(candidate.sorted, internal.sorted);
        assert_eq!(candidate.filtered, internal.filtered);
        assert_eq!(candidate.resized, internal.resized);
        assert_eq!(candidate.expanded, internal.expanded);
    }

    #[test]
    fn drifted_default_replaces_only_its_option() {
        let internal = user_state();
        let previous = snapshot(&TableConfig::new(), &internal);
        let config = TableConfig::new().with_default_sorted(vec![SortTerm::asc("age")]);
        let mut candidate = snapshot(&config, &internal);
        apply_default_drift(&previous, &mut candidate);
        assert_eq!(candidate.sorted, vec![SortTerm::asc("age")]);
        assert_eq!(candidate.filtered, internal.filtered);
        assert!(candidate.expanded.any_expanded());
    }

    #[test]
    fn expanded_default_drift_collapses_rows() {
        let internal = user_state();
        let previous = snapshot(&TableConfig::new(), &internal);
        let mut config = TableConfig::new();
        config.defaults.expanded = [("3", true)].into_iter().collect::<ExpandedRows>();
        let mut candidate = snapshot(&config, &internal);
        apply_default_drift(&previous, &mut candidate);
        assert!(candidate.expanded.is_expanded("3"));
        assert!(!candidate.expanded.is_expanded("0"));
    }

    #[test]
    fn toggled_resizable_clears_resize_state() {
        let internal = user_state();
        let previous = snapshot(&TableConfig::new(), &internal);
        let config = TableConfig::new().with_resizable(false);
        let mut candidate = snapshot(&config, &internal);
        apply_capability_resets(&previous, &mut candidate);
        assert!(candidate.resized.is_empty());
        assert!(!candidate.currently_resizing);
        assert_eq!(candidate.sorted, internal.sorted);
    }

    #[test]
    fn toggled_filterable_uses_updated_default() {
        let internal = user_state();
        let previous = snapshot(&TableConfig::new(), &internal);
        let config = TableConfig::new()
            .with_filterable(true)
            .with_default_filtered(vec![FilterTerm::new("city", "par")]);
        let mut candidate = snapshot(&config, &internal);
        apply_capability_resets(&previous, &mut candidate);
        assert_eq!(candidate.filtered, vec![FilterTerm::new("city", "par")]);
    }
}
