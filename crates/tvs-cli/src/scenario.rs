//! Scenario files: a table configuration plus a list of events to replay.
//!
//! ```json
//! {
//!   "config": { "defaults": { "page_size": 5 }, "source": { "rows": [], "columns": [] } },
//!   "events": [{ "type": "sort", "key": "name" }, { "type": "next_page" }]
//! }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use tvs_model::{
    Behavior, Capabilities, ColumnDef, ControlledState, Record, Result, TableConfig,
    TableDefaults, TableError,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub config: TableConfig,
    pub events: Vec<ScenarioEvent>,
}

/// One step of a replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioEvent {
    SetPage {
        page: usize,
    },
    SetPageSize {
        page_size: usize,
    },
    NextPage,
    PreviousPage,
    Sort {
        key: String,
        #[serde(default)]
        additive: bool,
    },
    Filter {
        key: String,
        #[serde(default)]
        value: String,
    },
    ToggleExpanded {
        path: String,
    },
    ResizeStart {
        column: String,
    },
    ResizeMove {
        column: String,
        width: f32,
    },
    ResizeEnd,
    /// Host-side configuration change.
    Configure {
        patch: ConfigPatch,
    },
    /// Host replaces the data rows.
    ReplaceRows {
        rows: Vec<Record>,
    },
}

impl ScenarioEvent {
    /// Short label used in replay summaries.
    pub fn label(&self) -> String {
        match self {
            Self::SetPage { page } => format!("set_page {page}"),
            Self::SetPageSize { page_size } => format!("set_page_size {page_size}"),
            Self::NextPage => "next_page".to_string(),
            Self::PreviousPage => "previous_page".to_string(),
            Self::Sort { key, additive } => {
                if *additive {
                    format!("sort +{key}")
                } else {
                    format!("sort {key}")
                }
            }
            Self::Filter { key, value } => format!("filter {key}={value}"),
            Self::ToggleExpanded { path } => format!("toggle_expanded {path}"),
            Self::ResizeStart { column } => format!("resize_start {column}"),
            Self::ResizeMove { column, width } => format!("resize_move {column} {width}"),
            Self::ResizeEnd => "resize_end".to_string(),
            Self::Configure { .. } => "configure".to_string(),
            Self::ReplaceRows { rows } => format!("replace_rows {}", rows.len()),
        }
    }

    /// Column key the event targets, if any.
    pub fn column_key(&self) -> Option<&str> {
        match self {
            Self::Sort { key, .. } | Self::Filter { key, .. } => Some(key.as_str()),
            Self::ResizeStart { column } | Self::ResizeMove { column, .. } => {
                Some(column.as_str())
            }
            _ => None,
        }
    }
}

/// Partial configuration update. Each present section replaces the whole
/// section of the current configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub defaults: Option<TableDefaults>,
    pub capabilities: Option<Capabilities>,
    pub behavior: Option<Behavior>,
    pub controlled: Option<ControlledState>,
    pub columns: Option<Vec<ColumnDef>>,
    pub pivot_by: Option<Vec<String>>,
}

impl ConfigPatch {
    /// New configuration with this patch applied. Untouched source parts keep
    /// their identity.
    pub fn apply(&self, config: &TableConfig) -> TableConfig {
        let mut next = config.clone();
        if let Some(defaults) = &self.defaults {
            next.defaults = defaults.clone();
        }
        if let Some(capabilities) = self.capabilities {
            next.capabilities = capabilities;
        }
        if let Some(behavior) = self.behavior {
            next.behavior = behavior;
        }
        if let Some(controlled) = &self.controlled {
            next.controlled = controlled.clone();
        }
        if let Some(columns) = &self.columns {
            next.source.columns = Arc::from(columns.clone());
        }
        if let Some(pivot_by) = &self.pivot_by {
            next.source.pivot_by = Arc::from(pivot_by.clone());
        }
        next
    }
}

impl Scenario {
    /// Check every event against the columns configured at that point.
    pub fn validate(&self) -> Result<()> {
        let mut columns = column_keys(&self.config.source.columns);
        for (index, event) in self.events.iter().enumerate() {
            if let ScenarioEvent::Configure { patch } = event
                && let Some(replaced) = &patch.columns
            {
                columns = column_keys(replaced);
            }
            if let Some(key) = event.column_key()
                && !columns.contains(key)
            {
                return Err(TableError::InvalidScenario {
                    index,
                    message: format!("unknown column `{key}`"),
                });
            }
            if let ScenarioEvent::SetPageSize { page_size: 0 } = event {
                return Err(TableError::InvalidScenario {
                    index,
                    message: "page size must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn column_keys(columns: &[ColumnDef]) -> BTreeSet<String> {
    columns.iter().map(|column| column.key.clone()).collect()
}

/// Parse and validate a scenario document.
pub fn parse_scenario(text: &str) -> Result<Scenario> {
    let scenario: Scenario = serde_json::from_str(text)?;
    scenario.validate()?;
    Ok(scenario)
}

/// Read, parse and validate a scenario file.
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = fs::read_to_string(path)?;
    let scenario = parse_scenario(&text)?;
    debug!(
        path = %path.display(),
        events = scenario.events.len(),
        rows = scenario.config.source.rows.len(),
        "loaded scenario"
    );
    Ok(scenario)
}
