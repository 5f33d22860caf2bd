//! Column definitions.

use serde::{Deserialize, Serialize};

/// Minimum width a column can be resized to when none is configured.
pub const DEFAULT_MIN_WIDTH: f32 = 100.0;

fn default_min_width() -> f32 {
    DEFAULT_MIN_WIDTH
}

/// Definition of one table column.
///
/// The per-column `sortable`, `filterable` and `resizable` flags override the
/// table-level capability when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Record key the column reads.
    pub key: String,
    #[serde(default)]
    pub header: Option<String>,
    /// Starting width, used until the column is resized.
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default = "default_min_width")]
    pub min_width: f32,
    #[serde(default)]
    pub sortable: Option<bool>,
    #[serde(default)]
    pub filterable: Option<bool>,
    #[serde(default)]
    pub resizable: Option<bool>,
    /// First click on the header sorts descending instead of ascending.
    #[serde(default)]
    pub default_sort_desc: bool,
}

impl ColumnDef {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: None,
            width: None,
            min_width: DEFAULT_MIN_WIDTH,
            sortable: None,
            filterable: None,
            resizable: None,
            default_sort_desc: false,
        }
    }

    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_min_width(mut self, min_width: f32) -> Self {
        self.min_width = min_width;
        self
    }

    #[must_use]
    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    #[must_use]
    pub fn with_filterable(mut self, filterable: bool) -> Self {
        self.filterable = Some(filterable);
        self
    }

    #[must_use]
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = Some(resizable);
        self
    }

    #[must_use]
    pub fn with_default_sort_desc(mut self, desc: bool) -> Self {
        self.default_sort_desc = desc;
        self
    }

    /// Header text, falling back to the key.
    pub fn header(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.key)
    }
}
