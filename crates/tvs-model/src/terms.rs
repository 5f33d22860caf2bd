//! Sort, filter, resize and expansion terms.
//!
//! These are the values a user changes through the table UI. All of them
//! compare structurally, which is what default-drift detection relies on.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of a single sort term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the ordered sort spec.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortTerm {
    /// Column key the term sorts by.
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortTerm {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    pub fn asc(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Desc)
    }
}

impl fmt::Display for SortTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.direction)
    }
}

/// Filter on a single column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterTerm {
    pub key: String,
    /// Predicate value; rows match when the cell text starts with it.
    pub value: String,
}

impl FilterTerm {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for FilterTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// User-chosen width of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeTerm {
    pub column: String,
    pub width: f32,
}

impl ResizeTerm {
    pub fn new(column: impl Into<String>, width: f32) -> Self {
        Self {
            column: column.into(),
            width,
        }
    }
}

/// Sparse mapping from row path (`"0"`, `"2.1"`) to expansion flag.
///
/// Absent paths are collapsed. An entry explicitly set to `false` is kept so
/// that structural comparison sees the same mapping the user produced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpandedRows(BTreeMap<String, bool>);

impl ExpandedRows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when at least one path is expanded.
    pub fn any_expanded(&self) -> bool {
        self.0.values().any(|expanded| *expanded)
    }

    /// Number of expanded paths.
    pub fn expanded_count(&self) -> usize {
        self.0.values().filter(|expanded| **expanded).count()
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.0.get(path).copied().unwrap_or(false)
    }

    pub fn set(&mut self, path: impl Into<String>, expanded: bool) {
        self.0.insert(path.into(), expanded);
    }

    /// Flip a path and return its new flag.
    pub fn toggle(&mut self, path: &str) -> bool {
        let next = !self.is_expanded(path);
        self.set(path, next);
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(path, expanded)| (path.as_str(), *expanded))
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for ExpandedRows {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Render a sort spec as `"age asc, name desc"`.
pub fn describe_sorted(sorted: &[SortTerm]) -> String {
    join_terms(sorted)
}

/// Render a filter spec as `"name=al, city=ber"`.
pub fn describe_filtered(filtered: &[FilterTerm]) -> String {
    join_terms(filtered)
}

fn join_terms<T: fmt::Display>(terms: &[T]) -> String {
    if terms.is_empty() {
        return "-".to_string();
    }
    terms
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expanded_rows_toggle_and_count() {
        let mut expanded = ExpandedRows::new();
        assert!(!expanded.any_expanded());
        assert!(expanded.toggle("0"));
        assert!(expanded.toggle("1.2"));
        assert!(!expanded.toggle("0"));
        assert_eq!(expanded.expanded_count(), 1);
        assert!(expanded.any_expanded());
        assert!(!expanded.is_empty());
    }

    #[test]
    fn set_overwrites_a_toggled_path() {
        let mut expanded = ExpandedRows::new();
        expanded.toggle("2");
        expanded.set("2", false);
        assert!(!expanded.is_expanded("2"));
        assert_eq!(expanded, [("2", false)].into_iter().collect());
        assert!(expanded.toggle("2"));
    }

    #[test]
    fn explicit_false_entries_are_not_expanded() {
        let expanded: ExpandedRows = [("0", false), ("1", false)].into_iter().collect();
        assert!(!expanded.any_expanded());
        assert_ne!(expanded, ExpandedRows::new());
    }

    #[test]
    fn describe_terms() {
        let sorted = vec![SortTerm::asc("age"), SortTerm::desc("name")];
        assert_eq!(describe_sorted(&sorted), "age asc, name desc");
        assert_eq!(describe_filtered(&[]), "-");
        assert_eq!(describe_filtered(&[FilterTerm::new("city", "ber")]), "city=ber");
    }

    #[test]
    fn sort_direction_defaults_to_ascending() {
        let term: SortTerm = serde_json::from_str(r#"{"key":"age"}"#).expect("parse term");
        assert_eq!(term, SortTerm::asc("age"));
        assert_eq!(term.direction.flip(), SortDirection::Desc);
    }
}
