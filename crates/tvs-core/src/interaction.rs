//! Pure edits of sort, filter and resize specs driven by user interaction.

use tvs_model::{ColumnDef, FilterTerm, ResizeTerm, SortDirection, SortTerm};

/// Sort spec after clicking a column header.
///
/// A column that is not sorted yet starts ascending, or descending when the
/// column asks for it. A sorted column flips direction. Without `additive`
/// the result holds only the clicked column; with it, other terms stay in
/// place and a new term is appended.
pub fn toggle_sort(
    sorted: &[SortTerm],
    key: &str,
    column: Option<&ColumnDef>,
    additive: bool,
) -> Vec<SortTerm> {
    let first_direction = if column.is_some_and(|column| column.default_sort_desc) {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    let existing = sorted.iter().find(|term| term.key == key);
    let direction = existing.map_or(first_direction, |term| term.direction.flip());

    if !additive {
        return vec![SortTerm::new(key, direction)];
    }
    let mut next = sorted.to_vec();
    match next.iter_mut().find(|term| term.key == key) {
        Some(term) => term.direction = direction,
        None => next.push(SortTerm::new(key, direction)),
    }
    next
}

/// Filter spec after editing one column's filter.
///
/// An empty (or whitespace-only) value removes the column's filter.
pub fn set_filter(filtered: &[FilterTerm], key: &str, value: &str) -> Vec<FilterTerm> {
    let mut next: Vec<FilterTerm> = filtered
        .iter()
        .filter(|term| term.key != key)
        .cloned()
        .collect();
    if value.trim().is_empty() {
        return next;
    }
    match filtered.iter().position(|term| term.key == key) {
        Some(position) => next.insert(position, FilterTerm::new(key, value)),
        None => next.push(FilterTerm::new(key, value)),
    }
    next
}

/// Resize spec after dragging a column to `width`, clamped to its minimum.
pub fn set_width(
    resized: &[ResizeTerm],
    column: &str,
    width: f32,
    min_width: f32,
) -> Vec<ResizeTerm> {
    let width = if width.is_finite() {
        width.max(min_width)
    } else {
        min_width
    };
    let mut next = resized.to_vec();
    match next.iter_mut().find(|term| term.column == column) {
        Some(term) => term.width = width,
        None => next.push(ResizeTerm::new(column, width)),
    }
    next
}

/// Page that keeps the first visible row on screen after a page size change.
pub fn page_for_new_size(page: usize, old_size: usize, new_size: usize) -> usize {
    page.saturating_mul(old_size.max(1)) / new_size.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_click_sorts_ascending_then_flips() {
        let once = toggle_sort(&[], "age", None, false);
        assert_eq!(once, vec![SortTerm::asc("age")]);
        let twice = toggle_sort(&once, "age", None, false);
        assert_eq!(twice, vec![SortTerm::desc("age")]);
    }

    #[test]
    fn column_can_default_to_descending() {
        let column = ColumnDef::new("score").with_default_sort_desc(true);
        let sorted = toggle_sort(&[], "score", Some(&column), false);
        assert_eq!(sorted, vec![SortTerm::desc("score")]);
    }

    #[test]
    fn plain_click_replaces_other_terms() {
        let sorted = vec![SortTerm::asc("age"), SortTerm::asc("name")];
        let next = toggle_sort(&sorted, "name", None, false);
        assert_eq!(next, vec![SortTerm::desc("name")]);
    }

    #[test]
    fn additive_click_appends_or_flips_in_place() {
        let sorted = vec![SortTerm::asc("age")];
        let appended = toggle_sort(&sorted, "name", None, true);
        assert_eq!(appended, vec![SortTerm::asc("age"), SortTerm::asc("name")]);
        let flipped = toggle_sort(&appended, "age", None, true);
        assert_eq!(flipped, vec![SortTerm::desc("age"), SortTerm::asc("name")]);
    }

    #[test]
    fn filter_edits_replace_in_place_and_remove_on_empty() {
        let filtered = vec![FilterTerm::new("city", "be"), FilterTerm::new("name", "a")];
        let replaced = set_filter(&filtered, "city", "par");
        assert_eq!(
            replaced,
            vec![FilterTerm::new("city", "par"), FilterTerm::new("name", "a")]
        );
        let removed = set_filter(&replaced, "city", "  ");
        assert_eq!(removed, vec![FilterTerm::new("name", "a")]);
        let added = set_filter(&removed, "age", "3");
        assert_eq!(added.len(), 2);
        assert_eq!(added[1], FilterTerm::new("age", "3"));
    }

    #[test]
    fn widths_respect_minimum() {
        let resized = set_width(&[], "name", 40.0, 100.0);
        assert_eq!(resized, vec![ResizeTerm::new("name", 100.0)]);
        let resized = set_width(&resized, "name", 180.0, 100.0);
        assert_eq!(resized, vec![ResizeTerm::new("name", 180.0)]);
        let resized = set_width(&resized, "name", f32::NAN, 100.0);
        assert_eq!(resized, vec![ResizeTerm::new("name", 100.0)]);
    }

    #[test]
    fn page_size_change_keeps_first_row_visible() {
        assert_eq!(page_for_new_size(3, 10, 25), 1);
        assert_eq!(page_for_new_size(0, 10, 5), 0);
        assert_eq!(page_for_new_size(2, 10, 0), 20);
    }
}
