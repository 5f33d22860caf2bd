pub mod cascade;
pub mod engine;
pub mod interaction;
pub mod resolver;
pub mod row_model;
pub mod table;

pub use cascade::{
    CASCADE_RULES, Capability, CascadeRule, DefaultableOption, apply_capability_resets,
    apply_default_drift,
};
pub use engine::{Reconciliation, initialize, is_frozen, reconcile};
pub use interaction::{page_for_new_size, set_filter, set_width, toggle_sort};
pub use resolver::{prefer_controlled, resolve};
pub use row_model::{
    LocalRowModel, RowModel, cell_text, compare_cells, filter_rows, matches_filter, pivot_rows,
    sort_rows,
};
pub use table::{NoopListener, Table, TableListener};
