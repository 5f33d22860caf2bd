//! Configuration and state snapshot types for table view state.

pub mod column;
pub mod config;
pub mod error;
pub mod state;
pub mod terms;

pub use column::{ColumnDef, DEFAULT_MIN_WIDTH};
pub use config::{
    Behavior, Capabilities, ControlledState, DEFAULT_PAGE_SIZE, DataSource, Record, TableConfig,
    TableDefaults,
};
pub use error::{Result, TableError};
pub use state::{GroupInfo, InternalState, ResolvedState, RowView, StateField, ViewRow};
pub use terms::{
    ExpandedRows, FilterTerm, ResizeTerm, SortDirection, SortTerm, describe_filtered,
    describe_sorted,
};
