//! Scenario replay components for the `tvs` command line tool.

pub mod logging;
pub mod replay;
pub mod scenario;
pub mod summary;
