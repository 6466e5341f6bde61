//! Library components of the `tally` command-line tool.

pub mod logging;
pub mod reconcile;
pub mod render;
