//! Harness artifacts: discovery, loading and classification
//!
//! An artifact is a file the external test run left behind. Tables
//! (`*.csv`) are the primary input; audio (`*.wav`) is only ever looked up as
//! the sibling of a table with the same base name.
//!
//! - [`discover`]: listing table artifacts and their audio siblings
//! - [`table`]: CSV parsing into named numeric columns
//! - [`classify`]: name-based layout and trace-style rules
//! - [`sweep`]: `prefix_type_param` families and their dense grid

pub mod classify;
pub mod discover;
pub mod sweep;
pub mod table;

pub use classify::{classify, Classification, Layout, TraceStyle, XAxis};
pub use discover::{base_name, discover_tables, sibling_audio};
pub use sweep::{SweepFamily, SweepGrid};
pub use table::Table;
