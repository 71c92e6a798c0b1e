//! Trajectory data: loading, in-memory table and summary statistics
//!
//! Structure:
//! - `table.rs`: `TimeSeriesTable`, the immutable `(time, position, velocity)` table
//! - `loader.rs`: CSV loading with schema and numeric validation
//! - `stats.rs`: `SummaryStatistics` and the post-load `TableOverview`

pub mod loader;
pub mod stats;
pub mod table;

pub use loader::load_csv;
pub use stats::{SummaryStatistics, TableOverview};
pub use table::{Column, Row, TimeSeriesTable};
