//! Terminal output for the `clusterkit` binary.
//!
//! Provides styled tables for registry listings and cluster summaries, and
//! progress bars that plug into the clustering progress seam.

pub mod progress;
pub mod tables;
pub mod theme;

pub use progress::{BarReporter, create_progress_bar};
pub use tables::{TableBuilder, cluster_summary_table, names_table};
pub use theme::{THEME, Theme};
