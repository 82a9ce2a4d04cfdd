//! Table layouts shared by the integration and cleaning stages.

pub mod columns;

pub use columns::{Column, ColumnSet};
