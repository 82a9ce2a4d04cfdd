//! Algorithms of the two pipeline stages
//!
//! `integration` builds the merged table from the scraped postings and the
//! country economics; `cleaning` turns it into the analysis-ready table. The
//! remaining modules hold the pieces both stages share.

pub mod cleaning;
pub mod integration;
pub mod location;
pub mod salary;
pub mod statistics;
