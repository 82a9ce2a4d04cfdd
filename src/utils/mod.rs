//! Shared helpers for Arrow column handling and logging

pub mod arrow;
pub mod logging;
