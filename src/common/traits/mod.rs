//! Common traits shared by models and readers

pub mod adapter;

pub use adapter::BatchAdapter;
