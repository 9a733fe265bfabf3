//! Dataset acquisition and validation.
//!
//! This module turns a static JSON document (local file or HTTP resource)
//! into the in-memory [`crate::models::Dataset`].

pub mod loader;

pub use loader::{load_dataset, DataSource, DatasetError};
