#![warn(clippy::all, missing_docs)]

//! Core domain logic for the wmtui compendium browser.
//!
//! This crate hosts the data models, configuration handling,
//! dataset loading and cross-referencing, the filter/sort engine,
//! and the detail-shaping/export layers used by the terminal UI
//! and any future frontends.

pub mod config;
pub mod dataset;
pub mod detail;
pub mod error;
pub mod export;
pub mod models;
pub mod query;

pub use config::AppConfig;
pub use dataset::{CrossIndex, DatasetLoader, DatasetSync, LoadEvent, Snapshot, SnapshotSlot};
pub use error::{DatasetError, Resource};
pub use models::{Unit, Warband};
