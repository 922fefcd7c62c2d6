// lib.rs - Root module for the sql_movies library
//
// Snapshot-based fixtures for SQL exercises: copy a snapshot database to a
// working copy, open it, run literal queries, compare the rows.

pub mod config;
pub mod database;
pub mod error;
/// The fixtures module contains the dataset and the snapshot chain builder
pub mod fixtures;
pub mod loader;
pub mod row;
pub mod snapshot;
pub mod timing;

pub use config::{CleanupPolicy, HarnessConfig};
pub use database::Database;
pub use error::{Error, ErrorKind, Result};
pub use loader::FixtureLoader;
pub use row::Row;
pub use snapshot::SnapshotLabel;
pub use timing::minutes;
