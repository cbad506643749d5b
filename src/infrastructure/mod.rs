//! Infrastructure layer - external adapters (database, filesystem).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod sqlite_store;

pub use config::{ensure_config_exists, load_config, render_config};
pub use sqlite_store::SqliteContentStore;
