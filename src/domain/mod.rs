//! Domain layer - core types, ports and errors.
//!
//! This layer contains pure domain models, the collaborator traits and
//! error types without any I/O of its own.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;
pub mod query;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use models::{
    ContentKind, EraseOutcome, EraseResult, ExportField, ExportGroup, ExportItem,
    ExportPage, ExportReport, FieldMap, FieldSource, Identity, Record,
};
pub use ports::{ContentQueryService, IdentityResolver, MetaStore};
pub use query::{total_pages, ContentQuery, OrderBy, QueryFilter, QueryResult, SortOrder};
