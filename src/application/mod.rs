//! Application layer - use cases and orchestration.
//!
//! This layer contains the exporters, erasers and ownership rules, plus the
//! request orchestration and formatting used by the CLI.

pub mod eraser;
pub mod exporter;
pub mod fields;
pub mod fixtures;
pub mod formatter;
#[cfg(test)]
pub mod memory_store;
pub mod ownership;
pub mod registry;
pub mod request;

pub use exporter::Exporter;
pub use fixtures::{import_fixture, parse_fixture};
pub use formatter::{
    format_erase_results, format_json, format_page_markdown, format_registry_table,
    format_items_table, format_report_markdown, format_report_table, format_summary,
    OutputFormat,
};
pub use registry::{register_erasers, register_exporters};
pub use request::{run_erase_request, run_export_request};
