//! Data subject request orchestration.
//!
//! Drives every registered exporter (or eraser) for one email address,
//! requesting page after page until the callback reports `done`.

use chrono::Utc;

use crate::domain::{AppError, ContentKind, EraseResult, ExportGroup, ExportReport, Result};

use super::registry::{in_registration_order, EraserRegistry, ExporterRegistry};

/// Runs a full export request.
///
/// With `only`, just that kind's exporter runs.
///
/// # Errors
/// Returns the first exporter error, or `PageLimit` if an exporter is
/// still not done after `max_pages` pages.
pub fn run_export_request(
    exporters: &ExporterRegistry,
    email: &str,
    only: Option<ContentKind>,
    max_pages: u32,
) -> Result<ExportReport> {
    tracing::info!(exporters = exporters.len(), "Starting export request");

    let mut groups = Vec::new();

    for (id, exporter) in in_registration_order(exporters) {
        if only.is_some_and(|kind| kind.id() != id) {
            continue;
        }

        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let result = (exporter.callback)(email, page)?;
            items.extend(result.data);

            if result.done {
                break;
            }
            if page >= max_pages {
                return Err(AppError::PageLimit {
                    callback: format!("Exporter {id}"),
                    max_pages,
                });
            }
            page += 1;
        }

        tracing::info!(exporter = id, pages = page, items = items.len(), "Exporter finished");

        groups.push(ExportGroup {
            exporter_id: id.to_string(),
            friendly_name: exporter.friendly_name.to_string(),
            pages: page,
            items,
        });
    }

    Ok(ExportReport {
        email: email.to_string(),
        generated_at: Utc::now(),
        groups,
    })
}

/// Runs a full erase request.
///
/// # Errors
/// Returns the first eraser error, or `PageLimit` if an eraser is still not
/// done after `max_pages` pages.
pub fn run_erase_request(
    erasers: &EraserRegistry,
    email: &str,
    only: Option<ContentKind>,
    max_pages: u32,
) -> Result<Vec<EraseResult>> {
    tracing::info!(erasers = erasers.len(), "Starting erase request");

    let mut results = Vec::new();

    for (id, eraser) in in_registration_order(erasers) {
        if only.is_some_and(|kind| kind.id() != id) {
            continue;
        }

        let mut page = 1;
        let outcome = loop {
            let outcome = (eraser.callback)(email, page)?;
            if outcome.done() {
                break outcome;
            }
            if page >= max_pages {
                return Err(AppError::PageLimit {
                    callback: format!("Eraser {id}"),
                    max_pages,
                });
            }
            page += 1;
        };

        results.push(EraseResult {
            eraser_id: id.to_string(),
            friendly_name: eraser.friendly_name.to_string(),
            outcome,
        });
    }

    Ok(results)
}
