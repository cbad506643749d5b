//! Exporter and eraser registration.
//!
//! The privacy orchestrator receives these maps once at startup and calls
//! the callbacks page by page.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::domain::{ContentKind, EraseOutcome, ExportPage, Result};

use super::eraser::erase_kind;
use super::exporter::Exporter;

/// Export callback: `(email, page)`.
pub type ExportFn = Box<dyn Fn(&str, u32) -> Result<ExportPage>>;

/// Erase callback: `(email, page)`.
pub type EraseFn = Box<dyn Fn(&str, u32) -> Result<EraseOutcome>>;

pub struct RegisteredExporter {
    pub friendly_name: &'static str,
    pub callback: ExportFn,
}

pub struct RegisteredEraser {
    pub friendly_name: &'static str,
    pub callback: EraseFn,
}

impl fmt::Debug for RegisteredExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredExporter")
            .field("friendly_name", &self.friendly_name)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for RegisteredEraser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredEraser")
            .field("friendly_name", &self.friendly_name)
            .finish_non_exhaustive()
    }
}

/// Exporters keyed by content kind id.
pub type ExporterRegistry = BTreeMap<&'static str, RegisteredExporter>;

/// Erasers keyed by content kind id.
pub type EraserRegistry = BTreeMap<&'static str, RegisteredEraser>;

/// Registry entries in registration order: the kinds as listed in
/// `ContentKind::ALL`, then any other ids by id.
#[must_use]
pub fn in_registration_order<'a, T>(
    registry: &'a BTreeMap<&'static str, T>,
) -> Vec<(&'static str, &'a T)> {
    let mut entries: Vec<_> = registry.iter().map(|(id, entry)| (*id, entry)).collect();
    entries.sort_by_key(|(id, _)| {
        ContentKind::ALL
            .iter()
            .position(|kind| kind.id() == *id)
            .unwrap_or(ContentKind::ALL.len())
    });
    entries
}

/// Registers one exporter per content kind.
#[must_use]
pub fn register_exporters(exporter: &Rc<Exporter>) -> ExporterRegistry {
    ContentKind::ALL
        .into_iter()
        .map(|kind| {
            let exporter = Rc::clone(exporter);
            let callback: ExportFn =
                Box::new(move |email: &str, page: u32| exporter.export_kind(kind, email, page));
            (
                kind.id(),
                RegisteredExporter {
                    friendly_name: kind.friendly_name(),
                    callback,
                },
            )
        })
        .collect()
}

/// Registers one eraser per content kind.
#[must_use]
pub fn register_erasers() -> EraserRegistry {
    ContentKind::ALL
        .into_iter()
        .map(|kind| {
            let callback: EraseFn =
                Box::new(move |email: &str, page: u32| Ok(erase_kind(kind, email, page)));
            (
                kind.id(),
                RegisteredEraser {
                    friendly_name: kind.friendly_name(),
                    callback,
                },
            )
        })
        .collect()
}
