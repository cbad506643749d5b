//! Personal-data erasers.
//!
//! No erasure or anonymization behavior has been defined for WordCamp
//! content, so every eraser reports that nothing was done.

use crate::domain::{ContentKind, EraseOutcome};

/// Erases personal data of `kind` owned by the requested email address.
///
/// The address is never logged.
pub fn erase_kind(kind: ContentKind, _email: &str, page: u32) -> EraseOutcome {
    tracing::warn!(
        kind = %kind,
        page,
        "Erasure requested but not implemented; nothing removed"
    );

    EraseOutcome::NotImplemented { kind }
}
