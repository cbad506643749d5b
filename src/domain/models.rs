//! Domain models for personal-data export.
//!
//! These models describe the WordCamp content records a data subject may own
//! and the shape of the export pages handed back to the privacy orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The content post types that carry personal data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    /// Session speakers (`wcb_speaker`).
    #[serde(rename = "wcb_speaker")]
    Speaker,
    /// Event sponsors (`wcb_sponsor`).
    #[serde(rename = "wcb_sponsor")]
    Sponsor,
    /// Event organizers (`wcb_organizer`).
    #[serde(rename = "wcb_organizer")]
    Organizer,
}

impl ContentKind {
    /// All kinds, in registration order.
    pub const ALL: [Self; 3] = [Self::Speaker, Self::Sponsor, Self::Organizer];

    /// Post type identifier, also used as exporter id and export group id.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Speaker => "wcb_speaker",
            Self::Sponsor => "wcb_sponsor",
            Self::Organizer => "wcb_organizer",
        }
    }

    /// Name shown for the registered exporter and eraser.
    #[must_use]
    pub const fn friendly_name(self) -> &'static str {
        match self {
            Self::Speaker => "WordCamp Speaker Data",
            Self::Sponsor => "WordCamp Sponsor Data",
            Self::Organizer => "WordCamp Organizer Data",
        }
    }

    /// Label of the export group items of this kind belong to.
    #[must_use]
    pub const fn group_label(self) -> &'static str {
        match self {
            Self::Speaker => "WordCamp Speakers",
            Self::Sponsor => "WordCamp Sponsors",
            Self::Organizer => "WordCamp Organizers",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wcb_speaker" | "speaker" => Ok(Self::Speaker),
            "wcb_sponsor" | "sponsor" => Ok(Self::Sponsor),
            "wcb_organizer" | "organizer" => Ok(Self::Organizer),
            _ => Err(format!(
                "Unknown content kind: {s}. Use: wcb_speaker, wcb_sponsor, wcb_organizer"
            )),
        }
    }
}

/// Fields stored on the record itself rather than in its metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreField {
    Title,
    Content,
}

/// Where a field-map key is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource<'a> {
    Core(CoreField),
    Meta(&'a str),
}

impl<'a> FieldSource<'a> {
    /// Classifies a field-map key.
    #[must_use]
    pub fn of(key: &'a str) -> Self {
        match key {
            "post_title" => Self::Core(CoreField::Title),
            "post_content" => Self::Core(CoreField::Content),
            other => Self::Meta(other),
        }
    }
}

/// Ordered mapping of internal field key to display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    entries: &'static [(&'static str, &'static str)],
}

impl FieldMap {
    #[must_use]
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Iterates `(key, label)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A content item as returned by the content-query service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned identifier.
    pub id: u64,
    /// Post type of the record.
    pub kind: ContentKind,
    /// Core `post_title` field.
    #[serde(default)]
    pub title: String,
    /// Core `post_content` field.
    #[serde(default)]
    pub content: String,
}

impl Record {
    /// Reads a core field.
    #[must_use]
    pub fn core_field(&self, field: CoreField) -> &str {
        match field {
            CoreField::Title => &self.title,
            CoreField::Content => &self.content,
        }
    }
}

/// A user account resolved from an email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Account login name.
    pub login: String,
    /// URL-safe "nice" name of the account.
    pub display_alias: String,
}

/// One exported `{name, value}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportField {
    pub name: String,
    pub value: String,
}

/// Personal data exported from one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportItem {
    pub group_id: String,
    pub group_label: String,
    pub item_id: String,
    pub data: Vec<ExportField>,
}

/// Result of one exporter invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportPage {
    /// Items found on this page.
    pub data: Vec<ExportItem>,
    /// Whether the last page has been reached.
    pub done: bool,
}

impl ExportPage {
    /// A final page with no items.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            data: Vec::new(),
            done: true,
        }
    }
}

/// Result of one eraser invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EraseOutcome {
    /// No erasure behavior is defined for this kind.
    NotImplemented { kind: ContentKind },
}

impl EraseOutcome {
    #[must_use]
    pub const fn items_removed(&self) -> bool {
        match self {
            Self::NotImplemented { .. } => false,
        }
    }

    /// Erasers never page; every outcome is final.
    #[must_use]
    pub const fn done(&self) -> bool {
        true
    }

    /// Human-readable explanation for the request log.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NotImplemented { kind } => format!(
                "Erasure of {} is not implemented; no data was removed.",
                kind.friendly_name()
            ),
        }
    }
}

/// Everything one exporter produced across all of its pages.
#[derive(Debug, Clone, Serialize)]
pub struct ExportGroup {
    pub exporter_id: String,
    pub friendly_name: String,
    pub pages: u32,
    pub items: Vec<ExportItem>,
}

/// A complete export request for one email address.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub email: String,
    pub generated_at: DateTime<Utc>,
    pub groups: Vec<ExportGroup>,
}

impl ExportReport {
    /// Total items across all groups.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}

/// Outcome of one eraser for an erase request.
#[derive(Debug, Clone, Serialize)]
pub struct EraseResult {
    pub eraser_id: String,
    pub friendly_name: String,
    #[serde(flatten)]
    pub outcome: EraseOutcome,
}
