//! JSON fixtures for seeding a content database.
//!
//! A fixture lists user accounts and content records with their metadata:
//!
//! ```json
//! {
//!   "users": [{"login": "janedoe", "nicename": "jane-doe", "email": "a@x.com"}],
//!   "records": [{"kind": "wcb_speaker", "title": "Jane", "meta": {"_wcpt_user_id": "janedoe"}}]
//! }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::{AppError, ContentKind, Result};
use crate::infrastructure::SqliteContentStore;

/// A user account in a fixture.
#[derive(Debug, Deserialize)]
pub struct FixtureUser {
    pub login: String,
    #[serde(default, alias = "display_alias")]
    pub nicename: String,
    pub email: String,
}

/// A content record in a fixture.
#[derive(Debug, Deserialize)]
pub struct FixtureRecord {
    pub kind: ContentKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

/// A parsed fixture file.
#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub users: Vec<FixtureUser>,
    #[serde(default)]
    pub records: Vec<FixtureRecord>,
}

/// Counts of imported rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub users: usize,
    pub records: usize,
    pub meta: usize,
}

/// Parses a fixture from raw JSON bytes.
///
/// # Errors
/// Returns error if JSON parsing fails.
pub fn parse_fixture(data: &[u8]) -> Result<Fixture> {
    serde_json::from_slice(data).map_err(AppError::json_parse)
}

/// Writes a fixture into the store.
///
/// # Errors
/// Returns error if any insert fails.
pub fn import_fixture(store: &SqliteContentStore, fixture: &Fixture) -> Result<ImportStats> {
    let mut stats = ImportStats::default();

    for user in &fixture.users {
        store.insert_user(&user.login, &user.nicename, &user.email)?;
        stats.users += 1;
    }

    for record in &fixture.records {
        let id = store.insert_record(record.kind, &record.title, &record.content)?;
        for (key, value) in &record.meta {
            store.insert_meta(id, key, value)?;
            stats.meta += 1;
        }
        stats.records += 1;
    }

    tracing::info!(
        users = stats.users,
        records = stats.records,
        meta = stats.meta,
        "Fixture imported"
    );

    Ok(stats)
}
