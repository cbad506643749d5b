//! Collaborator interfaces the exporters depend on.
//!
//! Storage, querying and identity lookup belong to the host; the exporters
//! only see these traits.

use super::{ContentQuery, Identity, QueryResult, Result};

/// Executes filtered, paginated record listings.
pub trait ContentQueryService {
    /// Runs one page of a query.
    ///
    /// # Errors
    /// Returns the store's error unchanged.
    fn query(&self, query: &ContentQuery) -> Result<QueryResult>;
}

/// Key/value metadata attached to records.
pub trait MetaStore {
    /// First stored value of `key` on the record, if any.
    ///
    /// # Errors
    /// Returns the store's error unchanged.
    fn get_meta(&self, record_id: u64, key: &str) -> Result<Option<String>>;
}

/// Looks up user accounts.
pub trait IdentityResolver {
    /// Account registered with this email address, if any.
    ///
    /// # Errors
    /// Returns the resolver's error unchanged.
    fn find_by_email(&self, email: &str) -> Result<Option<Identity>>;
}
