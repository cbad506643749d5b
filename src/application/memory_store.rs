//! In-memory content store used by the application-layer tests.

use std::cell::Cell;

use crate::domain::{
    total_pages, AppError, ContentKind, ContentQuery, ContentQueryService, Identity,
    IdentityResolver, MetaStore, QueryResult, Record, Result,
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<(Record, Vec<(String, String)>)>,
    users: Vec<(String, Identity)>,
    queries: Cell<usize>,
    fail_queries: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record and returns its id.
    pub fn add_record(
        &mut self,
        kind: ContentKind,
        title: &str,
        content: &str,
        meta: &[(&str, &str)],
    ) -> u64 {
        let id = self.records.len() as u64 + 1;
        let record = Record {
            id,
            kind,
            title: title.to_string(),
            content: content.to_string(),
        };
        let meta = meta
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.records.push((record, meta));
        id
    }

    pub fn add_user(&mut self, email: &str, login: &str, display_alias: &str) {
        self.users.push((
            email.to_string(),
            Identity {
                login: login.to_string(),
                display_alias: display_alias.to_string(),
            },
        ));
    }

    /// Makes every subsequent query fail.
    pub fn failing(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    /// Number of queries executed so far.
    pub fn query_count(&self) -> usize {
        self.queries.get()
    }

    fn meta_values(&self, record_id: u64, key: &str) -> Vec<String> {
        self.records
            .iter()
            .filter(|(r, _)| r.id == record_id)
            .flat_map(|(_, meta)| meta.iter())
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

impl ContentQueryService for MemoryStore {
    fn query(&self, query: &ContentQuery) -> Result<QueryResult> {
        self.queries.set(self.queries.get() + 1);
        if self.fail_queries {
            return Err(AppError::InvalidData {
                message: "content store unavailable".into(),
            });
        }

        let mut matching: Vec<&Record> = self
            .records
            .iter()
            .map(|(record, _)| record)
            .filter(|r| r.kind == query.kind)
            .filter(|r| query.filter.matches(&|key: &str| self.meta_values(r.id, key)))
            .collect();

        matching.sort_by_key(|r| r.id);

        let total = matching.len() as u64;
        let records = matching
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(query.page_size as usize)
            .cloned()
            .collect();

        Ok(QueryResult {
            records,
            total_pages: total_pages(total, query.page_size),
        })
    }
}

impl MetaStore for MemoryStore {
    fn get_meta(&self, record_id: u64, key: &str) -> Result<Option<String>> {
        Ok(self.meta_values(record_id, key).into_iter().next())
    }
}

impl IdentityResolver for MemoryStore {
    fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
        Ok(self
            .users
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(email))
            .map(|(_, identity)| identity.clone()))
    }
}
