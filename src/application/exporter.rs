//! Personal-data exporter.
//!
//! Queries the records an email address owns, one fixed-size page at a time,
//! and projects the declared personal-data fields of each record.

use std::rc::Rc;

use crate::domain::{
    ContentKind, ContentQuery, ContentQueryService, ExportField, ExportItem, ExportPage,
    FieldMap, FieldSource, IdentityResolver, MetaStore, OrderBy, Record, Result, SortOrder,
};

use super::fields::field_map;
use super::ownership::build_filter;

/// Records requested per export page.
pub const PAGE_SIZE: u32 = 20;

/// Exports personal data from the content store.
pub struct Exporter {
    content: Rc<dyn ContentQueryService>,
    meta: Rc<dyn MetaStore>,
    identities: Rc<dyn IdentityResolver>,
    organizer_uses_speaker_kind: bool,
}

impl Exporter {
    /// Create an exporter over separate collaborators.
    #[must_use]
    pub fn new(
        content: Rc<dyn ContentQueryService>,
        meta: Rc<dyn MetaStore>,
        identities: Rc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            content,
            meta,
            identities,
            organizer_uses_speaker_kind: false,
        }
    }

    /// Create an exporter over a store that provides every collaborator.
    #[must_use]
    pub fn from_store<S>(store: Rc<S>) -> Self
    where
        S: ContentQueryService + MetaStore + IdentityResolver + 'static,
    {
        Self::new(store.clone(), store.clone(), store)
    }

    /// Run the organizer exporter as the speaker kind, like the legacy plugin.
    #[must_use]
    pub const fn with_organizer_compat(mut self, enabled: bool) -> Self {
        self.organizer_uses_speaker_kind = enabled;
        self
    }

    /// Per-kind exporter: the kind's own field map and query kind.
    ///
    /// # Errors
    /// Returns collaborator errors unchanged.
    pub fn export_kind(&self, kind: ContentKind, email: &str, page: u32) -> Result<ExportPage> {
        let query_kind = match kind {
            ContentKind::Organizer if self.organizer_uses_speaker_kind => {
                tracing::debug!("Organizer export running as wcb_speaker (compat)");
                ContentKind::Speaker
            }
            other => other,
        };

        self.export(query_kind, field_map(kind), email, page)
    }

    /// Exports one page of `kind` records owned by `email`.
    ///
    /// `page` is 1-indexed; `0` is treated as `1`.
    ///
    /// # Errors
    /// Returns collaborator errors unchanged.
    pub fn export(
        &self,
        kind: ContentKind,
        fields: FieldMap,
        email: &str,
        page: u32,
    ) -> Result<ExportPage> {
        let page = page.max(1);

        let filter = build_filter(kind, email, self.identities.as_ref())?;
        if filter.is_nothing() {
            tracing::debug!(kind = %kind, page, "Ownership filter matches nothing");
            return Ok(ExportPage::empty());
        }

        let query = ContentQuery {
            kind,
            page_size: PAGE_SIZE,
            page,
            filter,
            order_by: OrderBy::Id,
            order: SortOrder::Asc,
        };
        let result = self.content.query(&query)?;

        let mut data = Vec::with_capacity(result.records.len());
        for record in &result.records {
            if let Some(item) = self.export_record(kind, fields, record)? {
                data.push(item);
            }
        }

        let done = result.total_pages <= page;

        tracing::debug!(
            kind = %kind,
            page,
            total_pages = result.total_pages,
            records = result.records.len(),
            items = data.len(),
            done,
            "Exported page"
        );

        Ok(ExportPage { data, done })
    }

    /// Projects the declared fields of one record, `None` if all are empty.
    fn export_record(
        &self,
        kind: ContentKind,
        fields: FieldMap,
        record: &Record,
    ) -> Result<Option<ExportItem>> {
        let mut data = Vec::with_capacity(fields.len());

        for (key, label) in fields.iter() {
            let value = match FieldSource::of(key) {
                FieldSource::Core(field) => Some(record.core_field(field).to_string()),
                FieldSource::Meta(meta_key) => self.meta.get_meta(record.id, meta_key)?,
            };

            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                data.push(ExportField {
                    name: label.to_string(),
                    value,
                });
            }
        }

        if data.is_empty() {
            return Ok(None);
        }

        Ok(Some(ExportItem {
            group_id: kind.id().to_string(),
            group_label: kind.group_label().to_string(),
            item_id: format!("{}-{}", kind.id(), record.id),
            data,
        }))
    }
}
