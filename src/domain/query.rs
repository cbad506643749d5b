//! Content query model.
//!
//! A `ContentQuery` is what the exporters hand to the content-query service:
//! one post type, one page, and a metadata filter tree deciding which
//! records belong to the data subject.

/// A filter over record metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFilter {
    /// Metadata `key` exactly equals `value`.
    Meta { key: String, value: String },
    /// Any of the nested filters matches. An empty list matches nothing.
    Or(Vec<QueryFilter>),
    /// Matches no record.
    Nothing,
}

impl QueryFilter {
    /// Exact-match clause on a metadata key.
    pub fn meta(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Meta {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether this filter can never match anything.
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        match self {
            Self::Nothing => true,
            Self::Or(filters) => filters.iter().all(Self::is_nothing),
            Self::Meta { .. } => false,
        }
    }
}

#[cfg(test)]
impl QueryFilter {
    /// Evaluates the filter against one record's metadata.
    ///
    /// `meta` returns every stored value for a key.
    pub fn matches<F>(&self, meta: &F) -> bool
    where
        F: Fn(&str) -> Vec<String>,
    {
        match self {
            Self::Meta { key, value } => meta(key).iter().any(|v| v == value),
            Self::Or(filters) => filters.iter().any(|f| f.matches(meta)),
            Self::Nothing => false,
        }
    }
}

/// Column records are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    Id,
}

/// Direction of `OrderBy`. Exports always page in ascending id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
}

/// One page of a filtered record listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentQuery {
    pub kind: super::ContentKind,
    pub page_size: u32,
    /// 1-indexed page number.
    pub page: u32,
    pub filter: QueryFilter,
    pub order_by: OrderBy,
    pub order: SortOrder,
}

impl ContentQuery {
    /// Number of records to skip before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.page_size as u64
    }
}

/// Records on the requested page plus the total page count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryResult {
    pub records: Vec<super::Record>,
    pub total_pages: u32,
}

/// Pages needed to hold `total` records, `0` when there are none.
#[must_use]
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
}
