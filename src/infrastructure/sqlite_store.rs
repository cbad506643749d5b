//! `SQLite` content store.
//!
//! Stores WordCamp posts, their metadata and user accounts in a
//! WordPress-shaped schema and serves the exporters' queries.

use std::path::Path;

use rusqlite::{params, params_from_iter, Connection, OpenFlags, OptionalExtension};

use crate::domain::{
    total_pages, AppError, ContentKind, ContentQuery, ContentQueryService, Identity,
    IdentityResolver, MetaStore, OrderBy, QueryFilter, QueryResult, Record, Result, SortOrder,
};

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        post_type TEXT NOT NULL,
        post_title TEXT NOT NULL DEFAULT '',
        post_content TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS postmeta (
        meta_id INTEGER PRIMARY KEY AUTOINCREMENT,
        post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
        meta_key TEXT NOT NULL,
        meta_value TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_login TEXT UNIQUE NOT NULL,
        user_nicename TEXT NOT NULL DEFAULT '',
        user_email TEXT NOT NULL COLLATE NOCASE
    );

    CREATE INDEX IF NOT EXISTS idx_posts_type ON posts(post_type, id);
    CREATE INDEX IF NOT EXISTS idx_postmeta_lookup ON postmeta(post_id, meta_key);
    CREATE INDEX IF NOT EXISTS idx_postmeta_value ON postmeta(meta_key, meta_value);
    CREATE INDEX IF NOT EXISTS idx_users_email ON users(user_email);
";

/// Content store backed by a `SQLite` database.
pub struct SqliteContentStore {
    conn: Connection,
}

impl SqliteContentStore {
    /// Opens an existing content database in read-only mode.
    ///
    /// # Errors
    /// Returns error if the file is missing or cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AppError::DatabaseNotFound {
                path: path.to_path_buf(),
            });
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(AppError::database)?;

        conn.execute_batch(
            "PRAGMA query_only = ON;
             PRAGMA temp_store = MEMORY;",
        )
        .map_err(AppError::database)?;

        tracing::debug!(path = %path.display(), "Opened content database");

        Ok(Self { conn })
    }

    /// Opens or creates a writable content database.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or schema creation fails.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create database directory", e))?;
        }

        let conn = Connection::open(path).map_err(AppError::database)?;
        Self::with_schema(conn)
    }

    /// Creates an empty in-memory content database.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(AppError::database)?;
        Self::with_schema(conn)
    }

    fn with_schema(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(AppError::database)?;
        conn.execute_batch(SCHEMA).map_err(AppError::database)?;
        Ok(Self { conn })
    }

    /// Inserts a post and returns its id.
    ///
    /// # Errors
    /// Returns error if the insert fails.
    pub fn insert_record(&self, kind: ContentKind, title: &str, content: &str) -> Result<u64> {
        self.conn
            .execute(
                "INSERT INTO posts (post_type, post_title, post_content) VALUES (?1, ?2, ?3)",
                params![kind.id(), title, content],
            )
            .map_err(AppError::database)?;

        from_row_id(self.conn.last_insert_rowid())
    }

    /// Adds a metadata entry to a post.
    ///
    /// # Errors
    /// Returns error if the insert fails.
    pub fn insert_meta(&self, record_id: u64, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO postmeta (post_id, meta_key, meta_value) VALUES (?1, ?2, ?3)",
                params![to_row_id(record_id)?, key, value],
            )
            .map_err(AppError::database)?;
        Ok(())
    }

    /// Inserts or replaces a user account.
    ///
    /// # Errors
    /// Returns error if the insert fails.
    pub fn insert_user(&self, login: &str, nicename: &str, email: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO users (user_login, user_nicename, user_email) VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_login) DO UPDATE SET
                    user_nicename = excluded.user_nicename,
                    user_email = excluded.user_email",
                params![login, nicename, email],
            )
            .map_err(AppError::database)?;
        Ok(())
    }
}

impl ContentQueryService for SqliteContentStore {
    fn query(&self, query: &ContentQuery) -> Result<QueryResult> {
        let mut bindings = vec![query.kind.id().to_string()];
        let condition = filter_sql(&query.filter, &mut bindings);
        let where_clause = format!("p.post_type = ?1 AND {condition}");

        let total: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM posts p WHERE {where_clause}"),
                params_from_iter(bindings.iter()),
                |row| row.get(0),
            )
            .map_err(AppError::database)?;

        let order_column = match query.order_by {
            OrderBy::Id => "p.id",
        };
        let direction = match query.order {
            SortOrder::Asc => "ASC",
        };

        let sql = format!(
            "SELECT p.id, p.post_title, p.post_content FROM posts p WHERE {where_clause}
             ORDER BY {order_column} {direction} LIMIT {} OFFSET {}",
            query.page_size,
            query.offset()
        );

        let mut stmt = self.conn.prepare(&sql).map_err(AppError::database)?;
        let rows = stmt
            .query_map(params_from_iter(bindings.iter()), |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(AppError::database)?;

        let mut records = Vec::new();
        for row in rows {
            let (id, title, content) = row.map_err(AppError::database)?;
            records.push(Record {
                id: from_row_id(id)?,
                kind: query.kind,
                title,
                content,
            });
        }

        let total = u64::try_from(total).unwrap_or_default();

        tracing::debug!(
            kind = %query.kind,
            page = query.page,
            total,
            returned = records.len(),
            "Content query"
        );

        Ok(QueryResult {
            records,
            total_pages: total_pages(total, query.page_size),
        })
    }
}

impl MetaStore for SqliteContentStore {
    fn get_meta(&self, record_id: u64, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT meta_value FROM postmeta WHERE post_id = ?1 AND meta_key = ?2
                 ORDER BY meta_id LIMIT 1",
                params![to_row_id(record_id)?, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(AppError::database)
    }
}

impl IdentityResolver for SqliteContentStore {
    fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
        self.conn
            .query_row(
                "SELECT user_login, user_nicename FROM users WHERE user_email = ?1
                 ORDER BY id LIMIT 1",
                [email],
                |row| {
                    Ok(Identity {
                        login: row.get(0)?,
                        display_alias: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(AppError::database)
    }
}

/// Renders a filter as an SQL condition on `posts p`, appending its values
/// to `bindings` as numbered parameters.
fn filter_sql(filter: &QueryFilter, bindings: &mut Vec<String>) -> String {
    match filter {
        QueryFilter::Meta { key, value } => {
            bindings.push(key.clone());
            let key_param = bindings.len();
            bindings.push(value.clone());
            let value_param = bindings.len();
            format!(
                "EXISTS (SELECT 1 FROM postmeta m WHERE m.post_id = p.id \
                 AND m.meta_key = ?{key_param} AND m.meta_value = ?{value_param})"
            )
        }
        QueryFilter::Or(filters) if !filters.is_empty() => {
            let parts: Vec<String> = filters.iter().map(|f| filter_sql(f, bindings)).collect();
            format!("({})", parts.join(" OR "))
        }
        QueryFilter::Or(_) | QueryFilter::Nothing => "0".to_string(),
    }
}

fn from_row_id(id: i64) -> Result<u64> {
    u64::try_from(id).map_err(|_| AppError::InvalidData {
        message: format!("Negative row id: {id}"),
    })
}

fn to_row_id(id: u64) -> Result<i64> {
    i64::try_from(id).map_err(|_| AppError::InvalidData {
        message: format!("Record id out of range: {id}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::exporter::Exporter;
    use crate::application::fields::{SPEAKER_EMAIL_KEY, SPONSOR_EMAIL_KEY, USER_ID_KEY};
    use std::rc::Rc;
    use tempfile::tempdir;

    fn query(kind: ContentKind, page: u32, filter: QueryFilter) -> ContentQuery {
        ContentQuery {
            kind,
            page_size: 2,
            page,
            filter,
            order_by: OrderBy::Id,
            order: SortOrder::Asc,
        }
    }

    fn ids(result: &QueryResult) -> Vec<u64> {
        result.records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_filter_sql_numbers_parameters() {
        let mut bindings = vec!["wcb_speaker".to_string()];
        let sql = filter_sql(
            &QueryFilter::Or(vec![
                QueryFilter::meta("a", "1"),
                QueryFilter::Or(vec![QueryFilter::meta("b", "2")]),
            ]),
            &mut bindings,
        );

        assert!(sql.contains("m.meta_key = ?2 AND m.meta_value = ?3"));
        assert!(sql.contains("m.meta_key = ?4 AND m.meta_value = ?5"));
        assert!(sql.contains(" OR "));
        assert_eq!(bindings, vec!["wcb_speaker", "a", "1", "b", "2"]);
    }

    #[test]
    fn test_query_filters_kind_and_meta() {
        let store = SqliteContentStore::open_in_memory().unwrap();
        let speaker = store.insert_record(ContentKind::Speaker, "Jane", "").unwrap();
        store.insert_meta(speaker, SPEAKER_EMAIL_KEY, "a@x.com").unwrap();
        let sponsor = store.insert_record(ContentKind::Sponsor, "Acme", "").unwrap();
        store.insert_meta(sponsor, SPEAKER_EMAIL_KEY, "a@x.com").unwrap();

        let result = store
            .query(&query(
                ContentKind::Speaker,
                1,
                QueryFilter::meta(SPEAKER_EMAIL_KEY, "a@x.com"),
            ))
            .unwrap();

        assert_eq!(ids(&result), vec![speaker]);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.records[0].kind, ContentKind::Speaker);
        assert_eq!(result.records[0].title, "Jane");
    }

    #[test]
    fn test_speaker_export_matches_account_aliases() {
        let store = SqliteContentStore::open_in_memory().unwrap();
        store.insert_user("janedoe", "jane-doe", "a@x.com").unwrap();

        let by_email = store.insert_record(ContentKind::Speaker, "Jane", "").unwrap();
        store.insert_meta(by_email, SPEAKER_EMAIL_KEY, "a@x.com").unwrap();
        let by_login = store.insert_record(ContentKind::Speaker, "Jane (login)", "").unwrap();
        store.insert_meta(by_login, USER_ID_KEY, "janedoe").unwrap();
        let by_nicename = store
            .insert_record(ContentKind::Speaker, "Jane (nice name)", "")
            .unwrap();
        store.insert_meta(by_nicename, USER_ID_KEY, "jane-doe").unwrap();
        let other = store.insert_record(ContentKind::Speaker, "Bob", "").unwrap();
        store.insert_meta(other, USER_ID_KEY, "bob").unwrap();

        let exporter = Exporter::from_store(Rc::new(store));
        let page = exporter
            .export_kind(ContentKind::Speaker, "a@x.com", 1)
            .unwrap();

        let item_ids: Vec<_> = page.data.iter().map(|item| item.item_id.clone()).collect();
        assert_eq!(
            item_ids,
            vec![
                format!("wcb_speaker-{by_email}"),
                format!("wcb_speaker-{by_login}"),
                format!("wcb_speaker-{by_nicename}"),
            ]
        );
        assert!(page.done);
    }

    #[test]
    fn test_query_paginates_in_id_order() {
        let store = SqliteContentStore::open_in_memory().unwrap();
        let mut expected = Vec::new();
        for i in 0..5 {
            let id = store
                .insert_record(ContentKind::Sponsor, &format!("Sponsor {i}"), "")
                .unwrap();
            store.insert_meta(id, SPONSOR_EMAIL_KEY, "a@x.com").unwrap();
            expected.push(id);
        }

        let filter = QueryFilter::meta(SPONSOR_EMAIL_KEY, "a@x.com");
        let page1 = store.query(&query(ContentKind::Sponsor, 1, filter.clone())).unwrap();
        let page3 = store.query(&query(ContentKind::Sponsor, 3, filter)).unwrap();

        assert_eq!(page1.total_pages, 3);
        assert_eq!(ids(&page1), expected[..2].to_vec());
        assert_eq!(ids(&page3), expected[4..].to_vec());
    }

    #[test]
    fn test_nothing_filter_matches_no_rows() {
        let store = SqliteContentStore::open_in_memory().unwrap();
        let id = store.insert_record(ContentKind::Organizer, "Org", "").unwrap();
        store.insert_meta(id, USER_ID_KEY, "").unwrap();

        for filter in [QueryFilter::Nothing, QueryFilter::Or(Vec::new())] {
            let result = store.query(&query(ContentKind::Organizer, 1, filter)).unwrap();
            assert!(result.records.is_empty());
            assert_eq!(result.total_pages, 0);
        }
    }

    #[test]
    fn test_get_meta_returns_first_value() {
        let store = SqliteContentStore::open_in_memory().unwrap();
        let id = store.insert_record(ContentKind::Speaker, "Jane", "").unwrap();
        store.insert_meta(id, USER_ID_KEY, "janedoe").unwrap();
        store.insert_meta(id, USER_ID_KEY, "other").unwrap();

        assert_eq!(
            store.get_meta(id, USER_ID_KEY).unwrap(),
            Some("janedoe".to_string())
        );
        assert_eq!(store.get_meta(id, "_missing").unwrap(), None);
    }

    #[test]
    fn test_find_by_email_ignores_case() {
        let store = SqliteContentStore::open_in_memory().unwrap();
        store.insert_user("janedoe", "jane-doe", "Jane@X.com").unwrap();

        let identity = store.find_by_email("jane@x.com").unwrap().unwrap();
        assert_eq!(identity.login, "janedoe");
        assert_eq!(identity.display_alias, "jane-doe");
        assert!(store.find_by_email("nobody@x.com").unwrap().is_none());
    }

    #[test]
    fn test_open_missing_database() {
        let dir = tempdir().unwrap();
        let err = SqliteContentStore::open(&dir.path().join("missing.db"))
            .err()
            .unwrap();
        assert!(matches!(err, AppError::DatabaseNotFound { .. }));
    }

    #[test]
    fn test_exports_from_reopened_database() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("content.db");

        {
            let store = SqliteContentStore::create(&db_path).unwrap();
            store.insert_user("janedoe", "jane-doe", "a@x.com").unwrap();
            let id = store
                .insert_record(ContentKind::Speaker, "Jane", "Bio text")
                .unwrap();
            store.insert_meta(id, SPEAKER_EMAIL_KEY, "a@x.com").unwrap();
            let org = store.insert_record(ContentKind::Organizer, "Jane", "").unwrap();
            store.insert_meta(org, USER_ID_KEY, "jane-doe").unwrap();
        }

        let store = Rc::new(SqliteContentStore::open(&db_path).unwrap());
        let exporter = Exporter::from_store(store);

        let speakers = exporter
            .export_kind(ContentKind::Speaker, "a@x.com", 1)
            .unwrap();
        assert!(speakers.done);
        assert_eq!(speakers.data.len(), 1);
        assert_eq!(speakers.data[0].data.len(), 3);

        let organizers = exporter
            .export_kind(ContentKind::Organizer, "a@x.com", 1)
            .unwrap();
        assert_eq!(organizers.data.len(), 1);
        assert_eq!(organizers.data[0].data[0].value, "Jane");
    }

    #[test]
    fn test_read_only_store_rejects_writes() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("content.db");
        drop(SqliteContentStore::create(&db_path).unwrap());

        let store = SqliteContentStore::open(&db_path).unwrap();
        assert!(store.insert_record(ContentKind::Speaker, "Jane", "").is_err());
    }
}
