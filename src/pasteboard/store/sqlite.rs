use super::DataStore;
use crate::browse::SearchTerms;
use crate::error::{PasteError, Result};
use crate::ids::{IdAllocator, IdLookup};
use crate::model::{Paste, PasteId};
use chrono::{TimeZone, Utc};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const CREATE_PASTES: &str = "
    CREATE TABLE IF NOT EXISTS pastes (
        id         INTEGER NOT NULL PRIMARY KEY,
        title      TEXT,
        content    TEXT NOT NULL,
        author     TEXT,
        language   TEXT,
        channel    TEXT,
        annotates  INTEGER,
        private    INTEGER NOT NULL,
        created    INTEGER NOT NULL
    );
";

const CREATE_ANNOTATES_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS pastes_annotates ON pastes (annotates, id);";

const COLUMNS: &str = "id, title, content, author, language, channel, annotates, private, created";

/// Base of every browse query: public, top-level rows.
const TOP_LEVEL: &str = "FROM pastes WHERE NOT private AND annotates IS NULL";

impl ToSql for PasteId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.get()))
    }
}

impl FromSql for PasteId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(PasteId::new)
    }
}

fn paste_from_row(row: &Row<'_>) -> rusqlite::Result<Paste> {
    let created: i64 = row.get(8)?;
    Ok(Paste {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        author: row.get(3)?,
        language: row.get(4)?,
        channel: row.get(5)?,
        annotates: row.get(6)?,
        private: row.get(7)?,
        created: Utc
            .timestamp_opt(created, 0)
            .single()
            .ok_or(rusqlite::Error::IntegralValueOutOfRange(8, created))?,
    })
}

/// Appends the equality filters for `terms` to a top-level query.
fn top_level_clause(terms: &SearchTerms) -> (String, Vec<&str>) {
    let mut sql = TOP_LEVEL.to_string();
    let mut values = Vec::new();
    for (field, value) in terms.filters() {
        // `field` comes from a fixed list, never from the caller
        sql.push_str(&format!(" AND {} = ?", field));
        values.push(value);
    }
    (sql, values)
}

impl IdLookup for Connection {
    fn max_public_id(&self) -> Result<i64> {
        Ok(self.query_row(
            "SELECT COALESCE(MAX(id), 0) FROM pastes WHERE NOT private",
            [],
            |row| row.get(0),
        )?)
    }

    fn max_thread_id(&self, root: PasteId) -> Result<Option<i64>> {
        Ok(self.query_row(
            "SELECT MAX(id) FROM pastes WHERE id = ?1 OR annotates = ?1",
            [root],
            |row| row.get(0),
        )?)
    }

    fn id_exists(&self, id: PasteId) -> Result<bool> {
        Ok(self
            .query_row("SELECT 1 FROM pastes WHERE id = ?", [id], |_| Ok(()))
            .optional()?
            .is_some())
    }
}

/// Production storage: one `pastes` table in a SQLite database.
pub struct SqliteStore {
    conn: Connection,
    ids: IdAllocator,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL")?;
        info!(target: "pasteboard::store", path = %path.display(), "opened paste database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Wraps an existing connection, creating the schema if it is missing.
    pub fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(CREATE_PASTES)?;
        conn.execute_batch(CREATE_ANNOTATES_INDEX)?;
        Ok(Self {
            conn,
            ids: IdAllocator::new(),
        })
    }

    pub fn with_id_allocator(mut self, ids: IdAllocator) -> Self {
        self.ids = ids;
        self
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl DataStore for SqliteStore {
    fn insert(&mut self, paste: &Paste) -> Result<PasteId> {
        // IMMEDIATE takes the write lock up front, so the max(id) reads made
        // by the allocator cannot interleave with another writer's insert.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let id = self.ids.allocate(paste, &*tx)?;

        tx.execute(
            &format!("INSERT INTO pastes ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)", COLUMNS),
            params![
                id,
                paste.title,
                paste.content,
                paste.author,
                paste.language,
                paste.channel,
                paste.annotates,
                paste.private,
                paste.created.timestamp(),
            ],
        )?;
        // Dropping an uncommitted transaction rolls it back
        tx.commit()?;

        debug!(
            target: "pasteboard::store",
            %id,
            private = paste.private,
            annotates = ?paste.annotates.map(PasteId::get),
            "inserted paste"
        );
        Ok(id)
    }

    fn get(&self, id: PasteId) -> Result<Option<Paste>> {
        let paste = self
            .conn
            .query_row(
                &format!("SELECT {} FROM pastes WHERE id = ?", COLUMNS),
                [id],
                paste_from_row,
            )
            .optional()?;
        Ok(paste)
    }

    fn get_annotations(&self, root: PasteId) -> Result<Vec<Paste>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {} FROM pastes WHERE annotates = ? ORDER BY id",
            COLUMNS
        ))?;
        let pastes = stmt
            .query_map([root], paste_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(pastes)
    }

    fn annotation_ordinal(&self, id: PasteId) -> Result<u32> {
        let n: u32 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM pastes p
                 JOIN pastes o ON o.annotates = p.annotates
                              AND o.id <= p.id
             WHERE p.id = ? AND p.annotates IS NOT NULL",
            [id],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    fn count_top_level(&self, terms: &SearchTerms) -> Result<usize> {
        let (clause, values) = top_level_clause(terms);
        let n: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) {}", clause),
            params_from_iter(values),
            |row| row.get(0),
        )?;
        usize::try_from(n).map_err(|_| PasteError::Store(format!("bad row count {}", n)))
    }

    fn top_level_ids(
        &self,
        terms: &SearchTerms,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PasteId>> {
        let (clause, values) = top_level_clause(terms);
        let limit = limit.min(i64::MAX as usize);
        let offset = offset.min(i64::MAX as usize);

        let mut stmt = self.conn.prepare(&format!(
            "SELECT id {} ORDER BY id DESC LIMIT {} OFFSET {}",
            clause, limit, offset
        ))?;
        let ids = stmt
            .query_map(params_from_iter(values), |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<PasteId>>>()?;
        Ok(ids)
    }
}
