//! SQLite-backed changelog store
//!
//! One table, one connection behind a mutex. Every operation holds the lock
//! for its whole duration, so handlers call straight into the store.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use super::error::{StoreError, StoreResult};
use super::types::{Changelog, ChangelogUpdate, NewChangelog};

const SELECT_COLUMNS: &str = "SELECT id, title, content, author, repository, commit_range, \
                              raw_commits, published, created_at FROM changelogs";

/// Changelog persistence
#[derive(Clone)]
pub struct ChangelogStore {
    conn: Arc<Mutex<Connection>>,
}

impl ChangelogStore {
    /// Open or create the store at `path`
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let store = Self::from_connection(conn)?;

        tracing::info!("Changelog store opened at {:?}", path);
        Ok(store)
    }

    /// Open a throwaway in-memory store
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        create_tables(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    /// Insert a changelog and return it with its new id
    pub fn create(&self, new: NewChangelog) -> StoreResult<Changelog> {
        let created_at = Utc::now();
        let raw_commits = serde_json::to_string(&new.raw_commits)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO changelogs
                (title, content, author, repository, commit_range, raw_commits, published, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                new.title,
                new.content,
                new.author,
                new.repository,
                new.commit_range,
                raw_commits,
                new.published,
                created_at.to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        tracing::debug!(id, repository = %new.repository, published = new.published, "Changelog created");

        Ok(Changelog {
            id,
            title: new.title,
            content: new.content,
            author: new.author,
            repository: new.repository,
            commit_range: new.commit_range,
            raw_commits: new.raw_commits,
            published: new.published,
            created_at,
        })
    }

    /// List changelogs, newest first
    pub fn list(&self, published_only: bool) -> StoreResult<Vec<Changelog>> {
        let conn = self.conn()?;
        let sql = if published_only {
            format!("{SELECT_COLUMNS} WHERE published = 1 ORDER BY created_at DESC, id DESC")
        } else {
            format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC")
        };

        let mut stmt = conn.prepare(&sql)?;
        let changelogs = stmt
            .query_map([], row_to_changelog)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(changelogs)
    }

    /// Get a changelog by id
    pub fn get(&self, id: i64) -> StoreResult<Option<Changelog>> {
        let conn = self.conn()?;
        select_one(&conn, id)
    }

    /// Apply a partial update and return the updated changelog. The read and
    /// the write happen under one lock.
    pub fn update(&self, id: i64, update: &ChangelogUpdate) -> StoreResult<Changelog> {
        let conn = self.conn()?;
        let mut changelog = select_one(&conn, id)?.ok_or(StoreError::NotFound(id))?;
        if update.is_empty() {
            return Ok(changelog);
        }
        update.apply(&mut changelog);

        conn.execute(
            "UPDATE changelogs SET title = ?1, content = ?2, published = ?3 WHERE id = ?4",
            params![changelog.title, changelog.content, changelog.published, id],
        )?;

        Ok(changelog)
    }

    /// Delete a changelog
    pub fn delete(&self, id: i64) -> StoreResult<()> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM changelogs WHERE id = ?1", [id])?;
        if removed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// Number of stored changelogs; doubles as a readiness probe
    pub fn count(&self) -> StoreResult<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM changelogs", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn create_tables(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS changelogs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            author TEXT NOT NULL,
            repository TEXT NOT NULL,
            commit_range TEXT NOT NULL,
            raw_commits TEXT,
            published INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_changelogs_published_created
        ON changelogs(published, created_at DESC);
        "#,
    )?;
    Ok(())
}

fn select_one(conn: &Connection, id: i64) -> StoreResult<Option<Changelog>> {
    let changelog = conn
        .query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            [id],
            row_to_changelog,
        )
        .optional()?;
    Ok(changelog)
}

fn row_to_changelog(row: &Row<'_>) -> rusqlite::Result<Changelog> {
    let raw_commits: Option<String> = row.get(6)?;
    let created_at: String = row.get(8)?;

    let raw_commits = match raw_commits {
        Some(text) => serde_json::from_str(&text).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?,
        None => serde_json::Value::Null,
    };

    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);

    Ok(Changelog {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        author: row.get(3)?,
        repository: row.get(4)?,
        commit_range: row.get(5)?,
        raw_commits,
        published: row.get(7)?,
        created_at,
    })
}
