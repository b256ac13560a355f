//! SQLite-backed comics store.
//!
//! Keywords live in their own table so that search-by-word is an indexed lookup
//! instead of a scan. All statements run on the blocking pool.

use super::ComicsStore;
use super::types::{Comic, DbStats};
use crate::error::{Error, Result};
use crate::search::WordSearcher;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Arc;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS comics (
    comic_id INTEGER PRIMARY KEY,
    img_url  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS comic_keywords (
    comic_id INTEGER NOT NULL,
    keyword  TEXT NOT NULL,
    PRIMARY KEY (comic_id, keyword)
);
CREATE INDEX IF NOT EXISTS idx_comic_keywords_keyword ON comic_keywords(keyword);
";

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        tracing::info!("Opened SQLite store at {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            f(&mut guard)
        })
        .await?
    }
}

fn to_id(raw: i64) -> Result<u32> {
    u32::try_from(raw).map_err(|_| Error::Storage(format!("comic id {} out of range", raw)))
}

#[async_trait]
impl WordSearcher for SqliteStore {
    async fn search_by_word(&self, word: &str) -> Result<Vec<u32>> {
        let word = word.to_string();
        self.with_conn(move |conn| {
            let mut stmt =
                conn.prepare_cached("SELECT comic_id FROM comic_keywords WHERE keyword = ?1")?;
            let rows = stmt.query_map(params![word], |row| row.get::<_, i64>(0))?;

            let mut ids = Vec::new();
            for row in rows {
                ids.push(to_id(row?)?);
            }
            Ok(ids)
        })
        .await
    }

    async fn get_comics(&self, id: u32) -> Result<Comic> {
        self.with_conn(move |conn| {
            let url: Option<String> = conn
                .query_row(
                    "SELECT img_url FROM comics WHERE comic_id = ?1",
                    params![id as i64],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(url) = url else {
                return Err(Error::NotFound);
            };

            let mut stmt =
                conn.prepare_cached("SELECT keyword FROM comic_keywords WHERE comic_id = ?1")?;
            let keywords = stmt
                .query_map(params![id as i64], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<_, _>>()?;

            Ok(Comic { id, url, keywords })
        })
        .await
    }
}

#[async_trait]
impl ComicsStore for SqliteStore {
    async fn add(&self, comic: Comic) -> Result<()> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO comics (comic_id, img_url) VALUES (?1, ?2)",
                params![comic.id as i64, comic.url],
            )?;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT INTO comic_keywords (comic_id, keyword) VALUES (?1, ?2)",
                )?;
                for keyword in &comic.keywords {
                    stmt.execute(params![comic.id as i64, keyword])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn ids(&self) -> Result<Vec<u32>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached("SELECT comic_id FROM comics")?;
            let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;

            let mut ids = Vec::new();
            for row in rows {
                ids.push(to_id(row?)?);
            }
            Ok(ids)
        })
        .await
    }

    async fn stats(&self) -> Result<DbStats> {
        self.with_conn(|conn| {
            let (words_total, words_unique): (i64, i64) = conn.query_row(
                "SELECT COUNT(*), COUNT(DISTINCT keyword) FROM comic_keywords",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            let comics_fetched: i64 =
                conn.query_row("SELECT COUNT(*) FROM comics", [], |row| row.get(0))?;

            Ok(DbStats {
                words_total: words_total as u64,
                words_unique: words_unique as u64,
                comics_fetched: comics_fetched as u64,
            })
        })
        .await
    }

    async fn max_id(&self) -> Result<u32> {
        self.with_conn(|conn| {
            let max: i64 = conn.query_row(
                "SELECT COALESCE(MAX(comic_id), 0) FROM comics",
                [],
                |row| row.get(0),
            )?;
            to_id(max)
        })
        .await
    }

    async fn drop_all(&self) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM comic_keywords", [])?;
            tx.execute("DELETE FROM comics", [])?;
            tx.commit()?;
            tracing::info!("Dropped all comics from SQLite store");
            Ok(())
        })
        .await
    }
}
