//! SQLite gateway for scraped articles and their prediction results.
//!
//! Provides [`SqliteGateway`], the single storage boundary of the pipeline.
//! Prediction uniqueness is enforced at this layer: `predictions.article_id`
//! is the primary key, so a second insert for the same article surfaces as
//! the benign [`InsertOutcome::AlreadyExists`] rather than an error.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{Row, Sqlite, SqlitePool};
use std::str::FromStr;

use baitcheck_core::error::Error;
use baitcheck_core::traits::{ArticleStore, PredictionStore};
use baitcheck_core::types::{Article, ArticleId, InsertOutcome, PredictionResult};

const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS scraped_articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS predictions (
        article_id INTEGER NOT NULL PRIMARY KEY,
        real_news_probability REAL NOT NULL,
        fake_news_probability REAL NOT NULL,
        created_at TEXT NOT NULL
    )",
];

#[derive(Clone)]
pub struct SqliteGateway {
    pool: SqlitePool,
}

impl SqliteGateway {
    /// Open (or create) the store and run schema migrations.
    pub async fn open(database_url: &str) -> Result<Self> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| Error::Storage(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        // For in-memory databases every connection gets its own database, so
        // restrict the pool to a single connection to keep a consistent view.
        let max_conns: u32 = if database_url.contains(":memory:") { 1 } else { 10 };

        let pool = sqlx::pool::PoolOptions::<Sqlite>::new()
            .max_connections(max_conns)
            .connect_with(connect_opts)
            .await
            .map_err(|e| Error::Storage(format!("Failed to connect to SQLite: {e}")))?;

        for statement in MIGRATIONS {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("Migration failed: {e}")))?;
        }
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// The reporting join: prediction plus article title, keyed by URL.
    pub async fn find_prediction_by_url(
        &self,
        url: &str,
    ) -> Result<Option<(PredictionResult, String)>> {
        let row = sqlx::query(
            "SELECT p.article_id, p.real_news_probability, p.fake_news_probability,
                    p.created_at, sa.title
             FROM predictions p
             JOIN scraped_articles sa ON p.article_id = sa.id
             WHERE sa.url = ?1",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to query prediction by url: {e}")))?;

        match row {
            Some(row) => {
                let title: String = row.get("title");
                Ok(Some((prediction_from_row(&row)?, title)))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ArticleStore for SqliteGateway {
    async fn find_article_by_url(&self, url: &str) -> Result<Option<Article>> {
        let row = sqlx::query(
            "SELECT id, url, title, content FROM scraped_articles WHERE url = ?1",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to query article: {e}")))?;

        Ok(row.map(|row| Article {
            id: row.get("id"),
            url: row.get("url"),
            title: row.get("title"),
            content: row.get("content"),
        }))
    }

    /// Find-or-insert keyed on the unique `url` column. Returns the existing
    /// id when the article was already scraped; a concurrent insert losing
    /// the unique-constraint race falls back to re-reading the winner's row.
    async fn save_article(&self, url: &str, title: &str, content: &str) -> Result<ArticleId> {
        if let Some(article) = self.find_article_by_url(url).await? {
            return Ok(article.id);
        }
        let inserted = sqlx::query(
            "INSERT INTO scraped_articles (url, title, content, created_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(url)
        .bind(title)
        .bind(content)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                let article = self
                    .find_article_by_url(url)
                    .await?
                    .ok_or_else(|| Error::Storage("Article vanished after unique violation".to_string()))?;
                Ok(article.id)
            }
            Err(e) => Err(Error::Storage(format!("Failed to insert article: {e}")).into()),
        }
    }
}

#[async_trait]
impl PredictionStore for SqliteGateway {
    async fn find_prediction(&self, article_id: ArticleId) -> Result<Option<PredictionResult>> {
        let row = sqlx::query(
            "SELECT article_id, real_news_probability, fake_news_probability, created_at
             FROM predictions WHERE article_id = ?1",
        )
        .bind(article_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to query prediction: {e}")))?;

        row.map(|row| prediction_from_row(&row)).transpose()
    }

    async fn insert_prediction(
        &self,
        article_id: ArticleId,
        real_probability: f64,
        fake_probability: f64,
    ) -> Result<InsertOutcome> {
        let inserted = sqlx::query(
            "INSERT INTO predictions
                 (article_id, real_news_probability, fake_news_probability, created_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(article_id)
        .bind(real_probability)
        .bind(fake_probability)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Ok(InsertOutcome::AlreadyExists)
            }
            Err(e) => Err(Error::Storage(format!("Failed to insert prediction: {e}")).into()),
        }
    }
}

fn prediction_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<PredictionResult> {
    let created_at: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| Error::Storage(format!("Malformed created_at in predictions row: {e}")))?
        .with_timezone(&Utc);
    Ok(PredictionResult {
        article_id: row.get("article_id"),
        real_probability: row.get("real_news_probability"),
        fake_probability: row.get("fake_news_probability"),
        created_at,
    })
}
