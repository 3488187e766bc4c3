use chrono::{DateTime, Utc};
use ratings_core::{RatingSummary, RatingsError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS rating_history (
    symbol TEXT PRIMARY KEY NOT NULL,
    average REAL NOT NULL,
    highest REAL,
    lowest REAL,
    updated_at TEXT NOT NULL
)";

/// Last recorded rating summary per symbol.
#[derive(Clone)]
pub struct HistoryDb {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    average: f64,
    highest: Option<f64>,
    lowest: Option<f64>,
    updated_at: String,
}

/// A stored summary and when it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub rating: RatingSummary,
    pub updated_at: DateTime<Utc>,
}

fn db_error(e: sqlx::Error) -> RatingsError {
    RatingsError::DatabaseError(e.to_string())
}

impl HistoryDb {
    /// Open (creating if needed) the database at `database_url`.
    pub async fn new(database_url: &str) -> Result<Self, RatingsError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(db_error)?
            .create_if_missing(true);

        // Every connection to an in-memory database is a separate database,
        // and closing the last one drops it.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(db_error)?;

        let db = Self { pool };
        db.init_schema().await?;

        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), RatingsError> {
        sqlx::query(SCHEMA).execute(&self.pool).await.map_err(db_error)?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Most recent summary for `symbol`, if one was ever recorded.
    pub async fn latest(&self, symbol: &str) -> Result<Option<HistoryEntry>, RatingsError> {
        let row = sqlx::query_as::<_, HistoryRow>(
            "SELECT average, highest, lowest, updated_at FROM rating_history WHERE symbol = ?",
        )
        .bind(symbol.to_uppercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(|r| {
            let updated_at = DateTime::parse_from_rfc3339(&r.updated_at)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| RatingsError::DatabaseError(format!("bad timestamp {}: {}", r.updated_at, e)))?;
            Ok(HistoryEntry {
                rating: RatingSummary {
                    average: r.average,
                    highest: r.highest,
                    lowest: r.lowest,
                },
                updated_at,
            })
        })
        .transpose()
    }

    /// Insert or replace the summary for `symbol`.
    pub async fn upsert(&self, symbol: &str, rating: &RatingSummary) -> Result<(), RatingsError> {
        sqlx::query(
            "INSERT INTO rating_history (symbol, average, highest, lowest, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(symbol) DO UPDATE SET
                average = excluded.average,
                highest = excluded.highest,
                lowest = excluded.lowest,
                updated_at = excluded.updated_at",
        )
        .bind(symbol.to_uppercase())
        .bind(rating.average)
        .bind(rating.highest)
        .bind(rating.lowest)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        tracing::debug!("recorded rating history for {}", symbol.to_uppercase());
        Ok(())
    }
}
