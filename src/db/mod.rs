pub mod comparisons;
pub mod fighters;
pub mod predictions;
pub mod users;

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tracing::info;

/// SQLite store for the roster, saved predictions, comparisons and users
pub struct FightStore {
    pool: Pool<Sqlite>,
}

impl FightStore {
    /// Create a new store and initialize the database
    pub async fn new(database_url: &str) -> Result<Self> {
        // Create data directory if needed
        if let Some(path) = database_url.strip_prefix("sqlite:") {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .context("Failed to create database directory")?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL")?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.init_schema().await?;

        info!("Fight store initialized");
        Ok(store)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS fighters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                nickname TEXT,
                division TEXT NOT NULL,
                record TEXT NOT NULL,
                wins INTEGER NOT NULL DEFAULT 0,
                losses INTEGER NOT NULL DEFAULT 0,
                draws INTEGER NOT NULL DEFAULT 0,
                age INTEGER,
                height TEXT,
                reach TEXT,
                stance TEXT,
                team TEXT,
                image TEXT,
                style TEXT,
                ranking INTEGER,
                strikes_landed_per_min REAL,
                striking_accuracy REAL,
                takedown_accuracy REAL,
                takedown_defense REAL,
                wins_by_ko INTEGER NOT NULL DEFAULT 0,
                wins_by_sub INTEGER NOT NULL DEFAULT 0,
                wins_by_dec INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create fighters table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                display_name TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create users table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS prediction_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER REFERENCES users (id),
                fighter1_id INTEGER NOT NULL REFERENCES fighters (id),
                fighter2_id INTEGER NOT NULL REFERENCES fighters (id),
                created_at TEXT NOT NULL,
                event_name TEXT,
                weight_class TEXT,
                venue_type TEXT,
                fight_type TEXT,
                predicted_winner_id INTEGER NOT NULL,
                win_probability REAL,
                prediction_confidence REAL,
                predicted_method TEXT,
                predicted_round INTEGER,
                analysis TEXT,
                technical_breakdown TEXT,
                key_factors TEXT NOT NULL DEFAULT '[]',
                gameplan_suggestions TEXT,
                actual_winner_id INTEGER,
                actual_method TEXT,
                actual_round INTEGER,
                was_prediction_correct INTEGER,
                is_public INTEGER NOT NULL DEFAULT 1,
                title TEXT,
                notes TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create prediction_history table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS fighter_comparisons (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fighter1_id INTEGER NOT NULL REFERENCES fighters (id),
                fighter2_id INTEGER NOT NULL REFERENCES fighters (id),
                user_id INTEGER REFERENCES users (id),
                title TEXT NOT NULL,
                notes TEXT,
                created_at TEXT NOT NULL,
                prediction_summary TEXT,
                prediction_score INTEGER,
                is_public INTEGER NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create fighter_comparisons table")?;

        // Indexes for common lookups
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_predictions_user
            ON prediction_history (user_id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_predictions_fighters
            ON prediction_history (fighter1_id, fighter2_id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_comparisons_user
            ON fighter_comparisons (user_id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Parse a stored RFC3339 timestamp, falling back to now
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Fresh store in a temporary directory. Keep the guard alive for the test's duration.
    pub(crate) async fn temp_store() -> (FightStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("fights.db").display());
        let store = FightStore::new(&url).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let (store, _dir) = temp_store().await;
        store.init_schema().await.unwrap();
        assert_eq!(store.fighter_count().await.unwrap(), 0);
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2024-03-09T22:15:00+00:00");
        assert_eq!(ts.to_rfc3339(), "2024-03-09T22:15:00+00:00");
    }
}
