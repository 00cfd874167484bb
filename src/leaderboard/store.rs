use std::time::Duration;

use thiserror::Error;
use tokio_postgres::Client;
use tracing::{info, warn};

use crate::game::Difficulty;

use super::config::StoreConfig;

/// Attempts per operation before giving up
const MAX_ATTEMPTS: u32 = 3;
/// Fixed delay between read/write retries
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Score store error wrapper
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

/// One persisted leaderboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub username: String,
    pub score: i32,
    pub difficulty: Difficulty,
}

/// Low-level PostgreSQL access for the `scores` table.
///
/// Every operation opens its own connection per attempt; nothing shares a
/// client across tasks, so concurrent fire-and-forget writes cannot race
/// on connection state.
pub struct ScoreStore {
    config: StoreConfig,
}

impl ScoreStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Open a fresh connection, spawning its driver task
    async fn connect(&self) -> Result<Client, StoreError> {
        let tls = self.config.tls_connector();
        let (client, connection) = self.config.to_pg_config().connect(tls).await?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                warn!(error = %err, "postgres connection closed with error");
            }
        });
        Ok(client)
    }

    /// Connect and run the idempotent schema setup, with up to 3 attempts
    /// and exponential backoff (1s, 2s, 4s) between them.
    pub async fn connect_and_migrate(&self) -> Result<(), StoreError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            info!(attempt, max = MAX_ATTEMPTS, "connecting to score database");
            match self.try_migrate().await {
                Ok(()) => {
                    info!("score database initialized");
                    return Ok(());
                }
                Err(err) if attempt < MAX_ATTEMPTS => {
                    warn!(attempt, error = %err, "database init attempt failed");
                    tokio::time::sleep(Duration::from_secs(1 << (attempt - 1))).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_migrate(&self) -> Result<(), StoreError> {
        let client = self.connect().await?;
        // Create the table if absent, add the difficulty column to
        // pre-existing installs, and back the upsert with a unique index.
        client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS scores (
                    id SERIAL PRIMARY KEY,
                    username VARCHAR(50) NOT NULL,
                    score INTEGER NOT NULL,
                    difficulty VARCHAR(20) DEFAULT 'Medium',
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                );
                ALTER TABLE scores ADD COLUMN IF NOT EXISTS difficulty VARCHAR(20) DEFAULT 'Medium';
                CREATE UNIQUE INDEX IF NOT EXISTS idx_scores_user_diff
                    ON scores (username, difficulty);",
            )
            .await?;
        Ok(())
    }

    /// Upsert a score: insert, or keep the maximum for an existing
    /// `(username, difficulty)` pair and refresh its timestamp.
    pub async fn add_score(
        &self,
        username: &str,
        score: i32,
        difficulty: Difficulty,
    ) -> Result<(), StoreError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_add_score(username, score, difficulty).await {
                Ok(()) => {
                    info!(username, score, %difficulty, "score saved");
                    return Ok(());
                }
                Err(err) if attempt < MAX_ATTEMPTS => {
                    warn!(attempt, error = %err, "add_score attempt failed");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_add_score(
        &self,
        username: &str,
        score: i32,
        difficulty: Difficulty,
    ) -> Result<(), StoreError> {
        let client = self.connect().await?;
        client
            .execute(
                "INSERT INTO scores (username, score, difficulty)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (username, difficulty)
                 DO UPDATE SET score = GREATEST(scores.score, EXCLUDED.score),
                               created_at = CURRENT_TIMESTAMP",
                &[&username, &score, &difficulty.to_string()],
            )
            .await?;
        Ok(())
    }

    /// Fetch up to `limit` records ordered by score descending
    pub async fn top_scores(&self, limit: i64) -> Result<Vec<ScoreRecord>, StoreError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_top_scores(limit).await {
                Ok(records) => return Ok(records),
                Err(err) if attempt < MAX_ATTEMPTS => {
                    warn!(attempt, error = %err, "top_scores attempt failed");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_top_scores(&self, limit: i64) -> Result<Vec<ScoreRecord>, StoreError> {
        let client = self.connect().await?;
        let rows = client
            .query(
                "SELECT username, score, difficulty FROM scores
                 ORDER BY score DESC LIMIT $1",
                &[&limit],
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| ScoreRecord {
                username: row.get(0),
                score: row.get(1),
                // Rows predating the difficulty migration carry the
                // column default.
                difficulty: row
                    .get::<_, String>(2)
                    .parse()
                    .unwrap_or(Difficulty::Medium),
            })
            .collect())
    }
}
