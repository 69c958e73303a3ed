use crate::models::CompatibilityResult;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// One logged recommendation row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedRecommendation {
    pub batch_id: Uuid,
    pub customer_id: String,
    pub property_id: String,
    pub rank: i32,
    pub score: i16,
    pub reason: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// PostgreSQL client for the service's own history tables
///
/// The CRM records themselves live in Supabase. This database only keeps
/// what the service produces: served recommendation batches and the lead
/// score history.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }

    /// Store one served batch of recommendations, returning its batch id
    pub async fn record_recommendations(
        &self,
        customer_id: &str,
        results: &[CompatibilityResult],
    ) -> Result<Uuid, PostgresError> {
        let batch_id = Uuid::new_v4();

        let query = r#"
            INSERT INTO recommendation_log (batch_id, customer_id, property_id, rank, score, reason, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
        "#;

        let mut tx = self.pool.begin().await?;
        for (rank, result) in results.iter().enumerate() {
            sqlx::query(query)
                .bind(batch_id)
                .bind(customer_id)
                .bind(&result.property_id)
                .bind(rank as i32 + 1)
                .bind(result.score as i16)
                .bind(&result.reason)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        tracing::debug!(
            "Logged {} recommendations for customer {} (batch {})",
            results.len(),
            customer_id,
            batch_id
        );

        Ok(batch_id)
    }

    /// Most recent logged recommendations for a customer, newest first
    pub async fn get_recent_recommendations(
        &self,
        customer_id: &str,
        limit: usize,
    ) -> Result<Vec<LoggedRecommendation>, PostgresError> {
        let query = r#"
            SELECT batch_id, customer_id, property_id, rank, score, reason, created_at
            FROM recommendation_log
            WHERE customer_id = $1
            ORDER BY created_at DESC, rank ASC
            LIMIT $2
        "#;

        let rows = sqlx::query(query)
            .bind(customer_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        let logged = rows
            .iter()
            .map(|row| LoggedRecommendation {
                batch_id: row.get("batch_id"),
                customer_id: row.get("customer_id"),
                property_id: row.get("property_id"),
                rank: row.get("rank"),
                score: row.get("score"),
                reason: row.get("reason"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(logged)
    }

    /// Append a lead score to its history
    pub async fn record_lead_score(&self, lead_id: &str, score: u8, status: &str) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO lead_score_history (lead_id, score, status, scored_at)
            VALUES ($1, $2, $3, NOW())
        "#;

        sqlx::query(query)
            .bind(lead_id)
            .bind(score as i16)
            .bind(status)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Recorded score {} for lead {}", score, lead_id);
        Ok(())
    }

    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
