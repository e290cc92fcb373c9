use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::quiz_result::QuizResult;

/// Key/value blob storage for completed attempts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub fn result_key(quiz_id: &str) -> String {
    format!("quiz_result_{}", quiz_id)
}

#[derive(Debug, Default)]
pub struct MemoryResultStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Clone)]
pub struct SqliteResultStore {
    pool: SqlitePool,
}

impl SqliteResultStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for SqliteResultStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let payload: Option<String> =
            sqlx::query_scalar(r#"SELECT payload FROM quiz_results WHERE key = ?1"#)
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(payload)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO quiz_results (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(crate::utils::time::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Typed access to stored results, keyed by quiz id.
#[derive(Clone)]
pub struct ResultRepository {
    store: Arc<dyn ResultStore>,
}

impl ResultRepository {
    pub fn new(store: Arc<dyn ResultStore>) -> Self {
        Self { store }
    }

    /// Stores `result`, replacing any earlier attempt at the same quiz.
    pub async fn save(&self, result: &QuizResult) -> Result<()> {
        let payload = serde_json::to_string(result)?;
        self.store.set(&result_key(&result.quiz_id), &payload).await?;
        tracing::info!(
            quiz_id = %result.quiz_id,
            score = result.score,
            total_points = result.total_points,
            "Stored quiz result"
        );
        Ok(())
    }

    pub async fn load(&self, quiz_id: &str) -> Result<Option<QuizResult>> {
        match self.store.get(&result_key(quiz_id)).await? {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }
}
