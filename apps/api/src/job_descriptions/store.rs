//! Persistence of seen job descriptions: the store seam plus its Postgres and in-process
//! backends.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::job_description::{JobDescriptionRow, NewJobDescription};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait JobDescriptionStore: Send + Sync {
    async fn find_by_hash(
        &self,
        content_hash: &str,
    ) -> Result<Option<JobDescriptionRow>, StoreError>;

    /// Entries whose `char_length` lies in `min..=max`.
    async fn find_by_length(
        &self,
        min: i32,
        max: i32,
    ) -> Result<Vec<JobDescriptionRow>, StoreError>;

    /// Inserts, or replaces the keywords of the entry with the same hash.
    async fn upsert(&self, entry: NewJobDescription) -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres
// ────────────────────────────────────────────────────────────────────────────

pub struct PgJobDescriptionStore {
    pool: PgPool,
}

impl PgJobDescriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobDescriptionStore for PgJobDescriptionStore {
    async fn find_by_hash(
        &self,
        content_hash: &str,
    ) -> Result<Option<JobDescriptionRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobDescriptionRow>(
            "SELECT * FROM job_descriptions WHERE content_hash = $1",
        )
        .bind(content_hash)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_by_length(
        &self,
        min: i32,
        max: i32,
    ) -> Result<Vec<JobDescriptionRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobDescriptionRow>(
            "SELECT * FROM job_descriptions WHERE char_length BETWEEN $1 AND $2",
        )
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn upsert(&self, entry: NewJobDescription) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO job_descriptions
                (id, content_hash, full_text, keywords, char_length, normalized_text)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (content_hash)
            DO UPDATE SET keywords = EXCLUDED.keywords, updated_at = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&entry.content_hash)
        .bind(&entry.full_text)
        .bind(&entry.keywords)
        .bind(entry.char_length)
        .bind(&entry.normalized_text)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-process
// ────────────────────────────────────────────────────────────────────────────

/// Used when no database is configured. Contents live as long as the process.
#[derive(Default)]
pub struct InMemoryJobDescriptionStore {
    rows: RwLock<Vec<JobDescriptionRow>>,
}

impl InMemoryJobDescriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl JobDescriptionStore for InMemoryJobDescriptionStore {
    async fn find_by_hash(
        &self,
        content_hash: &str,
    ) -> Result<Option<JobDescriptionRow>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.content_hash == content_hash).cloned())
    }

    async fn find_by_length(
        &self,
        min: i32,
        max: i32,
    ) -> Result<Vec<JobDescriptionRow>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|r| (min..=max).contains(&r.char_length))
            .cloned()
            .collect())
    }

    async fn upsert(&self, entry: NewJobDescription) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let now = Utc::now();

        match rows.iter_mut().find(|r| r.content_hash == entry.content_hash) {
            Some(existing) => {
                existing.keywords = entry.keywords;
                existing.updated_at = now;
            }
            None => rows.push(JobDescriptionRow {
                id: Uuid::new_v4(),
                content_hash: entry.content_hash,
                full_text: entry.full_text,
                keywords: entry.keywords,
                char_length: entry.char_length,
                normalized_text: entry.normalized_text,
                created_at: now,
                updated_at: now,
            }),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry(hash: &str, length: i32, keywords: &[&str]) -> NewJobDescription {
        NewJobDescription {
            content_hash: hash.to_string(),
            full_text: "text".to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            char_length: length,
            normalized_text: "text".to_string(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_upsert_replaces_keywords() {
        let store = InMemoryJobDescriptionStore::new();
        store.upsert(make_entry("abc", 100, &["Rust", "Kafka", "AWS"])).await.unwrap();
        store.upsert(make_entry("abc", 100, &["Go", "gRPC", "GCP"])).await.unwrap();

        assert_eq!(store.len().await, 1);
        let row = store.find_by_hash("abc").await.unwrap().unwrap();
        assert_eq!(row.keywords, vec!["Go", "gRPC", "GCP"]);
        assert!(row.updated_at >= row.created_at);
    }

    #[tokio::test]
    async fn test_in_memory_length_range_is_inclusive() {
        let store = InMemoryJobDescriptionStore::new();
        for (hash, length) in [("a", 94), ("b", 95), ("c", 105), ("d", 106)] {
            store.upsert(make_entry(hash, length, &["Rust"])).await.unwrap();
        }

        let mut hashes: Vec<String> = store
            .find_by_length(95, 105)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.content_hash)
            .collect();
        hashes.sort();
        assert_eq!(hashes, vec!["b", "c"]);
    }
}
