use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobDescriptionRow {
    pub id: Uuid,
    pub content_hash: String,
    pub full_text: String,
    pub keywords: Vec<String>,
    pub char_length: i32,
    pub normalized_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values written by an upsert. Identity and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewJobDescription {
    pub content_hash: String,
    pub full_text: String,
    pub keywords: Vec<String>,
    pub char_length: i32,
    pub normalized_text: String,
}
