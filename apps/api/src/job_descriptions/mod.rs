//! Job-description dedup lookup.
//!
//! Lets callers skip a keyword-extraction round trip for a job description that was
//! seen before, either verbatim (hash match) or nearly (similar length, similar text,
//! overlapping keywords).

pub mod handlers;
pub mod similarity;
pub mod store;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::job_description::NewJobDescription;
use similarity::{
    char_length, clean_keywords, content_hash, keyword_similarity, length_window, normalize_text,
    text_similarity, KEYWORD_SIMILARITY_THRESHOLD, TEXT_SIMILARITY_THRESHOLD,
};
use store::{JobDescriptionStore, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

impl CheckResult {
    fn found(keywords: Vec<String>) -> Self {
        Self {
            found: true,
            keywords: Some(keywords),
        }
    }

    fn not_found() -> Self {
        Self {
            found: false,
            keywords: None,
        }
    }
}

/// Looks `text` up: exact hash first, then near-duplicates within the length window.
///
/// A near-duplicate always needs text similarity ≥ 0.85. The second condition, keyword
/// overlap ≥ 0.85 with the stored set, is checked only when `query_keywords` is `Some`.
/// With `None` the text score alone decides, which is looser than requiring both. An
/// empty list counts as supplied keywords and has zero overlap, so it never matches here.
pub async fn check_job_description(
    store: &dyn JobDescriptionStore,
    text: &str,
    query_keywords: Option<&[String]>,
) -> Result<CheckResult, StoreError> {
    let hash = content_hash(text);
    if let Some(row) = store.find_by_hash(&hash).await? {
        debug!(hash = %hash, "Job description matched by hash");
        return Ok(CheckResult::found(row.keywords));
    }

    let normalized = normalize_text(text);
    let (min, max) = length_window(char_length(text));
    let candidates = store
        .find_by_length(to_db_length(min), to_db_length(max))
        .await?;

    for candidate in candidates {
        let similarity = text_similarity(&normalized, &candidate.normalized_text);
        if similarity < TEXT_SIMILARITY_THRESHOLD {
            continue;
        }

        let keywords_match = match query_keywords {
            Some(query) => {
                keyword_similarity(&candidate.keywords, query) >= KEYWORD_SIMILARITY_THRESHOLD
            }
            None => true,
        };
        if keywords_match {
            debug!(similarity, "Job description matched by similarity");
            return Ok(CheckResult::found(candidate.keywords));
        }
    }

    Ok(CheckResult::not_found())
}

/// Validates and upserts. Returns `false` when the keywords were rejected and nothing
/// was written.
pub async fn store_job_description(
    store: &dyn JobDescriptionStore,
    text: &str,
    keywords: &Value,
) -> Result<bool, StoreError> {
    let Some(raw) = keyword_list(keywords) else {
        warn!("Job description not stored: keywords must be an array of strings");
        return Ok(false);
    };
    let Some(cleaned) = clean_keywords(&raw) else {
        warn!(count = raw.len(), "Job description not stored: at least 3 keywords required");
        return Ok(false);
    };

    store
        .upsert(NewJobDescription {
            content_hash: content_hash(text),
            full_text: text.to_string(),
            keywords: cleaned,
            char_length: to_db_length(char_length(text)),
            normalized_text: normalize_text(text),
        })
        .await?;

    info!(chars = char_length(text), "Job description stored");
    Ok(true)
}

/// Runs `store_job_description` as a detached task. Nothing is reported back; failures
/// are only logged.
pub fn spawn_store(
    store: Arc<dyn JobDescriptionStore>,
    text: String,
    keywords: Value,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = store_job_description(store.as_ref(), &text, &keywords).await {
            warn!(error = %e, "Failed to store job description");
        }
    })
}

fn keyword_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|k| k.as_str().map(str::to_string))
        .collect()
}

fn to_db_length(length: usize) -> i32 {
    i32::try_from(length).unwrap_or(i32::MAX)
}
