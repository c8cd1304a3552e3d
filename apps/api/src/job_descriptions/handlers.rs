//! Axum route handlers for the Job Description API.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::job_descriptions::{check_job_description, spawn_store, CheckResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct StoreRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub keywords: Value,
}

/// POST /api/v1/job-descriptions/check
pub async fn handle_check(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> Result<Json<CheckResult>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text is required".to_string()));
    }

    let result = check_job_description(
        state.jd_store.as_ref(),
        &request.text,
        request.keywords.as_deref(),
    )
    .await?;

    Ok(Json(result))
}

/// POST /api/v1/job-descriptions
///
/// Acknowledges immediately; validation and storage happen in a detached task.
pub async fn handle_store(
    State(state): State<AppState>,
    Json(request): Json<StoreRequest>,
) -> Json<Value> {
    if request.text.trim().is_empty() {
        tracing::warn!("Job description not stored: empty text");
    } else {
        spawn_store(state.jd_store.clone(), request.text, request.keywords);
    }
    Json(json!({ "success": true }))
}
