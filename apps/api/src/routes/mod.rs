pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::job_descriptions::handlers as job_descriptions;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes/customize",
            post(tailoring::handle_customize),
        )
        // Job Description API
        .route(
            "/api/v1/job-descriptions",
            post(job_descriptions::handle_store),
        )
        .route(
            "/api/v1/job-descriptions/check",
            post(job_descriptions::handle_check),
        )
        .with_state(state)
}
