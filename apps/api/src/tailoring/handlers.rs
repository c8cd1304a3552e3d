//! Axum route handlers for the Resume API.

use axum::{
    extract::State,
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::pipeline::{customize_resume, CustomizeRequest};

const EXCEEDS_ONE_PAGE_HEADER: HeaderName = HeaderName::from_static("x-exceeds-one-page");
const SHRINK_ITERATIONS_HEADER: HeaderName = HeaderName::from_static("x-shrink-iterations");
const RENDER_COUNT_HEADER: HeaderName = HeaderName::from_static("x-render-count");
const FAILED_SECTIONS_HEADER: HeaderName = HeaderName::from_static("x-failed-sections");

/// POST /api/v1/resumes/customize
///
/// Body: `{ htmlContent, keywords, fullTailoring }`. Responds with the tailored PDF;
/// `X-Exceeds-One-Page` tells the caller whether it still overflows.
/// `X-Shrink-Iterations` and `X-Render-Count` describe the page-fit loop, and
/// `X-Failed-Sections` (comma separated, empty when none) lists sections that were only
/// partially populated.
pub async fn handle_customize(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    let request = CustomizeRequest::from_json(&body)?;

    info!(
        keywords = request.keywords.len(),
        full_tailoring = request.full_tailoring,
        "Customizing resume"
    );

    let outcome = customize_resume(
        request,
        state.generator.clone(),
        state.renderer.clone(),
        state.config.retry_delay(),
    )
    .await?;

    if outcome.exceeds_one_page {
        warn!("Customized resume exceeds one page");
    }
    let failed_sections = outcome
        .failed_sections
        .iter()
        .map(|section| section.as_str())
        .collect::<Vec<_>>()
        .join(",");
    if !failed_sections.is_empty() {
        warn!(
            failed_sections = %failed_sections,
            "Some sections were only partially tailored"
        );
    }
    debug!(markup_bytes = outcome.markup.len(), "Tailored markup rendered");

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=customized_resume.pdf".to_string(),
        ),
        (EXCEEDS_ONE_PAGE_HEADER, outcome.exceeds_one_page.to_string()),
        (SHRINK_ITERATIONS_HEADER, outcome.shrink_iterations.to_string()),
        (RENDER_COUNT_HEADER, outcome.renders.to_string()),
        (FAILED_SECTIONS_HEADER, failed_sections),
    ];

    Ok((headers, outcome.pdf).into_response())
}
