//! Document-processing entry point: validate, tailor, fit, render.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use tracing::info;

use crate::document::{DocumentTree, HtmlDocument};
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::render::PageRenderer;
use crate::tailoring::bullet_generator::BulletGenerator;
use crate::tailoring::bullet_pool::BulletPoolCache;
use crate::tailoring::page_fit::PageFitController;
use crate::tailoring::populator::RunState;
use crate::tailoring::section::SectionType;

/// A validated customize request.
#[derive(Debug, Clone)]
pub struct CustomizeRequest {
    pub html_content: String,
    pub keywords: Vec<String>,
    pub full_tailoring: bool,
}

impl CustomizeRequest {
    /// Validates the raw body. Shapes are checked by hand so that a wrong type is a
    /// `VALIDATION_ERROR` like every other rejection.
    pub fn from_json(body: &Value) -> Result<Self, AppError> {
        let html_content = match body.get("htmlContent") {
            Some(Value::String(html)) if !html.trim().is_empty() => html.clone(),
            Some(Value::String(_)) | None | Some(Value::Null) => {
                return Err(AppError::Validation("htmlContent is required".to_string()))
            }
            Some(_) => {
                return Err(AppError::Validation("htmlContent must be a string".to_string()))
            }
        };

        let Some(Value::Array(items)) = body.get("keywords") else {
            return Err(AppError::Validation("keywords must be an array".to_string()));
        };
        let mut keywords = Vec::with_capacity(items.len());
        for item in items {
            match item.as_str().map(str::trim) {
                Some(keyword) if !keyword.is_empty() => keywords.push(keyword.to_string()),
                Some(_) => {}
                None => {
                    return Err(AppError::Validation(
                        "keywords must contain only strings".to_string(),
                    ))
                }
            }
        }
        if keywords.is_empty() {
            return Err(AppError::Validation("keywords cannot be empty".to_string()));
        }

        let full_tailoring = match body.get("fullTailoring") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(_) => {
                return Err(AppError::Validation(
                    "fullTailoring must be a boolean".to_string(),
                ))
            }
        };

        Ok(Self {
            html_content,
            keywords,
            full_tailoring,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TailoringOutcome {
    pub pdf: Bytes,
    pub markup: String,
    pub exceeds_one_page: bool,
    pub shrink_iterations: u32,
    pub renders: u32,
    pub failed_sections: Vec<SectionType>,
}

/// Runs one tailoring request on a blocking thread.
///
/// The parsed document is `!Send`, so the whole run is driven there with
/// `Handle::block_on`; generator calls still run on the shared runtime's IO driver.
pub async fn customize_resume(
    request: CustomizeRequest,
    llm: Arc<dyn TextGenerator>,
    renderer: Arc<dyn PageRenderer>,
    retry_delay: Duration,
) -> Result<TailoringOutcome, AppError> {
    let handle = tokio::runtime::Handle::current();

    tokio::task::spawn_blocking(move || {
        let generator = BulletGenerator::new(llm, retry_delay);
        handle.block_on(run_tailoring(
            &request,
            generator,
            renderer.as_ref(),
            StdRng::from_os_rng(),
        ))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("tailoring task failed: {e}")))?
}

/// One full run against fresh trackers and pools.
pub async fn run_tailoring(
    request: &CustomizeRequest,
    generator: BulletGenerator,
    renderer: &dyn PageRenderer,
    rng: StdRng,
) -> Result<TailoringOutcome, AppError> {
    let mut doc = HtmlDocument::parse(&request.html_content);
    let run = RunState::new(BulletPoolCache::new(generator), rng);

    let mut controller =
        PageFitController::new(renderer, run, &request.keywords, request.full_tailoring);
    let fit = controller.run(&mut doc).await?;

    info!(
        exceeds_one_page = fit.exceeds_one_page,
        shrink_iterations = fit.shrink_iterations,
        renders = fit.renders,
        failed_sections = fit.failed_sections.len(),
        "Tailoring run finished"
    );

    Ok(TailoringOutcome {
        pdf: fit.pdf,
        markup: doc.to_markup(),
        exceeds_one_page: fit.exceeds_one_page,
        shrink_iterations: fit.shrink_iterations,
        renders: fit.renders,
        failed_sections: fit.failed_sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::test_support::{context_echo_generator, StubRenderer};

    fn make_request_body() -> Value {
        json!({
            "htmlContent": "<html><head></head><body><div class=\"job-details\"><span class=\"company-name\">Acme</span><ul><li>Built billing</li></ul></div></body></html>",
            "keywords": ["Rust", " Kafka ", ""],
            "fullTailoring": false
        })
    }

    #[test]
    fn test_valid_request_is_normalized() {
        let request = CustomizeRequest::from_json(&make_request_body()).unwrap();
        assert_eq!(request.keywords, vec!["Rust", "Kafka"]);
        assert!(!request.full_tailoring);
    }

    #[test]
    fn test_full_tailoring_defaults_to_false() {
        let mut body = make_request_body();
        body.as_object_mut().unwrap().remove("fullTailoring");
        assert!(!CustomizeRequest::from_json(&body).unwrap().full_tailoring);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let cases = [
            json!({ "keywords": ["Rust"] }),
            json!({ "htmlContent": "   ", "keywords": ["Rust"] }),
            json!({ "htmlContent": 42, "keywords": ["Rust"] }),
            json!({ "htmlContent": "<p>x</p>", "keywords": "Rust, Kafka" }),
            json!({ "htmlContent": "<p>x</p>" }),
            json!({ "htmlContent": "<p>x</p>", "keywords": [] }),
            json!({ "htmlContent": "<p>x</p>", "keywords": ["Rust", 3] }),
            json!({ "htmlContent": "<p>x</p>", "keywords": ["Rust"], "fullTailoring": "yes" }),
        ];
        for body in cases {
            assert!(
                matches!(CustomizeRequest::from_json(&body), Err(AppError::Validation(_))),
                "accepted {body}"
            );
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_customize_resume_returns_pdf_and_markup() {
        let request = CustomizeRequest::from_json(&make_request_body()).unwrap();
        let llm = Arc::new(context_echo_generator(6));
        let renderer = Arc::new(StubRenderer::always_fits());

        let outcome = customize_resume(request, llm.clone(), renderer.clone(), Duration::ZERO)
            .await
            .unwrap();

        assert!(!outcome.exceeds_one_page);
        assert_eq!(outcome.renders, 1);
        assert!(outcome.pdf.starts_with(b"%PDF"));
        assert!(outcome.markup.contains("for job experience"));
        assert!(!outcome.markup.contains("Built billing"));
        assert_eq!(renderer.renders(), 1);
        assert_eq!(llm.calls(), 3);
    }
}
