use std::sync::Arc;

use crate::config::Config;
use crate::job_descriptions::store::JobDescriptionStore;
use crate::llm_client::TextGenerator;
use crate::render::PageRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Only configuration and the collaborator handles live here. Every tailoring run builds
/// its own trackers and pools.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Text-completion backend. `LlmClient` in production.
    pub generator: Arc<dyn TextGenerator>,
    /// PDF renderer. `ChromiumRenderer` in production.
    pub renderer: Arc<dyn PageRenderer>,
    /// Postgres when `DATABASE_URL` is set, in-process otherwise.
    pub jd_store: Arc<dyn JobDescriptionStore>,
}
