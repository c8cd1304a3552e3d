//! Renderer seam — markup in, PDF bytes and a measured content height out.

pub mod chromium;
pub mod stylesheet;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use chromium::ChromiumRenderer;
pub use stylesheet::inject_stylesheet;

/// Height of one Letter page at 96 DPI (11in × 96).
pub const PAGE_HEIGHT_PX: u32 = 1056;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch renderer: {0}")]
    Spawn(std::io::Error),

    #[error("renderer exited with status {0}")]
    Exit(i32),

    #[error("renderer IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unreadable PDF output: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub pdf: Bytes,
    pub measured_height: u32,
}

impl RenderedPage {
    pub fn exceeds_one_page(&self) -> bool {
        exceeds_one_page(self.measured_height)
    }
}

pub fn exceeds_one_page(measured_height: u32) -> bool {
    measured_height > PAGE_HEIGHT_PX
}

/// Renders full markup with the fixed stylesheet applied. Each call uses a fresh
/// rendering context that is torn down before returning, on success or failure.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, markup: &str) -> Result<RenderedPage, RenderError>;
}
