//! Headless Chromium renderer.
//!
//! Every render gets its own temp directory and browser process; both are gone when
//! `render` returns, whichever way it returns (`TempDir` drop, `kill_on_drop`).
//! Height is derived from the printed page count, since the print path already lays the
//! document out on Letter pages.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::render::{inject_stylesheet, PageRenderer, RenderError, RenderedPage, PAGE_HEIGHT_PX};

pub struct ChromiumRenderer {
    binary: PathBuf,
}

impl ChromiumRenderer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render(&self, markup: &str) -> Result<RenderedPage, RenderError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("resume.html");
        let output = workdir.path().join("resume.pdf");

        tokio::fs::write(&input, inject_stylesheet(markup)).await?;

        let result = Command::new(&self.binary)
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(format!("file://{}", input.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(RenderError::Spawn)?;

        if !result.status.success() {
            warn!(
                stderr = %String::from_utf8_lossy(&result.stderr),
                "Chromium print failed"
            );
            return Err(RenderError::Exit(result.status.code().unwrap_or(-1)));
        }

        let pdf = tokio::fs::read(&output).await?;
        let pages = count_pages(&pdf)?;
        debug!(pages, bytes = pdf.len(), "Rendered PDF");

        Ok(RenderedPage {
            pdf: Bytes::from(pdf),
            measured_height: pages.saturating_mul(PAGE_HEIGHT_PX),
        })
    }
}

pub fn count_pages(pdf: &[u8]) -> Result<u32, RenderError> {
    let document = lopdf::Document::load_mem(pdf).map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(document.get_pages().len() as u32)
}
