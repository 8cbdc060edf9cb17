use anyhow::{anyhow, Result};
use serde::Serialize;

/// Rendering options forwarded to the headless-browser service.
#[derive(Debug, Clone, Serialize)]
pub struct PdfOptions {
    pub landscape: bool,
    /// Page size name understood by the service ("A4", "Letter", ...).
    pub format: String,
    pub margin_mm: u32,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            landscape: false,
            format: "A4".to_string(),
            margin_mm: 0,
        }
    }
}

/// Turns an HTML document into PDF bytes.
///
/// Treated as a pure function of its inputs: a failure is one terminal
/// error for the whole document, never partial output.
#[async_trait::async_trait]
pub trait PdfRenderer: Send + Sync + 'static {
    async fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>>;
}

/// Client for an HTTP PDF rendering service (headless Chromium behind a
/// `POST /render` endpoint taking `{ html, options }` and returning the
/// PDF body).
pub struct HttpPdfRenderer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPdfRenderer {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    html: &'a str,
    options: &'a PdfOptions,
}

#[async_trait::async_trait]
impl PdfRenderer for HttpPdfRenderer {
    async fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>> {
        let url = format!("{}/render", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RenderRequest { html, options })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("pdf service returned {}", status));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(anyhow!("pdf service returned an empty body"));
        }
        Ok(bytes.to_vec())
    }
}

/// [`PdfRenderer`] that echoes the HTML bytes back.
///
/// Used in tests and when no rendering service is configured — the
/// document pipeline stays exercisable end to end without the external
/// dependency.
pub struct NullPdfRenderer;

#[async_trait::async_trait]
impl PdfRenderer for NullPdfRenderer {
    async fn render(&self, html: &str, _options: &PdfOptions) -> Result<Vec<u8>> {
        Ok(html.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_renderer_echoes_the_document() {
        let renderer = NullPdfRenderer;
        let bytes = renderer
            .render("<html></html>", &PdfOptions::default())
            .await
            .expect("render");
        assert_eq!(bytes, b"<html></html>");
    }

    #[test]
    fn default_options_are_a4_portrait() {
        let options = PdfOptions::default();
        assert!(!options.landscape);
        assert_eq!(options.format, "A4");
    }
}
