// Science Parse client — PDF in, headed sections out.
//
// Science Parse (https://github.com/allenai/science-parse) runs as a local
// HTTP server. A PDF is POSTed to `/v1` as the raw request body and the
// server answers with JSON metadata including a `sections` array. A server
// error means the PDF could not be parsed, which is not fatal for a batch.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Default Science Parse host.
pub const DEFAULT_SCIENCE_PARSE_URL: &str = "http://127.0.0.1";

/// Default Science Parse port.
pub const DEFAULT_SCIENCE_PARSE_PORT: &str = "8080";

/// One section of a parsed PDF.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// The parts of the Science Parse response this crate uses.
///
/// `sections` is `None` when the response has no `sections` key at all,
/// which Science Parse returns when it extracted no data from the PDF.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ParsedPdf {
    #[serde(default)]
    pub sections: Option<Vec<Section>>,
}

impl ParsedPdf {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections: Some(sections),
        }
    }

    /// Whether the response carried a `sections` key, even an empty one.
    pub fn has_sections(&self) -> bool {
        self.sections.is_some()
    }

    pub fn sections(&self) -> &[Section] {
        self.sections.as_deref().unwrap_or_default()
    }
}

/// Trait for turning a PDF into sections.
#[async_trait]
pub trait PdfParser: Send + Sync {
    /// Parse the PDF at `path`. `Ok(None)` means the service could not
    /// parse this PDF; `Err` means the service itself is unreachable.
    async fn parse_pdf(&self, path: &Path) -> Result<Option<ParsedPdf>>;
}

/// HTTP client for a Science Parse server.
pub struct ScienceParseClient {
    client: Client,
    endpoint: String,
}

impl ScienceParseClient {
    /// Create a client for the server at `url` (scheme and host) and `port`.
    pub fn new(url: &str, port: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("thesis-keyness/0.1")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}:{}/v1", url.trim_end_matches('/'), port),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PdfParser for ScienceParseClient {
    async fn parse_pdf(&self, path: &Path) -> Result<Option<ParsedPdf>> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/pdf")
            .body(bytes)
            .send()
            .await
            .with_context(|| format!("Science Parse request failed for {}", path.display()))?;

        if !response.status().is_success() {
            debug!(
                status = %response.status(),
                file = %path.display(),
                "Science Parse could not parse PDF"
            );
            return Ok(None);
        }

        let parsed = response
            .json::<ParsedPdf>()
            .await
            .with_context(|| format!("Failed to parse Science Parse response for {}", path.display()))?;
        Ok(Some(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let client = ScienceParseClient::new("http://127.0.0.1/", "8080").unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:8080/v1");
    }

    #[test]
    fn test_deserialize_response() {
        let json = r#"{
            "id": "abc",
            "title": "A Thesis",
            "sections": [
                {"heading": "1 Introduction", "text": "Hello."},
                {"text": "No heading here."}
            ]
        }"#;
        let pdf: ParsedPdf = serde_json::from_str(json).unwrap();
        assert_eq!(pdf.sections().len(), 2);
        assert_eq!(pdf.sections()[0].heading.as_deref(), Some("1 Introduction"));
        assert!(pdf.sections()[1].heading.is_none());
    }

    #[test]
    fn test_missing_sections_differs_from_empty() {
        let pdf: ParsedPdf = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert!(!pdf.has_sections());
        assert!(pdf.sections().is_empty());

        let pdf: ParsedPdf = serde_json::from_str(r#"{"id": "abc", "sections": []}"#).unwrap();
        assert!(pdf.has_sections());
        assert!(pdf.sections().is_empty());
    }
}
