// UCREL tagging API client (CLAWS C7 POS tags + USAS semantic tags).
//
// The API takes a form post with the caller's email and the text, and
// answers in vertical tab-separated form: one `token<TAB>pos<TAB>lemma<TAB>usas`
// line per token, with a blank line after each sentence.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::document::{TaggedDocument, Token};
use super::traits::Tagger;

/// Default UCREL API endpoint.
pub const DEFAULT_UCREL_API_URL: &str = "http://ucrel-api.lancaster.ac.uk";

/// Path of the USAS tagging script on the API server.
const USAS_PATH: &str = "/cgi-bin/usas.pl";

/// Client for the UCREL USAS tagging API.
pub struct UcrelTagger {
    client: Client,
    base_url: String,
    email: String,
}

impl UcrelTagger {
    /// Create a tagger for `base_url`, identifying as `email`.
    pub fn new(base_url: &str, email: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("thesis-keyness/0.1")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            email: email.to_string(),
        })
    }
}

#[async_trait]
impl Tagger for UcrelTagger {
    async fn tag(&self, text: &str) -> Result<TaggedDocument> {
        let url = format!("{}{}", self.base_url, USAS_PATH);
        let form = [
            ("email", self.email.as_str()),
            ("tagset", "c7"),
            ("style", "tab"),
            ("text", text),
        ];

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .context("UCREL tagging API request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("UCREL tagging API returned {}: {}", status, body);
        }

        let body = response
            .text()
            .await
            .context("Failed to read UCREL tagging API response")?;

        let document = parse_vertical_output(text, &body);
        debug!(
            tokens = document.tokens.len(),
            sentences = document.sentence_indexes.len(),
            "Tagged text"
        );
        Ok(document)
    }
}

/// Build a [`TaggedDocument`] from the API's vertical tab-separated output.
///
/// Missing trailing columns become `None`; lines without a token are
/// ignored. A blank line closes the current sentence.
pub fn parse_vertical_output(text: &str, body: &str) -> TaggedDocument {
    let mut tokens = Vec::new();
    let mut sentence_indexes = Vec::new();
    let mut sentence_start = 0;

    for line in body.lines() {
        if line.trim().is_empty() {
            if tokens.len() > sentence_start {
                sentence_indexes.push((sentence_start, tokens.len()));
                sentence_start = tokens.len();
            }
            continue;
        }

        let mut fields = line.split('\t').map(str::trim);
        let Some(token_text) = fields.next().filter(|t| !t.is_empty()) else {
            continue;
        };
        let mut column = || {
            fields
                .next()
                .filter(|f| !f.is_empty())
                .map(str::to_string)
        };
        let pos_tag = column();
        let lemma = column();
        let usas_tag = column();

        tokens.push(Token {
            text: token_text.to_string(),
            lemma,
            pos_tag,
            usas_tag,
            ..Default::default()
        });
    }
    if tokens.len() > sentence_start {
        sentence_indexes.push((sentence_start, tokens.len()));
    }

    TaggedDocument {
        text: text.to_string(),
        tokens,
        sentence_indexes,
    }
}
