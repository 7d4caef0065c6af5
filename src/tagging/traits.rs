// Tagger trait — the seam between the pipelines and the tagging service.
//
// The keyword pipeline only needs "text in, tagged document out". Keeping
// that behind a trait lets the cache and counting stages run against a
// canned tagger in tests.

use anyhow::Result;
use async_trait::async_trait;

use super::document::TaggedDocument;

/// Trait for POS + semantic tagging of a plain text.
#[async_trait]
pub trait Tagger: Send + Sync {
    /// Tag a whole text.
    async fn tag(&self, text: &str) -> Result<TaggedDocument>;
}
