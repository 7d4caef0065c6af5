// Tagging — remote CLAWS/USAS tagging and the on-disk tag cache.
//
// The Tagger trait defines the interface and UcrelTagger implements it against
// the UCREL API. The cache paces texts sent to it with a fixed-interval limiter.

pub mod cache;
pub mod document;
pub mod rate_limiter;
pub mod traits;
pub mod ucrel;
