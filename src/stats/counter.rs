// Frequency counting over tagged documents.
//
// Three tables are kept in step: surface token counts, the USAS tags seen
// with each token, and global USAS tag counts. Every USAS alternative of a
// kept token counts once in both tag tables.

use std::collections::BTreeMap;

use super::filters::TokenFilter;
use super::frequency::FrequencyTable;
use crate::tagging::document::TaggedDocument;

/// Counts accumulated over a corpus of tagged documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusCounts {
    pub tokens: FrequencyTable,
    pub token_tags: BTreeMap<String, FrequencyTable>,
    pub tags: FrequencyTable,
}

/// A tag and the percentage of a token's tag occurrences it accounts for.
pub type TagShare = (String, f64);

impl CorpusCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every token of `document` that survives `filter`.
    pub fn add_document(&mut self, document: &TaggedDocument, filter: &TokenFilter) {
        for token in &document.tokens {
            let Some(text) = filter.apply(token) else {
                continue;
            };
            let usas_tags = token.usas_tags();
            if !usas_tags.is_empty() {
                let per_token = self.token_tags.entry(text.clone()).or_default();
                for tag in &usas_tags {
                    *per_token.entry(tag.to_string()).or_insert(0) += 1;
                    *self.tags.entry(tag.to_string()).or_insert(0) += 1;
                }
            }
            *self.tokens.entry(text).or_insert(0) += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.tags.is_empty()
    }

    /// The `n` most common tags of `token` with their percentage share.
    ///
    /// Ties are broken alphabetically so the result is stable.
    pub fn associated_tags(&self, token: &str, n: usize) -> Vec<TagShare> {
        let Some(tags) = self.token_tags.get(token) else {
            return Vec::new();
        };
        let total: u64 = tags.values().sum();
        if total == 0 {
            return Vec::new();
        }
        let mut ranked: Vec<(&String, &u64)> = tags.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        ranked
            .into_iter()
            .take(n)
            .map(|(tag, &count)| (tag.clone(), count as f64 / total as f64 * 100.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::filters::FilterOptions;
    use crate::tagging::document::Token;

    fn token(text: &str, usas: Option<&str>) -> Token {
        Token {
            text: text.to_string(),
            lemma: Some(text.to_lowercase()),
            pos_tag: Some("NN1".to_string()),
            usas_tag: usas.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_document_gives_empty_tables() {
        let mut counts = CorpusCounts::new();
        counts.add_document(&TaggedDocument::default(), &TokenFilter::new(FilterOptions::default()));
        assert!(counts.is_empty());
        assert!(counts.token_tags.is_empty());
    }

    #[test]
    fn test_alternatives_count_separately() {
        let doc = TaggedDocument {
            text: String::new(),
            tokens: vec![
                token("spring", Some("T1.3/M1")),
                token("spring", Some("T1.3")),
                token("data", None),
            ],
            sentence_indexes: vec![],
        };
        let mut counts = CorpusCounts::new();
        counts.add_document(&doc, &TokenFilter::new(FilterOptions::default()));

        assert_eq!(counts.tokens["spring"], 2);
        assert_eq!(counts.tokens["data"], 1);
        assert_eq!(counts.tags["T1.3"], 2);
        assert_eq!(counts.tags["M1"], 1);
        assert_eq!(counts.token_tags["spring"]["T1.3"], 2);
        assert!(!counts.token_tags.contains_key("data"));
    }

    #[test]
    fn test_associated_tags_top_two_percentages() {
        let mut counts = CorpusCounts::new();
        counts.token_tags.insert(
            "bank".to_string(),
            [("I1".to_string(), 6), ("W3".to_string(), 3), ("M4".to_string(), 1)].into(),
        );
        let top = counts.associated_tags("bank", 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, "I1");
        assert!((top[0].1 - 60.0).abs() < 1e-9);
        assert_eq!(top[1].0, "W3");
        assert!((top[1].1 - 30.0).abs() < 1e-9);
        assert!(counts.associated_tags("missing", 2).is_empty());
    }
}
