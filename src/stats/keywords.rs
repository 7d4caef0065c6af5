// Keyword report — significant tokens and semantic tags for a corpus.
//
// Runs SigEff twice (tokens, then USAS tags) against the reference lists,
// decorates tokens with their most common semantic tags, drops the
// unmatched Z9x tags and optionally swaps tags for their labels.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::counter::{CorpusCounts, TagShare};
use super::frequency::FrequencyTable;
use super::sigeff::{SigEff, SignificanceLevel, SignificanceRecord, DEFAULT_MIN_FREQUENCY};
use crate::labels::mapping::TagLabels;
use crate::labels::normalize::tag_to_label;
use crate::labels::TagError;

/// Number of associated tags reported per token.
pub const ASSOCIATED_TAGS: usize = 2;

/// Marker of the unmatched/unknown semantic tags (Z99 and friends).
pub const UNMATCHED_TAG_MARKER: &str = "Z9";

/// A significant token with its most common USAS tags (or labels).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignificantToken {
    #[serde(flatten)]
    pub stats: SignificanceRecord,
    #[serde(rename = "Common associated USAS tags (%)")]
    pub associated_tags: Vec<TagShare>,
}

#[derive(Debug, Clone, Copy)]
pub struct KeywordOptions {
    pub level: SignificanceLevel,
    pub min_frequency: u64,
}

impl Default for KeywordOptions {
    fn default() -> Self {
        Self {
            level: SignificanceLevel::default(),
            min_frequency: DEFAULT_MIN_FREQUENCY,
        }
    }
}

/// Significant tokens and tags, keyed by token and tag (or label).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordReport {
    pub tokens: BTreeMap<String, SignificantToken>,
    pub tags: BTreeMap<String, SignificanceRecord>,
}

/// Attach each token's most common USAS tags to its statistics.
pub fn with_associated_tags(
    counts: &CorpusCounts,
    significant: BTreeMap<String, SignificanceRecord>,
) -> BTreeMap<String, SignificantToken> {
    significant
        .into_iter()
        .map(|(token, stats)| {
            let associated_tags = counts.associated_tags(&token, ASSOCIATED_TAGS);
            (token, SignificantToken { stats, associated_tags })
        })
        .collect()
}

/// Remove the Z9/Z99 (unmatched) tags.
pub fn drop_unmatched_tags(
    tags: BTreeMap<String, SignificanceRecord>,
) -> BTreeMap<String, SignificanceRecord> {
    tags.into_iter()
        .filter(|(tag, _)| !tag.contains(UNMATCHED_TAG_MARKER))
        .collect()
}

impl KeywordReport {
    /// Replace tags with labels, both as tag keys and on tokens.
    ///
    /// Two tags converting to the same label is an error, since one would
    /// silently overwrite the other in the output.
    pub fn into_labels(self, labels: &TagLabels) -> Result<Self, TagError> {
        let mut tags = BTreeMap::new();
        for (tag, stats) in self.tags {
            let label = tag_to_label(labels, &tag, None)?;
            if tags.insert(label.clone(), stats).is_some() {
                return Err(TagError::DuplicateLabel(label));
            }
        }

        let mut tokens = self.tokens;
        for token in tokens.values_mut() {
            for (tag, _) in token.associated_tags.iter_mut() {
                *tag = tag_to_label(labels, tag, None)?;
            }
        }

        Ok(Self { tokens, tags })
    }

    /// Write tokens and tags as JSON objects.
    pub fn write(&self, token_path: &Path, tag_path: &Path) -> Result<()> {
        write_json(token_path, &self.tokens)?;
        write_json(tag_path, &self.tags)
    }
}

fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!(file = %path.display(), "Writing token/tag information");
    let json = serde_json::to_string(data)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Compute the keyword report for `counts` against the reference lists.
pub fn build_report(
    sigeff: &SigEff,
    counts: &CorpusCounts,
    reference_tokens: &FrequencyTable,
    reference_tags: &FrequencyTable,
    options: KeywordOptions,
) -> Result<KeywordReport> {
    let significant_tokens = sigeff
        .extract(&counts.tokens, reference_tokens, options.level, options.min_frequency)
        .context("Token keyness extraction failed")?;
    let tokens = with_associated_tags(counts, significant_tokens);

    let significant_tags = sigeff
        .extract(&counts.tags, reference_tags, options.level, options.min_frequency)
        .context("Semantic tag keyness extraction failed")?;
    let tags = drop_unmatched_tags(significant_tags);

    Ok(KeywordReport { tokens, tags })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ll: f64) -> SignificanceRecord {
        SignificanceRecord {
            log_likelihood: ll,
            log_ratio: 1.0,
            frequency: 10,
            relative_frequency: 0.5,
        }
    }

    #[test]
    fn test_drop_unmatched_tags() {
        let tags: BTreeMap<String, SignificanceRecord> = [
            ("Z99".to_string(), record(5.0)),
            ("Z9".to_string(), record(5.0)),
            ("T1".to_string(), record(5.0)),
        ]
        .into();
        let kept = drop_unmatched_tags(tags);
        assert_eq!(kept.keys().collect::<Vec<_>>(), vec!["T1"]);
    }

    #[test]
    fn test_into_labels_converts_keys_and_associated_tags() {
        let mut labels = TagLabels::new();
        labels.insert("T1", "Time");
        labels.insert("A1", "General");

        let report = KeywordReport {
            tokens: [(
                "week".to_string(),
                SignificantToken {
                    stats: record(9.0),
                    associated_tags: vec![("T1".to_string(), 75.0), ("A1+".to_string(), 25.0)],
                },
            )]
            .into(),
            tags: [("T1".to_string(), record(9.0))].into(),
        };

        let labelled = report.into_labels(&labels).unwrap();
        assert!(labelled.tags.contains_key("Time"));
        assert_eq!(
            labelled.tokens["week"].associated_tags,
            vec![("Time".to_string(), 75.0), ("General - +".to_string(), 25.0)]
        );
    }

    #[test]
    fn test_into_labels_rejects_duplicate_labels() {
        let mut labels = TagLabels::new();
        labels.insert("T1", "Time");
        labels.insert("T2", "Time");
        let report = KeywordReport {
            tokens: BTreeMap::new(),
            tags: [("T1".to_string(), record(9.0)), ("T2".to_string(), record(8.0))].into(),
        };
        assert!(matches!(
            report.into_labels(&labels),
            Err(TagError::DuplicateLabel(label)) if label == "Time"
        ));
    }

    #[test]
    fn test_token_json_shape() {
        let token = SignificantToken {
            stats: record(9.0),
            associated_tags: vec![("T1".to_string(), 100.0)],
        };
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["Log Likelihood"], 9.0);
        assert_eq!(json["Common associated USAS tags (%)"][0][0], "T1");
        assert_eq!(json["Common associated USAS tags (%)"][0][1], 100.0);
    }
}
