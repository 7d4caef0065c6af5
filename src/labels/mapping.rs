// Loading tag → label tables.
//
// Three on-disk forms are supported:
// - the USAS semantic tag summary file: `tag<TAB>label` per line
// - a JSON object of `{"tag": "label"}` (the CLAWS C7 labels)
// - the raw CLAWS C7 tag listing: `TAG label words (notes)` per line,
//   which `claws-labels` converts into the JSON form

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::TagError;

/// A flat tag → label table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagLabels {
    labels: BTreeMap<String, String>,
}

impl TagLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(tag.into(), label.into());
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.labels.get(tag).map(String::as_str)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.labels.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(t, l)| (t.as_str(), l.as_str()))
    }

    /// Parse the USAS semantic tag summary format.
    ///
    /// Blank lines are skipped. Every other line must contain exactly one tab;
    /// tag and label are trimmed.
    pub fn from_semtag_summary(contents: &str) -> Result<Self, TagError> {
        let mut labels = Self::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut parts = line.split('\t');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(tag), Some(label), None) => labels.insert(tag.trim(), label.trim()),
                _ => {
                    return Err(TagError::MalformedSummaryLine {
                        line: index + 1,
                        content: line.to_string(),
                    })
                }
            }
        }
        Ok(labels)
    }

    /// Parse a CLAWS C7 tag listing such as
    /// `NN1 singular common noun (e.g. book, girl)`.
    ///
    /// Anything from the first `(` onwards is dropped, the first word is the
    /// tag and the rest is the label with trailing ` -,` characters removed.
    pub fn from_claws_listing(contents: &str) -> Self {
        let mut labels = Self::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let line = match line.find('(') {
                Some(idx) => line[..idx].trim(),
                None => line,
            };
            let mut words = line.split_whitespace();
            let Some(tag) = words.next() else {
                continue;
            };
            let label = words.collect::<Vec<_>>().join(" ");
            let label = label.trim_end_matches([' ', '-', ',']);
            labels.insert(tag, label);
        }
        labels
    }

    /// Load a semantic tag summary file (UTF-8).
    pub fn load_semtag_summary(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tag summary file {}", path.display()))?;
        Ok(Self::from_semtag_summary(&contents)?)
    }

    /// Load a JSON tag → label object.
    pub fn load_json(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tag label file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("{} is not a JSON object of tag labels", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semtag_summary_trims_and_skips_blank_lines() {
        let labels =
            TagLabels::from_semtag_summary("T\tTime \n\n A1.1.1\tGeneral actions\n").unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get("T"), Some("Time"));
        assert_eq!(labels.get("A1.1.1"), Some("General actions"));
    }

    #[test]
    fn test_semtag_summary_rejects_extra_columns() {
        let err = TagLabels::from_semtag_summary("T\tTime\textra\n").unwrap_err();
        assert!(matches!(err, TagError::MalformedSummaryLine { line: 1, .. }));
    }

    #[test]
    fn test_claws_listing_drops_examples_and_trailing_punctuation() {
        let listing = "APPGE possessive pronoun, pre-nominal (e.g. my, your, our)\n\
                       NN1 singular common noun (e.g. book, girl)\n\
                       \n\
                       ZZ2 plural letter of the alphabet -\n";
        let labels = TagLabels::from_claws_listing(listing);
        assert_eq!(labels.get("APPGE"), Some("possessive pronoun, pre-nominal"));
        assert_eq!(labels.get("NN1"), Some("singular common noun"));
        assert_eq!(labels.get("ZZ2"), Some("plural letter of the alphabet"));
    }

    #[test]
    fn test_json_form_is_a_plain_object() {
        let mut labels = TagLabels::new();
        labels.insert("NN1", "singular common noun");
        let json = serde_json::to_string(&labels).unwrap();
        assert_eq!(json, r#"{"NN1":"singular common noun"}"#);
    }
}
