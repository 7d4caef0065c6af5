// TaggedDocument — the tagging service output, as cached on disk.

use serde::{Deserialize, Serialize};

use crate::labels::mapping::TagLabels;
use crate::labels::normalize::{tag_to_label, tags_to_labels};
use crate::labels::TagError;

/// A single tagged token.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    #[serde(default)]
    pub lemma: Option<String>,
    /// CLAWS C7 part-of-speech tag
    #[serde(default)]
    pub pos_tag: Option<String>,
    /// USAS semantic tag; alternatives are joined with `/`
    #[serde(default)]
    pub usas_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usas_label: Option<String>,
}

impl Token {
    /// The individual USAS alternatives of this token (empty if untagged).
    pub fn usas_tags(&self) -> Vec<&str> {
        match self.usas_tag.as_deref() {
            Some(tag) => tag.split('/').collect(),
            None => Vec::new(),
        }
    }
}

/// A tagged text: the source text, its tokens and sentence boundaries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaggedDocument {
    pub text: String,
    pub tokens: Vec<Token>,
    /// Half-open `[start, end)` token index ranges, one per sentence
    #[serde(default)]
    pub sentence_indexes: Vec<(usize, usize)>,
}

impl TaggedDocument {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Fill in `pos_label` and `usas_label` on every token that has the
    /// corresponding tag.
    pub fn attach_labels(&mut self, pos: &TagLabels, usas: &TagLabels) -> Result<(), TagError> {
        for token in &mut self.tokens {
            let lemma = token.lemma.as_deref();
            if let Some(tag) = token.pos_tag.as_deref() {
                token.pos_label = Some(tag_to_label(pos, tag, lemma)?);
            }
            if let Some(tag) = token.usas_tag.as_deref() {
                token.usas_label = Some(tags_to_labels(usas, tag, lemma)?);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, lemma: &str, pos: &str, usas: &str) -> Token {
        Token {
            text: text.to_string(),
            lemma: Some(lemma.to_string()),
            pos_tag: Some(pos.to_string()),
            usas_tag: Some(usas.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_usas_tags_split_alternatives() {
        let t = token("spring", "spring", "NN1", "T1.3/M1");
        assert_eq!(t.usas_tags(), vec!["T1.3", "M1"]);
        assert!(Token::default().usas_tags().is_empty());
    }

    #[test]
    fn test_attach_labels() {
        let mut pos = TagLabels::new();
        pos.insert("NN1", "singular common noun");
        pos.insert("Y", "punctuation");
        let mut usas = TagLabels::new();
        usas.insert("T1.3", "Time: Period");
        usas.insert("M1", "Moving, coming and going");

        let mut doc = TaggedDocument {
            text: "spring .".to_string(),
            tokens: vec![
                token("spring", "spring", "NN1", "T1.3/M1+"),
                token(".", "PUNC", "Y", "PUNC"),
            ],
            sentence_indexes: vec![(0, 2)],
        };
        doc.attach_labels(&pos, &usas).unwrap();

        assert_eq!(doc.tokens[0].pos_label.as_deref(), Some("singular common noun"));
        assert_eq!(
            doc.tokens[0].usas_label.as_deref(),
            Some("Time: Period/Moving, coming and going - +")
        );
        assert_eq!(doc.tokens[1].pos_label.as_deref(), Some("PUNC"));
        assert_eq!(doc.tokens[1].usas_label.as_deref(), Some("PUNC"));
    }

    #[test]
    fn test_json_without_labels_or_sentences() {
        let json = r#"{"text": "Hi", "tokens": [{"text": "Hi", "lemma": "hi", "pos_tag": "UH", "usas_tag": "Z4"}]}"#;
        let doc = TaggedDocument::from_json(json).unwrap();
        assert_eq!(doc.tokens.len(), 1);
        assert!(doc.sentence_indexes.is_empty());
        assert!(doc.tokens[0].pos_label.is_none());

        let round = doc.to_json().unwrap();
        assert!(!round.contains("pos_label"));
    }
}
