// Tag → label normalization.
//
// USAS tags such as `A5.1+++` or `Z3c` and CLAWS ditto tags such as `II21`
// are not in the label tables verbatim. We strip trailing symbols one at a
// time until the remainder is a known tag, then append the stripped symbols
// to the label so the original tag can be recovered from it.
//
// Symbol lists: page 2 of the USAS guide (http://ucrel.lancs.ac.uk/usas/usas_guide.pdf)
// and the CLAWS C7 ditto tag notes (http://ucrel.lancs.ac.uk/claws7tags.html).

use super::mapping::TagLabels;
use super::TagError;

/// Non-digit symbols that may trail a base tag.
pub const TRAILING_SYMBOLS: &str = "%@fmcni+-.";

/// Lemma the tagger assigns to punctuation tokens.
pub const PUNCTUATION_LEMMA: &str = "PUNC";

/// Tag the tagger emits for an ellipsis token.
pub const ELLIPSIS_TAG: &str = "...";

fn is_trailing_symbol(c: char) -> bool {
    TRAILING_SYMBOLS.contains(c) || ('1'..='9').contains(&c)
}

/// Convert a single tag to its label.
///
/// `"..."` is returned unchanged, and a `PUNC` lemma short-circuits to
/// `"PUNC"`. Otherwise the label of the longest known prefix is returned,
/// suffixed with ` - <stripped symbols>` when anything was stripped. The
/// stripped symbols are listed in the order they were removed.
pub fn tag_to_label(labels: &TagLabels, tag: &str, lemma: Option<&str>) -> Result<String, TagError> {
    if tag == ELLIPSIS_TAG {
        return Ok(tag.to_string());
    }
    if lemma == Some(PUNCTUATION_LEMMA) {
        return Ok(PUNCTUATION_LEMMA.to_string());
    }

    let mut base = tag;
    let mut removed = String::new();
    while !labels.contains(base) {
        match base.chars().next_back() {
            Some(last) if is_trailing_symbol(last) => {
                removed.push(last);
                base = &base[..base.len() - last.len_utf8()];
            }
            _ => {
                return Err(TagError::UnknownSymbol {
                    tag: tag.to_string(),
                    symbols: TRAILING_SYMBOLS,
                })
            }
        }
    }

    // The loop only exits once `base` is a key.
    let label = labels.get(base).unwrap_or_default();
    if removed.is_empty() {
        Ok(label.to_string())
    } else {
        Ok(format!("{label} - {removed}"))
    }
}

/// Convert a possibly multi-valued tag (`A1/B2+`) to labels joined by `/`.
pub fn tags_to_labels(
    labels: &TagLabels,
    tags: &str,
    lemma: Option<&str>,
) -> Result<String, TagError> {
    let converted = tags
        .split('/')
        .map(|tag| tag_to_label(labels, tag, lemma))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(converted.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usas() -> TagLabels {
        let mut labels = TagLabels::new();
        labels.insert("T", "Time");
        labels.insert("A5.1", "Evaluation: Good/bad");
        labels.insert("Z3", "Other proper names");
        labels.insert("Z99", "Unmatched");
        labels
    }

    #[test]
    fn test_known_tag_maps_directly() {
        assert_eq!(tag_to_label(&usas(), "T", None).unwrap(), "Time");
        assert_eq!(tag_to_label(&usas(), "Z99", None).unwrap(), "Unmatched");
    }

    #[test]
    fn test_stripped_symbols_are_appended_in_removal_order() {
        assert_eq!(
            tag_to_label(&usas(), "A5.1+-", None).unwrap(),
            "Evaluation: Good/bad - -+"
        );
        assert_eq!(tag_to_label(&usas(), "Z3c", None).unwrap(), "Other proper names - c");
    }

    #[test]
    fn test_ditto_numbers_are_stripped() {
        let mut claws = TagLabels::new();
        claws.insert("II", "general preposition");
        assert_eq!(
            tag_to_label(&claws, "II21", None).unwrap(),
            "general preposition - 12"
        );
    }

    #[test]
    fn test_unknown_symbol_is_an_error() {
        let err = tag_to_label(&usas(), "T&", None).unwrap_err();
        assert!(matches!(err, TagError::UnknownSymbol { ref tag, .. } if tag == "T&"));
    }

    #[test]
    fn test_exhausted_tag_is_an_error() {
        assert!(tag_to_label(&usas(), "+-", None).is_err());
        assert!(tag_to_label(&usas(), "", None).is_err());
    }

    #[test]
    fn test_special_cases() {
        assert_eq!(tag_to_label(&usas(), "...", None).unwrap(), "...");
        assert_eq!(tag_to_label(&usas(), "YPUNC", Some("PUNC")).unwrap(), "PUNC");
        assert_eq!(tag_to_label(&usas(), "T", Some("time")).unwrap(), "Time");
    }

    #[test]
    fn test_multi_tags_are_joined() {
        assert_eq!(
            tags_to_labels(&usas(), "T/Z3c", None).unwrap(),
            "Time/Other proper names - c"
        );
    }
}
