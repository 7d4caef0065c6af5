// Frequency tables and the on-disk frequency list format.
//
// A frequency list is whitespace delimited, `word count` per line, with the
// first row reserved for `Total <sum>`. Reference corpora (e.g. the BNC
// sample word and semantic tag lists) are distributed in this form.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

/// Word/tag → count. Keys are unique by construction.
pub type FrequencyTable = BTreeMap<String, u64>;

#[derive(Debug, Error)]
pub enum FrequencyError {
    #[error("failed to read frequency file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line} of the frequency list should be `word frequency`: {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("line {line} of the frequency list has a non-integer frequency {value:?}")]
    InvalidCount { line: usize, value: String },

    #[error(
        "the word {0:?} has already occurred in the frequency list, \
         all words in the frequency list should be unique"
    )]
    DuplicateWord(String),
}

/// Parse a frequency list, skipping its total row.
///
/// Blank lines are ignored. With `lower_case`, words are lower-cased and
/// the counts of words that fold together are summed; repeated words in the
/// file itself are still an error.
pub fn parse_frequency_list(contents: &str, lower_case: bool) -> Result<FrequencyTable, FrequencyError> {
    let mut raw = FrequencyTable::new();
    for (index, line) in contents.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (word, count) = match (fields.next(), fields.next(), fields.next()) {
            (Some(word), Some(count), None) => (word, count),
            _ => {
                return Err(FrequencyError::MalformedLine {
                    line: index + 1,
                    content: line.to_string(),
                })
            }
        };
        let count: u64 = count.parse().map_err(|_| FrequencyError::InvalidCount {
            line: index + 1,
            value: count.to_string(),
        })?;
        if raw.insert(word.to_string(), count).is_some() {
            return Err(FrequencyError::DuplicateWord(word.to_string()));
        }
    }

    if !lower_case {
        return Ok(raw);
    }
    let mut folded = FrequencyTable::new();
    for (word, count) in raw {
        *folded.entry(word.to_lowercase()).or_insert(0) += count;
    }
    Ok(folded)
}

/// Read a frequency list file.
pub fn read_frequency_file(path: &Path, lower_case: bool) -> Result<FrequencyTable, FrequencyError> {
    let contents = std::fs::read_to_string(path).map_err(|source| FrequencyError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_frequency_list(&contents, lower_case)
}

/// Entries with a count of at least `min_count`.
pub fn at_least(table: &FrequencyTable, min_count: u64) -> FrequencyTable {
    table
        .iter()
        .filter(|(_, &count)| count >= min_count)
        .map(|(word, &count)| (word.clone(), count))
        .collect()
}

/// The entries of `reference` whose keys also appear in `target`.
pub fn restrict_to(reference: &FrequencyTable, target: &FrequencyTable) -> FrequencyTable {
    reference
        .iter()
        .filter(|(word, _)| target.contains_key(word.as_str()))
        .map(|(word, &count)| (word.clone(), count))
        .collect()
}

pub fn total(table: &FrequencyTable) -> u64 {
    table.values().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_total_row() {
        let table = parse_frequency_list("Total 30\nthe 20\ncat 10\n", false).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["the"], 20);
        assert!(!table.contains_key("Total"));
    }

    #[test]
    fn test_tabs_and_blank_lines() {
        let table = parse_frequency_list("Total\t5\n\nA1\t3\nT\t2\n\n", false).unwrap();
        assert_eq!(table["A1"], 3);
        assert_eq!(table["T"], 2);
    }

    #[test]
    fn test_duplicate_word_is_rejected() {
        let err = parse_frequency_list("Total 2\ncat 1\ncat 1\n", false).unwrap_err();
        assert!(matches!(err, FrequencyError::DuplicateWord(w) if w == "cat"));
    }

    #[test]
    fn test_malformed_lines() {
        assert!(matches!(
            parse_frequency_list("Total 1\ncat\n", false),
            Err(FrequencyError::MalformedLine { line: 2, .. })
        ));
        assert!(matches!(
            parse_frequency_list("Total 1\ncat 1.5\n", false),
            Err(FrequencyError::InvalidCount { line: 2, .. })
        ));
    }

    #[test]
    fn test_lower_case_merges_counts() {
        let table = parse_frequency_list("Total 5\nThe 3\nthe 2\n", true).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table["the"], 5);
    }

    #[test]
    fn test_restrict_to_never_adds_keys() {
        let target: FrequencyTable = [("a".to_string(), 5), ("b".to_string(), 7)].into();
        let reference: FrequencyTable =
            [("a".to_string(), 50), ("z".to_string(), 9)].into();
        let restricted = restrict_to(&reference, &target);
        assert_eq!(restricted.len(), 1);
        assert!(restricted.keys().all(|k| target.contains_key(k)));
    }

    #[test]
    fn test_at_least_is_inclusive() {
        let table: FrequencyTable = [("a".to_string(), 4), ("b".to_string(), 5)].into();
        let kept = at_least(&table, 5);
        assert_eq!(kept.keys().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(total(&table), 9);
    }
}
