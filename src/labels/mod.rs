// Tag labels — mapping coded USAS / CLAWS C7 tags to human-readable labels.
//
// Both tagsets annotate their base tags with trailing symbols (USAS uses
// `+`, `-`, `%`, `@`, `f`, `m`, `c`, `n`, `i`; CLAWS uses ditto numbers and
// `.`), so the same normalizer serves both mappings.

pub mod mapping;
pub mod normalize;

use thiserror::Error;

/// Errors raised while loading or applying a tag-to-label mapping.
#[derive(Debug, Error)]
pub enum TagError {
    /// The tag ends in a character that is neither a known symbol nor part
    /// of a mapped tag.
    #[error(
        "special symbol in the tag {tag:?} that is not one of the special symbols \
         {symbols:?}, or a ditto number 1-9, or a tag itself"
    )]
    UnknownSymbol { tag: String, symbols: &'static str },

    /// A semantic tag summary line did not split into exactly `tag<TAB>label`.
    #[error("line {line} of the tag summary file is not `tag<TAB>label`: {content:?}")]
    MalformedSummaryLine { line: usize, content: String },

    /// Two different tags were converted to the same label.
    #[error("the label {0:?} appears twice in the significantly occurring tag labels")]
    DuplicateLabel(String),
}
