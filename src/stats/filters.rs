// Token exclusion filters for frequency counting.
//
// Punctuation symbols and stopwords follow SpaCy's English data; determiner
// and digit filters work on the CLAWS C7 POS tag rather than on the surface
// form.

use std::collections::HashSet;

use crate::labels::normalize::PUNCTUATION_LEMMA;
use crate::tagging::document::Token;

/// CLAWS C7 determiner tags.
pub const DETERMINER_TAGS: &[&str] = &[
    "DA", "DA1", "DA2", "DAR", "DAT", "DB", "DB2", "DD", "DD1", "DD2", "DDQ", "DDQGE", "DDQV",
];

/// CLAWS C7 number and formula tags.
pub const DIGIT_TAGS: &[&str] = &["FO", "MC", "MC1", "MC2", "MCGE", "MCMC", "MD", "MF"];

/// Surface forms treated as punctuation.
pub const PUNCTUATION_SYMBOLS: &[&str] = &[
    "..", "…", "……", ",", ":", ";", "!", "?", "¿", "؟", "¡", "(", ")", "[", "]", "{", "}", "<",
    ">", "_", "#", "*", "&", "。", "？", "！", "，", "、", "；", "：", "～", "·", "।", "،", "۔",
    "؛", "٪", "%", "'", "\"", "”", "“", "`", "‘", "´", "’", "‚", "„", "»", "«", "「", "」", "『",
    "』", "（", "）", "〔", "〕", "【", "】", "《", "》", "〈", "〉", "-", "–", "—", "--", "---",
    "——", "~", "$", "£", "€", "¥", "฿", "US$", "C$", "A$", "₽", "﷼", "₴",
];

/// SpaCy's English stopwords, whitespace separated.
const SPACY_STOP_WORDS: &str = "
a about above across after afterwards again against all almost alone along
already also although always am among amongst amount an and another any anyhow
anyone anything anyway anywhere are around as at
back be became because become becomes becoming been before beforehand behind
being below beside besides between beyond both bottom but by
call can cannot ca could
did do does doing done down due during
each eight either eleven else elsewhere empty enough even ever every
everyone everything everywhere except
few fifteen fifty first five for former formerly forty four from front full
further
get give go
had has have he hence her here hereafter hereby herein hereupon hers herself
him himself his how however hundred
i if in indeed into is it its itself
keep
last latter latterly least less
just
made make many may me meanwhile might mine more moreover most mostly move much
must my myself
name namely neither never nevertheless next nine no nobody none noone nor not
nothing now nowhere
of off often on once one only onto or other others otherwise our ours ourselves
out over own
part per perhaps please put
quite
rather re really regarding
same say see seem seemed seeming seems serious several she should show side
since six sixty so some somehow someone something sometime sometimes somewhere
still such
take ten than that the their them themselves then thence there thereafter
thereby therefore therein thereupon these they third this those though three
through throughout thru thus to together too top toward towards twelve twenty
two
under until up unless upon us used using
various very very via was we well were what whatever when whence whenever where
whereafter whereas whereby wherein whereupon wherever whether which while
whither who whoever whole whom whose why will with within without would
yet you your yours yourself yourselves
";

/// Contractions added to the stopword list, in straight and curly forms.
const CONTRACTIONS: &[&str] = &["n't", "'d", "'ll", "'m", "'re", "'s", "'ve"];

/// SpaCy's English stopwords plus contraction suffixes.
pub fn english_stop_words() -> HashSet<String> {
    let mut words: HashSet<String> = SPACY_STOP_WORDS
        .split_whitespace()
        .map(str::to_string)
        .collect();
    for contraction in CONTRACTIONS {
        words.insert(contraction.to_string());
        for apostrophe in ['‘', '’'] {
            words.insert(contraction.replace('\'', &apostrophe.to_string()));
        }
    }
    words
}

/// Which tokens to drop before counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub lower_case: bool,
    pub remove_punctuation: bool,
    pub remove_determiners: bool,
    pub remove_stop_words: bool,
    pub remove_digits: bool,
}

/// Applies [`FilterOptions`] to tokens.
#[derive(Debug, Clone)]
pub struct TokenFilter {
    options: FilterOptions,
    punctuation: HashSet<&'static str>,
    determiners: HashSet<&'static str>,
    digits: HashSet<&'static str>,
    stop_words: HashSet<String>,
}

impl TokenFilter {
    pub fn new(options: FilterOptions) -> Self {
        Self::with_stop_words(options, english_stop_words())
    }

    /// Build a filter with a custom stopword list (compared lower-cased).
    pub fn with_stop_words(options: FilterOptions, stop_words: HashSet<String>) -> Self {
        Self {
            options,
            punctuation: PUNCTUATION_SYMBOLS.iter().copied().collect(),
            determiners: DETERMINER_TAGS.iter().copied().collect(),
            digits: DIGIT_TAGS.iter().copied().collect(),
            stop_words,
        }
    }

    pub fn options(&self) -> FilterOptions {
        self.options
    }

    /// The token text to count, or `None` if the token is filtered out.
    pub fn apply(&self, token: &Token) -> Option<String> {
        let opts = &self.options;
        let text = if opts.lower_case {
            token.text.to_lowercase()
        } else {
            token.text.clone()
        };

        if opts.remove_punctuation
            && (self.punctuation.contains(text.as_str())
                || token.lemma.as_deref() == Some(PUNCTUATION_LEMMA))
        {
            return None;
        }
        if let Some(pos) = token.pos_tag.as_deref() {
            if opts.remove_determiners && self.determiners.contains(pos) {
                return None;
            }
            if opts.remove_digits && self.digits.contains(pos) {
                return None;
            }
        }
        if opts.remove_stop_words && self.stop_words.contains(&text.to_lowercase()) {
            return None;
        }
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, lemma: &str, pos: &str) -> Token {
        Token {
            text: text.to_string(),
            lemma: Some(lemma.to_string()),
            pos_tag: Some(pos.to_string()),
            usas_tag: None,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        let filter = TokenFilter::new(FilterOptions::default());
        assert_eq!(filter.apply(&token("The", "the", "AT")), Some("The".to_string()));
        assert_eq!(filter.apply(&token(",", "PUNC", "YCOM")), Some(",".to_string()));
    }

    #[test]
    fn test_punctuation_by_symbol_or_lemma() {
        let filter = TokenFilter::new(FilterOptions {
            remove_punctuation: true,
            ..Default::default()
        });
        assert!(filter.apply(&token("—", "—", "Y")).is_none());
        assert!(filter.apply(&token(".", "PUNC", "YSTP")).is_none());
        assert!(filter.apply(&token("word", "word", "NN1")).is_some());
    }

    #[test]
    fn test_determiners_and_digits_by_pos_tag() {
        let filter = TokenFilter::new(FilterOptions {
            remove_determiners: true,
            remove_digits: true,
            ..Default::default()
        });
        assert!(filter.apply(&token("this", "this", "DD1")).is_none());
        assert!(filter.apply(&token("42", "42", "MC")).is_none());
        assert!(filter.apply(&token("data", "data", "NN")).is_some());
    }

    #[test]
    fn test_stop_words_are_case_insensitive() {
        let filter = TokenFilter::new(FilterOptions {
            remove_stop_words: true,
            ..Default::default()
        });
        assert!(filter.apply(&token("However", "however", "RR")).is_none());
        assert!(filter.apply(&token("n’t", "not", "XX")).is_none());
        assert!(filter.apply(&token("photosynthesis", "photosynthesis", "NN1")).is_some());
    }

    #[test]
    fn test_stop_words_keep_academic_content_words() {
        let words = english_stop_words();
        for kept in ["research", "results", "system", "information", "problem", "work"] {
            assert!(!words.contains(kept), "{kept} should not be a stopword");
        }
        for dropped in ["however", "the", "whereupon", "'s", "’ve"] {
            assert!(words.contains(dropped), "{dropped} should be a stopword");
        }

        let filter = TokenFilter::new(FilterOptions {
            remove_stop_words: true,
            ..Default::default()
        });
        assert!(filter.apply(&token("research", "research", "NN1")).is_some());
        assert!(filter.apply(&token("results", "result", "NN2")).is_some());
        assert!(filter.apply(&token("however", "however", "RR")).is_none());
    }

    #[test]
    fn test_lower_case_changes_counted_text() {
        let filter = TokenFilter::new(FilterOptions {
            lower_case: true,
            ..Default::default()
        });
        assert_eq!(filter.apply(&token("Lancaster", "Lancaster", "NP1")), Some("lancaster".to_string()));
    }
}
