// Section filtering heuristics for thesis PDFs.
//
// Science Parse splits a thesis into headed sections. Front and back matter
// (contents, lists of figures/tables, acknowledgements, declarations,
// bibliography, appendices) is dropped by header name, declaration
// paragraphs by known sentences, and table-of-contents style lines
// (`Chapter 3 . . . . 5`) are cut out of whatever remains.

use std::sync::OnceLock;

use regex_lite::Regex;

use super::science_parse::{ParsedPdf, Section};

/// Sentences that only appear in a declaration of originality.
const DECLARATION_SENTENCES: &[&str] = &[
    "I certify that the material contained in this dissertation is my own work",
    "I certify that the material contained within this dissertation is my own work",
    "I hereby declare that the entirety of the content of this dissertation is my own work",
    "I certify that this dissertation is my own work and that the material",
    "I declare that the work presented in this thesis is, to the best of my knowledge and \
     belief, original and my own work",
];

struct HeaderPatterns {
    trailing_roman: Regex,
    leading_number: Regex,
    trailing_number: Regex,
}

fn header_patterns() -> &'static HeaderPatterns {
    static PATTERNS: OnceLock<HeaderPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| HeaderPatterns {
        trailing_roman: Regex::new(r"\s*(i*v?i*)+$").expect("static pattern"),
        leading_number: Regex::new(r"^(\d+.?)+\s*").expect("static pattern"),
        trailing_number: Regex::new(r"\s*(\d+.?)$").expect("static pattern"),
    })
}

fn table_of_contents_line() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r".+(\s*\.){3,}.*\d+\s*").expect("static pattern"))
}

/// Normalize a header for matching: trimmed, lower-cased, colons removed,
/// trailing roman numerals and leading/trailing section numbers removed.
pub fn normalize_header(header: &str) -> String {
    let patterns = header_patterns();
    let header = header.trim().to_lowercase().replace(':', "");
    let header = patterns.trailing_roman.replace_all(&header, "");
    let header = patterns.leading_number.replace_all(&header, "");
    patterns.trailing_number.replace_all(&header, "").into_owned()
}

/// Kinds of section that are not part of the thesis body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    ListOfTables,
    ListOfFigures,
    Acknowledgements,
    TableOfContents,
    Declaration,
    Bibliography,
    Appendix,
}

impl SectionKind {
    pub const ALL: [SectionKind; 7] = [
        Self::ListOfTables,
        Self::ListOfFigures,
        Self::Acknowledgements,
        Self::TableOfContents,
        Self::Declaration,
        Self::Bibliography,
        Self::Appendix,
    ];

    /// Does an already normalized header name this kind of section?
    fn matches_normalized(self, header: &str) -> bool {
        match self {
            Self::ListOfTables => matches!(header, "tables" | "table of tables" | "list of tables"),
            Self::ListOfFigures => matches!(
                header,
                "figures & tables" | "table of figures" | "figures" | "list of figures"
            ),
            Self::Acknowledgements => matches!(header, "acknowledgements" | "acknowledgement"),
            Self::TableOfContents => matches!(header, "contents" | "table of contents"),
            Self::Declaration => matches!(
                header,
                "statement of originality"
                    | "declaration"
                    | "declaration of originality"
                    | "declaration of authorship"
            ),
            Self::Bibliography => matches!(header, "bibliography" | "citations" | "references"),
            Self::Appendix => header.contains("appendix") || header.contains("appendices"),
        }
    }

    /// The kind of section a raw header names, if it is one to drop.
    pub fn of_header(header: &str) -> Option<SectionKind> {
        let normalized = normalize_header(header);
        Self::ALL
            .into_iter()
            .find(|kind| kind.matches_normalized(&normalized))
    }
}

/// True if the header names a section that is not part of the thesis body.
pub fn is_header_to_remove(header: &str) -> bool {
    SectionKind::of_header(header).is_some()
}

/// True if the paragraph contains a known declaration sentence.
pub fn is_declaration_paragraph(paragraph: &str) -> bool {
    let lower = paragraph.to_lowercase();
    DECLARATION_SENTENCES
        .iter()
        .any(|sentence| lower.contains(&sentence.to_lowercase()))
}

/// Remove table-of-contents style lines (`Abstract . . . . 12`).
pub fn remove_table_of_contents_lines(paragraph: &str) -> String {
    let mut cleaned = paragraph.to_string();
    for entry in table_of_contents_line().find_iter(paragraph) {
        cleaned = cleaned.replace(entry.as_str(), "");
    }
    cleaned
}

/// The cleaned text a section contributes, if any.
pub fn section_body(section: &Section) -> Option<String> {
    if let Some(heading) = section.heading.as_deref() {
        if is_header_to_remove(heading) {
            return None;
        }
    }
    let text = section.text.as_deref()?;
    if is_declaration_paragraph(text) {
        return None;
    }
    Some(remove_table_of_contents_lines(text))
}

/// Concatenate the cleaned text of every kept section, trimmed.
pub fn thesis_text(pdf: &ParsedPdf) -> String {
    pdf.sections()
        .iter()
        .filter_map(section_body)
        .collect::<String>()
        .trim()
        .to_string()
}
