// Thesis export — PDF directory in, one cleaned `.txt` per thesis out.
//
// Every problem with an individual PDF (not a PDF, unparseable, no text,
// too short) is logged and counted, never fatal. Only an unreachable
// Science Parse server or a filesystem error stops the batch.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::science_parse::PdfParser;
use super::sections::{
    is_declaration_paragraph, is_header_to_remove, normalize_header, remove_table_of_contents_lines,
    thesis_text, SectionKind,
};
use crate::output::progress_bar;
use crate::paths::list_files;

/// Default minimum number of whitespace-separated words for an export.
pub const DEFAULT_MIN_WORDS: usize = 1000;

/// Number of header names listed by the survey.
const POPULAR_HEADERS: usize = 20;

#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    /// Re-export theses that already have a `.txt` in the export directory
    pub replace: bool,
    pub min_words: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            replace: false,
            min_words: DEFAULT_MIN_WORDS,
        }
    }
}

/// What happened to one file of the thesis directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    NotPdf,
    AlreadyExported,
    Unparseable,
    NoText,
    TooShort { words: usize },
    Exported { replaced: bool },
}

/// Counters over a whole export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub files: usize,
    pub not_pdf: usize,
    pub already_exported: usize,
    pub unparseable: usize,
    pub no_text: usize,
    pub too_short: usize,
    pub replaced: usize,
    pub exported: usize,
}

impl ExportSummary {
    fn record(&mut self, outcome: &ExportOutcome) {
        self.files += 1;
        match outcome {
            ExportOutcome::NotPdf => self.not_pdf += 1,
            ExportOutcome::AlreadyExported => self.already_exported += 1,
            ExportOutcome::Unparseable => self.unparseable += 1,
            ExportOutcome::NoText => self.no_text += 1,
            ExportOutcome::TooShort { .. } => self.too_short += 1,
            ExportOutcome::Exported { replaced } => {
                self.exported += 1;
                if *replaced {
                    self.replaced += 1;
                }
            }
        }
    }

    pub fn log(&self) {
        debug!(
            not_pdf = self.not_pdf,
            unparseable = self.unparseable,
            no_text = self.no_text,
            below_min_words = self.too_short,
            already_exported = self.already_exported,
            files = self.files,
            replaced = self.replaced,
            exported = self.exported,
            "Export finished"
        );
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "pdf")
}

/// `<export_dir>/<stem>.txt`
pub fn export_path(export_dir: &Path, pdf: &Path) -> PathBuf {
    let mut name = pdf.file_stem().unwrap_or_default().to_os_string();
    name.push(".txt");
    export_dir.join(name)
}

/// Export a single file of the thesis directory.
pub async fn export_thesis(
    parser: &dyn PdfParser,
    pdf: &Path,
    export_dir: &Path,
    options: &ExportOptions,
) -> Result<ExportOutcome> {
    let name = pdf.display();
    if !is_pdf(pdf) {
        debug!(
            file = %name,
            "Not a PDF and will not be parsed; if it is a PDF please give it a `.pdf` extension"
        );
        return Ok(ExportOutcome::NotPdf);
    }

    let target = export_path(export_dir, pdf);
    let exists = target.exists();
    if exists && !options.replace {
        return Ok(ExportOutcome::AlreadyExported);
    }

    info!(file = %name, "Processing");
    let Some(parsed) = parser.parse_pdf(pdf).await? else {
        debug!(file = %name, "Science Parse server could not parse PDF");
        return Ok(ExportOutcome::Unparseable);
    };
    if !parsed.has_sections() {
        info!(file = %name, "Science Parse could not extract any text from PDF");
        return Ok(ExportOutcome::NoText);
    }

    let text = thesis_text(&parsed);
    if text.is_empty() {
        info!(file = %name, "Science Parse could not extract any text from PDF");
        return Ok(ExportOutcome::NoText);
    }

    let words = text.split_whitespace().count();
    if words < options.min_words {
        info!(
            file = %name,
            words,
            min_words = options.min_words,
            "PDF has fewer words than the minimum"
        );
        return Ok(ExportOutcome::TooShort { words });
    }

    std::fs::write(&target, text)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(ExportOutcome::Exported { replaced: exists })
}

/// Export every PDF in `thesis_dir` to `export_dir`.
pub async fn export_directory(
    parser: &dyn PdfParser,
    thesis_dir: &Path,
    export_dir: &Path,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    let files = list_files(thesis_dir)?;
    let mut summary = ExportSummary::default();

    let pb = progress_bar(files.len() as u64, "Exporting");
    for file in &files {
        let outcome = export_thesis(parser, file, export_dir, options).await?;
        summary.record(&outcome);
        pb.inc(1);
    }
    pb.finish_and_clear();

    summary.log();
    Ok(summary)
}

/// Statistics about a PDF directory, without exporting anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyReport {
    pub pdfs: usize,
    pub pdfs_without_data: Vec<String>,
    pub sections_with_header: usize,
    pub sections_without_header: usize,
    /// Normalized header → occurrences
    pub header_counts: BTreeMap<String, usize>,
    pub pdfs_without_declaration: Vec<String>,
    pub bibliography_headers: BTreeMap<String, usize>,
    pub appendix_headers: BTreeMap<String, usize>,
    /// PDF name → whitespace token count of the text that would be exported
    pub token_counts: BTreeMap<String, usize>,
}

impl SurveyReport {
    /// The `n` most common normalized headers, most common first.
    pub fn popular_headers(&self, n: usize) -> Vec<(&str, usize)> {
        let mut headers: Vec<(&str, usize)> = self
            .header_counts
            .iter()
            .map(|(h, &c)| (h.as_str(), c))
            .collect();
        headers.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        headers.truncate(n);
        headers
    }

    /// PDFs ordered by ascending token count.
    pub fn by_token_count(&self) -> Vec<(&str, usize)> {
        let mut pdfs: Vec<(&str, usize)> = self
            .token_counts
            .iter()
            .map(|(name, &count)| (name.as_str(), count))
            .collect();
        pdfs.sort_by_key(|&(_, count)| count);
        pdfs
    }

    pub fn log(&self) {
        info!(pdfs = self.pdfs, "Number of PDFs in the directory");
        info!(
            count = self.pdfs_without_data.len(),
            "Number of PDFs without any sections/data"
        );
        info!(count = self.sections_without_header, "Sections without a header");
        info!(count = self.sections_with_header, "Sections with a header");
        for (header, count) in self.popular_headers(POPULAR_HEADERS) {
            info!(header, count, "Popular normalized header");
        }
        for pdf in &self.pdfs_without_declaration {
            info!(pdf = %pdf, "PDF believed to have no declaration");
        }
        for (header, count) in &self.bibliography_headers {
            info!(header = %header, count, "Bibliography header");
        }
        for (header, count) in &self.appendix_headers {
            info!(header = %header, count, "Appendix header");
        }
        for (pdf, tokens) in self.by_token_count() {
            info!(pdf, tokens, "Exportable tokens");
        }
    }
}

/// Survey every PDF in `thesis_dir`.
pub async fn survey_directory(parser: &dyn PdfParser, thesis_dir: &Path) -> Result<SurveyReport> {
    let mut report = SurveyReport::default();

    for file in list_files(thesis_dir)? {
        if !is_pdf(&file) {
            debug!(file = %file.display(), "Not a PDF, skipping");
            continue;
        }
        report.pdfs += 1;
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(file = %name, "Processing");

        let parsed = match parser.parse_pdf(&file).await? {
            // An empty section list still counts: no declaration, 0 tokens.
            Some(parsed) if parsed.has_sections() => parsed,
            Some(_) => {
                info!(file = %name, "No data was extracted from PDF");
                report.pdfs_without_data.push(name);
                continue;
            }
            None => {
                info!(file = %name, "Science Parse server could not parse PDF");
                report.pdfs_without_data.push(name);
                continue;
            }
        };

        let mut has_declaration = false;
        let mut text = String::new();
        for section in parsed.sections() {
            if let Some(heading) = section.heading.as_deref() {
                let normalized = normalize_header(heading);
                match SectionKind::of_header(heading) {
                    Some(SectionKind::Declaration) => has_declaration = true,
                    Some(SectionKind::Bibliography) => {
                        *report.bibliography_headers.entry(normalized.clone()).or_default() += 1
                    }
                    Some(SectionKind::Appendix) => {
                        *report.appendix_headers.entry(normalized.clone()).or_default() += 1
                    }
                    _ => {}
                }
                if is_header_to_remove(heading) {
                    continue;
                }
            }
            if let Some(section_text) = section.text.as_deref() {
                if is_declaration_paragraph(section_text) {
                    has_declaration = true;
                    continue;
                }
                text.push_str(&remove_table_of_contents_lines(section_text));
            }
            match section.heading.as_deref() {
                Some(heading) => {
                    report.sections_with_header += 1;
                    *report.header_counts.entry(normalize_header(heading)).or_default() += 1;
                }
                None => report.sections_without_header += 1,
            }
        }

        if !has_declaration {
            report.pdfs_without_declaration.push(name.clone());
        }
        report.token_counts.insert(name, text.split_whitespace().count());
    }

    Ok(report)
}
