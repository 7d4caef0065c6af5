// Colored terminal summaries for the export and keyword commands.
//
// The JSON files are the real output; these tables are a quick look at
// what was found.

use colored::Colorize;

use crate::pdf::export::ExportSummary;
use crate::stats::keywords::KeywordReport;
use crate::stats::sigeff::SignificanceLevel;

/// Rows shown per table.
const TOP_N: usize = 20;

/// Display the strongest keywords and semantic tags.
pub fn display_keyword_report(report: &KeywordReport, level: SignificanceLevel) {
    println!(
        "\n{}",
        format!(
            "=== Significant tokens: {} (p < {level}) ===",
            report.tokens.len()
        )
        .bold()
    );

    if report.tokens.is_empty() {
        println!("  No tokens are significantly more frequent than in the reference corpus.");
    } else {
        println!(
            "  {:>4}  {:<24} {:>9} {:>7} {:>7}  {}",
            "Rank".dimmed(),
            "Token".dimmed(),
            "LL".dimmed(),
            "LogR".dimmed(),
            "Freq".dimmed(),
            "Common USAS tags".dimmed(),
        );
        println!("  {}", "-".repeat(78).dimmed());

        let mut tokens: Vec<_> = report.tokens.iter().collect();
        tokens.sort_by(|a, b| b.1.stats.log_likelihood.total_cmp(&a.1.stats.log_likelihood));
        for (i, (token, entry)) in tokens.into_iter().take(TOP_N).enumerate() {
            let tags = entry
                .associated_tags
                .iter()
                .map(|(tag, pct)| format!("{} ({pct:.0}%)", super::truncate_chars(tag, 24)))
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "  {:>4}. {:<24} {:>9.2} {:>7.2} {:>7}  {}",
                i + 1,
                super::truncate_chars(token, 24),
                entry.stats.log_likelihood,
                entry.stats.log_ratio,
                entry.stats.frequency,
                tags.dimmed(),
            );
        }
    }

    println!(
        "\n{}",
        format!("=== Significant semantic tags: {} ===", report.tags.len()).bold()
    );
    if report.tags.is_empty() {
        println!("  No semantic tags are significantly more frequent than in the reference corpus.");
        return;
    }

    let mut tags: Vec<_> = report.tags.iter().collect();
    tags.sort_by(|a, b| b.1.log_likelihood.total_cmp(&a.1.log_likelihood));
    for (i, (tag, stats)) in tags.into_iter().take(TOP_N).enumerate() {
        println!(
            "  {:>4}. {:<40} {:>9.2} {:>7.2} {:>7}",
            i + 1,
            super::truncate_chars(tag, 40).bright_green(),
            stats.log_likelihood,
            stats.log_ratio,
            stats.frequency,
        );
    }
}

/// Display the counters of an export run.
pub fn display_export_summary(summary: &ExportSummary) {
    println!("\n{}", "Export complete.".bold());
    println!("  Files in thesis directory: {}", summary.files);
    println!("  Exported:                  {}", summary.exported.to_string().green());
    if summary.replaced > 0 {
        println!("  Replaced:                  {}", summary.replaced);
    }
    if summary.already_exported > 0 {
        println!("  Already exported:          {}", summary.already_exported);
    }
    if summary.not_pdf > 0 {
        println!("  Not PDFs:                  {}", summary.not_pdf.to_string().dimmed());
    }
    if summary.unparseable > 0 {
        println!("  Could not be parsed:       {}", summary.unparseable.to_string().yellow());
    }
    if summary.no_text > 0 {
        println!("  No text extracted:         {}", summary.no_text.to_string().yellow());
    }
    if summary.too_short > 0 {
        println!("  Below minimum word count:  {}", summary.too_short.to_string().yellow());
    }
}
