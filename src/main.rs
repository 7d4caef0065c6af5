use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{debug, info};

use thesis_keyness::config::Config;
use thesis_keyness::labels::mapping::TagLabels;
use thesis_keyness::output::terminal;
use thesis_keyness::paths::{created_dir, existing_dir, existing_file, file_path, list_files};
use thesis_keyness::pdf::export::{self, ExportOptions, DEFAULT_MIN_WORDS};
use thesis_keyness::pdf::science_parse::ScienceParseClient;
use thesis_keyness::stats::counter::CorpusCounts;
use thesis_keyness::stats::filters::{FilterOptions, TokenFilter};
use thesis_keyness::stats::frequency::read_frequency_file;
use thesis_keyness::stats::keywords::{build_report, KeywordOptions};
use thesis_keyness::stats::sigeff::{SigEff, SignificanceLevel, DEFAULT_MIN_FREQUENCY};
use thesis_keyness::tagging::cache::{load_cached, tag_directory};
use thesis_keyness::tagging::rate_limiter::RateLimiter;
use thesis_keyness::tagging::traits::Tagger;
use thesis_keyness::tagging::ucrel::UcrelTagger;

/// Seconds between UCREL API calls unless told otherwise.
const DEFAULT_WAIT_SECS: u64 = 10;

/// Thesis keyness: find what a collection of theses talks about.
///
/// Exports thesis PDFs to text, tags them with CLAWS/USAS and reports the
/// tokens and semantic tags that are significantly more frequent than in a
/// reference corpus.
#[derive(Parser)]
#[command(name = "thesis-keyness", version, about)]
struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the text of every thesis PDF in a directory
    Extract {
        /// Directory of thesis PDFs
        #[arg(value_parser = existing_dir)]
        thesis_dir: PathBuf,

        /// Directory to write one `.txt` per thesis into (created if missing)
        #[arg(value_parser = created_dir)]
        export_dir: PathBuf,

        /// Science Parse host (default: SCIENCE_PARSE_URL or http://127.0.0.1)
        #[arg(long)]
        science_parse_server_url: Option<String>,

        /// Science Parse port (default: SCIENCE_PARSE_PORT or 8080)
        #[arg(long)]
        science_parse_server_port: Option<String>,

        /// Only report statistics about the PDFs, export nothing
        #[arg(long)]
        survey: bool,

        /// Re-export theses that already have a text file
        #[arg(long)]
        replace: bool,

        /// Skip theses with fewer words than this
        #[arg(long, default_value_t = DEFAULT_MIN_WORDS)]
        min_number_words: usize,
    },

    /// Tag one text file and write it with human readable tag labels
    Tag {
        /// Text file to tag
        #[arg(value_parser = existing_file)]
        input: PathBuf,

        /// JSON file to write the tagged document to
        #[arg(value_parser = file_path)]
        output: PathBuf,

        /// USAS semantic tag summary (tab separated tag and label)
        #[arg(value_parser = existing_file)]
        semtag_summary: PathBuf,

        /// JSON object of CLAWS POS tag to label (see `claws-labels`)
        #[arg(value_parser = existing_file)]
        pos_tag_labels: PathBuf,
    },

    /// Find significant tokens and semantic tags against a reference corpus
    Keywords {
        /// Directory of exported thesis texts
        #[arg(value_parser = existing_dir)]
        text_dir: PathBuf,

        /// Directory caching the tagged form of each text (created if missing)
        #[arg(value_parser = created_dir)]
        usas_cache_dir: PathBuf,

        /// JSON file for the significant tokens
        #[arg(value_parser = file_path)]
        token_output: PathBuf,

        /// JSON file for the significant USAS tags
        #[arg(value_parser = file_path)]
        usas_output: PathBuf,

        /// Reference corpus token frequency list
        #[arg(value_parser = existing_file)]
        reference_token_freq: PathBuf,

        /// Reference corpus USAS tag frequency list
        #[arg(value_parser = existing_file)]
        reference_usas_freq: PathBuf,

        /// SigEff executable
        #[arg(value_parser = existing_file)]
        sigeff_binary: PathBuf,

        /// USAS semantic tag summary passed to SigEff
        #[arg(value_parser = existing_file)]
        semtag_summary: PathBuf,

        /// Tag every text again, even if it is already cached
        #[arg(long)]
        replace_usas_cache: bool,

        #[arg(long)]
        remove_punctuation: bool,

        #[arg(long)]
        remove_determiners: bool,

        #[arg(long)]
        remove_stop_words: bool,

        #[arg(long)]
        remove_digits: bool,

        /// Lower case tokens (and the reference token list) before counting
        #[arg(long)]
        lower_case: bool,

        /// Significance level: 0.05, 0.01, 0.001 or 0.0001
        #[arg(long, default_value = "0.05")]
        significance_level: SignificanceLevel,

        /// Ignore tokens and tags less frequent than this in the theses
        #[arg(long, default_value_t = DEFAULT_MIN_FREQUENCY)]
        minimum_token_frequency: u64,

        /// Report USAS labels instead of tags
        #[arg(long)]
        usas_tags_to_labels: bool,

        /// Seconds to wait between UCREL API calls
        #[arg(long, default_value_t = DEFAULT_WAIT_SECS)]
        time_to_wait_between_usas_api_calls: u64,
    },

    /// Convert a CLAWS C7 tag listing to a JSON object of tag to label
    ClawsLabels {
        /// CLAWS tag listing (`TAG label words (notes)` per line)
        #[arg(value_parser = existing_file)]
        tag_listing: PathBuf,

        /// JSON file to write
        #[arg(value_parser = file_path)]
        json_output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up structured logging
    let default_filter = if cli.verbose {
        "thesis_keyness=debug"
    } else {
        "thesis_keyness=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Extract {
            thesis_dir,
            export_dir,
            science_parse_server_url,
            science_parse_server_port,
            survey,
            replace,
            min_number_words,
        } => {
            let url = science_parse_server_url.unwrap_or(config.science_parse_url);
            let port = science_parse_server_port.unwrap_or(config.science_parse_port);
            let parser = ScienceParseClient::new(&url, &port)?;
            debug!(endpoint = parser.endpoint(), "Using Science Parse server");

            if survey {
                let report = export::survey_directory(&parser, &thesis_dir).await?;
                report.log();
                return Ok(());
            }

            let options = ExportOptions {
                replace,
                min_words: min_number_words,
            };
            let summary =
                export::export_directory(&parser, &thesis_dir, &export_dir, &options).await?;
            terminal::display_export_summary(&summary);
        }

        Commands::Tag {
            input,
            output,
            semtag_summary,
            pos_tag_labels,
        } => {
            config.require_tagger()?;
            let usas_labels = TagLabels::load_semtag_summary(&semtag_summary)?;
            let pos_labels = TagLabels::load_json(&pos_tag_labels)?;

            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let tagger = UcrelTagger::new(&config.ucrel_api_url, &config.ucrel_api_email)?;

            info!(file = %input.display(), "Tagging text");
            let mut document = tagger.tag(&text).await?;
            document.attach_labels(&pos_labels, &usas_labels)?;

            std::fs::write(&output, document.to_json()?)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "{} {} tokens written to {}",
                "Tagged.".bold(),
                document.tokens.len(),
                output.display()
            );
        }

        Commands::Keywords {
            text_dir,
            usas_cache_dir,
            token_output,
            usas_output,
            reference_token_freq,
            reference_usas_freq,
            sigeff_binary,
            semtag_summary,
            replace_usas_cache,
            remove_punctuation,
            remove_determiners,
            remove_stop_words,
            remove_digits,
            lower_case,
            significance_level,
            minimum_token_frequency,
            usas_tags_to_labels,
            time_to_wait_between_usas_api_calls,
        } => {
            let pacing = RateLimiter::from_secs(time_to_wait_between_usas_api_calls);
            tag_directory(&text_dir, &usas_cache_dir, replace_usas_cache, &pacing, || {
                config.require_tagger()?;
                UcrelTagger::new(&config.ucrel_api_url, &config.ucrel_api_email)
            })
            .await?;

            let filter = TokenFilter::new(FilterOptions {
                lower_case,
                remove_punctuation,
                remove_determiners,
                remove_stop_words,
                remove_digits,
            });
            let counts = count_corpus(&text_dir, &usas_cache_dir, &filter)?;

            info!("Loading reference frequency lists");
            let reference_tokens = read_frequency_file(&reference_token_freq, lower_case)?;
            let reference_tags = read_frequency_file(&reference_usas_freq, false)?;

            let sigeff = SigEff::new(&sigeff_binary, &semtag_summary)?;
            debug!(binary = %sigeff.binary().display(), "Using SigEff");
            let options = KeywordOptions {
                level: significance_level,
                min_frequency: minimum_token_frequency,
            };
            let mut report =
                build_report(&sigeff, &counts, &reference_tokens, &reference_tags, options)?;

            if usas_tags_to_labels {
                let labels = TagLabels::load_semtag_summary(&semtag_summary)?;
                report = report.into_labels(&labels)?;
            }

            report.write(&token_output, &usas_output)?;
            terminal::display_keyword_report(&report, significance_level);
        }

        Commands::ClawsLabels {
            tag_listing,
            json_output,
        } => {
            let listing = std::fs::read_to_string(&tag_listing)
                .with_context(|| format!("Failed to read {}", tag_listing.display()))?;
            let labels = TagLabels::from_claws_listing(&listing);
            std::fs::write(&json_output, serde_json::to_string(&labels)?)
                .with_context(|| format!("Failed to write {}", json_output.display()))?;
            println!(
                "{} {} CLAWS tags written to {}",
                "Converted.".bold(),
                labels.len(),
                json_output.display()
            );
        }
    }

    Ok(())
}

/// Count tokens and tags over the cached tagging of every text in `text_dir`.
fn count_corpus(text_dir: &Path, cache_dir: &Path, filter: &TokenFilter) -> Result<CorpusCounts> {
    let mut counts = CorpusCounts::new();
    for text_path in list_files(text_dir)? {
        let document = load_cached(cache_dir, &text_path)?;
        counts.add_document(&document, filter);
    }
    info!(
        tokens = counts.tokens.len(),
        tags = counts.tags.len(),
        "Counted tokens and semantic tags"
    );
    Ok(counts)
}
