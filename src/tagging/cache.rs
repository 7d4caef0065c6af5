// On-disk tag cache: one `<stem>.json` TaggedDocument per text file.
//
// Tagging a thesis takes a remote call plus a politeness wait, so every
// result is cached and reused on later runs unless a refresh is requested.
// The wait is applied per file here, between texts actually sent.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use super::document::TaggedDocument;
use super::rate_limiter::RateLimiter;
use super::traits::Tagger;
use crate::output::progress_bar;
use crate::paths::list_files;

/// Counts from one pass over the text directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSummary {
    /// Texts sent to the tagger
    pub tagged: usize,
    /// Texts whose cached result was reused
    pub reused: usize,
}

/// Cache file for a text file: `<cache_dir>/<stem>.json`.
pub fn cache_path(cache_dir: &Path, text_path: &Path) -> PathBuf {
    let stem = text_path.file_stem().unwrap_or_default();
    let mut name = stem.to_os_string();
    name.push(".json");
    cache_dir.join(name)
}

/// Text files in `text_dir` that have no cache entry yet, or all of them
/// when `replace` is set.
pub fn pending_files(text_dir: &Path, cache_dir: &Path, replace: bool) -> Result<Vec<PathBuf>> {
    let files = list_files(text_dir)?;
    if replace {
        return Ok(files);
    }
    Ok(files
        .into_iter()
        .filter(|text_path| !cache_path(cache_dir, text_path).exists())
        .collect())
}

/// Tag every file in `text_dir`, writing results into `cache_dir`.
///
/// Existing cache entries are kept unless `replace` is set. `connect` builds
/// the tagger and is only called when at least one text needs tagging, so a
/// fully cached corpus never touches the tagging service or its settings.
pub async fn tag_directory<T, F>(
    text_dir: &Path,
    cache_dir: &Path,
    replace: bool,
    pacing: &RateLimiter,
    connect: F,
) -> Result<CacheSummary>
where
    T: Tagger,
    F: FnOnce() -> Result<T>,
{
    let total = list_files(text_dir)?.len();
    let pending = pending_files(text_dir, cache_dir, replace)?;
    let mut summary = CacheSummary {
        tagged: 0,
        reused: total - pending.len(),
    };

    if pending.is_empty() {
        info!(reused = summary.reused, "All texts are already tagged and cached");
        return Ok(summary);
    }
    let tagger = connect()?;

    info!(
        cache_dir = %cache_dir.display(),
        pending = pending.len(),
        wait_secs = pacing.interval().as_secs(),
        "Tagging text and caching"
    );
    let pb = progress_bar(pending.len() as u64, "Tagging");

    for text_path in &pending {
        let text = std::fs::read_to_string(text_path)
            .with_context(|| format!("Failed to read {}", text_path.display()))?;

        pacing.wait_turn(text_path).await;
        info!(file = %text_path.display(), "Tagging text");
        let document = tagger
            .tag(&text)
            .await
            .with_context(|| format!("Failed to tag {}", text_path.display()))?;

        let cached = cache_path(cache_dir, text_path);
        let json = document.to_json()?;
        std::fs::write(&cached, json)
            .with_context(|| format!("Failed to write cache file {}", cached.display()))?;
        info!(cache_file = %cached.display(), "Tagged data cached");

        summary.tagged += 1;
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        tagged = summary.tagged,
        reused = summary.reused,
        "Tagging completed and all tagged data has been cached"
    );
    Ok(summary)
}

/// Read the cached tagged form of `text_path`.
pub fn load_cached(cache_dir: &Path, text_path: &Path) -> Result<TaggedDocument> {
    let cached = cache_path(cache_dir, text_path);
    let json = std::fs::read_to_string(&cached)
        .with_context(|| format!("No cached tagging for {}", text_path.display()))?;
    TaggedDocument::from_json(&json)
        .with_context(|| format!("Cache file {} is not a tagged document", cached.display()))
}
