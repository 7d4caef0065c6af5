// SigEff — log-likelihood keyness via the external SigEff binary.
//
// SigEff reads a `word target reference` table (first row `Total ...`) on
// stdin and writes one row of statistics per word. The columns used here:
//
//   0 word    1 target frequency    2 target relative frequency (%)
//   5 `+` if more frequent in the target than the reference, else `-`
//   6 log-likelihood    11 log ratio
//
// The binary is invoked as `sigeff -X <semtag summary> < input > output`
// with both files held as temporaries for the duration of the call.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::frequency::{at_least, restrict_to, total, FrequencyTable};

/// Minimum number of whitespace separated fields in a SigEff output row.
pub const MIN_OUTPUT_FIELDS: usize = 13;

/// Default minimum target frequency for a word/tag to be tested.
pub const DEFAULT_MIN_FREQUENCY: u64 = 5;

#[derive(Debug, Error)]
pub enum SigEffError {
    #[error("number of fields on line {line} is {fields} when it should be at least 13")]
    MalformedRow { line: usize, fields: usize },

    #[error("line {line} field {field} is not a number: {value:?}")]
    InvalidNumber {
        line: usize,
        field: usize,
        value: String,
    },

    #[error("SigEff binary {binary} could not be resolved: {source}")]
    NotFound {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run SigEff binary {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("SigEff temporary file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported significance levels and their log-likelihood critical values
/// (one degree of freedom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignificanceLevel {
    /// p < 0.05
    #[default]
    P05,
    /// p < 0.01
    P01,
    /// p < 0.001
    P001,
    /// p < 0.0001
    P0001,
}

impl SignificanceLevel {
    pub const ALL: [SignificanceLevel; 4] = [Self::P05, Self::P01, Self::P001, Self::P0001];

    /// Log-likelihood value a row must reach to be significant at this level.
    pub fn critical_value(self) -> f64 {
        match self {
            Self::P05 => 3.84,
            Self::P01 => 6.63,
            Self::P001 => 10.83,
            Self::P0001 => 15.13,
        }
    }

    pub fn p_value(self) -> f64 {
        match self {
            Self::P05 => 0.05,
            Self::P01 => 0.01,
            Self::P001 => 0.001,
            Self::P0001 => 0.0001,
        }
    }
}

impl fmt::Display for SignificanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.p_value())
    }
}

impl FromStr for SignificanceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| format!("{s:?} is not a number"))?;
        Self::ALL
            .into_iter()
            .find(|level| (level.p_value() - value).abs() < 1e-12)
            .ok_or_else(|| {
                format!("significance level must be one of 0.05, 0.01, 0.001, 0.0001 (got {s})")
            })
    }
}

/// Keyness statistics for one word/tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignificanceRecord {
    #[serde(rename = "Log Likelihood")]
    pub log_likelihood: f64,
    #[serde(rename = "Log Ratio")]
    pub log_ratio: f64,
    #[serde(rename = "Frequency")]
    pub frequency: u64,
    #[serde(rename = "Relative Frequency (%)")]
    pub relative_frequency: f64,
}

/// Build SigEff's input table.
///
/// Target entries below `min_frequency` are dropped, and the reference is
/// restricted to the remaining target words. Words missing from the
/// reference get a reference frequency of 0.
pub fn format_input(
    target: &FrequencyTable,
    reference: &FrequencyTable,
    min_frequency: u64,
) -> String {
    let target = at_least(target, min_frequency);
    let reference = restrict_to(reference, &target);

    let mut out = format!("Total\t{}\t{}\n", total(&target), total(&reference));
    for (word, target_frequency) in &target {
        let reference_frequency = reference.get(word).copied().unwrap_or(0);
        out.push_str(&format!("{word}\t{target_frequency}\t{reference_frequency}\n"));
    }
    out
}

fn parse_field<T: FromStr>(fields: &[&str], field: usize, line: usize) -> Result<T, SigEffError> {
    fields[field]
        .parse()
        .map_err(|_| SigEffError::InvalidNumber {
            line,
            field,
            value: fields[field].to_string(),
        })
}

/// Parse SigEff output, keeping words significantly more frequent in the
/// target corpus at `level`.
///
/// The first two lines (total and column headers) are skipped, as are blank
/// lines. Any other row with fewer than 13 fields is an error.
pub fn parse_output(
    output: &str,
    level: SignificanceLevel,
) -> Result<BTreeMap<String, SignificanceRecord>, SigEffError> {
    let critical = level.critical_value();
    let mut significant = BTreeMap::new();

    for (index, line) in output.lines().enumerate().skip(2) {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_OUTPUT_FIELDS {
            return Err(SigEffError::MalformedRow {
                line: line_number,
                fields: fields.len(),
            });
        }
        if fields[5] != "+" {
            continue;
        }
        let log_likelihood: f64 = parse_field(&fields, 6, line_number)?;
        if log_likelihood < critical {
            continue;
        }
        let record = SignificanceRecord {
            log_likelihood,
            log_ratio: parse_field(&fields, 11, line_number)?,
            frequency: parse_field(&fields, 1, line_number)?,
            relative_frequency: parse_field(&fields, 2, line_number)?,
        };
        significant.insert(fields[0].to_string(), record);
    }
    Ok(significant)
}

/// Handle to the SigEff binary and the tag summary file it reads.
#[derive(Debug, Clone)]
pub struct SigEff {
    binary: PathBuf,
    semtag_summary: PathBuf,
}

impl SigEff {
    /// The binary path is resolved to an absolute path, so a bare relative
    /// name runs the file in the current directory rather than a `PATH` match.
    pub fn new(
        binary: impl AsRef<Path>,
        semtag_summary: impl Into<PathBuf>,
    ) -> Result<Self, SigEffError> {
        let binary = binary.as_ref();
        let resolved = std::fs::canonicalize(binary).map_err(|source| SigEffError::NotFound {
            binary: binary.display().to_string(),
            source,
        })?;
        Ok(Self {
            binary: resolved,
            semtag_summary: semtag_summary.into(),
        })
    }

    /// Run SigEff on `input`, returning its raw output.
    pub fn run(&self, input: &str) -> Result<String, SigEffError> {
        let mut input_file = tempfile::NamedTempFile::new()?;
        input_file.write_all(input.as_bytes())?;
        input_file.flush()?;
        let output_file = tempfile::NamedTempFile::new()?;

        debug!(
            binary = %self.binary.display(),
            input = %input_file.path().display(),
            "Running SigEff"
        );
        let status = Command::new(&self.binary)
            .arg("-X")
            .arg(&self.semtag_summary)
            .stdin(Stdio::from(input_file.reopen()?))
            .stdout(Stdio::from(output_file.reopen()?))
            .status()
            .map_err(|source| SigEffError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;
        if !status.success() {
            warn!(status = %status, "SigEff exited unsuccessfully, parsing its output anyway");
        }

        Ok(std::fs::read_to_string(output_file.path())?)
    }

    /// Words/tags of `target` significantly more frequent than in `reference`.
    pub fn extract(
        &self,
        target: &FrequencyTable,
        reference: &FrequencyTable,
        level: SignificanceLevel,
        min_frequency: u64,
    ) -> Result<BTreeMap<String, SignificanceRecord>, SigEffError> {
        let input = format_input(target, reference, min_frequency);
        let output = self.run(&input)?;
        let significant = parse_output(&output, level)?;
        info!(
            candidates = input.lines().count().saturating_sub(1),
            significant = significant.len(),
            level = %level,
            "Extracted significant keywords"
        );
        Ok(significant)
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}
