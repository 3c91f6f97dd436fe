//! Pipeline configuration, deserialized from the `[extraction]`, `[scoring]`
//! and `[text_source]` tables of the app config.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scorer::ScoringRule;
use crate::text_source::{CommandTextSource, FileTextSource, TextSource};
use crate::VerificationError;

/// Date recognition settings.
///
/// `patterns` are chrono format strings tried in order against each candidate
/// substring; the first that parses wins. `%B` also accepts abbreviated and
/// lower-case month names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// Captions that mark the date of birth, matched case-insensitively on
    /// word boundaries.
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,

    /// Maximum distance in bytes between a label and a date for the date to
    /// count as the labelled one.
    #[serde(default = "default_label_window")]
    pub label_window: usize,

    /// Parsed dates outside `[min_year, max_year]` are ignored.
    #[serde(default = "default_min_year")]
    pub min_year: i32,

    #[serde(default = "default_max_year")]
    pub max_year: i32,

    /// Longest run of separator characters (spaces, `/`, `-`, `.`, `,`)
    /// allowed between the parts of one date, so `12 / 05 / 1990` needs 3.
    /// Raised automatically to the widest separator in `patterns`.
    #[serde(default = "default_max_separator_len")]
    pub max_separator_len: usize,
}

/// Characters that may separate the day, month and year of a date.
pub(crate) fn is_separator_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '/' | '-' | '.' | ',')
}

/// Widest run of separator characters between two fields of a chrono
/// pattern, e.g. 2 for `%B %d, %Y`.
fn pattern_separator_width(pattern: &str) -> usize {
    let mut widest = 0;
    let mut run = 0;
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            // Skip the specifier and an optional padding flag.
            if let Some(next) = chars.next() {
                if matches!(next, '-' | '_' | '0') {
                    chars.next();
                }
            }
            run = 0;
        } else if is_separator_char(c) {
            run += 1;
            widest = widest.max(run);
        } else {
            run = 0;
        }
    }
    widest
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_patterns() -> Vec<String> {
    [
        "%d/%m/%Y",
        "%d.%m.%Y",
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m-%d-%Y",
        "%d-%m-%Y",
        "%d %B %Y",
        "%d %B, %Y",
        "%d-%B-%Y",
        "%B %d, %Y",
        "%B %d %Y",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

fn default_labels() -> Vec<String> {
    ["date of birth", "birth date", "d.o.b", "dob", "born on", "born"]
        .iter()
        .map(|l| l.to_string())
        .collect()
}

fn default_label_window() -> usize {
    64
}

fn default_min_year() -> i32 {
    1800
}

fn default_max_year() -> i32 {
    2100
}

fn default_max_separator_len() -> usize {
    3
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            labels: default_labels(),
            label_window: default_label_window(),
            min_year: default_min_year(),
            max_year: default_max_year(),
            max_separator_len: default_max_separator_len(),
        }
    }
}

impl ExtractorConfig {
    pub fn validate(&self) -> Result<(), VerificationError> {
        if self.patterns.iter().all(|p| p.trim().is_empty()) {
            return Err(VerificationError::Config(
                "extraction.patterns must contain at least one date pattern".to_string(),
            ));
        }
        if self.min_year > self.max_year {
            return Err(VerificationError::Config(format!(
                "extraction.min_year ({}) is after max_year ({})",
                self.min_year, self.max_year
            )));
        }
        if self.max_separator_len == 0 {
            return Err(VerificationError::Config(
                "extraction.max_separator_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Separator width the extractor actually allows: the configured limit,
    /// or more if a pattern has a wider separator.
    pub fn separator_width(&self) -> usize {
        self.patterns
            .iter()
            .map(|p| pattern_separator_width(p.trim()))
            .fold(self.max_separator_len, usize::max)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub rule: ScoringRule,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSourceKind {
    /// The certificate reference names a text file (e.g. a saved OCR transcript).
    #[default]
    File,
    /// An external program turns the referenced document into text.
    Command,
}

/// How certificate text is obtained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSourceConfig {
    #[serde(default)]
    pub kind: TextSourceKind,

    /// Relative certificate references are resolved against this directory.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    /// Program to run for `kind = "command"`, e.g. `"tesseract"`.
    #[serde(default)]
    pub program: Option<String>,

    /// Program arguments; `{input}` is replaced by the document path.
    #[serde(default = "default_command_args")]
    pub args: Vec<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_command_args() -> Vec<String> {
    vec!["{input}".to_string(), "stdout".to_string()]
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for TextSourceConfig {
    fn default() -> Self {
        Self {
            kind: TextSourceKind::File,
            base_dir: None,
            program: None,
            args: default_command_args(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TextSourceConfig {
    /// Build the configured text source.
    pub fn build(&self) -> Result<Arc<dyn TextSource>, VerificationError> {
        match self.kind {
            TextSourceKind::File => Ok(Arc::new(FileTextSource::new(self.base_dir.clone()))),
            TextSourceKind::Command => {
                let program = self.program.clone().ok_or_else(|| {
                    VerificationError::Config(
                        "text_source.program is required for kind = \"command\"".to_string(),
                    )
                })?;
                if self.timeout_secs == 0 {
                    return Err(VerificationError::Config(
                        "text_source.timeout_secs must be positive".to_string(),
                    ));
                }
                Ok(Arc::new(
                    CommandTextSource::new(
                        program,
                        self.args.clone(),
                        Duration::from_secs(self.timeout_secs),
                    )
                    .with_base_dir(self.base_dir.clone()),
                ))
            }
        }
    }
}
