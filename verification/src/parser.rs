//! Date normalization shared by extraction and scoring.
//!
//! Text is split into tokens (maximal runs of alphanumeric characters). A
//! date candidate is a short run of tokens whose gaps look like date
//! separators; it is normalized by stripping ordinal suffixes (`13th` -> `13`)
//! and trying each configured chrono pattern in order.

use chrono::NaiveDate;

use dobverify_types::NormalizedDate;

use crate::{ExtractorConfig, VerificationError};

/// Byte span of one alphanumeric run in the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub start: usize,
    pub end: usize,
}

pub(crate) fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        if c.is_alphanumeric() {
            start.get_or_insert(i);
        } else if let Some(s) = start.take() {
            tokens.push(Token { start: s, end: i });
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            start: s,
            end: text.len(),
        });
    }
    tokens
}

/// `1st`, `22nd`, `3rd`, `13th` -> the bare number; anything else unchanged.
fn strip_ordinal(token: &str) -> &str {
    if token.len() < 3 || !token.is_ascii() {
        return token;
    }
    let (digits, suffix) = token.split_at(token.len() - 2);
    let is_ordinal = matches!(
        suffix.to_ascii_lowercase().as_str(),
        "st" | "nd" | "rd" | "th"
    );
    if is_ordinal && digits.bytes().all(|b| b.is_ascii_digit()) {
        digits
    } else {
        token
    }
}

/// Rebuild the text covered by `tokens` (which must be contiguous in `text`),
/// with ordinal suffixes removed and the original gaps kept.
///
/// With `compact`, whitespace is dropped from gaps that also hold
/// punctuation, so `12 / 05 / 1990` becomes `12/05/1990`.
pub(crate) fn clean_window(text: &str, tokens: &[Token], compact: bool) -> String {
    let mut out = String::new();
    for (idx, tok) in tokens.iter().enumerate() {
        if idx > 0 {
            let gap = &text[tokens[idx - 1].end..tok.start];
            if compact && gap.chars().any(|c| !c.is_whitespace()) {
                out.extend(gap.chars().filter(|c| !c.is_whitespace()));
            } else {
                out.push_str(gap);
            }
        }
        out.push_str(strip_ordinal(&text[tok.start..tok.end]));
    }
    out
}

/// Parses date strings written in any of the configured formats.
#[derive(Clone, Debug)]
pub struct DateParser {
    patterns: Vec<String>,
    min_year: i32,
    max_year: i32,
}

impl DateParser {
    pub fn new(config: &ExtractorConfig) -> Result<Self, VerificationError> {
        config.validate()?;
        Ok(Self {
            patterns: config
                .patterns
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            min_year: config.min_year,
            max_year: config.max_year,
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    fn in_range(&self, date: NaiveDate) -> bool {
        let year = NormalizedDate::new(date).year();
        (self.min_year..=self.max_year).contains(&year)
    }

    /// Parse the text covered by `tokens`, first with its gaps as written,
    /// then with spaced punctuation compacted.
    pub(crate) fn parse_window(&self, text: &str, tokens: &[Token]) -> Option<NormalizedDate> {
        let verbatim = clean_window(text, tokens, false);
        self.parse_candidate(&verbatim).or_else(|| {
            let compacted = clean_window(text, tokens, true);
            (compacted != verbatim)
                .then(|| self.parse_candidate(&compacted))
                .flatten()
        })
    }

    /// Parse an already-cleaned candidate; the whole string must match one
    /// pattern. The first pattern (in configured order) that yields an
    /// in-range date wins.
    fn parse_candidate(&self, cleaned: &str) -> Option<NormalizedDate> {
        self.patterns.iter().find_map(|pattern| {
            NaiveDate::parse_from_str(cleaned, pattern)
                .ok()
                .filter(|d| self.in_range(*d))
                .map(NormalizedDate::new)
        })
    }

    /// Normalize a complete date string such as a claimed date of birth.
    ///
    /// ISO `YYYY-MM-DD` is always accepted, whatever the pattern set.
    /// Surrounding punctuation is ignored. Returns `None` for anything that
    /// is not a real calendar date in one of the formats.
    pub fn normalize(&self, text: &str) -> Option<NormalizedDate> {
        let trimmed = text.trim();
        if let Ok(date) = NormalizedDate::parse_iso(trimmed) {
            if self.in_range(date.as_naive()) {
                return Some(date);
            }
        }
        let tokens = tokenize(trimmed);
        if tokens.is_empty() {
            return None;
        }
        self.parse_window(trimmed, &tokens)
    }
}
