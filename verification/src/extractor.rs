//! Certificate date extraction.
//!
//! Candidates are found by scanning token windows of up to four tokens joined
//! by short separator gaps (`/`, `-`, `.`, `,`, spaces; at most
//! `ExtractorConfig::separator_width` characters). The longest window that
//! parses wins at each position and scanning resumes after it.
//!
//! When several candidates are found the choice is deterministic:
//! 1. the candidate nearest to a birth-date label, within `label_window`
//!    bytes; at equal distance a date after the label beats one before it;
//! 2. otherwise the first candidate in document order.
//!
//! Remaining ties go to the earlier candidate.

use std::sync::Arc;

use dobverify_types::{ExtractedDate, NormalizedDate};

use crate::config::is_separator_char;
use crate::parser::tokenize;
use crate::{DateParser, ExtractorConfig, TracingObserver, TextSource, VerificationError, VerificationObserver};

const MAX_WINDOW_TOKENS: usize = 4;

/// A date found in document text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateCandidate {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    pub raw_text: String,
    pub date: NormalizedDate,
}

fn is_date_gap(gap: &str, max_len: usize) -> bool {
    let len = gap.chars().count();
    (1..=max_len).contains(&len) && gap.chars().all(is_separator_char)
}

pub struct DateExtractor {
    source: Arc<dyn TextSource>,
    parser: DateParser,
    /// Lower-cased, non-empty labels.
    labels: Vec<String>,
    label_window: usize,
    max_gap: usize,
    observer: Arc<dyn VerificationObserver>,
}

impl DateExtractor {
    pub fn new(source: Arc<dyn TextSource>, config: &ExtractorConfig) -> Result<Self, VerificationError> {
        let parser = DateParser::new(config)?;
        let labels = config
            .labels
            .iter()
            .map(|l| l.trim().to_ascii_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        Ok(Self {
            source,
            parser,
            labels,
            label_window: config.label_window,
            max_gap: config.separator_width(),
            observer: Arc::new(TracingObserver),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn VerificationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn parser(&self) -> &DateParser {
        &self.parser
    }

    /// Read the referenced certificate and return its most probable date.
    ///
    /// Never fails: a text source error or timeout yields an absent date.
    pub fn extract(&self, reference: &str) -> ExtractedDate {
        let text = match self.source.read_text(reference) {
            Ok(text) => text,
            Err(error) => {
                self.observer.source_failed(reference, &error);
                return ExtractedDate::absent();
            }
        };
        let extracted = self.extract_from_text(&text);
        self.observer.date_extracted(reference, &extracted);
        extracted
    }

    /// Pure extraction over already-obtained document text.
    pub fn extract_from_text(&self, text: &str) -> ExtractedDate {
        let candidates = self.candidates(text);
        if candidates.is_empty() {
            return ExtractedDate::absent();
        }
        let labels = self.label_spans(text);
        let chosen = self.select(&candidates, &labels);
        let c = &candidates[chosen];
        ExtractedDate::found(c.raw_text.clone(), c.date)
    }

    /// Every date in the text, in document order, without overlaps.
    pub fn candidates(&self, text: &str) -> Vec<DateCandidate> {
        let tokens = tokenize(text);
        let mut found = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let mut last = i;
            while last + 1 < tokens.len()
                && last + 1 - i < MAX_WINDOW_TOKENS
                && is_date_gap(&text[tokens[last].end..tokens[last + 1].start], self.max_gap)
            {
                last += 1;
            }

            let matched = (i..=last).rev().find_map(|j| {
                self.parser
                    .parse_window(text, &tokens[i..=j])
                    .map(|date| (j, date))
            });

            match matched {
                Some((j, date)) => {
                    let (start, end) = (tokens[i].start, tokens[j].end);
                    found.push(DateCandidate {
                        start,
                        end,
                        raw_text: text[start..end].to_string(),
                        date,
                    });
                    i = j + 1;
                }
                None => i += 1,
            }
        }
        found
    }

    /// Byte spans of label occurrences, on word boundaries.
    fn label_spans(&self, text: &str) -> Vec<(usize, usize)> {
        let lower = text.to_ascii_lowercase();
        let bytes = lower.as_bytes();
        let mut spans = Vec::new();
        for label in &self.labels {
            let step = label.chars().next().map_or(1, char::len_utf8);
            let mut from = 0;
            while let Some(pos) = lower[from..].find(label.as_str()) {
                let start = from + pos;
                let end = start + label.len();
                let open = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
                let close = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
                if open && close {
                    spans.push((start, end));
                }
                from = start + step;
            }
        }
        spans
    }

    /// Index of the chosen candidate; `candidates` must be non-empty.
    fn select(&self, candidates: &[DateCandidate], labels: &[(usize, usize)]) -> usize {
        candidates
            .iter()
            .enumerate()
            .filter_map(|(idx, c)| {
                labels
                    .iter()
                    .filter_map(|&(label_start, label_end)| {
                        // (gap, 0) after a label ranks before (gap, 1) before one.
                        let rank = if c.start >= label_end {
                            (c.start - label_end, 0u8)
                        } else if c.end <= label_start {
                            (label_start - c.end, 1u8)
                        } else {
                            (0, 0u8)
                        };
                        (rank.0 <= self.label_window).then_some(rank)
                    })
                    .min()
                    .map(|rank| (rank, idx))
            })
            .min()
            .map_or(0, |(_, idx)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextSourceError;
    use std::collections::HashMap;

    struct MapSource(HashMap<String, Option<String>>);

    impl TextSource for MapSource {
        fn read_text(&self, reference: &str) -> Result<String, TextSourceError> {
            match self.0.get(reference) {
                Some(Some(text)) => Ok(text.clone()),
                _ => Err(TextSourceError::Failed {
                    reference: reference.to_string(),
                    reason: "unavailable".to_string(),
                }),
            }
        }
    }

    fn extractor() -> DateExtractor {
        let mut docs = HashMap::new();
        docs.insert("good".to_string(), Some("Born on 3rd March 1975".to_string()));
        docs.insert("broken".to_string(), None);
        DateExtractor::new(Arc::new(MapSource(docs)), &ExtractorConfig::default()).unwrap()
    }

    fn iso(text: &str) -> Option<String> {
        extractor()
            .extract_from_text(text)
            .normalized_value
            .map(|d| d.to_string())
    }

    #[test]
    fn label_adjacent_date_wins() {
        let text = "...Date of Birth: 12/05/1990...issued 01/01/2020...";
        let e = extractor().extract_from_text(text);
        assert_eq!(e.raw_text, "12/05/1990");
        assert_eq!(e.normalized_value.unwrap().to_string(), "1990-05-12");
    }

    #[test]
    fn label_later_in_document_still_wins() {
        let text = "Registered 01/01/2020. Child's DOB: 7 June 2011. Issued 02/01/2020.";
        assert_eq!(iso(text).as_deref(), Some("2011-06-07"));
    }

    #[test]
    fn equal_distance_prefers_date_after_label() {
        let text = "Issued 01/01/2020 Date of Birth 12/05/1990";
        assert_eq!(iso(text).as_deref(), Some("1990-05-12"));
    }

    #[test]
    fn nearer_date_before_label_beats_farther_date_after_it() {
        let text = "12/05/1990 (date of birth) issued on 01/01/2020";
        let e = extractor().extract_from_text(text);
        assert_eq!(e.raw_text, "12/05/1990");
        assert_eq!(e.normalized_value.unwrap().to_string(), "1990-05-12");
    }

    #[test]
    fn nearer_date_after_label_beats_farther_date_before_it() {
        let text = "Registered 01/01/2020 at the district office. DOB: 12/05/1990";
        assert_eq!(iso(text).as_deref(), Some("1990-05-12"));
    }

    #[test]
    fn spaced_separators_are_recognised() {
        let e = extractor().extract_from_text("DOB: 12 / 05 / 1990");
        assert_eq!(e.raw_text, "12 / 05 / 1990");
        assert_eq!(e.normalized_value.unwrap().to_string(), "1990-05-12");
    }

    #[test]
    fn separator_limit_is_configurable() {
        let narrow = DateExtractor::new(
            Arc::new(MapSource(HashMap::new())),
            &ExtractorConfig {
                max_separator_len: 1,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(narrow.extract_from_text("DOB: 12 / 05 / 1990").is_absent());

        let spaced_pattern = DateExtractor::new(
            Arc::new(MapSource(HashMap::new())),
            &ExtractorConfig {
                patterns: vec!["%d  /  %m  /  %Y".to_string()],
                ..Default::default()
            },
        )
        .unwrap();
        let e = spaced_pattern.extract_from_text("born 12  /  05  /  1990");
        assert_eq!(e.normalized_value.unwrap().to_string(), "1990-05-12");
    }

    #[test]
    fn date_before_label_used_when_nothing_follows() {
        let text = "Registered 01/01/2020. 12/05/1990 (date of birth)";
        assert_eq!(iso(text).as_deref(), Some("1990-05-12"));
    }

    #[test]
    fn first_date_without_labels() {
        let text = "Registered 01/01/2020, copy printed 02/02/2021";
        assert_eq!(iso(text).as_deref(), Some("2020-01-01"));
    }

    #[test]
    fn far_label_is_ignored() {
        let filler = "x ".repeat(100);
        let text = format!("Date of birth {filler} 01/01/2020 then 02/02/2021");
        assert_eq!(iso(&text).as_deref(), Some("2020-01-01"));
    }

    #[test]
    fn label_must_be_a_whole_word() {
        // "adobe" contains "dob" but is not the DOB label.
        let text = "Registered 01/01/2020 in Adobe 05/05/2005";
        assert_eq!(iso(text).as_deref(), Some("2020-01-01"));
    }

    #[test]
    fn spelled_month_with_ordinal() {
        let e = extractor().extract_from_text("Certificate: 13th May 1990");
        assert_eq!(e.raw_text, "13th May 1990");
        assert_eq!(e.normalized_value.unwrap().to_string(), "1990-05-13");
    }

    #[test]
    fn absent_for_empty_noise_and_malformed() {
        assert_eq!(iso(""), None);
        assert_eq!(iso("no dates in here at all"), None);
        assert_eq!(iso("Date of Birth: 32/05/1990"), None);
        assert_eq!(iso("\u{FFFD}\u{FFFD}\0\0 %%%% ////"), None);
    }

    #[test]
    fn candidates_are_in_document_order() {
        let e = extractor();
        let found = e.candidates("a 1990-05-12 b May 3, 2001 c 04.07.1976");
        let dates: Vec<String> = found.iter().map(|c| c.date.to_string()).collect();
        assert_eq!(dates, vec!["1990-05-12", "2001-05-03", "1976-07-04"]);
        assert!(found.windows(2).all(|w| w[0].end <= w[1].start));
    }

    #[test]
    fn extract_reads_through_source() {
        let e = extractor().extract("good");
        assert_eq!(e.normalized_value.unwrap().to_string(), "1975-03-03");
    }

    #[test]
    fn source_failure_is_absent() {
        assert!(extractor().extract("broken").is_absent());
        assert!(extractor().extract("missing").is_absent());
    }
}
