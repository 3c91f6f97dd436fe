//! Accuracy scoring of a claimed date of birth against an extracted one.

use serde::{Deserialize, Serialize};

use dobverify_types::NormalizedDate;

use crate::DateParser;

/// How two normalized dates are turned into a percentage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    /// 100 when the dates are identical, 0 otherwise.
    #[default]
    Exact,
    /// Year 50, month 25, day 25 points for each matching field.
    FieldWeighted,
}

impl ScoringRule {
    fn score(&self, claimed: NormalizedDate, extracted: NormalizedDate) -> f64 {
        match self {
            Self::Exact => {
                if claimed == extracted {
                    100.0
                } else {
                    0.0
                }
            }
            Self::FieldWeighted => {
                let mut points = 0u32;
                if claimed.year() == extracted.year() {
                    points += 50;
                }
                if claimed.month() == extracted.month() {
                    points += 25;
                }
                if claimed.day() == extracted.day() {
                    points += 25;
                }
                f64::from(points)
            }
        }
    }
}

/// Outcome of comparing a claim with an extracted date.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Assessment {
    /// The claim in canonical form; `None` if it is not a recognised date.
    pub claimed: Option<NormalizedDate>,
    pub accuracy: f64,
    /// Whether both sides name the same calendar date.
    pub matches: bool,
}

/// Stateless scorer; safe to share across threads.
#[derive(Clone, Debug)]
pub struct AccuracyScorer {
    rule: ScoringRule,
    parser: DateParser,
}

impl AccuracyScorer {
    pub fn new(rule: ScoringRule, parser: DateParser) -> Self {
        Self { rule, parser }
    }

    pub fn rule(&self) -> ScoringRule {
        self.rule
    }

    /// Similarity percentage in `[0, 100]` between a claimed date of birth
    /// (any recognised format) and the extractor's normalized output.
    ///
    /// An absent extraction must be handled by the caller; this function
    /// always receives a value. Unrecognised input on either side scores 0.
    pub fn score(&self, claimed_dob: &str, extracted_dob: &str) -> f64 {
        match self.parser.normalize(extracted_dob) {
            Some(extracted) => self.assess(claimed_dob, extracted).accuracy,
            None => {
                tracing::warn!(extracted_dob, "extracted date is not a recognised date");
                0.0
            }
        }
    }

    pub fn assess(&self, claimed_dob: &str, extracted: NormalizedDate) -> Assessment {
        let claimed = self.parser.normalize(claimed_dob);
        let accuracy = claimed.map_or(0.0, |c| self.rule.score(c, extracted));
        Assessment {
            claimed,
            accuracy,
            matches: claimed == Some(extracted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractorConfig;

    fn scorer(rule: ScoringRule) -> AccuracyScorer {
        AccuracyScorer::new(rule, DateParser::new(&ExtractorConfig::default()).unwrap())
    }

    #[test]
    fn exact_same_date_different_formats() {
        let s = scorer(ScoringRule::Exact);
        assert_eq!(s.score("12/05/1990", "1990-05-12"), 100.0);
        assert_eq!(s.score("May 12, 1990", "1990-05-12"), 100.0);
        assert_eq!(s.score("12th May 1990", "12.05.1990"), 100.0);
    }

    #[test]
    fn exact_different_dates_score_zero() {
        let s = scorer(ScoringRule::Exact);
        assert_eq!(s.score("1990-05-12", "1990-05-13"), 0.0);
        assert_eq!(s.score("1990-05-12", "1991-05-12"), 0.0);
    }

    #[test]
    fn unrecognised_inputs_score_zero() {
        let s = scorer(ScoringRule::Exact);
        assert_eq!(s.score("sometime in May", "1990-05-12"), 0.0);
        assert_eq!(s.score("1990-05-12", "garbage"), 0.0);
        let a = s.assess("sometime", NormalizedDate::from_ymd(1990, 5, 12).unwrap());
        assert_eq!(a.claimed, None);
        assert!(!a.matches);
    }

    #[test]
    fn field_weighted_partial_credit() {
        let s = scorer(ScoringRule::FieldWeighted);
        assert_eq!(s.score("1990-05-12", "1990-05-12"), 100.0);
        assert_eq!(s.score("1990-05-12", "1990-05-13"), 75.0);
        assert_eq!(s.score("1990-05-12", "1990-06-13"), 50.0);
        assert_eq!(s.score("1990-05-12", "1991-05-12"), 50.0);
        assert_eq!(s.score("1990-05-12", "1985-01-01"), 0.0);
    }

    #[test]
    fn field_weighted_match_flag_is_exact() {
        let s = scorer(ScoringRule::FieldWeighted);
        let a = s.assess("1990-05-12", NormalizedDate::from_ymd(1990, 5, 13).unwrap());
        assert_eq!(a.accuracy, 75.0);
        assert!(!a.matches);
    }
}
