//! Verification verdicts and results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal outcome of a verification attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// The certificate date equals the claimed date of birth.
    Verified,
    /// A date was found but differs from the claim.
    Mismatch,
    /// No date could be extracted from the certificate.
    Unreadable,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "VERIFIED",
            Self::Mismatch => "MISMATCH",
            Self::Unreadable => "UNREADABLE",
        }
    }

    /// Whether the verdict carries an accuracy score.
    pub fn is_scored(&self) -> bool {
        !matches!(self, Self::Unreadable)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of one `verify` call. Owned by the caller; never persisted by
/// the verification core.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verdict: Verdict,
    /// Similarity percentage in `[0, 100]`; `None` only for `Unreadable`.
    pub accuracy: Option<f64>,
}

impl VerificationResult {
    pub fn unreadable() -> Self {
        Self {
            verdict: Verdict::Unreadable,
            accuracy: None,
        }
    }

    /// A matching date; `accuracy` is clamped into `[0, 100]`.
    pub fn verified(accuracy: f64) -> Self {
        Self {
            verdict: Verdict::Verified,
            accuracy: Some(accuracy.clamp(0.0, 100.0)),
        }
    }

    /// A differing date; `accuracy` is clamped into `[0, 100]`.
    pub fn mismatch(accuracy: f64) -> Self {
        Self {
            verdict: Verdict::Mismatch,
            accuracy: Some(accuracy.clamp(0.0, 100.0)),
        }
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.accuracy {
            Some(acc) => write!(f, "{} ({acc:.0}%)", self.verdict),
            None => write!(f, "{}", self.verdict),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_has_no_accuracy() {
        let r = VerificationResult::unreadable();
        assert_eq!(r.verdict, Verdict::Unreadable);
        assert_eq!(r.accuracy, None);
        assert_eq!(r.to_string(), "UNREADABLE");
    }

    #[test]
    fn scored_results_clamp_accuracy() {
        assert_eq!(VerificationResult::mismatch(120.0).accuracy, Some(100.0));
        assert_eq!(VerificationResult::mismatch(-3.0).accuracy, Some(0.0));
        let r = VerificationResult::verified(100.0);
        assert_eq!(r.verdict, Verdict::Verified);
        assert_eq!(r.to_string(), "VERIFIED (100%)");
    }
}
