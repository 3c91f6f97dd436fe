//! Verification state machine.
//!
//! `PENDING -> { VERIFIED, MISMATCH, UNREADABLE }`. A [`PendingVerification`]
//! is consumed by exactly one transition, so a verification cannot reach two
//! verdicts or leave the pending state twice.

use dobverify_types::{DobError, Submission, VerificationResult};

use crate::Assessment;

/// A verification that has not reached a verdict yet.
#[derive(Debug)]
pub struct PendingVerification<'a> {
    submission: &'a Submission,
}

impl<'a> PendingVerification<'a> {
    /// Start a verification. Submissions with a blank field never reach
    /// the pending state.
    pub fn new(submission: &'a Submission) -> Result<Self, DobError> {
        submission.validate()?;
        Ok(Self { submission })
    }

    pub fn submission(&self) -> &'a Submission {
        self.submission
    }

    pub fn certificate_reference(&self) -> &'a str {
        &self.submission.certificate_reference
    }

    /// No date could be extracted.
    pub fn unreadable(self) -> VerificationResult {
        VerificationResult::unreadable()
    }

    /// A date was extracted and scored.
    pub fn resolve(self, assessment: &Assessment) -> VerificationResult {
        if assessment.matches {
            VerificationResult::verified(assessment.accuracy)
        } else {
            VerificationResult::mismatch(assessment.accuracy)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dobverify_types::{NormalizedDate, UserId, Verdict};

    fn submission() -> Submission {
        Submission {
            user_id: UserId::new(1),
            name: "Asha".to_string(),
            claimed_dob: "1990-05-12".to_string(),
            certificate_reference: "asha.txt".to_string(),
        }
    }

    #[test]
    fn matching_assessment_verifies() {
        let sub = submission();
        let date = NormalizedDate::from_ymd(1990, 5, 12);
        let result = PendingVerification::new(&sub).unwrap().resolve(&Assessment {
            claimed: date,
            accuracy: 100.0,
            matches: true,
        });
        assert_eq!(result.verdict, Verdict::Verified);
        assert_eq!(result.accuracy, Some(100.0));
    }

    #[test]
    fn non_matching_assessment_is_mismatch_even_with_partial_credit() {
        let sub = submission();
        let result = PendingVerification::new(&sub).unwrap().resolve(&Assessment {
            claimed: NormalizedDate::from_ymd(1990, 5, 12),
            accuracy: 75.0,
            matches: false,
        });
        assert_eq!(result.verdict, Verdict::Mismatch);
        assert_eq!(result.accuracy, Some(75.0));
    }

    #[test]
    fn unreadable_has_no_accuracy() {
        let sub = submission();
        let pending = PendingVerification::new(&sub).unwrap();
        assert_eq!(pending.certificate_reference(), "asha.txt");
        let result = pending.unreadable();
        assert_eq!(result.verdict, Verdict::Unreadable);
        assert_eq!(result.accuracy, None);
    }

    #[test]
    fn blank_field_never_becomes_pending() {
        let mut sub = submission();
        sub.claimed_dob = "  ".to_string();
        assert_eq!(
            PendingVerification::new(&sub).unwrap_err(),
            DobError::MissingField("date_of_birth")
        );
    }
}
