//! The verification service: extraction, scoring and verdict for one
//! submission at a time.

use std::sync::Arc;
use std::time::Instant;

use dobverify_types::{ExtractedDate, NormalizedDate, Submission, VerificationResult};

use crate::{
    AccuracyScorer, DateExtractor, ExtractorConfig, PendingVerification, ScoringConfig,
    TextSource, TracingObserver, VerificationError, VerificationObserver,
};

/// Everything a verification produced, for callers that persist or display
/// more than the verdict.
#[derive(Clone, Debug, PartialEq)]
pub struct VerificationReport {
    pub result: VerificationResult,
    pub extracted: ExtractedDate,
    /// The claimed date in canonical form, if it was recognised and a date
    /// was extracted to compare it with.
    pub claimed: Option<NormalizedDate>,
}

/// Runs the pipeline. Holds no mutable state and never persists anything, so
/// one service can verify independent submissions from many threads.
pub struct VerificationService {
    extractor: DateExtractor,
    scorer: AccuracyScorer,
    observer: Arc<dyn VerificationObserver>,
}

impl VerificationService {
    pub fn new(extractor: DateExtractor, scorer: AccuracyScorer) -> Self {
        Self {
            extractor,
            scorer,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Build the extractor and scorer from configuration.
    pub fn from_config(
        source: Arc<dyn TextSource>,
        extraction: &ExtractorConfig,
        scoring: &ScoringConfig,
    ) -> Result<Self, VerificationError> {
        let extractor = DateExtractor::new(source, extraction)?;
        let scorer = AccuracyScorer::new(scoring.rule, extractor.parser().clone());
        Ok(Self::new(extractor, scorer))
    }

    /// Route extractor and service events to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn VerificationObserver>) -> Self {
        self.extractor = self.extractor.with_observer(Arc::clone(&observer));
        self.observer = observer;
        self
    }

    pub fn extractor(&self) -> &DateExtractor {
        &self.extractor
    }

    pub fn scorer(&self) -> &AccuracyScorer {
        &self.scorer
    }

    /// Verify a submission's claimed date of birth against its certificate.
    ///
    /// A submission with a blank field is rejected with
    /// [`VerificationError::InvalidInput`] before the certificate is read.
    pub fn verify(
        &self,
        submission: &Submission,
    ) -> Result<VerificationResult, VerificationError> {
        Ok(self.verify_detailed(submission)?.result)
    }

    /// Like [`verify`](Self::verify), also returning the extracted date.
    pub fn verify_detailed(
        &self,
        submission: &Submission,
    ) -> Result<VerificationReport, VerificationError> {
        let started = Instant::now();
        let pending = PendingVerification::new(submission)?;
        let extracted = self.extractor.extract(pending.certificate_reference());

        let (result, claimed) = match extracted.normalized_value {
            None => (pending.unreadable(), None),
            Some(date) => {
                let assessment = self.scorer.assess(&submission.claimed_dob, date);
                (pending.resolve(&assessment), assessment.claimed)
            }
        };

        self.observer
            .verdict_reached(submission, &result, started.elapsed());
        Ok(VerificationReport {
            result,
            extracted,
            claimed,
        })
    }
}
