//! Telemetry hooks for the pipeline.
//!
//! Components receive an observer instead of logging through process-wide
//! state, so tests can capture exactly what a verification reported.

use std::time::Duration;

use dobverify_types::{ExtractedDate, Submission, VerificationResult};

use crate::TextSourceError;

pub trait VerificationObserver: Send + Sync {
    /// The text source failed or timed out; the document counts as unreadable.
    fn source_failed(&self, reference: &str, error: &TextSourceError);

    /// Extraction finished (the date may be absent).
    fn date_extracted(&self, reference: &str, extracted: &ExtractedDate);

    /// A verification reached its terminal state.
    fn verdict_reached(&self, submission: &Submission, result: &VerificationResult, elapsed: Duration);
}

/// Forwards every event to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl VerificationObserver for TracingObserver {
    fn source_failed(&self, reference: &str, error: &TextSourceError) {
        tracing::warn!(reference, %error, "certificate text unavailable");
    }

    fn date_extracted(&self, reference: &str, extracted: &ExtractedDate) {
        match &extracted.normalized_value {
            Some(date) => tracing::debug!(
                reference,
                raw = %extracted.raw_text,
                date = %date,
                "extracted certificate date"
            ),
            None => tracing::info!(reference, "no date found in certificate"),
        }
    }

    fn verdict_reached(&self, submission: &Submission, result: &VerificationResult, elapsed: Duration) {
        tracing::info!(
            user_id = %submission.user_id,
            verdict = %result.verdict,
            accuracy = ?result.accuracy,
            elapsed_ms = elapsed.as_millis() as u64,
            "verification complete"
        );
    }
}
