//! Nullable observer: records pipeline events for assertions.

use std::sync::Mutex;
use std::time::Duration;

use dobverify_types::{ExtractedDate, Submission, UserId, VerificationResult};
use dobverify_verification::{TextSourceError, VerificationObserver};

#[derive(Clone, Debug, PartialEq)]
pub enum ObservedEvent {
    SourceFailed { reference: String, error: String },
    DateExtracted { reference: String, extracted: ExtractedDate },
    VerdictReached { user_id: UserId, result: VerificationResult },
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: ObservedEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl VerificationObserver for RecordingObserver {
    fn source_failed(&self, reference: &str, error: &TextSourceError) {
        self.push(ObservedEvent::SourceFailed {
            reference: reference.to_string(),
            error: error.to_string(),
        });
    }

    fn date_extracted(&self, reference: &str, extracted: &ExtractedDate) {
        self.push(ObservedEvent::DateExtracted {
            reference: reference.to_string(),
            extracted: extracted.clone(),
        });
    }

    fn verdict_reached(&self, submission: &Submission, result: &VerificationResult, _elapsed: Duration) {
        self.push(ObservedEvent::VerdictReached {
            user_id: submission.user_id,
            result: *result,
        });
    }
}
