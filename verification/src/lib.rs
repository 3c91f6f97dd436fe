//! Date-of-birth verification pipeline.
//!
//! 1. **Extraction**: read a certificate's text through a [`TextSource`] and
//!    pick the most probable date of birth out of it ([`DateExtractor`]).
//! 2. **Scoring**: compare the claimed date with the extracted one
//!    ([`AccuracyScorer`]).
//! 3. **Verdict**: [`VerificationService`] runs both steps and resolves a
//!    pending verification to `VERIFIED`, `MISMATCH` or `UNREADABLE`.
//!
//! Every expected failure (empty documents, unreadable files, a timed-out
//! text extractor) ends as an `UNREADABLE` verdict rather than an error.

pub mod config;
pub mod error;
pub mod extractor;
pub mod observer;
pub mod parser;
pub mod scorer;
pub mod service;
pub mod state;
pub mod text_source;
pub mod workflow;

pub use config::{ExtractorConfig, ScoringConfig, TextSourceConfig, TextSourceKind};
pub use error::VerificationError;
pub use extractor::{DateCandidate, DateExtractor};
pub use observer::{TracingObserver, VerificationObserver};
pub use parser::DateParser;
pub use scorer::{AccuracyScorer, Assessment, ScoringRule};
pub use service::{VerificationReport, VerificationService};
pub use state::PendingVerification;
pub use text_source::{CommandTextSource, FileTextSource, TextSource, TextSourceError};
pub use workflow::{record_certificate, submit_and_verify, verify_batch, VerificationOutcome};
