//! Fundamental types for dobverify.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! submissions and their unique keys, normalized dates, extraction results,
//! verdicts, certificate records and timestamps.

pub mod certificate;
pub mod date;
pub mod error;
pub mod submission;
pub mod time;
pub mod verdict;

pub use certificate::CertificateRecord;
pub use date::{ExtractedDate, NormalizedDate};
pub use error::DobError;
pub use submission::{NewSubmission, Submission, SubmissionKey, UserId};
pub use time::Timestamp;
pub use verdict::{VerificationResult, Verdict};
