//! Submission workflow around the service: store the form entry, read it back
//! by its unique key, verify it, and optionally record the certificate date.

use std::time::{Duration, Instant};

use rayon::prelude::*;

use dobverify_store::{CertificateStore, RecordStore};
use dobverify_types::{CertificateRecord, NewSubmission, Submission, Timestamp};

use crate::{VerificationError, VerificationReport, VerificationService};

#[derive(Clone, Debug, PartialEq)]
pub struct VerificationOutcome {
    /// The stored record that was verified. For a duplicate submission this
    /// is the original record, not the new input.
    pub submission: Submission,
    /// `false` if the store already held this `(name, claimed_dob)`.
    pub inserted: bool,
    pub report: VerificationReport,
    /// Wall time for store round-trip plus verification.
    pub elapsed: Duration,
}

/// Upsert once, fetch once by `(name, claimed_dob)`, verify the fetched record.
pub fn submit_and_verify(
    store: &dyn RecordStore,
    service: &VerificationService,
    draft: &NewSubmission,
) -> Result<VerificationOutcome, VerificationError> {
    let started = Instant::now();
    let upserted = store.upsert(draft)?;
    if !upserted.inserted {
        tracing::info!(user_id = %upserted.user_id, "duplicate submission, verifying stored record");
    }

    let key = draft.key();
    let submission = store
        .fetch(&key)?
        .ok_or_else(|| VerificationError::MissingRecord(key.to_string()))?;

    let report = service.verify_detailed(&submission)?;
    Ok(VerificationOutcome {
        submission,
        inserted: upserted.inserted,
        report,
        elapsed: started.elapsed(),
    })
}

/// Record the extracted certificate date in the `dob_cert` table.
///
/// Returns `false` when nothing was extracted or the date was already recorded.
pub fn record_certificate(
    certificates: &dyn CertificateStore,
    outcome: &VerificationOutcome,
) -> Result<bool, VerificationError> {
    let Some(cert_dob) = outcome.report.extracted.normalized_value else {
        return Ok(false);
    };
    let record = CertificateRecord {
        user_id: outcome.submission.user_id,
        cert_dob,
        cert_name: outcome.submission.certificate_reference.clone(),
        recorded_at: Timestamp::now(),
    };
    Ok(certificates.put_certificate(&record)?)
}

/// Verify independent submissions in parallel. Results keep input order.
pub fn verify_batch(
    store: &dyn RecordStore,
    service: &VerificationService,
    drafts: &[NewSubmission],
) -> Vec<Result<VerificationOutcome, VerificationError>> {
    drafts
        .par_iter()
        .map(|draft| submit_and_verify(store, service, draft))
        .collect()
}
