//! Certificate metadata storage trait (the `dob_cert` table).

use dobverify_types::{CertificateRecord, UserId};

use crate::StoreError;

/// Trait for storing dates read from candidates' certificates.
pub trait CertificateStore: Send + Sync {
    /// Record a certificate date. Idempotent on `(user_id, cert_dob)`:
    /// returns `false` if the pair was already recorded.
    ///
    /// Returns [`StoreError::NotFound`] if `user_id` has no submission.
    fn put_certificate(&self, record: &CertificateRecord) -> Result<bool, StoreError>;

    /// All certificate records for a submission, ordered by date.
    fn get_certificates(&self, user_id: UserId) -> Result<Vec<CertificateRecord>, StoreError>;
}
