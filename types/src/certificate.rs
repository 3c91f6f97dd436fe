//! Certificate metadata recorded against a submission.

use serde::{Deserialize, Serialize};

use crate::{NormalizedDate, Timestamp, UserId};

/// One row of the `dob_cert` table: the date read from a candidate's
/// certificate, linked to the submission by `user_id`.
///
/// `(user_id, cert_dob)` is unique.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub user_id: UserId,
    pub cert_dob: NormalizedDate,
    /// The certificate reference the date was read from.
    pub cert_name: String,
    pub recorded_at: Timestamp,
}

impl CertificateRecord {
    /// Composite key `user_id_be ++ iso_date`.
    pub fn key_bytes(&self) -> Vec<u8> {
        let mut key = self.user_id.to_be_bytes().to_vec();
        key.extend_from_slice(self.cert_dob.to_string().as_bytes());
        key
    }
}
