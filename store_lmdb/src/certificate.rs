//! LMDB implementation of CertificateStore (the `dob_cert` table).
//!
//! Records use composite keys `user_id_be ++ iso_date`, so listing a user's
//! certificates is a prefix range-scan and `(user_id, cert_dob)` is unique.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use dobverify_store::{CertificateStore, StoreError};
use dobverify_types::{CertificateRecord, UserId};

use crate::{decode, encode, increment_prefix, LmdbError};

pub struct LmdbCertificateStore {
    pub(crate) env: Arc<Env>,
    pub(crate) form_db: Database<Bytes, Bytes>,
    pub(crate) dob_cert_db: Database<Bytes, Bytes>,
}

impl CertificateStore for LmdbCertificateStore {
    fn put_certificate(&self, record: &CertificateRecord) -> Result<bool, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let owner = self
            .form_db
            .get(&wtxn, &record.user_id.to_be_bytes())
            .map_err(LmdbError::from)?;
        if owner.is_none() {
            return Err(LmdbError::NotFound(format!("user {}", record.user_id)).into());
        }

        let key = record.key_bytes();
        if self
            .dob_cert_db
            .get(&wtxn, &key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Ok(false);
        }
        self.dob_cert_db
            .put(&mut wtxn, &key, &encode(record)?)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::debug!(user_id = %record.user_id, cert_dob = %record.cert_dob, "recorded certificate date");
        Ok(true)
    }

    fn get_certificates(&self, user_id: UserId) -> Result<Vec<CertificateRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = user_id.to_be_bytes();
        let mut upper = prefix.to_vec();
        increment_prefix(&mut upper);
        let upper_bound = if upper.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(upper.as_slice())
        };
        let bounds = (Bound::Included(&prefix[..]), upper_bound);

        let iter = self
            .dob_cert_db
            .range(&rtxn, &bounds)
            .map_err(LmdbError::from)?;
        let mut records = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            records.push(decode::<CertificateRecord>(val)?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use dobverify_store::RecordStore;
    use dobverify_types::{NewSubmission, NormalizedDate, Timestamp};

    fn record(user_id: UserId, day: u32) -> CertificateRecord {
        CertificateRecord {
            user_id,
            cert_dob: NormalizedDate::from_ymd(1990, 5, day).unwrap(),
            cert_name: "asha.png".to_string(),
            recorded_at: Timestamp::new(1_700_000_000),
        }
    }

    #[test]
    fn put_is_idempotent_per_date() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open_default(dir.path()).unwrap();
        let user = env
            .record_store()
            .upsert(&NewSubmission::new("Asha", "1990-05-12", "asha.png").unwrap())
            .unwrap()
            .user_id;
        let certs = env.certificate_store();

        assert!(certs.put_certificate(&record(user, 13)).unwrap());
        assert!(!certs.put_certificate(&record(user, 13)).unwrap());
        assert!(certs.put_certificate(&record(user, 12)).unwrap());

        let stored = certs.get_certificates(user).unwrap();
        assert_eq!(stored, vec![record(user, 12), record(user, 13)]);
    }

    #[test]
    fn unknown_user_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open_default(dir.path()).unwrap();
        let err = env
            .certificate_store()
            .put_certificate(&record(UserId::new(7), 1))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
