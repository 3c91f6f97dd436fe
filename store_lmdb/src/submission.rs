//! LMDB implementation of RecordStore (the `form` table).
//!
//! Submissions live in `form` keyed by big-endian `user_id`. The unique
//! `(name, claimed_dob)` constraint is enforced through the `form_key` index,
//! checked and written in the same write transaction as the record itself.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RoTxn};

use dobverify_store::{RecordStore, StoreError, UpsertOutcome};
use dobverify_types::{NewSubmission, Submission, SubmissionKey, UserId};

use crate::meta::{allocate_id, NEXT_USER_ID_KEY};
use crate::{decode, encode, increment_prefix, LmdbError};

pub struct LmdbRecordStore {
    pub(crate) env: Arc<Env>,
    pub(crate) form_db: Database<Bytes, Bytes>,
    pub(crate) form_key_db: Database<Bytes, Bytes>,
    pub(crate) dob_cert_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

pub(crate) fn decode_user_id(bytes: &[u8]) -> Result<UserId, LmdbError> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| LmdbError::Corruption("form_key value is not a user id".to_string()))?;
    Ok(UserId::new(u64::from_be_bytes(arr)))
}

impl LmdbRecordStore {
    fn lookup_id(&self, txn: &RoTxn, key: &SubmissionKey) -> Result<Option<UserId>, LmdbError> {
        self.form_key_db
            .get(txn, &key.index_bytes())?
            .map(decode_user_id)
            .transpose()
    }

    fn read_submission(&self, txn: &RoTxn, user_id: UserId) -> Result<Option<Submission>, LmdbError> {
        self.form_db
            .get(txn, &user_id.to_be_bytes())?
            .map(decode::<Submission>)
            .transpose()
    }
}

impl RecordStore for LmdbRecordStore {
    fn upsert(&self, submission: &NewSubmission) -> Result<UpsertOutcome, StoreError> {
        let key = submission.key();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        if let Some(user_id) = self.lookup_id(&wtxn, &key)? {
            // Dropping the transaction aborts it; nothing was written.
            tracing::debug!(%user_id, "submission already stored, insert ignored");
            return Ok(UpsertOutcome {
                user_id,
                inserted: false,
            });
        }

        let user_id = UserId::new(allocate_id(&self.meta_db, &mut wtxn, NEXT_USER_ID_KEY)?);
        let record = submission.clone().into_submission(user_id);
        let id_bytes = user_id.to_be_bytes();
        self.form_db
            .put(&mut wtxn, &id_bytes, &encode(&record)?)
            .map_err(LmdbError::from)?;
        self.form_key_db
            .put(&mut wtxn, &key.index_bytes(), &id_bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        tracing::info!(%user_id, "added submission to record store");
        Ok(UpsertOutcome {
            user_id,
            inserted: true,
        })
    }

    fn fetch(&self, key: &SubmissionKey) -> Result<Option<Submission>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let Some(user_id) = self.lookup_id(&rtxn, key)? else {
            return Ok(None);
        };
        match self.read_submission(&rtxn, user_id)? {
            Some(sub) => Ok(Some(sub)),
            None => Err(LmdbError::Corruption(format!(
                "index for {} points at missing user {}",
                key, user_id
            ))
            .into()),
        }
    }

    fn get_by_id(&self, user_id: UserId) -> Result<Option<Submission>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.read_submission(&rtxn, user_id)?)
    }

    fn update_certificate_reference(
        &self,
        key: &SubmissionKey,
        certificate_reference: &str,
    ) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let user_id = self
            .lookup_id(&wtxn, key)?
            .ok_or_else(|| LmdbError::NotFound(key.to_string()))?;
        let mut record = self
            .read_submission(&wtxn, user_id)?
            .ok_or_else(|| LmdbError::Corruption(format!("missing user {}", user_id)))?;
        record.certificate_reference = certificate_reference.to_string();
        self.form_db
            .put(&mut wtxn, &user_id.to_be_bytes(), &encode(&record)?)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::info!(%user_id, "updated certificate reference");
        Ok(())
    }

    fn delete(&self, key: &SubmissionKey) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let user_id = self
            .lookup_id(&wtxn, key)?
            .ok_or_else(|| LmdbError::NotFound(key.to_string()))?;
        let id_bytes = user_id.to_be_bytes();

        self.form_db
            .delete(&mut wtxn, &id_bytes)
            .map_err(LmdbError::from)?;
        self.form_key_db
            .delete(&mut wtxn, &key.index_bytes())
            .map_err(LmdbError::from)?;

        let mut upper = id_bytes.to_vec();
        increment_prefix(&mut upper);
        let upper_bound = if upper.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(upper.as_slice())
        };
        let bounds = (Bound::Included(&id_bytes[..]), upper_bound);
        let removed = self
            .dob_cert_db
            .delete_range(&mut wtxn, &bounds)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        tracing::info!(%user_id, certificates = removed, "deleted submission");
        Ok(())
    }

    fn submission_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.form_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
