//! Nullable store: thread-safe in-memory record storage for testing.
//!
//! Mirrors the LMDB backend's semantics: ids start at 1, duplicate
//! `(name, claimed_dob)` inserts are ignored, deletes cascade to certificates.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use dobverify_store::{CertificateStore, RecordStore, StoreError, UpsertOutcome};
use dobverify_types::{
    CertificateRecord, NewSubmission, NormalizedDate, Submission, SubmissionKey, UserId,
};

#[derive(Default)]
struct Tables {
    next_id: u64,
    form: BTreeMap<UserId, Submission>,
    form_key: HashMap<SubmissionKey, UserId>,
    dob_cert: BTreeMap<(UserId, NormalizedDate), CertificateRecord>,
    upsert_calls: u64,
}

/// An in-memory submission + certificate store for testing.
#[derive(Default)]
pub struct NullRecordStore {
    tables: Mutex<Tables>,
}

impl NullRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `upsert` calls, including ignored duplicates.
    pub fn upsert_calls(&self) -> u64 {
        self.tables.lock().unwrap().upsert_calls
    }
}

impl RecordStore for NullRecordStore {
    fn upsert(&self, submission: &NewSubmission) -> Result<UpsertOutcome, StoreError> {
        let mut t = self.tables.lock().unwrap();
        t.upsert_calls += 1;
        let key = submission.key();
        if let Some(&user_id) = t.form_key.get(&key) {
            return Ok(UpsertOutcome {
                user_id,
                inserted: false,
            });
        }
        t.next_id += 1;
        let user_id = UserId::new(t.next_id);
        t.form
            .insert(user_id, submission.clone().into_submission(user_id));
        t.form_key.insert(key, user_id);
        Ok(UpsertOutcome {
            user_id,
            inserted: true,
        })
    }

    fn fetch(&self, key: &SubmissionKey) -> Result<Option<Submission>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.form_key
            .get(key)
            .and_then(|id| t.form.get(id))
            .cloned())
    }

    fn get_by_id(&self, user_id: UserId) -> Result<Option<Submission>, StoreError> {
        Ok(self.tables.lock().unwrap().form.get(&user_id).cloned())
    }

    fn update_certificate_reference(
        &self,
        key: &SubmissionKey,
        certificate_reference: &str,
    ) -> Result<(), StoreError> {
        let mut t = self.tables.lock().unwrap();
        let user_id = *t
            .form_key
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        if let Some(sub) = t.form.get_mut(&user_id) {
            sub.certificate_reference = certificate_reference.to_string();
        }
        Ok(())
    }

    fn delete(&self, key: &SubmissionKey) -> Result<(), StoreError> {
        let mut t = self.tables.lock().unwrap();
        let user_id = t
            .form_key
            .remove(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        t.form.remove(&user_id);
        t.dob_cert.retain(|(owner, _), _| *owner != user_id);
        Ok(())
    }

    fn submission_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables.lock().unwrap().form.len() as u64)
    }
}

impl CertificateStore for NullRecordStore {
    fn put_certificate(&self, record: &CertificateRecord) -> Result<bool, StoreError> {
        let mut t = self.tables.lock().unwrap();
        if !t.form.contains_key(&record.user_id) {
            return Err(StoreError::NotFound(format!("user {}", record.user_id)));
        }
        let key = (record.user_id, record.cert_dob);
        if t.dob_cert.contains_key(&key) {
            return Ok(false);
        }
        t.dob_cert.insert(key, record.clone());
        Ok(true)
    }

    fn get_certificates(&self, user_id: UserId) -> Result<Vec<CertificateRecord>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .dob_cert
            .iter()
            .filter(|((owner, _), _)| *owner == user_id)
            .map(|(_, record)| record.clone())
            .collect())
    }
}
