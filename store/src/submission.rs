//! Form submission storage trait.

use dobverify_types::{NewSubmission, Submission, SubmissionKey, UserId};
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Result of an idempotent insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertOutcome {
    /// Identity of the stored record (new or pre-existing).
    pub user_id: UserId,
    /// `false` when a record with the same `(name, claimed_dob)` already
    /// existed and the call was a no-op.
    pub inserted: bool,
}

/// Keyed persistence for candidate submissions (the `form` table).
///
/// `(name, claimed_dob)` is unique. Inserting a duplicate is not an error:
/// the existing record is left untouched and its id returned.
pub trait RecordStore: Send + Sync {
    /// Insert a submission unless its key already exists.
    fn upsert(&self, submission: &NewSubmission) -> Result<UpsertOutcome, StoreError>;

    /// Look up a submission by its unique key.
    fn fetch(&self, key: &SubmissionKey) -> Result<Option<Submission>, StoreError>;

    /// Look up a submission by its primary key.
    fn get_by_id(&self, user_id: UserId) -> Result<Option<Submission>, StoreError>;

    /// Point an existing submission at a different certificate document.
    ///
    /// Returns [`StoreError::NotFound`] if no submission has this key.
    fn update_certificate_reference(
        &self,
        key: &SubmissionKey,
        certificate_reference: &str,
    ) -> Result<(), StoreError>;

    /// Remove a submission and its certificate records.
    ///
    /// Returns [`StoreError::NotFound`] if no submission has this key.
    fn delete(&self, key: &SubmissionKey) -> Result<(), StoreError>;

    /// Number of stored submissions.
    fn submission_count(&self) -> Result<u64, StoreError>;
}
