//! Candidate form submissions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DobError;

/// Durable primary key of a stored submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(u64);

impl UserId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Big-endian bytes, so LMDB key order matches numeric order.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The unique `(name, claimed_dob)` pair identifying a submission.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionKey {
    pub name: String,
    pub claimed_dob: String,
}

impl SubmissionKey {
    pub fn new(name: impl Into<String>, claimed_dob: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            claimed_dob: claimed_dob.into(),
        }
    }

    /// Encode as an index key: `name \0 claimed_dob`.
    ///
    /// Neither field may contain a NUL byte (enforced by [`NewSubmission::new`]),
    /// so the encoding is unambiguous.
    pub fn index_bytes(&self) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.name.len() + self.claimed_dob.len() + 1);
        key.extend_from_slice(self.name.as_bytes());
        key.push(0);
        key.extend_from_slice(self.claimed_dob.as_bytes());
        key
    }
}

impl fmt::Display for SubmissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.name, self.claimed_dob)
    }
}

/// A validated submission that has not been assigned a [`UserId`] yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubmission {
    pub name: String,
    pub claimed_dob: String,
    pub certificate_reference: String,
}

impl NewSubmission {
    /// Validate and trim the three required fields.
    pub fn new(
        name: impl AsRef<str>,
        claimed_dob: impl AsRef<str>,
        certificate_reference: impl AsRef<str>,
    ) -> Result<Self, DobError> {
        Ok(Self {
            name: required("name", name.as_ref())?,
            claimed_dob: required("date_of_birth", claimed_dob.as_ref())?,
            certificate_reference: required("dob_cert", certificate_reference.as_ref())?,
        })
    }

    pub fn key(&self) -> SubmissionKey {
        SubmissionKey::new(self.name.clone(), self.claimed_dob.clone())
    }

    /// Attach the identity assigned by the record store.
    pub fn into_submission(self, user_id: UserId) -> Submission {
        Submission {
            user_id,
            name: self.name,
            claimed_dob: self.claimed_dob,
            certificate_reference: self.certificate_reference,
        }
    }
}

fn required(field: &'static str, value: &str) -> Result<String, DobError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains('\0') {
        return Err(DobError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// A stored candidate form entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub user_id: UserId,
    pub name: String,
    pub claimed_dob: String,
    pub certificate_reference: String,
}

impl Submission {
    pub fn key(&self) -> SubmissionKey {
        SubmissionKey::new(self.name.clone(), self.claimed_dob.clone())
    }

    /// Apply the [`NewSubmission::new`] field rules to a record built by hand.
    pub fn validate(&self) -> Result<(), DobError> {
        required("name", &self.name)?;
        required("date_of_birth", &self.claimed_dob)?;
        required("dob_cert", &self.certificate_reference)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_submission_trims_fields() {
        let s = NewSubmission::new("  Asha Rao ", "1990-05-12\n", " certs/asha.png").unwrap();
        assert_eq!(s.name, "Asha Rao");
        assert_eq!(s.claimed_dob, "1990-05-12");
        assert_eq!(s.certificate_reference, "certs/asha.png");
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert_eq!(
            NewSubmission::new("", "1990-05-12", "c.png"),
            Err(DobError::MissingField("name"))
        );
        assert_eq!(
            NewSubmission::new("Asha", "   ", "c.png"),
            Err(DobError::MissingField("date_of_birth"))
        );
        assert_eq!(
            NewSubmission::new("Asha", "1990-05-12", ""),
            Err(DobError::MissingField("dob_cert"))
        );
    }

    #[test]
    fn hand_built_submission_is_validated() {
        let mut s = NewSubmission::new("Asha", "1990-05-12", "c.png")
            .unwrap()
            .into_submission(UserId::new(7));
        assert_eq!(s.validate(), Ok(()));

        s.certificate_reference = " ".to_string();
        assert_eq!(s.validate(), Err(DobError::MissingField("dob_cert")));

        s.certificate_reference = "c.png".to_string();
        s.name = String::new();
        assert_eq!(s.validate(), Err(DobError::MissingField("name")));
    }

    #[test]
    fn index_bytes_separate_fields() {
        let a = SubmissionKey::new("ab", "c").index_bytes();
        let b = SubmissionKey::new("a", "bc").index_bytes();
        assert_ne!(a, b);
    }

    #[test]
    fn user_id_bytes_sort_numerically() {
        assert!(UserId::new(2).to_be_bytes() < UserId::new(256).to_be_bytes());
    }
}
