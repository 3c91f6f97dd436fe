//! Abstract storage traits for dobverify.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The verification workflow and the CLI depend only on the traits.

pub mod certificate;
pub mod error;
pub mod meta;
pub mod submission;

pub use certificate::CertificateStore;
pub use error::StoreError;
pub use meta::MetaStore;
pub use submission::{RecordStore, UpsertOutcome};
