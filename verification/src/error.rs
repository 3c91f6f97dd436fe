use dobverify_store::StoreError;
use dobverify_types::DobError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] DobError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("record store error: {0}")]
    Store(#[from] StoreError),

    #[error("submission {0} is missing from the record store after upsert")]
    MissingRecord(String),
}
