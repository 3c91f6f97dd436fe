//! LMDB storage backend for dobverify.
//!
//! Implements the storage traits from `dobverify-store` using the `heed` LMDB
//! bindings. The relational layout of the `form` and `dob_cert` tables maps
//! onto four LMDB databases within a single environment:
//!
//! | database   | key                          | value                      |
//! |------------|------------------------------|----------------------------|
//! | `form`     | `user_id` (u64 big-endian)   | bincode `Submission`       |
//! | `form_key` | `name \0 claimed_dob`        | `user_id` (u64 big-endian) |
//! | `dob_cert` | `user_id ++ iso cert_dob`    | bincode `CertificateRecord`|
//! | `meta`     | ascii name                   | little-endian counters     |

pub mod certificate;
pub mod environment;
pub mod error;
pub mod meta;
pub mod migration;
pub mod submission;

pub use certificate::LmdbCertificateStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use meta::LmdbMetaStore;
pub use migration::Migrator;
pub use submission::LmdbRecordStore;

/// Increment a byte prefix in place to get the exclusive upper bound of a
/// prefix range scan. An all-`0xff` prefix becomes empty (unbounded).
pub(crate) fn increment_prefix(prefix: &mut Vec<u8>) {
    while let Some(last) = prefix.pop() {
        if last < 0xff {
            prefix.push(last + 1);
            return;
        }
    }
}

pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, LmdbError> {
    bincode::serialize(value).map_err(|e| LmdbError::Serialization(e.to_string()))
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, LmdbError> {
    bincode::deserialize(bytes).map_err(|e| LmdbError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_prefix_carries() {
        let mut p = vec![0x01, 0xff];
        increment_prefix(&mut p);
        assert_eq!(p, vec![0x02]);

        let mut q = vec![0xff, 0xff];
        increment_prefix(&mut q);
        assert!(q.is_empty());
    }
}
