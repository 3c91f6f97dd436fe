//! Schema versioning for the record store.
//!
//! The version lives in the `meta` database. The databases themselves are
//! created when the environment opens, so a fresh store (version 0) only needs
//! the current version stamped. A database written by a newer release is
//! refused.

use dobverify_store::MetaStore;

use crate::LmdbError;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

pub struct Migrator;

impl Migrator {
    /// Bring the stored schema up to [`CURRENT_SCHEMA_VERSION`].
    pub fn run(meta_store: &impl MetaStore) -> Result<(), LmdbError> {
        let stored = meta_store
            .get_schema_version()
            .map_err(|e| LmdbError::Corruption(e.to_string()))?;

        match stored {
            v if v == CURRENT_SCHEMA_VERSION => {
                tracing::debug!(version = v, "schema up to date");
                Ok(())
            }
            0 => {
                meta_store
                    .set_schema_version(CURRENT_SCHEMA_VERSION)
                    .map_err(|e| LmdbError::Schema(e.to_string()))?;
                tracing::info!(version = CURRENT_SCHEMA_VERSION, "schema version stamped");
                Ok(())
            }
            v if v > CURRENT_SCHEMA_VERSION => Err(LmdbError::Schema(format!(
                "stored version {v} is newer than supported version {CURRENT_SCHEMA_VERSION}"
            ))),
            v => Err(LmdbError::Schema(format!(
                "no upgrade path from version {v} to {CURRENT_SCHEMA_VERSION}"
            ))),
        }
    }
}
