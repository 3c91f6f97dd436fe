//! LMDB implementation of MetaStore, plus the id counter used by the form table.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RwTxn};

use dobverify_store::{MetaStore, StoreError};

use crate::LmdbError;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";
pub(crate) const NEXT_USER_ID_KEY: &[u8] = b"next_user_id";

pub struct LmdbMetaStore {
    pub(crate) env: Arc<Env>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl MetaStore for LmdbMetaStore {
    fn get_schema_version(&self) -> Result<u32, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .meta_db
            .get(&rtxn, SCHEMA_VERSION_KEY)
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Corruption("schema_version has unexpected byte length".to_string())
                })?;
                Ok(u32::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        let bytes = version.to_le_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, SCHEMA_VERSION_KEY, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

/// Take the next value of a monotonically increasing counter inside an open
/// write transaction. Counters start at 1.
pub(crate) fn allocate_id(
    meta_db: &Database<Bytes, Bytes>,
    wtxn: &mut RwTxn,
    counter_key: &[u8],
) -> Result<u64, LmdbError> {
    let current = match meta_db.get(wtxn, counter_key)? {
        Some(bytes) => {
            let arr: [u8; 8] = bytes.try_into().map_err(|_| {
                LmdbError::Corruption("id counter has unexpected byte length".to_string())
            })?;
            u64::from_le_bytes(arr)
        }
        None => 1,
    };
    meta_db.put(wtxn, counter_key, &(current + 1).to_le_bytes())?;
    Ok(current)
}
