//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::{LmdbCertificateStore, LmdbError, LmdbMetaStore, LmdbRecordStore, Migrator};

/// Wraps the LMDB environment and all database handles.
///
/// Cloning is cheap; every clone shares the same environment.
#[derive(Clone)]
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) form_db: Database<Bytes, Bytes>,
    pub(crate) form_key_db: Database<Bytes, Bytes>,
    pub(crate) dob_cert_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Number of named databases the schema uses.
    pub const DATABASE_COUNT: u32 = 4;

    /// Default map size (64 MiB), far beyond what form submissions need.
    pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

    /// Open or create an LMDB environment at the given directory, then bring
    /// its schema up to date.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process for this path and
        // the data file is never modified or truncated outside LMDB.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs.max(Self::DATABASE_COUNT))
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let form_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("form"))?;
        let form_key_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("form_key"))?;
        let dob_cert_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("dob_cert"))?;
        let meta_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        let this = Self {
            env: Arc::new(env),
            form_db,
            form_key_db,
            dob_cert_db,
            meta_db,
        };
        Migrator::run(&this.meta_store())?;
        tracing::info!(path = %path.display(), "opened record store");
        Ok(this)
    }

    /// Open with the default database count and map size.
    pub fn open_default(path: &Path) -> Result<Self, LmdbError> {
        Self::open(path, Self::DATABASE_COUNT, Self::DEFAULT_MAP_SIZE)
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn record_store(&self) -> LmdbRecordStore {
        LmdbRecordStore {
            env: Arc::clone(&self.env),
            form_db: self.form_db,
            form_key_db: self.form_key_db,
            dob_cert_db: self.dob_cert_db,
            meta_db: self.meta_db,
        }
    }

    pub fn certificate_store(&self) -> LmdbCertificateStore {
        LmdbCertificateStore {
            env: Arc::clone(&self.env),
            form_db: self.form_db,
            dob_cert_db: self.dob_cert_db,
        }
    }

    pub fn meta_store(&self) -> LmdbMetaStore {
        LmdbMetaStore {
            env: Arc::clone(&self.env),
            meta_db: self.meta_db,
        }
    }
}
