//! RocksDB backend
//!
//! Stores the serialized sequence as one value under [`SLOT_KEY`] with LZ4
//! compression. The database is flushed after every write.

use std::path::{Path, PathBuf};

use rocksdb::{Options, DB};

use super::{PersistenceBackend, SLOT_KEY};
use crate::error::Result;

/// RocksDB-based persistence slot
pub struct RocksDbBackend {
    db: DB,
    path: PathBuf,
}

impl RocksDbBackend {
    /// Open (or create) the database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_max_background_jobs(2);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let db = DB::open(&opts, path)?;

        log::info!("RocksDB slot opened at: {}", path.display());

        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }
}

impl PersistenceBackend for RocksDbBackend {
    fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(SLOT_KEY.as_bytes())?)
    }

    fn save(&self, bytes: &[u8]) -> Result<()> {
        self.db.put(SLOT_KEY.as_bytes(), bytes)?;
        self.db.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("rocksdb:{}", self.path.display())
    }
}
