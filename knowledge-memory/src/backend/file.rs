//! JSON file backend
//!
//! The slot lives at `<data_dir>/knowledge_memory_index.json`. Each write
//! lands in its own uniquely named temp file in the same directory and is
//! renamed over the slot, so readers never observe a half-written sequence
//! and concurrent writers never share a temp file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{PersistenceBackend, SLOT_KEY};
use crate::error::Result;

/// Single-file persistence slot
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
    path: PathBuf,
}

impl FileBackend {
    /// Create the backend, making `data_dir` if needed
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;

        Ok(Self {
            dir: data_dir.to_path_buf(),
            path: data_dir.join(format!("{}.json", SLOT_KEY)),
        })
    }

    /// Path of the slot file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceBackend for FileBackend {
    fn load(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, bytes: &[u8]) -> Result<()> {
        // Dropping the temp file on an error path removes it.
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
