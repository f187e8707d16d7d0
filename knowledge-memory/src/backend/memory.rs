//! In-process backends

use parking_lot::Mutex;

use super::PersistenceBackend;
use crate::error::Result;

/// Backend for environments without durable storage
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBackend;

impl PersistenceBackend for NoopBackend {
    fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn save(&self, _bytes: &[u8]) -> Result<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        "none".to_string()
    }
}

/// Session-durable backend holding the slot in process memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the slot, e.g. with a previously exported sequence
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            slot: Mutex::new(Some(bytes.into())),
        }
    }

    /// Current slot contents
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.slot.lock().clone()
    }
}

impl PersistenceBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, bytes: &[u8]) -> Result<()> {
        *self.slot.lock() = Some(bytes.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

// Lets several stores in one process share a slot, the way separate
// processes would share a file.
impl<B: PersistenceBackend + ?Sized> PersistenceBackend for std::sync::Arc<B> {
    fn load(&self) -> Result<Option<Vec<u8>>> {
        (**self).load()
    }

    fn save(&self, bytes: &[u8]) -> Result<()> {
        (**self).save(bytes)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
