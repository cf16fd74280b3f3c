use crate::storage_engine::{Result, StoreError};
use bucket_store_layout::FileKind;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tracing::trace;

static GLOBAL_TABLE: LazyLock<HandleTable> = LazyLock::new(HandleTable::new);

/// Table of currently open hash files, keyed by canonical path.
///
/// A file may be open through at most one handle at a time. Opening it again
/// fails with [`StoreError::AlreadyOpen`] until the first handle is closed or
/// dropped. There is exactly one table per process, [`HandleTable::global`];
/// every `open` claims through it, so no second table can admit a file that
/// is already held.
#[derive(Clone)]
pub struct HandleTable {
    open: Arc<DashMap<PathBuf, FileKind>>,
}

impl HandleTable {
    fn new() -> Self {
        Self {
            open: Arc::new(DashMap::new()),
        }
    }

    /// The process-wide table.
    pub fn global() -> &'static HandleTable {
        &GLOBAL_TABLE
    }

    /// Reserves `path` for a new handle.
    pub(crate) fn claim(&self, path: &Path, kind: FileKind) -> Result<HandleClaim> {
        let key = path.canonicalize()?;

        match self.open.entry(key.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyOpen(key)),
            Entry::Vacant(slot) => {
                slot.insert(kind);
                trace!("Claimed {:?} as {}", key, kind);
                Ok(HandleClaim {
                    table: self.clone(),
                    key,
                })
            }
        }
    }

    /// Whether some handle currently holds `path`.
    pub fn is_open(&self, path: &Path) -> bool {
        path.canonicalize()
            .map(|key| self.open.contains_key(&key))
            .unwrap_or(false)
    }

    /// Number of handles currently open in the process.
    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}

/// Proof that a handle owns its table slot; releases it on drop.
pub(crate) struct HandleClaim {
    table: HandleTable,
    key: PathBuf,
}

impl Drop for HandleClaim {
    fn drop(&mut self) {
        self.table.open.remove(&self.key);
        trace!("Released {:?}", self.key);
    }
}
