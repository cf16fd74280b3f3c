use crate::storage_engine::digest::hash_int_key;
use crate::storage_engine::hash_file::HashFile;
use crate::storage_engine::statistics::HashStatistics;
use crate::storage_engine::{Result, StoreError};
use bucket_store_layout::{FileKind, Record};
use std::path::Path;

/// Records matched by a scan, plus how many blocks the scan read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// In bucket order, then chain order, then slot order.
    pub records: Vec<Record>,
    /// Header, directory, and data blocks read.
    pub blocks_visited: u32,
}

/// A static hash file of [`Record`]s keyed by `id`.
///
/// The bucket count is fixed when the file is created; buckets grow by
/// chaining overflow blocks and never split. A handle is `Open` from
/// [`PrimaryHashFile::open`] until [`PrimaryHashFile::close`]; any call on a
/// closed handle fails with [`StoreError::NotOpen`].
pub struct PrimaryHashFile {
    inner: Option<HashFile>,
}

impl PrimaryHashFile {
    /// Creates a new primary hash file with `bucket_count` buckets.
    ///
    /// Fails if `path` exists or `bucket_count` is zero. The file is left
    /// closed.
    pub fn create(path: &Path, bucket_count: u32) -> Result<()> {
        HashFile::create(path, FileKind::PrimaryHash, bucket_count)
    }

    /// Opens an existing primary hash file, claiming it in the process-wide
    /// [`HandleTable`](crate::HandleTable).
    ///
    /// # Errors
    /// - [`StoreError::WrongFileKind`] if the header is not a primary hash file.
    /// - [`StoreError::AlreadyOpen`] if any handle in the process holds the
    ///   file, under whatever spelling of its path.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            inner: Some(HashFile::open(path, FileKind::PrimaryHash)?),
        })
    }

    /// Releases the handle. Every write was already persisted by the
    /// operation that made it.
    pub fn close(&mut self) -> Result<()> {
        self.inner.take().ok_or(StoreError::NotOpen)?.close()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    pub fn path(&self) -> Result<&Path> {
        Ok(self.file()?.path())
    }

    pub fn bucket_count(&self) -> Result<u32> {
        Ok(self.file()?.header().bucket_count)
    }

    /// Inserts `record`, returning the index of the data block it landed in.
    ///
    /// # Errors
    /// - [`StoreError::DuplicateKey`] if a record with the same id exists.
    pub fn insert(&mut self, record: &Record) -> Result<u32> {
        let id = record.id();
        let file = self.file_mut()?;
        let bucket = hash_int_key(id, file.header().bucket_count);

        file.insert(
            bucket,
            record,
            |encoded| Record::id_of(encoded) == id,
            || id.to_string(),
        )
    }

    /// Deletes the record with `id`, compacting the block that held it.
    ///
    /// Chains are never shortened: a block emptied by deletes stays linked.
    pub fn delete(&mut self, id: i32) -> Result<()> {
        let file = self.file_mut()?;
        let bucket = hash_int_key(id, file.header().bucket_count);

        file.remove::<Record>(bucket, |encoded| Record::id_of(encoded) == id, || {
            id.to_string()
        })?;
        Ok(())
    }

    /// With `Some(id)`, walks only that id's bucket and returns the one
    /// matching record; with `None`, returns every record in the file.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] if `id` is given and absent.
    pub fn scan(&mut self, id: Option<i32>) -> Result<ScanOutcome> {
        let file = self.file_mut()?;

        match id {
            Some(id) => {
                let bucket = hash_int_key(id, file.header().bucket_count);
                let lookup =
                    file.lookup::<Record>(bucket, |encoded| Record::id_of(encoded) == id)?;
                let hit = lookup
                    .search
                    .hit
                    .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

                Ok(ScanOutcome {
                    records: vec![hit.element],
                    blocks_visited: lookup.blocks_visited,
                })
            }
            None => {
                let mut records = Vec::new();
                let blocks_visited = file.for_each::<Record>(|_, record| records.push(record))?;

                Ok(ScanOutcome {
                    records,
                    blocks_visited,
                })
            }
        }
    }

    /// The record with `id`.
    pub fn get(&mut self, id: i32) -> Result<Record> {
        let mut outcome = self.scan(Some(id))?;
        outcome
            .records
            .pop()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Every record paired with the index of the data block holding it.
    pub fn records_with_blocks(&mut self) -> Result<Vec<(u32, Record)>> {
        let mut out = Vec::new();
        self.file_mut()?
            .for_each::<Record>(|block, record| out.push((block, record)))?;
        Ok(out)
    }

    pub fn statistics(&mut self) -> Result<HashStatistics> {
        self.file_mut()?.statistics()
    }

    pub(crate) fn file(&self) -> Result<&HashFile> {
        self.inner.as_ref().ok_or(StoreError::NotOpen)
    }

    fn file_mut(&mut self) -> Result<&mut HashFile> {
        self.inner.as_mut().ok_or(StoreError::NotOpen)
    }
}
