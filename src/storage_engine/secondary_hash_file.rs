use crate::block_store::BlockFile;
use crate::storage_engine::bucket_directory::read_chain_heads;
use crate::storage_engine::chain::for_each_in_chain;
use crate::storage_engine::digest::hash_str_key;
use crate::storage_engine::hash_file::HashFile;
use crate::storage_engine::primary_hash_file::PrimaryHashFile;
use crate::storage_engine::statistics::HashStatistics;
use crate::storage_engine::{Result, StoreError};
use crate::utils::verify_file_existence;
use bucket_store_layout::{
    BlockElement, DataBlockHeader, FileKind, Record, SecondaryEntry, data_element_range,
};
use std::path::Path;
use tracing::{debug, info, warn};

/// The primary data block read by a join.
const PRIMARY_BLOCKS_VISITED: u32 = 1;

/// A record found through the secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRecord {
    pub record: Record,
    /// Secondary header, directory, and data blocks, plus the one primary
    /// block the back-reference pointed at.
    pub blocks_visited: u32,
}

/// How many primary records a bootstrap indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapSummary {
    pub indexed: u64,
    /// Records whose surname was already indexed by an earlier record.
    pub skipped_duplicates: u64,
}

/// A static hash file of `(surname, primary block)` pairs.
///
/// Each entry points at the primary data block that held the record with that
/// surname when the entry was written. Deletes in the primary do not touch the
/// index, so a back-reference can go stale; [`SecondaryHashFile::lookup`]
/// reports that as [`StoreError::InvalidPrimaryReference`].
pub struct SecondaryHashFile {
    inner: Option<HashFile>,
}

impl SecondaryHashFile {
    /// Creates a secondary index over the primary hash file at `primary_path`
    /// and fills it with one entry per distinct surname already stored there.
    ///
    /// The primary is read directly from disk, read-only and without claiming
    /// it, so it may be open elsewhere in the process or lack write
    /// permission. The new index is claimed in the process-wide
    /// [`HandleTable`](crate::HandleTable) while it is filled, and left closed.
    ///
    /// # Errors
    /// - [`StoreError::InvalidPrimaryReference`] if `primary_path` is missing
    ///   or is not a primary hash file. Nothing is created in that case.
    /// - Anything the bootstrap inserts hit other than a duplicate surname.
    ///   The index is left partially populated.
    pub fn create(
        path: &Path,
        bucket_count: u32,
        primary_path: &Path,
    ) -> Result<BootstrapSummary> {
        let sources = Self::read_primary(primary_path)?;

        HashFile::create(path, FileKind::SecondaryHash, bucket_count)?;

        let mut index = Self::open(path)?;
        let mut summary = BootstrapSummary::default();

        for (block, surname) in sources {
            let entry = SecondaryEntry::new(surname, block)?;
            match index.insert(&entry) {
                Ok(_) => summary.indexed += 1,
                Err(StoreError::DuplicateKey(surname)) => {
                    warn!(
                        "Skipping surname {:?} in primary block {}: already indexed",
                        surname, block
                    );
                    summary.skipped_duplicates += 1;
                }
                Err(err) => return Err(err),
            }
        }

        index.close()?;

        info!(
            "Bootstrapped {} from {}: {} indexed, {} duplicate surnames skipped",
            path.display(),
            primary_path.display(),
            summary.indexed,
            summary.skipped_duplicates
        );
        Ok(summary)
    }

    /// Every `(owning block, surname)` pair in the primary, in scan order.
    fn read_primary(primary_path: &Path) -> Result<Vec<(u32, String)>> {
        verify_file_existence("Primary hash file", primary_path)
            .map_err(|err| StoreError::InvalidPrimaryReference(err.to_string()))?;

        let blocks = BlockFile::open_read_only(primary_path).map_err(|err| {
            StoreError::InvalidPrimaryReference(format!("{}: {}", primary_path.display(), err))
        })?;
        let header = HashFile::load_header(&blocks).map_err(|err| {
            StoreError::InvalidPrimaryReference(format!("{}: {}", primary_path.display(), err))
        })?;

        if header.kind != FileKind::PrimaryHash {
            return Err(StoreError::InvalidPrimaryReference(format!(
                "{} is a {}, not a primary hash file",
                primary_path.display(),
                header.kind
            )));
        }

        let directory = read_chain_heads(&blocks, &header)?;
        let mut sources = Vec::new();
        for head in directory.chain_heads {
            for_each_in_chain::<Record>(&blocks, head, |block, record| {
                sources.push((block, record.surname().to_string()));
            })?;
        }
        blocks.close()?;

        debug!(
            "Read {} records from primary {}",
            sources.len(),
            primary_path.display()
        );
        Ok(sources)
    }

    /// Opens an existing secondary hash file, claiming it in the
    /// process-wide [`HandleTable`](crate::HandleTable).
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            inner: Some(HashFile::open(path, FileKind::SecondaryHash)?),
        })
    }

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

    /// Inserts `entry`, returning the index of the block it landed in.
    ///
    /// # Errors
    /// - [`StoreError::DuplicateKey`] if the surname is already indexed.
    pub fn insert(&mut self, entry: &SecondaryEntry) -> Result<u32> {
        let file = self.file_mut()?;
        let key = entry.surname().as_bytes();
        let bucket = hash_str_key(key, file.header().bucket_count);

        file.insert(
            bucket,
            entry,
            |encoded| SecondaryEntry::surname_of(encoded) == key,
            || entry.surname().to_string(),
        )
    }

    /// Indexes `record`, which the primary stored in `primary_block`.
    pub fn insert_for(&mut self, record: &Record, primary_block: u32) -> Result<u32> {
        self.insert(&SecondaryEntry::new(record.surname(), primary_block)?)
    }

    /// Finds `surname` in the index and joins it to the record in `primary`.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] if the surname is not indexed.
    /// - [`StoreError::InvalidPrimaryReference`] if the referenced primary
    ///   block is out of range or no longer holds a record with `surname`.
    pub fn lookup(
        &mut self,
        surname: &str,
        primary: &mut PrimaryHashFile,
    ) -> Result<JoinedRecord> {
        let file = self.file_mut()?;
        let key = surname.as_bytes();
        let bucket = hash_str_key(key, file.header().bucket_count);

        let lookup = file.lookup::<SecondaryEntry>(bucket, |encoded| {
            SecondaryEntry::surname_of(encoded) == key
        })?;
        let hit = lookup
            .search
            .hit
            .ok_or_else(|| StoreError::NotFound(surname.to_string()))?;

        let record = Self::join(primary, hit.element.primary_block(), surname)?;

        Ok(JoinedRecord {
            record,
            blocks_visited: lookup.blocks_visited + PRIMARY_BLOCKS_VISITED,
        })
    }

    /// Reads `block` from the primary and returns its first record with
    /// `surname`.
    fn join(primary: &PrimaryHashFile, block: u32, surname: &str) -> Result<Record> {
        let blocks = primary.file()?.blocks();

        if block >= blocks.block_count() {
            return Err(StoreError::InvalidPrimaryReference(format!(
                "surname {:?} points at block {} but the primary has {} blocks",
                surname,
                block,
                blocks.block_count()
            )));
        }

        let data = blocks.block(block)?;
        let header = DataBlockHeader::deserialize(data).map_err(|err| {
            StoreError::InvalidPrimaryReference(format!("primary block {}: {}", block, err))
        })?;
        let count = (header.element_count as usize).min(Record::PER_BLOCK);
        let key = surname.as_bytes();

        for position in 0..count {
            let encoded = &data[data_element_range(position, Record::SIZE)];
            if Record::surname_of(encoded) == key {
                return Ok(Record::deserialize(encoded)?);
            }
        }

        Err(StoreError::InvalidPrimaryReference(format!(
            "primary block {} no longer holds a record with surname {:?}",
            block, surname
        )))
    }

    pub fn statistics(&mut self) -> Result<HashStatistics> {
        self.file_mut()?.statistics()
    }

    fn file(&self) -> Result<&HashFile> {
        self.inner.as_ref().ok_or(StoreError::NotOpen)
    }

    fn file_mut(&mut self) -> Result<&mut HashFile> {
        self.inner.as_mut().ok_or(StoreError::NotOpen)
    }
}
