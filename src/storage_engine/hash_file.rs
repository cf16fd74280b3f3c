use crate::block_store::BlockFile;
use crate::storage_engine::bucket_directory::{
    BucketSlot, create_directory, locate_bucket, read_chain_heads,
};
use crate::storage_engine::chain::{
    ChainSearch, append_to_chain, for_each_in_chain, remove_from_block, search_chain,
};
use crate::storage_engine::handle_table::{HandleClaim, HandleTable};
use crate::storage_engine::statistics::{HashStatistics, collect_statistics};
use crate::storage_engine::{Result, StoreError};
use bucket_store_layout::constants::HEADER_BLOCK_INDEX;
use bucket_store_layout::{BlockElement, FileHeader, FileKind};
use std::path::Path;
use tracing::{debug, info};

/// Blocks read on top of the data blocks: the header block itself.
const HEADER_BLOCKS_VISITED: u32 = 1;

/// The machinery both hash file kinds share: the block file, its header, and
/// the handle-table slot that keeps it exclusively open.
pub(crate) struct HashFile {
    blocks: BlockFile,
    header: FileHeader,
    _claim: HandleClaim,
}

/// Where a key was found, and how many blocks it took (header and directory
/// included).
pub(crate) struct Lookup<E> {
    pub location: BucketSlot,
    pub search: ChainSearch<E>,
    pub blocks_visited: u32,
}

impl HashFile {
    /// Creates a hash file: header block, then a fully linked directory with
    /// every bucket empty.
    pub(crate) fn create(path: &Path, kind: FileKind, bucket_count: u32) -> Result<()> {
        if bucket_count == 0 {
            return Err(StoreError::InvalidBucketCount(bucket_count));
        }

        BlockFile::create(path)?;
        let mut blocks = BlockFile::open(path)?;

        let header_index = blocks.allocate_block()?;
        debug_assert_eq!(header_index, HEADER_BLOCK_INDEX);

        let mut header = FileHeader::new(kind, bucket_count);
        Self::store_header(&mut blocks, &header)?;

        header.first_directory_block = Some(create_directory(&mut blocks, bucket_count)?);
        Self::store_header(&mut blocks, &header)?;

        blocks.close()?;

        info!(
            "Created {} {} with {} buckets",
            kind,
            path.display(),
            bucket_count
        );
        Ok(())
    }

    /// Opens `path`, checks it is a `kind` file, and claims it in the
    /// process-wide [`HandleTable`].
    pub(crate) fn open(path: &Path, kind: FileKind) -> Result<Self> {
        let blocks = BlockFile::open(path)?;
        let header = Self::load_header(&blocks)?;

        if header.kind != kind {
            return Err(StoreError::WrongFileKind {
                path: path.to_path_buf(),
                expected: kind.label(),
                found: header.kind.label(),
            });
        }

        let claim = HandleTable::global().claim(path, kind)?;

        debug!(
            "Opened {} {} ({} buckets, {} blocks)",
            kind,
            path.display(),
            header.bucket_count,
            blocks.block_count()
        );

        Ok(Self {
            blocks,
            header,
            _claim: claim,
        })
    }

    /// Flushes and releases the file. The handle-table slot is freed even if
    /// the flush fails.
    pub(crate) fn close(self) -> Result<()> {
        let Self { blocks, header, .. } = self;
        let path = blocks.path().to_path_buf();
        blocks.close()?;
        debug!("Closed {} {}", header.kind, path.display());
        Ok(())
    }

    /// Reads and decodes block 0.
    ///
    /// A hash-file header declaring zero buckets is rejected as corrupt:
    /// nothing could be hashed into it.
    pub(crate) fn load_header(blocks: &BlockFile) -> Result<FileHeader> {
        if blocks.block_count() == 0 {
            return Err(StoreError::Corrupt(format!(
                "{} has no header block",
                blocks.path().display()
            )));
        }

        let header = FileHeader::deserialize(blocks.block(HEADER_BLOCK_INDEX)?)?;
        if header.kind.is_hash_file() && header.bucket_count == 0 {
            return Err(StoreError::Corrupt(format!(
                "{} declares a {} with zero buckets",
                blocks.path().display(),
                header.kind
            )));
        }
        Ok(header)
    }

    fn store_header(blocks: &mut BlockFile, header: &FileHeader) -> Result<()> {
        let bytes = header.serialize();
        blocks.read_block(HEADER_BLOCK_INDEX)?[..bytes.len()].copy_from_slice(&bytes);
        blocks.write_block(HEADER_BLOCK_INDEX)?;
        Ok(())
    }

    #[inline]
    pub(crate) fn header(&self) -> &FileHeader {
        &self.header
    }

    #[inline]
    pub(crate) fn path(&self) -> &Path {
        self.blocks.path()
    }

    #[inline]
    pub(crate) fn blocks(&self) -> &BlockFile {
        &self.blocks
    }

    /// Searches `bucket`'s chain for the first element `matches` accepts.
    pub(crate) fn lookup<E: BlockElement>(
        &mut self,
        bucket: u32,
        matches: impl FnMut(&[u8]) -> bool,
    ) -> Result<Lookup<E>> {
        let location = locate_bucket(&self.blocks, &self.header, bucket)?;
        let search = search_chain::<E>(&self.blocks, location.chain_head, matches)?;
        let blocks_visited =
            HEADER_BLOCKS_VISITED + location.blocks_visited + search.blocks_visited;

        Ok(Lookup {
            location,
            search,
            blocks_visited,
        })
    }

    /// Inserts `element` into `bucket` unless `is_duplicate` accepts an
    /// element already in the chain. Returns the block now holding it.
    pub(crate) fn insert<E: BlockElement>(
        &mut self,
        bucket: u32,
        element: &E,
        is_duplicate: impl FnMut(&[u8]) -> bool,
        describe_key: impl FnOnce() -> String,
    ) -> Result<u32> {
        let lookup = self.lookup::<E>(bucket, is_duplicate)?;
        if lookup.search.hit.is_some() {
            return Err(StoreError::DuplicateKey(describe_key()));
        }

        append_to_chain(&mut self.blocks, &lookup.location, element)
    }

    /// Deletes the first element `matches` accepts from `bucket`.
    pub(crate) fn remove<E: BlockElement>(
        &mut self,
        bucket: u32,
        matches: impl FnMut(&[u8]) -> bool,
        describe_key: impl FnOnce() -> String,
    ) -> Result<u32> {
        let lookup = self.lookup::<E>(bucket, matches)?;
        let hit = lookup
            .search
            .hit
            .ok_or_else(|| StoreError::NotFound(describe_key()))?;

        remove_from_block::<E>(&mut self.blocks, hit.block, hit.position)?;
        Ok(hit.block)
    }

    /// Visits every element of the file in bucket order, then chain order,
    /// then slot order. Returns the total blocks read.
    pub(crate) fn for_each<E: BlockElement>(
        &mut self,
        mut visit: impl FnMut(u32, E),
    ) -> Result<u32> {
        let directory = read_chain_heads(&self.blocks, &self.header)?;
        let mut blocks_visited = HEADER_BLOCKS_VISITED + directory.blocks_visited;

        for head in directory.chain_heads {
            blocks_visited += for_each_in_chain::<E>(&self.blocks, head, &mut visit)?;
        }

        Ok(blocks_visited)
    }

    pub(crate) fn statistics(&mut self) -> Result<HashStatistics> {
        collect_statistics(&self.blocks, &self.header)
    }
}
