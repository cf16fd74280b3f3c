use crate::block_store::BlockFile;
use crate::storage_engine::{Result, StoreError};
use bucket_store_layout::constants::{SLOTS_PER_DIRECTORY_BLOCK, directory_blocks_for};
use bucket_store_layout::{
    FileHeader, init_directory_block, live_directory_slots, read_chain_head, read_directory_next,
    write_chain_head, write_directory_next,
};
use tracing::debug;

/// Position of one bucket's chain head inside the directory.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BucketSlot {
    pub directory_block: u32,
    pub slot: usize,
    pub chain_head: Option<u32>,
    /// Directory blocks read on the way, including the one holding the slot.
    pub blocks_visited: u32,
}

/// Chain heads of every bucket, in bucket order.
#[derive(Debug)]
pub(crate) struct DirectoryScan {
    pub chain_heads: Vec<Option<u32>>,
    pub blocks_visited: u32,
}

/// Allocates, initializes, and links the directory blocks of a new file.
///
/// Returns the index of the first directory block; the caller links it from
/// the file header.
pub(crate) fn create_directory(blocks: &mut BlockFile, bucket_count: u32) -> Result<u32> {
    let required = directory_blocks_for(bucket_count);
    let mut first = None;
    let mut previous: Option<u32> = None;

    for ordinal in 0..required {
        let index = blocks.allocate_block()?;
        init_directory_block(
            blocks.read_block(index)?,
            live_directory_slots(ordinal, bucket_count),
        );
        blocks.write_block(index)?;

        match previous {
            Some(prev) => {
                write_directory_next(blocks.read_block(prev)?, Some(index));
                blocks.write_block(prev)?;
            }
            None => first = Some(index),
        }
        previous = Some(index);
    }

    debug!(
        "Created directory of {} block(s) for {} buckets",
        required, bucket_count
    );

    first.ok_or(StoreError::InvalidBucketCount(bucket_count))
}

/// Walks the directory to the block that owns `bucket` and reads its chain
/// head.
pub(crate) fn locate_bucket(
    blocks: &BlockFile,
    header: &FileHeader,
    bucket: u32,
) -> Result<BucketSlot> {
    let ordinal = bucket as usize / SLOTS_PER_DIRECTORY_BLOCK;
    let slot = bucket as usize % SLOTS_PER_DIRECTORY_BLOCK;

    let mut current = header.first_directory_block;
    let mut blocks_visited = 0u32;

    loop {
        let index = current.ok_or_else(|| {
            StoreError::Corrupt(format!("directory ends before bucket {}", bucket))
        })?;
        let block = blocks.block(index)?;
        blocks_visited += 1;

        if blocks_visited as usize == ordinal + 1 {
            return Ok(BucketSlot {
                directory_block: index,
                slot,
                chain_head: read_chain_head(block, slot)?,
                blocks_visited,
            });
        }

        current = read_directory_next(block)?;
    }
}

/// Points a bucket's directory slot at `head` and persists the block.
pub(crate) fn set_chain_head(
    blocks: &mut BlockFile,
    location: &BucketSlot,
    head: Option<u32>,
) -> Result<()> {
    write_chain_head(blocks.read_block(location.directory_block)?, location.slot, head);
    blocks.write_block(location.directory_block)?;
    Ok(())
}

/// Reads every live chain head, visiting each directory block once.
pub(crate) fn read_chain_heads(
    blocks: &BlockFile,
    header: &FileHeader,
) -> Result<DirectoryScan> {
    let expected_blocks = directory_blocks_for(header.bucket_count);
    let mut chain_heads = Vec::with_capacity(header.bucket_count as usize);
    let mut current = header.first_directory_block;
    let mut blocks_visited = 0u32;

    while let Some(index) = current {
        if blocks_visited >= expected_blocks {
            return Err(StoreError::Corrupt(format!(
                "directory has more than the {} blocks {} buckets need",
                expected_blocks, header.bucket_count
            )));
        }

        let block = blocks.block(index)?;
        let live = live_directory_slots(blocks_visited, header.bucket_count);
        for slot in 0..live {
            chain_heads.push(read_chain_head(block, slot)?);
        }
        blocks_visited += 1;

        current = read_directory_next(block)?;
    }

    if chain_heads.len() != header.bucket_count as usize {
        return Err(StoreError::Corrupt(format!(
            "directory holds {} chain heads, header declares {} buckets",
            chain_heads.len(),
            header.bucket_count
        )));
    }

    Ok(DirectoryScan {
        chain_heads,
        blocks_visited,
    })
}
