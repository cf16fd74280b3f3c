//! Overflow chains: the singly linked data blocks hanging off one bucket.
//!
//! Elements inside a block are packed densely in `[0, element_count)`. Blocks
//! are appended to the tail when every block in the chain is full and are
//! never unlinked, even when a delete empties them.

use crate::block_store::BlockFile;
use crate::storage_engine::bucket_directory::{BucketSlot, set_chain_head};
use crate::storage_engine::{Result, StoreError};
use bucket_store_layout::constants::{BLOCK_SIZE, DATA_HEADER_SIZE};
use bucket_store_layout::{BlockElement, DataBlockHeader, data_element_range};
use std::ops::ControlFlow;
use tracing::trace;

/// An element found in a chain, with where it lives.
#[derive(Debug)]
pub(crate) struct ChainHit<E> {
    pub block: u32,
    pub position: usize,
    pub element: E,
}

#[derive(Debug)]
pub(crate) struct ChainSearch<E> {
    pub hit: Option<ChainHit<E>>,
    /// Data blocks read, including the one holding the hit.
    pub blocks_visited: u32,
}

/// Element and block totals of one chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ChainShape {
    pub elements: u64,
    pub blocks: u32,
}

/// Visits each block of the chain starting at `head`, in chain order.
///
/// `visit` gets the block index, the block bytes, and the decoded header, and
/// may stop the walk early with `ControlFlow::Break`. Returns the break value
/// (if any) and the number of blocks read.
fn walk_chain<T>(
    blocks: &BlockFile,
    head: Option<u32>,
    capacity: usize,
    mut visit: impl FnMut(u32, &[u8], DataBlockHeader) -> Result<ControlFlow<T>>,
) -> Result<(Option<T>, u32)> {
    let max_blocks = blocks.block_count();
    let mut current = head;
    let mut blocks_visited = 0u32;

    while let Some(index) = current {
        if blocks_visited >= max_blocks {
            return Err(StoreError::Corrupt(format!(
                "chain starting at block {:?} loops",
                head
            )));
        }

        let block = blocks.block(index)?;
        let header = DataBlockHeader::deserialize(block)?;
        blocks_visited += 1;

        if header.element_count as usize > capacity {
            return Err(StoreError::Corrupt(format!(
                "data block {} claims {} elements, capacity is {}",
                index, header.element_count, capacity
            )));
        }

        if let ControlFlow::Break(found) = visit(index, block, header)? {
            return Ok((Some(found), blocks_visited));
        }

        current = header.next_block;
    }

    Ok((None, blocks_visited))
}

/// Finds the first element in chain order whose encoded bytes satisfy
/// `matches`.
pub(crate) fn search_chain<E: BlockElement>(
    blocks: &BlockFile,
    head: Option<u32>,
    mut matches: impl FnMut(&[u8]) -> bool,
) -> Result<ChainSearch<E>> {
    let (hit, blocks_visited) = walk_chain(blocks, head, E::PER_BLOCK, |index, block, header| {
        for position in 0..header.element_count as usize {
            let encoded = &block[data_element_range(position, E::SIZE)];
            if matches(encoded) {
                return Ok(ControlFlow::Break(ChainHit {
                    block: index,
                    position,
                    element: E::deserialize(encoded)?,
                }));
            }
        }
        Ok(ControlFlow::Continue(()))
    })?;

    Ok(ChainSearch {
        hit,
        blocks_visited,
    })
}

/// Decodes every element of the chain in order, handing each to `visit`
/// with the index of the block holding it. Returns blocks read.
pub(crate) fn for_each_in_chain<E: BlockElement>(
    blocks: &BlockFile,
    head: Option<u32>,
    mut visit: impl FnMut(u32, E),
) -> Result<u32> {
    let (_, blocks_visited) =
        walk_chain::<()>(blocks, head, E::PER_BLOCK, |index, block, header| {
            for position in 0..header.element_count as usize {
                let encoded = &block[data_element_range(position, E::SIZE)];
                visit(index, E::deserialize(encoded)?);
            }
            Ok(ControlFlow::Continue(()))
        })?;
    Ok(blocks_visited)
}

/// Counts elements and blocks in a chain from the block headers alone.
pub(crate) fn measure_chain(
    blocks: &BlockFile,
    head: Option<u32>,
    capacity: usize,
) -> Result<ChainShape> {
    let mut elements = 0u64;
    let (_, blocks_visited) = walk_chain::<()>(blocks, head, capacity, |_, _, header| {
        elements += header.element_count as u64;
        Ok(ControlFlow::Continue(()))
    })?;
    Ok(ChainShape {
        elements,
        blocks: blocks_visited,
    })
}

/// Stores `element` in the first chain block with a free slot, or in a new
/// block linked at the tail (or as the head, for an empty bucket).
///
/// Returns the index of the block that now holds the element. Duplicate
/// checks are the caller's job.
pub(crate) fn append_to_chain<E: BlockElement>(
    blocks: &mut BlockFile,
    location: &BucketSlot,
    element: &E,
) -> Result<u32> {
    let mut tail = None;
    let (with_room, _) =
        walk_chain(blocks, location.chain_head, E::PER_BLOCK, |index, _, header| {
            if (header.element_count as usize) < E::PER_BLOCK {
                return Ok(ControlFlow::Break(index));
            }
            tail = Some(index);
            Ok(ControlFlow::Continue(()))
        })?;

    if let Some(index) = with_room {
        let block = blocks.read_block(index)?;
        let mut header = DataBlockHeader::deserialize(block)?;
        let slot = data_element_range(header.element_count as usize, E::SIZE);
        element.serialize_into(&mut block[slot]);
        header.element_count += 1;
        header.serialize_into(block);
        blocks.write_block(index)?;
        return Ok(index);
    }

    let index = blocks.allocate_block()?;
    {
        let block = blocks.read_block(index)?;
        DataBlockHeader {
            element_count: 1,
            next_block: None,
        }
        .serialize_into(block);
        element.serialize_into(&mut block[data_element_range(0, E::SIZE)]);
    }
    blocks.write_block(index)?;

    match tail {
        Some(tail_index) => {
            let block = blocks.read_block(tail_index)?;
            let mut header = DataBlockHeader::deserialize(block)?;
            header.next_block = Some(index);
            header.serialize_into(block);
            blocks.write_block(tail_index)?;
            trace!("Linked overflow block {} after {}", index, tail_index);
        }
        None => {
            set_chain_head(blocks, location, Some(index))?;
            trace!(
                "Installed block {} as chain head of directory slot {}",
                index, location.slot
            );
        }
    }

    Ok(index)
}

/// Removes the element at `position` of data block `index`: later elements
/// shift left by one, the freed tail is zeroed, and only that block is
/// written. The chain itself is left as is.
pub(crate) fn remove_from_block<E: BlockElement>(
    blocks: &mut BlockFile,
    index: u32,
    position: usize,
) -> Result<()> {
    let block = blocks.read_block(index)?;
    let mut header = DataBlockHeader::deserialize(block)?;
    let count = header.element_count as usize;

    if position >= count {
        return Err(StoreError::Corrupt(format!(
            "position {} is past the {} elements of block {}",
            position, count, index
        )));
    }

    let removed = data_element_range(position, E::SIZE);
    let used_end = DATA_HEADER_SIZE + count * E::SIZE;
    block.copy_within(removed.end..used_end, removed.start);

    header.element_count -= 1;
    let live_end = DATA_HEADER_SIZE + header.element_count as usize * E::SIZE;
    block[live_end..BLOCK_SIZE].fill(0);
    header.serialize_into(block);

    blocks.write_block(index)?;
    Ok(())
}
