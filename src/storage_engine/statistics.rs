use crate::block_store::BlockFile;
use crate::storage_engine::bucket_directory::read_chain_heads;
use crate::storage_engine::chain::measure_chain;
use crate::storage_engine::hash_file::HashFile;
use crate::storage_engine::{Result, StoreError};
use bucket_store_layout::{BlockElement, FileHeader, FileKind, Record, SecondaryEntry};
use std::path::Path;

/// Load distribution of a hash file.
///
/// A bucket "has data" once a chain has been allocated for it; a bucket whose
/// records were all deleted keeps its (now empty) chain and still counts, with
/// zero elements.
#[derive(Debug, Clone, PartialEq)]
pub struct HashStatistics {
    pub kind: FileKind,
    /// Blocks in the file: header, directory, and data.
    pub file_blocks: u32,
    pub bucket_count: u32,
    pub elements_per_bucket: Vec<u64>,
    /// Chain length minus one for every bucket; zero for empty buckets.
    pub overflow_blocks_per_bucket: Vec<u32>,
    /// Smallest element count among buckets with data.
    pub min_elements: Option<u64>,
    /// Largest element count among buckets with data.
    pub max_elements: Option<u64>,
    /// Mean element count over buckets with data.
    pub average_elements: f64,
    /// Mean element count over every bucket.
    pub average_over_all_buckets: f64,
    pub total_elements: u64,
    pub total_overflow_blocks: u64,
    pub buckets_with_data: u32,
    pub directory_blocks: u32,
    pub data_blocks: u32,
}

/// Computes statistics for the hash file at `path` without claiming it in a
/// handle table, so it works whether or not the file is open elsewhere.
///
/// The file is opened read-only and may lack write permission.
pub fn statistics(path: &Path) -> Result<HashStatistics> {
    let blocks = BlockFile::open_read_only(path)?;
    let header = HashFile::load_header(&blocks)?;

    if !header.kind.is_hash_file() {
        return Err(StoreError::WrongFileKind {
            path: path.to_path_buf(),
            expected: "hash file",
            found: header.kind.label(),
        });
    }

    let stats = collect_statistics(&blocks, &header)?;
    blocks.close()?;
    Ok(stats)
}

/// Walks every directory block and every chain; reads block headers only.
pub(crate) fn collect_statistics(
    blocks: &BlockFile,
    header: &FileHeader,
) -> Result<HashStatistics> {
    let capacity = match header.kind {
        FileKind::PrimaryHash => Record::PER_BLOCK,
        FileKind::SecondaryHash => SecondaryEntry::PER_BLOCK,
        other => {
            return Err(StoreError::WrongFileKind {
                path: blocks.path().to_path_buf(),
                expected: "hash file",
                found: other.label(),
            });
        }
    };

    let directory = read_chain_heads(blocks, header)?;

    let bucket_count = header.bucket_count as usize;
    let mut elements_per_bucket = Vec::with_capacity(bucket_count);
    let mut overflow_blocks_per_bucket = Vec::with_capacity(bucket_count);
    let mut min_elements: Option<u64> = None;
    let mut max_elements: Option<u64> = None;
    let mut total_elements = 0u64;
    let mut buckets_with_data = 0u32;
    let mut data_blocks = 0u32;

    for head in directory.chain_heads {
        let shape = measure_chain(blocks, head, capacity)?;
        elements_per_bucket.push(shape.elements);
        data_blocks += shape.blocks;

        if head.is_none() {
            overflow_blocks_per_bucket.push(0);
            continue;
        }

        buckets_with_data += 1;
        total_elements += shape.elements;
        min_elements = Some(min_elements.map_or(shape.elements, |m| m.min(shape.elements)));
        max_elements = Some(max_elements.map_or(shape.elements, |m| m.max(shape.elements)));
        overflow_blocks_per_bucket.push(shape.blocks.saturating_sub(1));
    }

    let average_elements = if buckets_with_data > 0 {
        total_elements as f64 / buckets_with_data as f64
    } else {
        0.0
    };
    let average_over_all_buckets = total_elements as f64 / header.bucket_count as f64;
    let total_overflow_blocks = overflow_blocks_per_bucket.iter().map(|&n| n as u64).sum();

    Ok(HashStatistics {
        kind: header.kind,
        file_blocks: blocks.block_count(),
        bucket_count: header.bucket_count,
        elements_per_bucket,
        overflow_blocks_per_bucket,
        min_elements,
        max_elements,
        average_elements,
        average_over_all_buckets,
        total_elements,
        total_overflow_blocks,
        buckets_with_data,
        directory_blocks: directory.blocks_visited,
        data_blocks,
    })
}
