#[cfg(test)]
mod tests {

    use bucket_store::{PrimaryHashFile, Record, StoreError};
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// Helper function to create (but not open) a primary hash file in a temp dir
    fn create_temp_primary(bucket_count: u32) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("primary.db");

        PrimaryHashFile::create(&path, bucket_count).expect("Failed to create primary");
        (dir, path)
    }

    fn person(id: i32) -> Record {
        Record::new(
            id,
            format!("Name{id}"),
            format!("Surname{id}"),
            format!("{id} Example Street"),
        )
        .expect("valid record")
    }

    fn ids(records: &[Record]) -> Vec<i32> {
        records.iter().map(Record::id).collect()
    }

    #[test]
    fn test_twelve_buckets_seventeen_ids() {
        let (_dir, path) = create_temp_primary(12);
        let mut primary = PrimaryHashFile::open(&path).expect("open");

        for id in 1..=17 {
            primary.insert(&person(id)).expect("insert");
        }

        let all = primary.scan(None).expect("scan all");
        assert_eq!(
            ids(&all.records),
            vec![5, 12, 13, 10, 1, 8, 15, 2, 16, 6, 9, 4, 3, 17, 14, 7, 11],
            "full scan must follow bucket, chain, then slot order"
        );
        // header + directory + 10 data blocks
        assert_eq!(all.blocks_visited, 12);

        let one = primary.scan(Some(5)).expect("scan id 5");
        assert_eq!(one.records, vec![person(5)]);
        // header + directory + the single data block of bucket 0
        assert_eq!(one.blocks_visited, 3);

        let stats = primary.statistics().expect("statistics");
        assert_eq!(stats.file_blocks, 12);
        assert_eq!(stats.buckets_with_data, 10);
        assert_eq!(stats.min_elements, Some(1));
        assert_eq!(stats.max_elements, Some(3));
        assert_eq!(stats.total_elements, 17);
        assert_eq!(stats.total_overflow_blocks, 0);
        assert_eq!(stats.elements_per_bucket[10], 0);
        assert_eq!(stats.elements_per_bucket[11], 0);
    }

    #[test]
    fn test_insert_returns_owning_block() {
        let (_dir, path) = create_temp_primary(12);
        let mut primary = PrimaryHashFile::open(&path).expect("open");

        // Block 0 is the header and block 1 the directory; chains start at 2.
        assert_eq!(primary.insert(&person(1)).expect("insert 1"), 2);
        assert_eq!(primary.insert(&person(2)).expect("insert 2"), 3);
        // Same bucket as id 1
        assert_eq!(primary.insert(&person(8)).expect("insert 8"), 2);

        let placed: Vec<(u32, i32)> = primary
            .records_with_blocks()
            .expect("records with blocks")
            .into_iter()
            .map(|(block, record)| (block, record.id()))
            .collect();
        assert_eq!(placed, vec![(2, 1), (2, 8), (3, 2)]);
    }

    #[test]
    fn test_round_trip_exact_fields() {
        let (_dir, path) = create_temp_primary(5);
        let mut primary = PrimaryHashFile::open(&path).expect("open");

        let longest = Record::new(
            i32::MIN,
            "n".repeat(14),
            "s".repeat(24),
            "a".repeat(49),
        )
        .expect("fields at their maximum width");

        primary.insert(&longest).expect("insert");
        primary.insert(&person(-7)).expect("insert negative id");

        assert_eq!(primary.get(i32::MIN).expect("get"), longest);
        assert_eq!(primary.get(-7).expect("get"), person(-7));
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let (_dir, path) = create_temp_primary(3);
        let mut primary = PrimaryHashFile::open(&path).expect("open");

        primary.insert(&person(42)).expect("first insert");
        let err = primary
            .insert(&Record::new(42, "Other", "Person", "Elsewhere").expect("record"))
            .expect_err("duplicate id must fail");

        assert!(matches!(err, StoreError::DuplicateKey(ref key) if key == "42"));
        assert_eq!(primary.scan(None).expect("scan").records, vec![person(42)]);
        assert_eq!(primary.statistics().expect("stats").total_elements, 1);
    }

    #[test]
    fn test_delete_then_lookup() {
        let (_dir, path) = create_temp_primary(4);
        let mut primary = PrimaryHashFile::open(&path).expect("open");

        for id in 0..20 {
            primary.insert(&person(id)).expect("insert");
        }

        primary.delete(7).expect("delete");

        assert!(matches!(primary.scan(Some(7)), Err(StoreError::NotFound(_))));
        assert!(matches!(primary.delete(7), Err(StoreError::NotFound(_))));

        for id in (0..20).filter(|&id| id != 7) {
            assert_eq!(primary.get(id).expect("still present"), person(id));
        }
        assert_eq!(primary.scan(None).expect("scan").records.len(), 19);
    }

    #[test]
    fn test_overflow_chain_and_slot_reuse() {
        let (_dir, path) = create_temp_primary(1);
        let mut primary = PrimaryHashFile::open(&path).expect("open");

        // Five records per block: ids 1..=11 need three chained blocks.
        let blocks: Vec<u32> = (1..=11)
            .map(|id| primary.insert(&person(id)).expect("insert"))
            .collect();
        assert_eq!(blocks, vec![2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 4]);

        let last = primary.scan(Some(11)).expect("scan id 11");
        assert_eq!(last.blocks_visited, 5);

        let stats = primary.statistics().expect("stats");
        assert_eq!(stats.file_blocks, 5);
        assert_eq!(stats.overflow_blocks_per_bucket, vec![2]);
        assert_eq!(stats.data_blocks, 3);

        // Deleting from the head block frees a slot that the next insert reuses.
        primary.delete(3).expect("delete");
        assert_eq!(primary.insert(&person(12)).expect("insert 12"), 2);

        let order = ids(&primary.scan(None).expect("scan").records);
        assert_eq!(order, vec![1, 2, 4, 5, 12, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_emptied_block_stays_linked() {
        let (_dir, path) = create_temp_primary(1);
        let mut primary = PrimaryHashFile::open(&path).expect("open");

        for id in 1..=6 {
            primary.insert(&person(id)).expect("insert");
        }
        for id in 1..=5 {
            primary.delete(id).expect("delete");
        }

        let all = primary.scan(None).expect("scan");
        assert_eq!(ids(&all.records), vec![6]);
        // The emptied head block is still walked.
        assert_eq!(all.blocks_visited, 4);

        let stats = primary.statistics().expect("stats");
        assert_eq!(stats.file_blocks, 4);
        assert_eq!(stats.overflow_blocks_per_bucket, vec![1]);
    }

    #[test]
    fn test_many_buckets_span_directory_blocks() {
        // 127 slots per directory block: 300 buckets need three.
        let (_dir, path) = create_temp_primary(300);
        let mut primary = PrimaryHashFile::open(&path).expect("open");

        for id in 0..600 {
            primary.insert(&person(id)).expect("insert");
        }

        let all = primary.scan(None).expect("scan");
        assert_eq!(all.records.len(), 600);

        let stats = primary.statistics().expect("stats");
        assert_eq!(stats.directory_blocks, 3);
        assert_eq!(stats.bucket_count, 300);
        assert_eq!(stats.elements_per_bucket.len(), 300);
        assert_eq!(
            all.blocks_visited,
            1 + stats.directory_blocks + stats.data_blocks
        );

        for id in [0, 299, 599] {
            assert_eq!(primary.get(id).expect("get"), person(id));
        }
    }
}
