#[cfg(test)]
mod tests {

    use bucket_store::{
        BlockFile, FileKind, HandleTable, PrimaryHashFile, Record, SecondaryHashFile, StoreError,
    };
    use bucket_store_layout::FileHeader;
    use std::io::ErrorKind;
    use tempfile::tempdir;

    fn person(id: i32) -> Record {
        Record::new(id, "Grace", format!("Hopper{id}"), "Arlington").expect("valid record")
    }

    #[test]
    fn test_reopen_sees_persisted_data() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("primary.db");
        PrimaryHashFile::create(&path, 6).expect("create");

        {
            let mut primary = PrimaryHashFile::open(&path).expect("open");
            for id in 0..30 {
                primary.insert(&person(id)).expect("insert");
            }
            primary.delete(10).expect("delete");
            primary.close().expect("close");
        }

        let mut primary = PrimaryHashFile::open(&path).expect("reopen");
        assert_eq!(primary.bucket_count().expect("bucket count"), 6);
        assert_eq!(primary.scan(None).expect("scan").records.len(), 29);
        assert_eq!(primary.get(29).expect("get"), person(29));
        assert!(matches!(primary.get(10), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_cannot_open_twice() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("primary.db");
        PrimaryHashFile::create(&path, 2).expect("create");

        let mut first = PrimaryHashFile::open(&path).expect("open");
        assert!(HandleTable::global().is_open(&path));
        assert!(matches!(
            PrimaryHashFile::open(&path),
            Err(StoreError::AlreadyOpen(_))
        ));

        first.close().expect("close");
        assert!(!HandleTable::global().is_open(&path));
        PrimaryHashFile::open(&path).expect("open after close");
    }

    #[test]
    fn test_drop_releases_handle() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("primary.db");
        PrimaryHashFile::create(&path, 2).expect("create");

        {
            let _primary = PrimaryHashFile::open(&path).expect("open");
        }

        PrimaryHashFile::open(&path).expect("open after drop");
    }

    #[test]
    fn test_second_handle_under_another_path_is_refused() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("primary.db");
        let alias = dir.path().join(".").join("primary.db");
        PrimaryHashFile::create(&path, 12).expect("create");

        let mut first = PrimaryHashFile::open(&path).expect("open");
        assert!(matches!(
            PrimaryHashFile::open(&alias),
            Err(StoreError::AlreadyOpen(_))
        ));
        assert!(HandleTable::global().is_open(&alias));

        // The single handle keeps allocating fresh blocks for new buckets.
        assert_eq!(first.insert(&person(1)).expect("insert 1"), 2);
        assert_eq!(first.insert(&person(2)).expect("insert 2"), 3);
        first.close().expect("close");

        let mut reopened = PrimaryHashFile::open(&alias).expect("reopen via alias");
        assert_eq!(reopened.get(1).expect("get 1"), person(1));
        assert_eq!(reopened.get(2).expect("get 2"), person(2));
    }

    #[test]
    fn test_open_index_blocks_a_second_index_handle() {
        let dir = tempdir().expect("Failed to create temp dir");
        let primary_path = dir.path().join("primary.db");
        let index_path = dir.path().join("surname.db");
        PrimaryHashFile::create(&primary_path, 3).expect("create primary");
        SecondaryHashFile::create(&index_path, 3, &primary_path).expect("create index");

        let _index = SecondaryHashFile::open(&index_path).expect("open index");
        assert!(matches!(
            SecondaryHashFile::open(&dir.path().join(".").join("surname.db")),
            Err(StoreError::AlreadyOpen(_))
        ));
    }

    #[test]
    fn test_closed_handle_rejects_everything() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("primary.db");
        PrimaryHashFile::create(&path, 2).expect("create");

        let mut primary = PrimaryHashFile::open(&path).expect("open");
        primary.close().expect("first close");

        assert!(!primary.is_open());
        assert!(matches!(primary.close(), Err(StoreError::NotOpen)));
        assert!(matches!(primary.insert(&person(1)), Err(StoreError::NotOpen)));
        assert!(matches!(primary.delete(1), Err(StoreError::NotOpen)));
        assert!(matches!(primary.scan(None), Err(StoreError::NotOpen)));
        assert!(matches!(primary.statistics(), Err(StoreError::NotOpen)));
        assert!(matches!(primary.bucket_count(), Err(StoreError::NotOpen)));
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("primary.db");

        assert!(matches!(
            PrimaryHashFile::create(&path, 0),
            Err(StoreError::InvalidBucketCount(0))
        ));
        assert!(!path.exists(), "no file is created for a zero bucket count");

        PrimaryHashFile::create(&path, 3).expect("create");
        match PrimaryHashFile::create(&path, 3) {
            Err(StoreError::IoFailure(err)) => assert_eq!(err.kind(), ErrorKind::AlreadyExists),
            other => panic!("expected AlreadyExists, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_open_checks_file_kind() {
        let dir = tempdir().expect("Failed to create temp dir");
        let primary_path = dir.path().join("primary.db");
        let secondary_path = dir.path().join("secondary.db");

        PrimaryHashFile::create(&primary_path, 3).expect("create primary");
        SecondaryHashFile::create(&secondary_path, 3, &primary_path).expect("create secondary");

        assert!(matches!(
            PrimaryHashFile::open(&secondary_path),
            Err(StoreError::WrongFileKind { .. })
        ));
        assert!(matches!(
            SecondaryHashFile::open(&primary_path),
            Err(StoreError::WrongFileKind { .. })
        ));
        // A failed open must not leave a claim behind.
        assert!(!HandleTable::global().is_open(&secondary_path));
    }

    #[test]
    fn test_open_rejects_partial_blocks() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("torn.db");
        std::fs::write(&path, vec![0u8; 700]).expect("write");

        match PrimaryHashFile::open(&path) {
            Err(StoreError::IoFailure(err)) => assert_eq!(err.kind(), ErrorKind::InvalidData),
            other => panic!("expected InvalidData, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_open_rejects_zero_bucket_header() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("zero.db");

        BlockFile::create(&path).expect("create");
        let mut blocks = BlockFile::open(&path).expect("open");
        let index = blocks.allocate_block().expect("allocate");
        let header = FileHeader::new(FileKind::PrimaryHash, 0).serialize();
        blocks.read_block(index).expect("read")[..header.len()].copy_from_slice(&header);
        blocks.write_block(index).expect("write");
        blocks.close().expect("close");

        assert!(matches!(
            PrimaryHashFile::open(&path),
            Err(StoreError::Corrupt(_))
        ));
        assert!(matches!(
            bucket_store::statistics(&path),
            Err(StoreError::Corrupt(_))
        ));
        assert!(!HandleTable::global().is_open(&path));
    }
}
