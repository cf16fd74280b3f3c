mod block_file;
pub use block_file::{BlockFile, MAX_BLOCK_INDEX};

pub use bucket_store_layout::constants::BLOCK_SIZE;
