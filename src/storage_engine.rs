mod store_error;
pub use store_error::{Result, StoreError};

mod handle_table;
pub use handle_table::HandleTable;

pub mod digest;

mod bucket_directory;
mod chain;
mod hash_file;

mod primary_hash_file;
pub use primary_hash_file::{PrimaryHashFile, ScanOutcome};

mod secondary_hash_file;
pub use secondary_hash_file::{BootstrapSummary, JoinedRecord, SecondaryHashFile};

mod statistics;
pub use statistics::{HashStatistics, statistics};
