//! # bucket-store
//!
//! A fixed-block storage engine with two static hash file kinds:
//!
//! - [`PrimaryHashFile`] stores [`Record`]s keyed by their integer `id`.
//! - [`SecondaryHashFile`] maps a surname to the primary data block holding
//!   the record with that surname, and joins back to the primary on lookup.
//!
//! Both kinds share one layout: a header block, a chain of directory blocks
//! mapping each bucket to the head of its overflow chain, and 512-byte data
//! blocks. The bucket count is fixed at creation.
//!
//! ```no_run
//! use bucket_store::{PrimaryHashFile, Record, SecondaryHashFile};
//! use std::path::Path;
//!
//! # fn main() -> bucket_store::Result<()> {
//! let primary_path = Path::new("people.db");
//! PrimaryHashFile::create(primary_path, 12)?;
//!
//! let mut primary = PrimaryHashFile::open(primary_path)?;
//! primary.insert(&Record::new(1, "Ada", "Lovelace", "12 St James's Square")?)?;
//! primary.close()?;
//!
//! SecondaryHashFile::create(Path::new("people.surname.db"), 7, primary_path)?;
//!
//! let mut primary = PrimaryHashFile::open(primary_path)?;
//! let mut index = SecondaryHashFile::open(Path::new("people.surname.db"))?;
//! let joined = index.lookup("Lovelace", &mut primary)?;
//! assert_eq!(joined.record.id(), 1);
//! # Ok(())
//! # }
//! ```

pub mod block_store;
pub use block_store::BlockFile;

pub mod cli;

pub mod storage_engine;
pub use storage_engine::*;

pub mod utils;

pub use bucket_store_layout::{FileKind, LayoutError, Record, SecondaryEntry};
