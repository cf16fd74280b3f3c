//! On-disk layouts shared by every bucket-store hash file.
//!
//! Every structure that lands in a block is encoded explicitly, little-endian,
//! with no implicit padding. The byte ranges live in [`constants`] so the
//! format can be audited in one place.

pub mod constants;

pub mod layout_error;
pub use layout_error::LayoutError;

pub mod block_link;
pub use block_link::*;

pub mod fixed_str;
pub use fixed_str::*;

pub mod file_header;
pub use file_header::*;

pub mod directory_block;
pub use directory_block::*;

pub mod data_block_header;
pub use data_block_header::*;

pub mod block_element;
pub use block_element::BlockElement;

pub mod record;
pub use record::Record;

pub mod secondary_entry;
pub use secondary_entry::SecondaryEntry;
