use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty primary hash file
    Create {
        /// Number of buckets (fixed for the life of the file)
        #[arg(short = 'b', long = "buckets", value_name = "N")]
        buckets: u32,
    },

    /// Insert a record into a primary hash file
    Insert {
        /// Record id (the primary key)
        #[arg(allow_negative_numbers = true)]
        id: i32,
        name: String,
        surname: String,
        address: String,
    },

    /// Delete the record with the given id
    Delete {
        #[arg(allow_negative_numbers = true)]
        id: i32,
    },

    /// Print every record, or only the record with `--id`
    Scan {
        #[arg(long = "id", value_name = "ID", allow_negative_numbers = true)]
        id: Option<i32>,
    },

    /// Create a secondary (surname) index over an existing primary hash file
    Index {
        /// Number of buckets in the index
        #[arg(short = 'b', long = "buckets", value_name = "N")]
        buckets: u32,

        /// The primary hash file to index
        #[arg(short = 'p', long = "primary", value_name = "PRIMARY")]
        primary: PathBuf,
    },

    /// Insert a record into the primary and index it in this secondary file
    IndexInsert {
        #[arg(allow_negative_numbers = true)]
        id: i32,
        name: String,
        surname: String,
        address: String,

        #[arg(short = 'p', long = "primary", value_name = "PRIMARY")]
        primary: PathBuf,
    },

    /// Look up a record by surname through this secondary file
    Lookup {
        surname: String,

        #[arg(short = 'p', long = "primary", value_name = "PRIMARY")]
        primary: PathBuf,
    },

    /// Print bucket statistics for a primary or secondary hash file
    Stats,
}
