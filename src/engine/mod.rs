//! Engine module: encoding, CSV scanning, metadata DB, CLI plumbing

pub mod arg_parser;
pub mod cli;
pub mod db_ops;
pub mod encoding;
pub mod tabular;
pub mod tools;

use thiserror::Error;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use db_ops::{
    SqliteMetadataStore, get_record, load_records, open_db, open_db_in_memory, record_count,
};
pub use encoding::{decode_text, detect_encoding};
pub use tabular::{Parsed, parse_table};
pub use tools::{has_extension, path_relative_to, path_to_object_key};

/// A file whose bytes or text cannot be turned into a table. Recoverable: the file is skipped.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("bytes are not valid {encoding}")]
    Decode { encoding: &'static str },

    #[error("malformed csv: {0}")]
    Parse(#[from] csv::Error),
}
