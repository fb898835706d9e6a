use clap::Parser;
use std::path::PathBuf;

use crate::utils::config::PackagePaths;

struct DefaultArgs;

impl DefaultArgs {
    pub const ROOT: &'static str = ".";
}

/// Record structural metadata for CSV objects announced by object-created events.
#[derive(Clone, Parser)]
#[command(name = "tabmeta")]
#[command(
    about = "Extract CSV metadata for an event batch; use --dry-run to print records without writing."
)]
pub struct Cli {
    /// Event JSON file (S3 notification shape). Reads stdin when omitted or `-`.
    #[arg(value_name = "EVENTS")]
    pub events: Option<PathBuf>,

    /// Object-store root: container `c` is the directory ROOT/c. Default: current directory.
    #[arg(long, short, default_value = DefaultArgs::ROOT)]
    pub root: PathBuf,

    /// Path to the metadata DB. Default: `.tabmeta` in ROOT.
    #[arg(long, short)]
    pub db: Option<PathBuf>,

    /// Backfill: build one notification per file under ROOT/CONTAINER instead of reading events.
    #[arg(long, value_name = "CONTAINER", conflicts_with = "events")]
    pub scan: Option<String>,

    /// Run the pipeline and print records as JSON lines; do not write to the DB.
    #[arg(long)]
    pub dry_run: bool,

    /// Print every stored record as JSON lines after the run.
    #[arg(long, short = 'l', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub list: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Size ceiling in bytes; objects at or above it are skipped.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub max_bytes: Option<u64>,

    /// Encrypt the metadata DB with SQLCipher. Prompts for passphrase (or use TABMETA_DB_KEY / .env).
    #[arg(long, short = 'x', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub encrypt: Option<bool>,
}

impl Cli {
    /// Get the database path, defaulting to the package db filename in the root.
    pub fn db_path(&self) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| self.root.join(PackagePaths::get().output_filename()))
    }
}
