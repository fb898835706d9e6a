//! CLI command handler: ingest by default; --dry-run prints records instead of writing them.

use anyhow::Result;
use log::{debug, warn};

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::ingest::{dry_run_batch, ingest_batch, print_records, read_events, scan_container};
use crate::utils::setup_logging;
use crate::utils::tabmeta_toml::{apply_file_to_opts, load_tabmeta_toml};

/// Defaults, then `.tabmeta.toml` in the root, then CLI flags.
fn setup_opts(cli: &Cli) -> Opts {
    let mut opts = Opts::default();
    if let Some(file) = load_tabmeta_toml(&cli.root) {
        apply_file_to_opts(&file, &mut opts);
    }
    if cli.db.is_some() {
        opts.db_path = Some(cli.db_path());
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    if let Some(v) = cli.list {
        opts.list_records = v;
    }
    if let Some(v) = cli.encrypt {
        opts.encrypt = v;
    }
    if let Some(v) = cli.max_bytes {
        opts.max_bytes = v;
    }
    opts.write_to_db = !cli.dry_run;
    opts
}

/// Run one batch: from `--scan CONTAINER` or the event document. Fails when the batch aborts.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli);
    setup_logging(opts.verbose);
    debug!("{} CONFIG:{:#?}", env!("CARGO_PKG_NAME").to_uppercase(), opts);

    let batch = match cli.scan {
        Some(ref container) => scan_container(&cli.root, container)?,
        None => read_events(cli.events.as_deref())?,
    };
    debug!("Batch of {} notifications", batch.len());

    if opts.write_to_db {
        ingest_batch(&cli.root, &batch, &opts)?;
    } else {
        warn!("RUNNING IN DRY-RUN MODE. NO RECORDS WILL BE WRITTEN TO THE DB.");
        let records = dry_run_batch(&cli.root, &batch, &opts)?;
        print_records(&records)?;
    }
    Ok(())
}
