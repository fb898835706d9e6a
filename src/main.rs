//! tabmeta CLI: extract CSV metadata for an event batch; use --dry-run to print without writing.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use tabmeta::engine::arg_parser::Cli;
use tabmeta::engine::handle_run;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
