use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

/// Module path without the crate prefix: `tabmeta::pipeline::orchestrator` → `pipeline::orchestrator`.
fn module_of(target: &str) -> &str {
    target
        .strip_prefix(concat!(env!("CARGO_PKG_NAME"), "::"))
        .unwrap_or(target)
}

/// Info lines carry only the `[tabmeta]` tag. Warnings, errors and debug traces also name the
/// emitting module, so a per-object trace shows which stage (store, pipeline, db) produced it.
fn format_line(level: Level, target: &str, msg: &str) -> String {
    let name = env!("CARGO_PKG_NAME").cyan();
    let module = module_of(target);
    match level {
        Level::Error => format!("[{} {} {}] {}", name, "ERROR".red().bold(), module.white(), msg),
        Level::Warn => format!("[{} {} {}] {}", name, "WARN".yellow(), module.white(), msg),
        Level::Info => format!("[{}] {}", name, msg),
        Level::Debug | Level::Trace => format!("[{} {}] {}", name, module.dimmed(), msg),
    }
}

pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // try_init: library callers may have installed a logger already.
    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn) // dependencies (rusqlite, csv): warnings only
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let msg = record.args().to_string();
            writeln!(buf, "{}", format_line(record.level(), record.target(), &msg))
        })
        .try_init();
}
