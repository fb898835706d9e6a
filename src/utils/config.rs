//! Application configuration constants.
//! Admission limits, formats, and package-derived names in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    db_filename: String,
    config_filename: String,
    key_env_var: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                db_filename: format!(".{pkg}"),
                config_filename: format!(".{pkg}.toml"),
                key_env_var: format!("{}_DB_KEY", pkg.to_uppercase()),
            }
        })
    }

    /// Default metadata DB filename, placed in the object-store root.
    pub fn output_filename(&self) -> &str {
        &self.db_filename
    }

    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Env var holding the SQLCipher passphrase (e.g. `TABMETA_DB_KEY`).
    pub fn key_env_var(&self) -> &str {
        &self.key_env_var
    }
}

// ---- Admission ----

/// Only objects whose key ends with this suffix (case-insensitive) are admitted.
pub const TABULAR_EXTENSION: &str = ".csv";

/// Objects at or above this size are rejected (bytes). 10 MiB.
pub const MAX_OBJECT_BYTES: u64 = 10 * 1024 * 1024;

// ---- Records ----

/// `ingested_at` format: UTC, seconds resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---- Database ----

/// Table holding one row per object key.
pub const METADATA_TABLE: &str = "metadata";
