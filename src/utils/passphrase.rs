//! SQLCipher passphrase for the metadata DB: `TABMETA_DB_KEY`, then `.env` in the store root, then a
//! prompt naming the DB file.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;

/// Where a non-interactive passphrase came from.
#[derive(Debug, PartialEq, Eq)]
enum KeySource {
    Env,
    DotEnv(PathBuf),
}

fn read_key_var(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Env var first; otherwise load `root/.env` (if any) and look again.
fn find_passphrase(root: &Path) -> Option<(String, KeySource)> {
    let var = PackagePaths::get().key_env_var();
    if let Some(s) = read_key_var(var) {
        return Some((s, KeySource::Env));
    }
    let env_path = root.join(".env");
    if !env_path.is_file() {
        return None;
    }
    let _ = dotenvy::from_path(&env_path);
    read_key_var(var).map(|s| (s, KeySource::DotEnv(env_path)))
}

/// Passphrase for the metadata DB at `db_path`. `is_new`: the DB is about to be created, so the
/// prompt asks for a new passphrase and a lost-key warning follows.
pub fn get_passphrase(root: &Path, db_path: &Path, is_new: bool) -> Result<String> {
    let var = PackagePaths::get().key_env_var();
    if is_new {
        info!("Creating encrypted metadata DB {}", db_path.display());
    } else {
        info!("Metadata DB {} is encrypted", db_path.display());
    }

    match find_passphrase(root) {
        Some((pass, KeySource::Env)) => {
            info!("Using passphrase from {}", var);
            return Ok(pass);
        }
        Some((pass, KeySource::DotEnv(path))) => {
            info!("Using passphrase from {}", path.display());
            return Ok(pass);
        }
        None => {}
    }

    let db_name = db_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| db_path.display().to_string());
    let label = format!("[{}]", env!("CARGO_PKG_NAME")).cyan().bold();
    let prompt = if is_new {
        format!("New passphrase for {db_name}: ")
    } else {
        format!("Passphrase for {db_name}: ")
    };
    let pass = rpassword::prompt_password(format!("{label} {prompt}"))
        .with_context(|| format!("read passphrase for {}", db_path.display()))?;
    let pass = pass.trim().to_string();
    if pass.is_empty() {
        bail!("empty passphrase for {}", db_path.display());
    }
    if is_new {
        warn!(
            "Records in {} cannot be read without this passphrase (set {} to skip the prompt)",
            db_path.display(),
            var
        );
    }
    Ok(pass)
}
