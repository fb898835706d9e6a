//! Load `.tabmeta.toml` from the object-store root (CLI only). Library callers build
//! [`PipelineContext`](crate::pipeline::PipelineContext) themselves.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TabmetaToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    db_path: Option<String>,
    extension: Option<String>,
    max_bytes: Option<u64>,
    verbose: Option<bool>,
    encrypt: Option<bool>,
    list: Option<bool>,
}

/// Load `.tabmeta.toml` from `dir` if present. Returns None if the file is missing or invalid.
pub(crate) fn load_tabmeta_toml(dir: &Path) -> Option<TabmetaToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_tabmeta_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub(crate) fn parse_tabmeta_toml(s: &str) -> Result<TabmetaToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $file_field:ident => $opts_field:ident) => {
        if let Some(v) = $section.$file_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
/// dry_run is never read from the file.
pub(crate) fn apply_file_to_opts(file: &TabmetaToml, opts: &mut Opts) {
    let settings = &file.settings;
    if let Some(ref p) = settings.db_path {
        opts.db_path = Some(PathBuf::from(p));
    }
    apply_file_opt!(settings, opts, extension => extension);
    apply_file_opt!(settings, opts, max_bytes => max_bytes);
    apply_file_opt!(settings, opts, verbose => verbose);
    apply_file_opt!(settings, opts, encrypt => encrypt);
    apply_file_opt!(settings, opts, list => list_records);
}
