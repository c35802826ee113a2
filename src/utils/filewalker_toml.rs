//! Load `.filewalker.toml` from the base directory (CLI only). The lib takes a ready [`Opts`].

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;
use crate::{CollisionPolicy, Opts};

#[derive(Debug, Default, Deserialize)]
pub struct FilewalkerToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    workers: Option<usize>,
    filter: Option<String>,
    pattern: Option<String>,
    out: Option<String>,
    action: Option<String>,
    on_collision: Option<CollisionPolicy>,
    follow_links: Option<bool>,
    strict: Option<bool>,
    verbose: Option<bool>,
}

/// Load the config file from `dir` if present. `Ok(None)` if missing.
/// Unreadable or malformed files are errors.
pub fn load_filewalker_toml(dir: &Path) -> Result<Option<FilewalkerToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    let file = parse_filewalker_toml(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(file))
}

pub fn parse_filewalker_toml(s: &str) -> Result<FilewalkerToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($file:expr, $opts:expr, $file_field:ident => $opts_field:ident) => {
        if let Some(v) = $file.$file_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_opts(file: &FilewalkerToml, opts: &mut Opts) {
    let s = &file.settings;
    if let Some(n) = s.workers {
        opts.workers = Some(n);
    }
    if let Some(ref out) = s.out {
        opts.output = Some(PathBuf::from(out));
    }
    apply_file_opt!(s, opts, filter => filter);
    apply_file_opt!(s, opts, pattern => pattern);
    apply_file_opt!(s, opts, action => action);
    apply_file_opt!(s, opts, on_collision => collision);
    apply_file_opt!(s, opts, follow_links => follow_links);
    apply_file_opt!(s, opts, strict => strict);
    apply_file_opt!(s, opts, verbose => verbose);
}
