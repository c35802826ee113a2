//! Application configuration constants.
//! Tuning and names in one place.

use std::sync::OnceLock;

// ---- Package / names (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Per-directory config file read by the CLI.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Prefix of destination directories synthesized by copy/move.
    pub fn dest_dir_prefix(&self) -> &str {
        self.pkg_name
    }
}

// ---- Worker threads ----

/// Filter worker count when none is configured: detected parallelism.
pub fn default_workers() -> usize {
    rayon::current_num_threads().max(1)
}

// ---- Actions ----

/// Transfer buffer for the copy action, reused across files (bytes). 32 KB.
pub const COPY_BUFFER_SIZE: usize = 32 * 1024;

/// How many timestamped names copy/move try before giving up on a fresh destination.
pub const SYNTHESIZED_DIR_ATTEMPTS: u32 = 16;
