pub mod config;
pub mod filewalker_toml;
pub mod logger;

pub use config::*;
pub use filewalker_toml::{apply_file_to_opts, load_filewalker_toml, parse_filewalker_toml};
pub use logger::setup_logging;
