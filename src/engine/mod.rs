//! Engine module: command-line surface

pub mod arg_parser;
pub mod cli;

pub use arg_parser::Cli;
pub use cli::{build_opts, handle_run};
