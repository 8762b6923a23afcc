//! CLI module for aeropage
//!
//! Provides command-line interface for:
//! - page: Fetch one page of a JSON data file
//! - explain: Describe how a request would be paged

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, page, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
