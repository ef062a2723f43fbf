//! Command line surface: exactly one positional path, no flags.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

pub const USAGE: &str = "usage: mustang [filename to edit]";

#[derive(Parser, Debug)]
#[command(
    name = "mustang",
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
pub struct Args {
    /// File to edit.
    pub path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
#[error("usage: mustang [filename to edit]")]
pub struct UsageError {
    #[source]
    source: clap::Error,
}

pub fn parse<I, T>(argv: I) -> Result<Args, UsageError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(argv).map_err(|source| UsageError { source })
}
