//! CLI command implementations.

pub mod check;
pub mod import;
pub mod list;
pub mod seed;

use std::path::PathBuf;

use thiserror::Error;

/// Failures specific to the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The data file exists and `--force` was not given.
    #[error("{} already exists (use --force to overwrite)", .0.display())]
    DataFileExists(PathBuf),

    /// One or more import entries failed the create contract.
    #[error("{0} import entries failed validation")]
    InvalidEntries(usize),

    /// The import file is not a YAML list.
    #[error("import file must hold a list of client payloads")]
    NotAList,

    /// The CPF failed the checksum rule.
    #[error("CPF {value} is invalid: {reason}")]
    InvalidCpf { value: String, reason: String },
}
