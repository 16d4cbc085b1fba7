//! Error taxonomy for a cleanup run.
//!
//! Everything here is recoverable: the scanner logs it with the offending path
//! and moves on to the next entry or directory.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("\"{}\" cannot be opened (or is not a directory): {source}", path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not get metadata for \"{}\": {source}", path.display())]
    MetadataUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error removing \"{}\": {source}", path.display())]
    RemovalFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read confirmation for \"{}\": {source}", path.display())]
    Prompt {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CleanError>;
