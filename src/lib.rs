//! lintex - TeX auxiliary file cleaner
//!
//! lintex scans directories for files produced while typesetting a TeX source
//! and removes those that are no longer needed. An auxiliary file (`.aux`,
//! `.log`, `.toc`, ...) is removed only when it is newer than the `.tex` file
//! with the same basename in the same directory, i.e. when a rebuild would
//! produce it again. Editor backups (`foo.tex~`) are removed unconditionally.
//!
//! ## Pipeline (one directory at a time)
//!
//! 1. backup filter ([`backup::is_backup`])
//! 2. classification by extension ([`classify::ClassifiedDir`])
//! 3. disposability resolution ([`resolve::resolve`])
//! 4. orphan report ([`resolve::report_orphans`])
//!
//! [`scanner`] drives the pipeline over the filesystem and hands deletion
//! candidates to a [`remove::Remover`].

pub mod backup;
pub mod classify;
pub mod config;
pub mod error;
pub mod extensions;
pub mod logging;
pub mod remove;
pub mod resolve;
pub mod scanner;

// Re-export commonly used items
pub use backup::is_backup;
pub use classify::{extension_of, ClassifiedDir, EntryInfo, ExtensionGroup, FileRecord};
pub use config::{CleanConfig, DEFAULT_BACKUP_SUFFIX};
pub use error::CleanError;
pub use extensions::ExtensionRegistry;
pub use remove::{confirm_removal, FsRemover, Removal, Remover};
pub use resolve::{report_orphans, resolve, Finding, KeepReason, Verdict};
pub use scanner::{clean_directory, clean_paths, list_directory, CleanSummary, DirListing};
