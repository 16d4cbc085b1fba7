//! Run-wide configuration.

/// Default trailer identifying editor backup files (the emacs convention).
pub const DEFAULT_BACKUP_SUFFIX: &str = "~";

/// Options controlling a cleanup run.
///
/// Built once from the command line and only ever borrowed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanConfig {
    /// Ask before removing any file
    pub confirm: bool,
    /// Descend into subdirectories of the given directories
    pub recurse: bool,
    /// Leave final documents (the protected extensions) alone
    pub protect: bool,
    /// Trailing string of editor backups; empty disables backup cleanup
    pub backup_suffix: String,
    /// Report what would be removed without touching the filesystem
    pub dry_run: bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            confirm: false,
            recurse: false,
            protect: false,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            dry_run: false,
        }
    }
}
