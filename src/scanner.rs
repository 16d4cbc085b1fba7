//! Directory scanning and the per-directory cleanup pipeline.
//!
//! Each directory runs backup filter, classification, resolution and orphan
//! report to completion, then its subdirectories are visited depth first in
//! the order they were listed. Nothing is shared between directories except
//! the read-only configuration and registry.

use crate::backup::is_backup;
use crate::classify::{ClassifiedDir, EntryInfo};
use crate::config::CleanConfig;
use crate::error::{CleanError, Result};
use crate::extensions::ExtensionRegistry;
use crate::remove::{Removal, Remover};
use crate::resolve::{report_orphans, resolve, Finding, KeepReason, Verdict};

use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Raw contents of one directory
#[derive(Debug, Default)]
pub struct DirListing {
    /// Files eligible for classification
    pub files: Vec<EntryInfo>,
    /// Editor backups, queued for unconditional removal
    pub backups: Vec<PathBuf>,
    /// Subdirectories to visit, only collected when recursing
    pub subdirs: Vec<PathBuf>,
    /// Entries skipped because their metadata could not be read
    pub unreadable: usize,
}

/// Totals for a whole run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanSummary {
    pub directories: usize,
    pub removed: usize,
    pub removed_bytes: u64,
    /// Dry run only
    pub would_remove: usize,
    pub declined: usize,
    pub read_only: usize,
    pub source_newer: usize,
    pub orphans: usize,
    pub errors: usize,
}

impl CleanSummary {
    /// Auxiliary files reported as not removed
    pub fn kept(&self) -> usize {
        self.read_only + self.source_newer + self.orphans
    }
}

/// List `dir`, splitting its entries into backups, files and subdirectories.
///
/// Fails only when the directory itself cannot be read; per-entry problems
/// are logged and counted in [`DirListing::unreadable`].
pub fn list_directory(dir: &Path, config: &CleanConfig) -> Result<DirListing> {
    let read_dir = fs::read_dir(dir).map_err(|source| CleanError::DirectoryUnavailable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut listing = DirListing::default();

    for entry_result in read_dir {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error reading entry in {}: {}", dir.display(), err);
                listing.unreadable += 1;
                continue;
            }
        };

        let os_name = entry.file_name();
        let path = dir.join(&os_name);

        // Backups go before anything else, whatever they are
        if is_backup(&os_name.to_string_lossy(), &config.backup_suffix) {
            listing.backups.push(path);
            continue;
        }

        // Follow links for metadata, like stat(2)
        let metadata = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(source) => {
                warn!("{}", CleanError::MetadataUnavailable { path, source });
                listing.unreadable += 1;
                continue;
            }
        };

        if metadata.is_dir() {
            if !config.recurse {
                continue;
            }
            // Never descend through links, so a cycle cannot trap the walk
            if entry.file_type().map(|ft| ft.is_symlink()).unwrap_or(true) {
                debug!("Not descending into linked directory {}", path.display());
                continue;
            }
            listing.subdirs.push(path);
            continue;
        }

        let Some(name) = os_name.to_str() else {
            debug!("Skipping non UTF-8 file name {}", path.display());
            continue;
        };

        let modified = match metadata.modified() {
            Ok(time) => time,
            Err(source) => {
                warn!("{}", CleanError::MetadataUnavailable { path, source });
                listing.unreadable += 1;
                continue;
            }
        };

        listing.files.push(EntryInfo {
            name: name.to_string(),
            modified,
            writable: is_writable(&path, &metadata),
            size: metadata.len(),
        });
    }

    Ok(listing)
}

/// Whether the current user may write `path`, as access(2) answers it.
///
/// Root passes this check for any file on a writable filesystem.
#[cfg(unix)]
fn is_writable(path: &Path, _metadata: &fs::Metadata) -> bool {
    use nix::unistd::{access, AccessFlags};

    access(path, AccessFlags::W_OK).is_ok()
}

#[cfg(not(unix))]
fn is_writable(_path: &Path, metadata: &fs::Metadata) -> bool {
    !metadata.permissions().readonly()
}

/// Clean every path in order, descending when `config.recurse` is set
pub fn clean_paths<R: Remover>(
    paths: &[PathBuf],
    config: &CleanConfig,
    registry: &ExtensionRegistry,
    remover: &mut R,
) -> CleanSummary {
    let mut summary = CleanSummary::default();
    for path in paths {
        clean_directory(path, config, registry, remover, &mut summary);
    }
    summary
}

/// Clean one directory, then each of its subdirectories
pub fn clean_directory<R: Remover>(
    dir: &Path,
    config: &CleanConfig,
    registry: &ExtensionRegistry,
    remover: &mut R,
    summary: &mut CleanSummary,
) {
    debug!(
        "Scanning directory {} (confirm={}, recurse={}, keep={}, backup suffix {:?})",
        dir.display(),
        config.confirm,
        config.recurse,
        config.protect,
        config.backup_suffix
    );

    let listing = match list_directory(dir, config) {
        Ok(listing) => listing,
        Err(err) => {
            warn!("{}", err);
            summary.errors += 1;
            return;
        }
    };
    summary.directories += 1;
    summary.errors += listing.unreadable;

    for backup in &listing.backups {
        let size = fs::symlink_metadata(backup).map(|m| m.len()).unwrap_or(0);
        dispose(backup, size, remover, summary);
    }

    // The classified tree is dropped before any subdirectory is visited
    {
        let mut classified = ClassifiedDir::from_entries(&listing.files, registry, config.protect);
        trace!(
            "{} classified files out of {} in {}",
            classified.len(),
            listing.files.len(),
            dir.display()
        );

        let findings = resolve(&mut classified);
        let orphans = report_orphans(&classified);
        for finding in findings.into_iter().chain(orphans) {
            handle_finding(dir, finding, remover, summary);
        }
    }

    for subdir in &listing.subdirs {
        clean_directory(subdir, config, registry, remover, summary);
    }
}

fn handle_finding<R: Remover>(
    dir: &Path,
    finding: Finding,
    remover: &mut R,
    summary: &mut CleanSummary,
) {
    let path = dir.join(&finding.file_name);

    let reason = match finding.verdict {
        Verdict::Disposable => {
            dispose(&path, finding.size, remover, summary);
            return;
        }
        Verdict::Kept(reason) => reason,
    };

    println!(
        "{}",
        format!("{} not removed; {}", path.display(), reason).yellow()
    );
    match reason {
        KeepReason::ReadOnly => summary.read_only += 1,
        KeepReason::SourceNewer { .. } => summary.source_newer += 1,
        KeepReason::Orphan { .. } => summary.orphans += 1,
    }
}

fn dispose<R: Remover>(path: &Path, size: u64, remover: &mut R, summary: &mut CleanSummary) {
    match remover.remove(path) {
        Ok(Removal::Removed) => {
            println!("{}", format!("{} has been removed", path.display()).green());
            summary.removed += 1;
            summary.removed_bytes += size;
        }
        Ok(Removal::Skipped) => {
            println!("Would remove: {}", path.display());
            summary.would_remove += 1;
        }
        Ok(Removal::Declined) => {
            debug!("Keeping {} on request", path.display());
            summary.declined += 1;
        }
        Err(err) => {
            warn!("{}", err);
            summary.errors += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Records requests without touching the filesystem
    #[derive(Default)]
    struct RecordingRemover {
        requested: Vec<PathBuf>,
    }

    impl Remover for RecordingRemover {
        fn remove(&mut self, path: &Path) -> Result<Removal> {
            self.requested.push(path.to_path_buf());
            Ok(Removal::Removed)
        }
    }

    #[test]
    fn test_list_directory_splits_entries() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.tex"), "x").unwrap();
        fs::write(dir.path().join("a.tex~"), "x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let config = CleanConfig {
            recurse: true,
            ..CleanConfig::default()
        };
        let listing = list_directory(dir.path(), &config).unwrap();

        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].name, "a.tex");
        assert!(listing.files[0].writable);
        assert_eq!(listing.backups, vec![dir.path().join("a.tex~")]);
        assert_eq!(listing.subdirs, vec![dir.path().join("sub")]);
    }

    #[test]
    fn test_list_directory_ignores_subdirs_without_recurse() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let listing = list_directory(dir.path(), &CleanConfig::default()).unwrap();
        assert!(listing.subdirs.is_empty());
        assert!(listing.files.is_empty());
    }

    #[test]
    fn test_list_directory_missing_is_unavailable() {
        let dir = tempdir().unwrap();
        let err = list_directory(&dir.path().join("nope"), &CleanConfig::default()).unwrap_err();
        assert!(matches!(err, CleanError::DirectoryUnavailable { .. }));
    }

    #[test]
    fn test_empty_suffix_keeps_backups() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.tex~"), "x").unwrap();

        let config = CleanConfig {
            backup_suffix: String::new(),
            ..CleanConfig::default()
        };
        let listing = list_directory(dir.path(), &config).unwrap();
        assert!(listing.backups.is_empty());
        assert_eq!(listing.files.len(), 1);
    }

    #[test]
    fn test_unavailable_directory_counts_error_and_continues() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("x.tex~"), "x").unwrap();

        let registry = ExtensionRegistry::builtin().unwrap();
        let mut remover = RecordingRemover::default();
        let paths = vec![dir.path().join("missing"), dir.path().to_path_buf()];
        let summary = clean_paths(&paths, &CleanConfig::default(), &registry, &mut remover);

        assert_eq!(summary.errors, 1);
        assert_eq!(summary.directories, 1);
        assert_eq!(remover.requested, vec![dir.path().join("x.tex~")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_without_write_bit_is_not_writable() {
        use std::os::unix::fs::PermissionsExt;

        // access(2) lets root write anything
        if nix::unistd::getuid().is_root() {
            return;
        }

        let dir = tempdir().unwrap();
        let aux = dir.path().join("a.aux");
        fs::write(&aux, "x").unwrap();
        // Group may write, the owner may not
        fs::set_permissions(&aux, fs::Permissions::from_mode(0o464)).unwrap();

        let listing = list_directory(dir.path(), &CleanConfig::default()).unwrap();
        assert_eq!(listing.files.len(), 1);
        assert!(!listing.files[0].writable);
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_directories_are_not_descended() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();
        symlink(dir.path(), dir.path().join("loop")).unwrap();

        let config = CleanConfig {
            recurse: true,
            ..CleanConfig::default()
        };
        let listing = list_directory(dir.path(), &config).unwrap();
        assert_eq!(listing.subdirs, vec![dir.path().join("real")]);

        let registry = ExtensionRegistry::builtin().unwrap();
        let mut remover = RecordingRemover::default();
        let summary = clean_paths(&[dir.path().to_path_buf()], &config, &registry, &mut remover);
        assert_eq!(summary.directories, 2);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_names_only_checked_for_backups() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let aux = dir.path().join(OsStr::from_bytes(b"a\xff.aux"));
        let backup = dir.path().join(OsStr::from_bytes(b"a\xff~"));
        fs::write(&aux, "x").unwrap();
        fs::write(&backup, "x").unwrap();

        let listing = list_directory(dir.path(), &CleanConfig::default()).unwrap();
        assert!(listing.files.is_empty());
        assert_eq!(listing.backups, vec![backup]);
        assert_eq!(listing.unreadable, 0);
    }
}
