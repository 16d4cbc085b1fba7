//! Removal of files from the filesystem, optionally after asking.

use crate::config::CleanConfig;
use crate::error::{CleanError, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Outcome of a single removal request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    /// The user answered no, or input ended
    Declined,
    /// Dry run: nothing touched
    Skipped,
}

/// Something that can take a deletion candidate off the filesystem
pub trait Remover {
    fn remove(&mut self, path: &Path) -> Result<Removal>;
}

/// Removes for real, honoring the confirm and dry-run options
pub struct FsRemover<R, W> {
    confirm: bool,
    dry_run: bool,
    input: R,
    output: W,
}

impl FsRemover<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the terminal when confirmation is requested
    pub fn from_config(config: &CleanConfig) -> Self {
        Self::new(config, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> FsRemover<R, W> {
    pub fn new(config: &CleanConfig, input: R, output: W) -> Self {
        Self {
            confirm: config.confirm,
            dry_run: config.dry_run,
            input,
            output,
        }
    }
}

impl<R: BufRead, W: Write> Remover for FsRemover<R, W> {
    fn remove(&mut self, path: &Path) -> Result<Removal> {
        if self.dry_run {
            return Ok(Removal::Skipped);
        }

        if self.confirm {
            let yes = confirm_removal(path, &mut self.input, &mut self.output).map_err(|source| {
                CleanError::Prompt {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            if !yes {
                return Ok(Removal::Declined);
            }
        }

        // A backup-named directory can only go if it is empty
        let is_dir = fs::symlink_metadata(path)
            .map(|m| m.is_dir())
            .unwrap_or(false);
        let result = if is_dir {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        };

        result
            .map(|_| Removal::Removed)
            .map_err(|source| CleanError::RemovalFailed {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Ask whether `path` should be removed.
///
/// Only the first character of the answer counts: y/Y accepts, n/N declines,
/// anything else (an empty line included) asks again. End of input declines.
pub fn confirm_removal<R: BufRead, W: Write>(
    path: &Path,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    let mut answer = String::new();

    loop {
        answer.clear();
        write!(output, "Remove {} (y|n) ? ", path.display())?;
        output.flush()?;

        if input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }

        match answer.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn ask(answers: &str) -> (bool, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let yes = confirm_removal(Path::new("dir/a.aux"), &mut input, &mut output).unwrap();
        (yes, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_confirm_yes() {
        let (yes, prompt) = ask("y\n");
        assert!(yes);
        assert_eq!(prompt, "Remove dir/a.aux (y|n) ? ");
        assert!(ask("Yes please\n").0);
    }

    #[test]
    fn test_confirm_no() {
        assert!(!ask("n\n").0);
        assert!(!ask("NO\n").0);
    }

    #[test]
    fn test_confirm_reasks_until_clear_answer() {
        let (yes, prompt) = ask("maybe\n\ny\n");
        assert!(yes);
        assert_eq!(prompt.matches("Remove dir/a.aux").count(), 3);
    }

    #[test]
    fn test_confirm_end_of_input_declines() {
        assert!(!ask("").0);
        assert!(!ask("what\n").0);
    }

    #[test]
    fn test_dry_run_leaves_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.aux");
        fs::write(&path, "x").unwrap();

        let config = CleanConfig {
            dry_run: true,
            ..CleanConfig::default()
        };
        let mut remover = FsRemover::new(&config, Cursor::new(Vec::new()), Vec::new());
        assert_eq!(remover.remove(&path).unwrap(), Removal::Skipped);
        assert!(path.exists());
    }

    #[test]
    fn test_declined_leaves_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.aux");
        fs::write(&path, "x").unwrap();

        let config = CleanConfig {
            confirm: true,
            ..CleanConfig::default()
        };
        let mut remover = FsRemover::new(&config, Cursor::new(b"n\n".to_vec()), Vec::new());
        assert_eq!(remover.remove(&path).unwrap(), Removal::Declined);
        assert!(path.exists());
    }

    #[test]
    fn test_removes_file_and_empty_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.tex~");
        let empty = dir.path().join("old~");
        fs::write(&file, "x").unwrap();
        fs::create_dir(&empty).unwrap();

        let config = CleanConfig::default();
        let mut remover = FsRemover::new(&config, Cursor::new(Vec::new()), Vec::new());
        assert_eq!(remover.remove(&file).unwrap(), Removal::Removed);
        assert_eq!(remover.remove(&empty).unwrap(), Removal::Removed);
        assert!(!file.exists());
        assert!(!empty.exists());
    }

    #[test]
    fn test_missing_file_is_removal_failure() {
        let dir = tempdir().unwrap();
        let config = CleanConfig::default();
        let mut remover = FsRemover::new(&config, Cursor::new(Vec::new()), Vec::new());

        let err = remover.remove(&dir.path().join("gone.aux")).unwrap_err();
        assert!(matches!(err, CleanError::RemovalFailed { .. }));
    }
}
