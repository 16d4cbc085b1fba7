//! Disposability decisions for the auxiliary files of one directory.
//!
//! An auxiliary file is disposable when it was written strictly after the
//! source file sharing its basename: it was regenerated from the current
//! source and a rebuild would produce it again. Anything else is kept and
//! reported.

use crate::classify::ClassifiedDir;
use std::fmt;
use tracing::trace;

/// What happens to an auxiliary file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Newer than its source and writable; hand it to the remover
    Disposable,
    Kept(KeepReason),
}

impl Verdict {
    pub fn is_disposable(&self) -> bool {
        matches!(self, Verdict::Disposable)
    }
}

/// Why an auxiliary file stays; displayed after "not removed;"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeepReason {
    /// Would be disposable but is not writable
    ReadOnly,
    /// The source was modified at or after the auxiliary file
    SourceNewer { source: String },
    /// No source file with the same basename in this directory
    Orphan { source_extension: String },
}

impl fmt::Display for KeepReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeepReason::ReadOnly => write!(f, "it is read only"),
            KeepReason::SourceNewer { source } => write!(f, "{} is newer", source),
            KeepReason::Orphan { source_extension } => {
                write!(f, "no {} file found", source_extension)
            }
        }
    }
}

/// Decision about a single auxiliary file, named relative to its directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub file_name: String,
    pub size: u64,
    pub verdict: Verdict,
}

/// Match every source record against the auxiliary groups.
///
/// For each source file, each auxiliary group is searched in arrival order
/// for the first unconsumed record with the same basename. That record is
/// marked matched whatever the outcome, and judged by modification time:
/// strictly newer than the source is disposable, equal or older is kept.
pub fn resolve(dir: &mut ClassifiedDir) -> Vec<Finding> {
    let mut findings = Vec::new();
    let (source_group, auxiliary) = dir.split_source_mut();

    for source in &source_group.records {
        let source_name = source_group.file_name(source);
        trace!(source = %source_name, "finding related files");

        for group in auxiliary.iter_mut() {
            let Some(record) = group
                .records
                .iter_mut()
                .find(|r| !r.matched && r.basename == source.basename)
            else {
                continue;
            };
            record.matched = true;

            let verdict = if record.modified > source.modified {
                if record.writable {
                    Verdict::Disposable
                } else {
                    Verdict::Kept(KeepReason::ReadOnly)
                }
            } else {
                Verdict::Kept(KeepReason::SourceNewer {
                    source: source_name.clone(),
                })
            };

            findings.push(Finding {
                file_name: format!("{}{}", record.basename, group.extension),
                size: record.size,
                verdict,
            });
        }
    }

    findings
}

/// Auxiliary records left unmatched after [`resolve`], each reported once
pub fn report_orphans(dir: &ClassifiedDir) -> Vec<Finding> {
    let source_extension = dir.source().extension.clone();

    dir.auxiliary()
        .iter()
        .flat_map(|group| {
            group
                .records
                .iter()
                .filter(|r| !r.matched)
                .map(move |r| (group, r))
        })
        .map(|(group, record)| Finding {
            file_name: group.file_name(record),
            size: record.size,
            verdict: Verdict::Kept(KeepReason::Orphan {
                source_extension: source_extension.clone(),
            }),
        })
        .collect()
}
