//! Grouping of one directory's files by recognized extension.

use crate::extensions::ExtensionRegistry;
use std::time::SystemTime;
use tracing::trace;

/// A plain file as seen by the directory scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub name: String,
    pub modified: SystemTime,
    pub writable: bool,
    pub size: u64,
}

/// A classified file: its name with the matched extension stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub basename: String,
    pub modified: SystemTime,
    pub writable: bool,
    pub size: u64,
    /// Set once a source record has consumed this one
    pub matched: bool,
}

/// Files sharing one recognized extension, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionGroup {
    pub extension: String,
    pub records: Vec<FileRecord>,
}

impl ExtensionGroup {
    fn new(extension: &str) -> Self {
        Self {
            extension: extension.to_string(),
            records: Vec::new(),
        }
    }

    /// Rebuild the file name of a record in this group
    pub fn file_name(&self, record: &FileRecord) -> String {
        format!("{}{}", record.basename, self.extension)
    }
}

/// The classified files of a single directory.
///
/// Group 0 holds the source extension, the remaining groups follow the
/// auxiliary order of the registry. Lives for one directory scan only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedDir {
    groups: Vec<ExtensionGroup>,
}

impl ClassifiedDir {
    pub fn new(registry: &ExtensionRegistry) -> Self {
        Self {
            groups: registry.extensions().map(ExtensionGroup::new).collect(),
        }
    }

    /// Classify a whole listing at once
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = &'a EntryInfo>,
        registry: &ExtensionRegistry,
        protect: bool,
    ) -> Self {
        let mut dir = Self::new(registry);
        for entry in entries {
            dir.classify(entry, registry, protect);
        }
        dir
    }

    /// Insert `entry` into the group of its extension.
    ///
    /// Returns false when the entry is ignored: no extension, an extension
    /// the registry does not know, or a protected extension while `protect`
    /// is on.
    pub fn classify(
        &mut self,
        entry: &EntryInfo,
        registry: &ExtensionRegistry,
        protect: bool,
    ) -> bool {
        let Some(extension) = extension_of(&entry.name) else {
            trace!(file = %entry.name, "no extension");
            return false;
        };
        let Some(index) = registry.position(extension) else {
            return false;
        };
        if protect && registry.is_protected(extension) {
            trace!(file = %entry.name, "keeping final document");
            return false;
        }

        let basename = &entry.name[..entry.name.len() - extension.len()];
        self.groups[index].records.push(FileRecord {
            basename: basename.to_string(),
            modified: entry.modified,
            writable: entry.writable,
            size: entry.size,
            matched: false,
        });
        true
    }

    pub fn groups(&self) -> &[ExtensionGroup] {
        &self.groups
    }

    pub fn source(&self) -> &ExtensionGroup {
        &self.groups[0]
    }

    pub fn auxiliary(&self) -> &[ExtensionGroup] {
        &self.groups[1..]
    }

    /// Source group alongside the mutable auxiliary groups
    pub(crate) fn split_source_mut(&mut self) -> (&ExtensionGroup, &mut [ExtensionGroup]) {
        let (source, auxiliary) = self.groups.split_at_mut(1);
        (&source[0], auxiliary)
    }

    /// Total number of classified files
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extension of a file name: everything from the last dot, dot included.
///
/// A name without a dot, or ending in one, has no extension. A name that
/// starts with its only dot (".aux") has one, with an empty basename.
pub fn extension_of(name: &str) -> Option<&str> {
    let dot = name.rfind('.')?;
    if dot + 1 == name.len() {
        return None;
    }
    Some(&name[dot..])
}
