//! Extension registry loading from extensions.toml.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

// Embed the TOML file directly in the binary at compile time
const EXTENSIONS_TOML: &str = include_str!("../extensions.toml");

/// Structure to deserialize the registry from TOML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryConfig {
    source: String,
    auxiliary: Vec<String>,
    #[serde(default)]
    protected: Vec<String>,
}

/// Ordered catalog of recognized extensions plus the protected set.
///
/// Position 0 of [`ExtensionRegistry::extensions`] is always the source
/// extension; every later position is an auxiliary one, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRegistry {
    source: String,
    auxiliary: Vec<String>,
    protected: HashSet<String>,
}

impl ExtensionRegistry {
    /// Build a registry, checking that every extension could ever be matched.
    pub fn new<S: Into<String>>(
        source: S,
        auxiliary: impl IntoIterator<Item = S>,
        protected: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let source = source.into();
        let auxiliary: Vec<String> = auxiliary.into_iter().map(Into::into).collect();
        let protected: HashSet<String> = protected.into_iter().map(Into::into).collect();

        validate_extension(&source).context("Bad source extension")?;

        let mut seen = HashSet::new();
        for ext in &auxiliary {
            validate_extension(ext).context("Bad auxiliary extension")?;
            if *ext == source {
                bail!("'{}' is the source extension and cannot also be auxiliary", ext);
            }
            if !seen.insert(ext.as_str()) {
                bail!("Auxiliary extension '{}' is listed twice", ext);
            }
        }
        for ext in &protected {
            validate_extension(ext).context("Bad protected extension")?;
        }

        Ok(Self {
            source,
            auxiliary,
            protected,
        })
    }

    /// The registry compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(EXTENSIONS_TOML).context("Failed to parse embedded extensions TOML")
    }

    /// Parse a registry from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RegistryConfig =
            toml::from_str(content).context("Failed to parse extensions TOML")?;
        Self::new(config.source, config.auxiliary, config.protected)
    }

    /// Load a registry from a user-supplied TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read extensions file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid extensions file {}", path.display()))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn auxiliary(&self) -> &[String] {
        &self.auxiliary
    }

    /// All recognized extensions, source first
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.source.as_str()).chain(self.auxiliary.iter().map(String::as_str))
    }

    /// Registry position of an extension (0 is the source), exact and case-sensitive
    pub fn position(&self, extension: &str) -> Option<usize> {
        self.extensions().position(|ext| ext == extension)
    }

    pub fn is_protected(&self, extension: &str) -> bool {
        self.protected.contains(extension)
    }
}

/// An extension must look like what `extension_of` can return: a dot followed
/// by at least one character, with no further dot.
fn validate_extension(ext: &str) -> Result<()> {
    match ext.strip_prefix('.') {
        Some(rest) if !rest.is_empty() && !rest.contains('.') => Ok(()),
        _ => bail!("'{}' is not a valid extension (expected e.g. \".aux\")", ext),
    }
}
