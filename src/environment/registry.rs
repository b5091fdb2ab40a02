//! Package Registry - in-memory package/version table
//!
//! Populated programmatically or from a `Cargo.lock` file. Immutable once
//! handed to a handler, so it can be shared across threads by reference.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::{normalize_package_name, EnvironmentResolver};
use crate::{Error, Result};

/// In-memory [`EnvironmentResolver`] backed by a package -> version map.
///
/// Names are normalized with [`normalize_package_name`], so `linfa-svm` and
/// `linfa_svm` refer to the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRegistry {
    packages: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Lockfile {
    #[serde(default)]
    package: Vec<LockedPackage>,
}

#[derive(Debug, Deserialize)]
struct LockedPackage {
    name: String,
    version: String,
}

impl PackageRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package, returning the registry (builder style).
    #[must_use]
    pub fn with_package(mut self, name: impl AsRef<str>, version: impl Into<String>) -> Self {
        self.register(name, version);
        self
    }

    /// Add or replace a package version.
    pub fn register(&mut self, name: impl AsRef<str>, version: impl Into<String>) {
        self.packages
            .insert(normalize_package_name(name.as_ref()), version.into());
    }

    /// Load every `[[package]]` entry of a `Cargo.lock` file.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read, or
    /// [`Error::ManifestParse`] if it is not a valid lockfile.
    pub fn from_cargo_lock<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_cargo_lock_str(&text)
    }

    /// Parse `Cargo.lock` contents.
    ///
    /// When a package appears more than once (several semver-incompatible
    /// versions in the graph), the first entry wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestParse`] if the text is not a valid lockfile.
    pub fn from_cargo_lock_str(text: &str) -> Result<Self> {
        let lockfile: Lockfile =
            toml::from_str(text).map_err(|e| Error::ManifestParse(format!("Cargo.lock: {e}")))?;

        let mut packages = BTreeMap::new();
        for locked in lockfile.package {
            let name = normalize_package_name(&locked.name);
            if let Some(existing) = packages.get(&name) {
                debug!(
                    package = %name,
                    kept = %existing,
                    skipped = %locked.version,
                    "duplicate package in Cargo.lock"
                );
                continue;
            }
            packages.insert(name, locked.version);
        }

        Ok(Self { packages })
    }

    /// Number of registered packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Check if a package is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(&normalize_package_name(name))
    }
}

impl EnvironmentResolver for PackageRegistry {
    fn get_version(&self, package: &str) -> Result<String> {
        self.packages
            .get(&normalize_package_name(package))
            .cloned()
            .ok_or_else(|| Error::PackageNotFound(package.to_string()))
    }
}
