//! Artifact Record - metadata embedded in the owning project's file

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ContentFingerprint;
use crate::codec::WriterKwargs;

/// Artifact Record is the persisted form of an artifact handler's metadata.
///
/// The owning project serializes it (typically as JSON) next to its other
/// log data and resolves `fname` against a directory it manages. The
/// artifact value itself lives only in the payload file.
///
/// ## JSON Shape
///
/// ```text
/// {
///   "name": "My estimator",
///   "fname": "my-estimator-20250120132330.bincode",
///   "created_at": "2025-01-20T13:23:30Z",
///   "writer_kwargs": {"compress": 3},
///   "package": "smartcore",
///   "package_version": "0.3.2",
///   "serializer_version": "1.3",
///   "version": 0,
///   "dirty": false,
///   "handler": "bincode"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactRecord {
    name: String,
    fname: String,
    created_at: DateTime<Utc>,
    writer_kwargs: Option<WriterKwargs>,
    package: String,
    package_version: String,
    serializer_version: String,
    version: Option<u64>,
    #[serde(default)]
    dirty: bool,
    handler: String,
}

impl ArtifactRecord {
    /// Create a builder with the required fields.
    #[must_use]
    pub fn builder(
        name: impl Into<String>,
        package: impl Into<String>,
        package_version: impl Into<String>,
    ) -> ArtifactRecordBuilder {
        ArtifactRecordBuilder::new(name, package, package_version)
    }

    /// Get the artifact name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the payload filename.
    #[must_use]
    pub fn fname(&self) -> &str {
        &self.fname
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the writer options, if any.
    #[must_use]
    pub const fn writer_kwargs(&self) -> Option<&WriterKwargs> {
        self.writer_kwargs.as_ref()
    }

    /// Get the originating package.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Get the package version at write time.
    #[must_use]
    pub fn package_version(&self) -> &str {
        &self.package_version
    }

    /// Get the serialization library version at write time.
    #[must_use]
    pub fn serializer_version(&self) -> &str {
        &self.serializer_version
    }

    /// Get the persisted revision number, if assigned.
    #[must_use]
    pub const fn version(&self) -> Option<u64> {
        self.version
    }

    /// Whether the artifact was dirty when recorded.
    #[must_use]
    pub const fn dirty(&self) -> bool {
        self.dirty
    }

    /// Get the handler alias that wrote the payload.
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// Content projection used for dirty detection.
    #[must_use]
    pub fn fingerprint(&self) -> ContentFingerprint<'_> {
        ContentFingerprint::new(
            self.writer_kwargs.as_ref(),
            &self.package,
            &self.package_version,
            &self.serializer_version,
        )
    }
}

/// Builder for `ArtifactRecord`.
///
/// Handlers produce records via `ArtifactHandler::to_record`; the builder is
/// for owning systems that assemble records themselves (migrations, tests).
#[derive(Debug)]
pub struct ArtifactRecordBuilder {
    record: ArtifactRecord,
}

impl ArtifactRecordBuilder {
    /// Create a new builder with required fields.
    ///
    /// Defaults: created now, no writer options, current serializer version,
    /// unversioned, clean, and the `bincode` handler alias.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        package: impl Into<String>,
        package_version: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let created_at = Utc::now();
        Self {
            record: ArtifactRecord {
                fname: super::artifact_fname(&name, created_at, super::FILE_SUFFIX),
                name,
                created_at,
                writer_kwargs: None,
                package: package.into(),
                package_version: package_version.into(),
                serializer_version: crate::codec::SERIALIZER_VERSION.to_string(),
                version: None,
                dirty: false,
                handler: super::HANDLER_ALIAS.to_string(),
            },
        }
    }

    /// Set the filename.
    #[must_use]
    pub fn fname(mut self, fname: impl Into<String>) -> Self {
        self.record.fname = fname.into();
        self
    }

    /// Set a custom creation timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.record.created_at = created_at;
        self
    }

    /// Set writer options.
    #[must_use]
    pub fn writer_kwargs(mut self, writer_kwargs: WriterKwargs) -> Self {
        self.record.writer_kwargs = Some(writer_kwargs);
        self
    }

    /// Set the serialization library version.
    #[must_use]
    pub fn serializer_version(mut self, version: impl Into<String>) -> Self {
        self.record.serializer_version = version.into();
        self
    }

    /// Set the persisted revision number.
    #[must_use]
    pub const fn version(mut self, version: u64) -> Self {
        self.record.version = Some(version);
        self
    }

    /// Set the dirty flag.
    #[must_use]
    pub const fn dirty(mut self, dirty: bool) -> Self {
        self.record.dirty = dirty;
        self
    }

    /// Set the handler alias.
    #[must_use]
    pub fn handler(mut self, handler: impl Into<String>) -> Self {
        self.record.handler = handler.into();
        self
    }

    /// Build the `ArtifactRecord`.
    #[must_use]
    pub fn build(self) -> ArtifactRecord {
        self.record
    }
}
