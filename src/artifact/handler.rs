//! Artifact Handler - value + reproducibility metadata + payload I/O

use std::io::{Read, Write};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{artifact_fname, ArtifactRecord, ContentFingerprint, FILE_SUFFIX, HANDLER_ALIAS};
use crate::codec::{self, WriterKwargs, WriterOptions, SERIALIZER_VERSION};
use crate::environment::{normalize_package_name, EnvironmentResolver};
use crate::{Error, Result};

/// Where an artifact's package identity comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSource {
    /// Infer from the Rust type path of the logged value
    FromValue {
        /// Fully qualified type path (`std::any::type_name`)
        type_path: &'static str,
    },
    /// Explicitly named package
    FromPackage(String),
}

impl PackageSource {
    /// Resolve to a top-level package name.
    ///
    /// Explicit names are normalized (`my-crate` -> `my_crate`) so they agree
    /// with names inferred from type paths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttributeResolution`] when a value's type has no crate
    /// root.
    pub fn resolve<R: EnvironmentResolver + ?Sized>(&self, resolver: &R) -> Result<String> {
        match self {
            Self::FromValue { type_path } => resolver.resolve_top_level_package(type_path),
            Self::FromPackage(package) => Ok(normalize_package_name(package)),
        }
    }
}

/// Handler for one logged artifact.
///
/// Holds the value (when in memory) and the metadata captured at
/// construction. Handlers deliberately do not implement `PartialEq`; use
/// [`ArtifactHandler::same_content`] or [`content_equal`], which compare the
/// [`ContentFingerprint`] projection only.
#[derive(Debug, Clone)]
pub struct ArtifactHandler<T> {
    name: String,
    fname: String,
    value: Option<T>,
    created_at: DateTime<Utc>,
    writer_kwargs: Option<WriterKwargs>,
    package: String,
    package_version: String,
    serializer_version: String,
    version: Option<u64>,
    dirty: bool,
}

impl<T> ArtifactHandler<T> {
    /// Alias under which the owning system registers this handler.
    pub const ALIAS: &'static str = HANDLER_ALIAS;

    /// File extension of the payload.
    pub const SUFFIX: &'static str = FILE_SUFFIX;

    /// Start building a handler for the named artifact.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ArtifactHandlerBuilder<T> {
        ArtifactHandlerBuilder::new(name)
    }

    /// Rebuild a handler (without value) from a stored record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the record was written by another
    /// handler.
    pub fn from_record(record: ArtifactRecord) -> Result<Self> {
        if record.handler() != HANDLER_ALIAS {
            return Err(Error::InvalidInput(format!(
                "artifact '{}' was written by handler '{}', not '{HANDLER_ALIAS}'",
                record.name(),
                record.handler()
            )));
        }

        Ok(Self {
            name: record.name().to_string(),
            fname: record.fname().to_string(),
            value: None,
            created_at: record.created_at(),
            writer_kwargs: record.writer_kwargs().cloned(),
            package: record.package().to_string(),
            package_version: record.package_version().to_string(),
            serializer_version: record.serializer_version().to_string(),
            version: record.version(),
            dirty: record.dirty(),
        })
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

    /// Get the in-memory value, if present.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Take ownership of the value.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        self.value
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

    /// Get the package version captured at construction.
    #[must_use]
    pub fn package_version(&self) -> &str {
        &self.package_version
    }

    /// Get the serialization library version captured at construction.
    #[must_use]
    pub fn serializer_version(&self) -> &str {
        &self.serializer_version
    }

    /// Get the persisted revision number, if assigned.
    #[must_use]
    pub const fn version(&self) -> Option<u64> {
        self.version
    }

    /// Whether this handler differs from the last persisted one.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record the revision number assigned by the persistence layer.
    pub fn assign_version(&mut self, version: u64) {
        self.version = Some(version);
    }

    /// Content projection used for equality and dirty detection.
    #[must_use]
    pub fn fingerprint(&self) -> ContentFingerprint<'_> {
        ContentFingerprint::new(
            self.writer_kwargs.as_ref(),
            &self.package,
            &self.package_version,
            &self.serializer_version,
        )
    }

    /// Compare content with another handler, ignoring `name`, `value`,
    /// `created_at`, `fname`, `version` and `dirty`.
    #[must_use]
    pub fn same_content<U>(&self, other: &ArtifactHandler<U>) -> bool {
        self.fingerprint() == other.fingerprint()
    }

    /// Recompute the dirty flag against the last persisted record.
    ///
    /// Dirty when a previous record with the same name exists and its content
    /// fingerprint differs. Returns the new flag.
    pub fn mark_dirty_against(&mut self, previous: Option<&ArtifactRecord>) -> bool {
        self.dirty = previous
            .filter(|record| record.name() == self.name)
            .is_some_and(|record| record.fingerprint() != self.fingerprint());

        if self.dirty {
            debug!(artifact = %self.name, "artifact content changed since last save");
        }
        self.dirty
    }

    /// Metadata record for the owning project file.
    #[must_use]
    pub fn to_record(&self) -> ArtifactRecord {
        let mut builder = ArtifactRecord::builder(&self.name, &self.package, &self.package_version)
            .fname(&self.fname)
            .created_at(self.created_at)
            .serializer_version(&self.serializer_version)
            .dirty(self.dirty)
            .handler(HANDLER_ALIAS);
        if let Some(kwargs) = &self.writer_kwargs {
            builder = builder.writer_kwargs(kwargs.clone());
        }
        if let Some(version) = self.version {
            builder = builder.version(version);
        }
        builder.build()
    }

    /// Check that the current environment matches the one the artifact was
    /// written under.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EnvironmentMismatch`] naming every drifted field.
    pub fn check_environment<R: EnvironmentResolver + ?Sized>(&self, resolver: &R) -> Result<()> {
        let mut drift = Vec::new();

        match resolver.get_version(&self.package) {
            Ok(current) if current == self.package_version => {}
            Ok(current) => drift.push(format!(
                "{} {} -> {current}",
                self.package, self.package_version
            )),
            Err(Error::PackageNotFound(_)) => {
                drift.push(format!("{} {} -> not installed", self.package, self.package_version));
            }
            Err(e) => return Err(e),
        }

        if self.serializer_version != SERIALIZER_VERSION {
            drift.push(format!(
                "{} {} -> {SERIALIZER_VERSION}",
                codec::SERIALIZER_NAME,
                self.serializer_version
            ));
        }

        if drift.is_empty() {
            return Ok(());
        }

        let details = drift.join(", ");
        warn!(artifact = %self.name, %details, "artifact environment mismatch");
        Err(Error::EnvironmentMismatch {
            artifact: self.name.clone(),
            details,
        })
    }
}

impl<T: Serialize> ArtifactHandler<T> {
    /// Serialize `value` into `buffer`, replaying the writer options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for unsupported writer options,
    /// [`Error::Serialization`] if the value cannot be encoded, or an IO error
    /// from the channel.
    pub fn write<W: Write>(&self, value: &T, buffer: W) -> Result<()> {
        let options = WriterOptions::from_kwargs(self.writer_kwargs.as_ref())?;
        codec::dump(value, buffer, &options)?;
        debug!(
            artifact = %self.name,
            fname = %self.fname,
            compression = options.compression.as_str(),
            "artifact written"
        );
        Ok(())
    }
}

impl<T: DeserializeOwned> ArtifactHandler<T> {
    /// Deserialize one value from `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Deserialization`] for corrupt or incompatible payloads.
    pub fn read<R: Read>(&self, buffer: R) -> Result<T> {
        let value = codec::load(buffer)?;
        debug!(artifact = %self.name, fname = %self.fname, "artifact read");
        Ok(value)
    }
}

/// Compare two handlers under the content-equality contract.
#[must_use]
pub fn content_equal<A, B>(a: &ArtifactHandler<A>, b: &ArtifactHandler<B>) -> bool {
    a.same_content(b)
}

/// Builder for `ArtifactHandler`.
#[derive(Debug)]
pub struct ArtifactHandlerBuilder<T> {
    name: String,
    value: Option<T>,
    package: Option<String>,
    writer_kwargs: WriterKwargs,
    created_at: Option<DateTime<Utc>>,
}

impl<T> ArtifactHandlerBuilder<T> {
    /// Create a new builder for the named artifact.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            package: None,
            writer_kwargs: WriterKwargs::new(),
            created_at: None,
        }
    }

    /// Set the value to log; its package is inferred unless set explicitly.
    #[must_use]
    pub fn value(mut self, value: T) -> Self {
        self.value = Some(value);
        self
    }

    /// Name the originating package explicitly.
    #[must_use]
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Add one writer option.
    #[must_use]
    pub fn writer_kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.writer_kwargs.insert(key.into(), value.into());
        self
    }

    /// Add writer options.
    #[must_use]
    pub fn writer_kwargs(mut self, kwargs: WriterKwargs) -> Self {
        self.writer_kwargs.extend(kwargs);
        self
    }

    /// Set a custom creation timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Where the package identity will come from.
    ///
    /// An explicit package wins over inference from the value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if neither a value nor a package was
    /// given.
    pub fn source(&self) -> Result<PackageSource> {
        match (&self.package, &self.value) {
            (Some(package), _) => Ok(PackageSource::FromPackage(package.clone())),
            (None, Some(_)) => Ok(PackageSource::FromValue {
                type_path: std::any::type_name::<T>(),
            }),
            (None, None) => Err(Error::InvalidInput(format!(
                "artifact '{}': provide a value or a package",
                self.name
            ))),
        }
    }

    /// Resolve package metadata and build the handler.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`]: empty name, neither value nor package, or a
    ///   package the resolver does not know
    /// - [`Error::AttributeResolution`]: the value's type has no crate root
    pub fn construct<R: EnvironmentResolver + ?Sized>(
        self,
        resolver: &R,
    ) -> Result<ArtifactHandler<T>> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("artifact name must not be empty".into()));
        }

        let source = self.source()?;
        let package = source.resolve(resolver)?;
        let package_version = resolver.get_version(&package).map_err(|e| match e {
            Error::PackageNotFound(p) => Error::InvalidInput(format!("invalid package '{p}'")),
            other => other,
        })?;

        let created_at = self.created_at.unwrap_or_else(Utc::now);
        let fname = artifact_fname(&self.name, created_at, FILE_SUFFIX);
        let writer_kwargs = (!self.writer_kwargs.is_empty()).then_some(self.writer_kwargs);

        debug!(
            artifact = %self.name,
            %package,
            %package_version,
            %fname,
            "artifact handler constructed"
        );

        Ok(ArtifactHandler {
            name: self.name,
            fname,
            value: self.value,
            created_at,
            writer_kwargs,
            package,
            package_version,
            serializer_version: SERIALIZER_VERSION.to_string(),
            version: None,
            dirty: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::PackageRegistry;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Estimator {
        coef: Vec<f64>,
        fitted: bool,
    }

    fn registry() -> PackageRegistry {
        PackageRegistry::new()
            .with_package("trueno_artifact", "0.1.0")
            .with_package("smartcore", "0.3.2")
    }

    #[test]
    fn test_source_prefers_explicit_package() {
        let builder = ArtifactHandler::builder("m")
            .value(Estimator { coef: vec![], fitted: false })
            .package("smartcore");
        assert_eq!(
            builder.source().unwrap(),
            PackageSource::FromPackage("smartcore".into())
        );
    }

    #[test]
    fn test_resolve_normalizes_explicit_package() {
        let source = PackageSource::FromPackage(" trueno-artifact ".into());
        assert_eq!(source.resolve(&registry()).unwrap(), "trueno_artifact");
    }

    #[test]
    fn test_source_from_value() {
        let builder = ArtifactHandler::builder("m").value(Estimator { coef: vec![], fitted: true });
        assert!(matches!(
            builder.source().unwrap(),
            PackageSource::FromValue { type_path } if type_path.ends_with("Estimator")
        ));
    }

    #[test]
    fn test_construct_infers_package_from_value() {
        let handler = ArtifactHandler::builder("m")
            .value(Estimator { coef: vec![1.0], fitted: true })
            .construct(&registry())
            .unwrap();

        assert_eq!(handler.package(), "trueno_artifact");
        assert_eq!(handler.package_version(), "0.1.0");
        assert_eq!(handler.serializer_version(), SERIALIZER_VERSION);
        assert!(handler.writer_kwargs().is_none());
        assert!(handler.version().is_none());
        assert!(!handler.is_dirty());
    }

    #[test]
    fn test_construct_empty_name() {
        let err = ArtifactHandler::<Estimator>::builder("  ")
            .package("smartcore")
            .construct(&registry())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_assign_version() {
        let mut handler = ArtifactHandler::<Estimator>::builder("m")
            .package("smartcore")
            .construct(&registry())
            .unwrap();
        handler.assign_version(3);
        assert_eq!(handler.version(), Some(3));
        assert_eq!(handler.to_record().version(), Some(3));
    }

    #[test]
    fn test_mark_dirty_ignores_other_names() {
        let stored = ArtifactRecord::builder("other", "smartcore", "0.1.0").build();
        let mut handler = ArtifactHandler::<Estimator>::builder("m")
            .package("smartcore")
            .construct(&registry())
            .unwrap();

        assert!(!handler.mark_dirty_against(Some(&stored)));
        assert!(!handler.mark_dirty_against(None));
    }

    #[test]
    fn test_from_record_rejects_foreign_handler() {
        let record = ArtifactRecord::builder("m", "smartcore", "0.3.2")
            .handler("json")
            .build();
        let err = ArtifactHandler::<Estimator>::from_record(record).unwrap_err();
        assert!(err.to_string().contains("json"));
    }

    #[test]
    fn test_check_environment_package_removed() {
        let handler = ArtifactHandler::<Estimator>::builder("m")
            .package("smartcore")
            .construct(&registry())
            .unwrap();

        let err = handler.check_environment(&PackageRegistry::new()).unwrap_err();
        assert!(err.to_string().contains("not installed"));
    }
}
