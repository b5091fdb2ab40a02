//! Error types for Trueno-Artifact
//!
//! Every failure surfaces at the call that triggers it (construct, write, read).
//! Nothing is retried or silently downgraded.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trueno-Artifact error types
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied unusable input (missing value and package, invalid package, bad writer option)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The crate root of a value's type could not be determined
    #[error("Cannot determine package: {0}\nPass the package name explicitly when constructing the artifact.")]
    AttributeResolution(String),

    /// Environment resolver does not know the package
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// Value could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Payload is corrupt or incompatible
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Artifact was written under a different environment than the current one
    #[error("Environment mismatch for artifact '{artifact}': {details}")]
    EnvironmentMismatch {
        /// Artifact name
        artifact: String,
        /// Human-readable list of drifted fields
        details: String,
    },

    /// `Cargo.lock` (or similar manifest) could not be parsed
    #[error("Manifest parse error: {0}")]
    ManifestParse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
