//! Artifact handlers for experiment tracking
//!
//! An [`ArtifactHandler`] pairs one logged value with the metadata needed to
//! reproduce it, and knows how to write and read that value through a binary
//! channel.
//!
//! ## Lifecycle
//!
//! ```text
//! builder(name) ──construct()──> ArtifactHandler (constructed)
//!                                    │  write(value, file)
//!                                    │  assign_version / mark_dirty_against
//!                                    ▼
//!                                ArtifactRecord (persisted, in project file)
//!                                    │  from_record()
//!                                    ▼
//!                                ArtifactHandler (value = None) ──read(file)──> T
//! ```
//!
//! ## Dirty Detection
//!
//! ```rust
//! use trueno_artifact::artifact::ArtifactHandler;
//! use trueno_artifact::environment::PackageRegistry;
//!
//! #[derive(serde::Serialize, serde::Deserialize)]
//! struct Model;
//!
//! let v1 = PackageRegistry::new().with_package("smartcore", "0.3.2");
//! let stored = ArtifactHandler::<Model>::builder("Estimator")
//!     .package("smartcore")
//!     .construct(&v1)?
//!     .to_record();
//!
//! let v2 = PackageRegistry::new().with_package("smartcore", "0.4.0");
//! let mut current = ArtifactHandler::<Model>::builder("Estimator")
//!     .package("smartcore")
//!     .construct(&v2)?;
//!
//! assert!(current.mark_dirty_against(Some(&stored)));
//! # Ok::<(), trueno_artifact::Error>(())
//! ```

mod fingerprint;
mod handler;
mod naming;
mod record;

pub use fingerprint::ContentFingerprint;
pub use handler::{content_equal, ArtifactHandler, ArtifactHandlerBuilder, PackageSource};
pub use naming::{artifact_fname, slugify, FNAME_TIMESTAMP_FORMAT};
pub use record::{ArtifactRecord, ArtifactRecordBuilder};

/// Alias under which the owning system registers this handler.
pub const HANDLER_ALIAS: &str = "bincode";

/// File extension of artifact payloads.
pub const FILE_SUFFIX: &str = "bincode";
