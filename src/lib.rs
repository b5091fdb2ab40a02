//! # Trueno-Artifact: Artifact Handlers for Experiment Tracking
//!
//! **Version**: 0.1.0
//!
//! An artifact handler governs how one logged value (typically a fitted model)
//! is written to disk, which reproducibility metadata travels with it, and how
//! it is read back. Handlers compare by *content* (package, versions, writer
//! options) rather than identity, so an owning tracker can tell whether a
//! re-logged artifact is "dirty".
//!
//! ## Design Principles
//!
//! - **Injected environment**: package discovery and version lookup go through
//!   [`environment::EnvironmentResolver`], never runtime reflection
//! - **Explicit equality policy**: [`artifact::ContentFingerprint`] is the
//!   projection that decides what counts as a content change
//! - **Opaque payloads**: bincode does the encoding; the handler only frames it
//!
//! ## Example Usage
//!
//! ```rust
//! use trueno_artifact::artifact::ArtifactHandler;
//! use trueno_artifact::environment::PackageRegistry;
//!
//! mod linfit {
//!     #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
//!     pub struct Model { pub coef: Vec<f64> }
//! }
//!
//! // Doctests are compiled as their own crate; register its root.
//! let crate_root = std::any::type_name::<linfit::Model>().split("::").next().unwrap();
//! let registry = PackageRegistry::new().with_package(crate_root, "0.4.2");
//!
//! let model = linfit::Model { coef: vec![0.5, 1.5] };
//! let handler = ArtifactHandler::builder("Linear fit")
//!     .value(model)
//!     .construct(&registry)?;
//!
//! let mut buf: Vec<u8> = Vec::new();
//! handler.write(handler.value().unwrap(), &mut buf)?;
//! let restored = handler.read(buf.as_slice())?;
//! assert_eq!(restored.coef, vec![0.5, 1.5]);
//! # Ok::<(), trueno_artifact::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod artifact;
pub mod codec;
pub mod environment;
pub mod error;

pub use error::{Error, Result};
