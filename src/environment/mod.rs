//! Environment resolution for artifact reproducibility metadata
//!
//! Handlers never introspect the running program. Instead they ask an
//! [`EnvironmentResolver`] two questions:
//!
//! 1. Which top-level package defines this value's type?
//! 2. Which version of that package is installed?
//!
//! The default answer to (1) is derived from the Rust type path reported by
//! [`std::any::type_name`]. The answer to (2) comes from a [`PackageRegistry`]
//! or any substitute (tests use fakes).
//!
//! ## Example
//!
//! ```rust
//! use trueno_artifact::environment::{EnvironmentResolver, PackageRegistry};
//!
//! let registry = PackageRegistry::new().with_package("linfa-svm", "0.7.1");
//!
//! let package = registry.resolve_top_level_package("linfa_svm::Svm<f64, bool>")?;
//! assert_eq!(package, "linfa_svm");
//! assert_eq!(registry.get_version(&package)?, "0.7.1");
//! # Ok::<(), trueno_artifact::Error>(())
//! ```

mod registry;

pub use registry::PackageRegistry;

use crate::{Error, Result};

/// Crate roots that never count as an artifact's originating package.
pub const STANDARD_ROOTS: [&str; 3] = ["core", "alloc", "std"];

/// Capability for discovering package identity and version.
pub trait EnvironmentResolver {
    /// Resolve the top-level package that defines a type.
    ///
    /// `type_path` is a fully qualified Rust type path as produced by
    /// [`std::any::type_name`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttributeResolution`] when the path has no
    /// discoverable crate root.
    fn resolve_top_level_package(&self, type_path: &str) -> Result<String> {
        top_level_package(type_path).map(str::to_string)
    }

    /// Get the installed version of a package.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackageNotFound`] if the package is unknown.
    fn get_version(&self, package: &str) -> Result<String>;
}

impl<R: EnvironmentResolver + ?Sized> EnvironmentResolver for &R {
    fn resolve_top_level_package(&self, type_path: &str) -> Result<String> {
        (**self).resolve_top_level_package(type_path)
    }

    fn get_version(&self, package: &str) -> Result<String> {
        (**self).get_version(package)
    }
}

impl<R: EnvironmentResolver + ?Sized> EnvironmentResolver for Box<R> {
    fn resolve_top_level_package(&self, type_path: &str) -> Result<String> {
        (**self).resolve_top_level_package(type_path)
    }

    fn get_version(&self, package: &str) -> Result<String> {
        (**self).get_version(package)
    }
}

/// Extract the crate root from a Rust type path.
///
/// Generic arguments are ignored, so `my_crate::Model<alloc::vec::Vec<f64>>`
/// resolves to `my_crate`. Primitives, slices, arrays, tuples, references,
/// pointers, trait objects, function pointers and standard-library types have
/// no originating package.
///
/// # Errors
///
/// Returns [`Error::AttributeResolution`] when no crate root can be found.
pub fn top_level_package(type_path: &str) -> Result<&str> {
    let path = type_path.trim();

    let builtin_shape = path.is_empty()
        || path.starts_with(['[', '(', '&', '*', '!'])
        || path.starts_with("dyn ")
        || path.starts_with("impl ")
        || path.starts_with("fn(")
        || path.starts_with("unsafe ")
        || path.starts_with("extern ");
    if builtin_shape {
        return Err(Error::AttributeResolution(format!(
            "type '{path}' is a built-in type with no defining package"
        )));
    }

    let base = path.split('<').next().unwrap_or(path);
    let Some((root, _)) = base.split_once("::") else {
        return Err(Error::AttributeResolution(format!(
            "type '{path}' has no module path"
        )));
    };

    if root.is_empty() || STANDARD_ROOTS.contains(&root) {
        return Err(Error::AttributeResolution(format!(
            "type '{path}' is defined by the standard library, not a package"
        )));
    }

    Ok(root)
}

/// Normalize a package name so crate names and Rust paths agree (`-` -> `_`).
#[must_use]
pub fn normalize_package_name(name: &str) -> String {
    name.trim().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_package_simple() {
        assert_eq!(top_level_package("linfa_svm::Svm").unwrap(), "linfa_svm");
    }

    #[test]
    fn test_top_level_package_nested_generics() {
        let path = "smartcore::svm::svc::SVC<f64, i32, alloc::vec::Vec<f64>>";
        assert_eq!(top_level_package(path).unwrap(), "smartcore");
    }

    #[test]
    fn test_top_level_package_std_types_rejected() {
        for path in [
            "alloc::vec::Vec<f64>",
            "std::collections::hash::map::HashMap<u8, u8>",
            "core::option::Option<i32>",
        ] {
            assert!(matches!(
                top_level_package(path),
                Err(Error::AttributeResolution(_))
            ));
        }
    }

    #[test]
    fn test_top_level_package_builtin_shapes_rejected() {
        for path in ["f64", "[f64; 3]", "(i32, i32)", "&str", "*const u8", "dyn my::Trait", ""] {
            assert!(
                matches!(top_level_package(path), Err(Error::AttributeResolution(_))),
                "{path} should not resolve"
            );
        }
    }

    #[test]
    fn test_type_name_of_local_type_resolves_to_this_crate() {
        struct Local;
        let path = std::any::type_name::<Local>();
        assert_eq!(top_level_package(path).unwrap(), "trueno_artifact");
    }

    #[test]
    fn test_normalize_package_name() {
        assert_eq!(normalize_package_name("linfa-svm"), "linfa_svm");
        assert_eq!(normalize_package_name(" serde "), "serde");
    }
}
