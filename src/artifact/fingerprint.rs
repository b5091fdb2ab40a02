//! Content fingerprint - what counts as a content change
//!
//! Two artifacts with the same fingerprint are considered the same content,
//! even though their payload bytes, filenames, and timestamps differ between
//! runs. Excluded on purpose: `name`, `value`, `created_at`, `fname`,
//! `version`, `dirty`. The owning tracker decides which artifacts share a
//! name before comparing them.

use crate::codec::WriterKwargs;

/// Projection of artifact metadata used for equality and dirty detection.
///
/// Package names compare with `-` and `_` treated as the same character, the
/// way Cargo treats crate names.
#[derive(Debug, Clone, Copy, Eq)]
pub struct ContentFingerprint<'a> {
    /// Writer options; an empty map is the same as no options
    pub writer_kwargs: Option<&'a WriterKwargs>,
    /// Originating package
    pub package: &'a str,
    /// Package version at construction time
    pub package_version: &'a str,
    /// Serialization library version
    pub serializer_version: &'a str,
}

impl<'a> ContentFingerprint<'a> {
    /// Build a fingerprint, normalizing empty writer options to `None`.
    #[must_use]
    pub fn new(
        writer_kwargs: Option<&'a WriterKwargs>,
        package: &'a str,
        package_version: &'a str,
        serializer_version: &'a str,
    ) -> Self {
        Self {
            writer_kwargs: writer_kwargs.filter(|kw| !kw.is_empty()),
            package: package.trim(),
            package_version,
            serializer_version,
        }
    }

    /// Names of the fields that differ from `other`.
    #[must_use]
    pub fn diff(&self, other: &Self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.writer_kwargs != other.writer_kwargs {
            fields.push("writer_kwargs");
        }
        if !same_package(self.package, other.package) {
            fields.push("package");
        }
        if self.package_version != other.package_version {
            fields.push("package_version");
        }
        if self.serializer_version != other.serializer_version {
            fields.push("serializer_version");
        }
        fields
    }
}

impl PartialEq for ContentFingerprint<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.diff(other).is_empty()
    }
}

fn same_package(a: &str, b: &str) -> bool {
    let canonical = |c: char| if c == '-' { '_' } else { c };
    a.chars().map(canonical).eq(b.chars().map(canonical))
}
