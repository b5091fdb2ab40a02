//! Artifact file naming

use chrono::{DateTime, Utc};

/// Timestamp layout embedded in artifact filenames.
pub const FNAME_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Turn a human-readable name into a filename-safe slug.
///
/// Lower-cases, drops anything that is not alphanumeric, `_`, `-` or
/// whitespace, collapses runs of whitespace and hyphens into one `-`, and
/// trims leading/trailing `-` and `_`.
///
/// ```rust
/// use trueno_artifact::artifact::slugify;
///
/// assert_eq!(slugify("My estimator"), "my-estimator");
/// assert_eq!(slugify("  Feature names (v2)  "), "feature-names-v2");
/// ```
#[must_use]
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_separator = false;

    for ch in value.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(ch.to_lowercase());
        } else if ch == '-' || ch.is_whitespace() {
            pending_separator = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Derive an artifact filename: `{slug(name)}-{YYYYMMDDHHMMSS}.{suffix}`.
#[must_use]
pub fn artifact_fname(name: &str, created_at: DateTime<Utc>, suffix: &str) -> String {
    format!(
        "{}-{}.{suffix}",
        slugify(name),
        created_at.format(FNAME_TIMESTAMP_FORMAT)
    )
}
