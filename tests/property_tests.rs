//! Property-based tests for trueno-artifact
//!
//! - Filename derivation invariants
//! - Payload integrity across compression settings
//! - Content equality ignores ephemeral fields
//! - Run with ProptestConfig::with_cases(100)

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use trueno_artifact::artifact::{slugify, ArtifactHandler};
use trueno_artifact::environment::PackageRegistry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Sample {
    label: String,
    values: Vec<f64>,
    flags: Vec<bool>,
}

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

fn arb_sample() -> impl Strategy<Value = Sample> {
    (
        ".{0,32}",
        proptest::collection::vec(-1.0e6f64..1.0e6, 0..128),
        proptest::collection::vec(any::<bool>(), 0..64),
    )
        .prop_map(|(label, values, flags)| Sample {
            label,
            values,
            flags,
        })
}

/// Seconds between 2000-01-01 and 2099-12-31
fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..4_102_358_400).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn arb_compress() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(serde_json::json!(false)),
        Just(serde_json::json!(true)),
        Just(serde_json::json!("lz4")),
        (1i64..=22).prop_map(|level| serde_json::json!(level)),
    ]
}

fn registry() -> PackageRegistry {
    PackageRegistry::new().with_package("property_tests", "0.1.0")
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: slugs contain no whitespace and no leading/trailing separators
    #[test]
    fn prop_slug_shape(name in "[ -~\\t]{0,48}") {
        let slug = slugify(&name);
        prop_assert!(!slug.chars().any(char::is_whitespace));
        prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
        prop_assert_eq!(slugify(&slug), slug.clone());
    }

    /// Property: fname is slug + frozen timestamp + suffix
    #[test]
    fn prop_fname_matches_created_at(
        name in "[A-Za-z][A-Za-z0-9 _-]{0,24}",
        created_at in arb_timestamp()
    ) {
        let handler = ArtifactHandler::<Sample>::builder(name.clone())
            .package("property_tests")
            .created_at(created_at)
            .construct(&registry())
            .unwrap();

        let expected = format!(
            "{}-{}.bincode",
            slugify(&name),
            created_at.format("%Y%m%d%H%M%S")
        );
        prop_assert_eq!(handler.fname(), expected.as_str());
    }

    /// Property: read(write(v)) == v for any compression setting
    #[test]
    fn prop_write_read_roundtrip(sample in arb_sample(), compress in arb_compress()) {
        let handler = ArtifactHandler::builder("Sample")
            .value(sample.clone())
            .writer_kwarg("compress", compress)
            .construct(&registry())
            .unwrap();

        let mut buf: Vec<u8> = Vec::new();
        handler.write(&sample, &mut buf).unwrap();
        let restored = handler.read(buf.as_slice()).unwrap();

        prop_assert_eq!(restored, sample);
    }

    /// Property: handlers that differ only in value and timestamp are equal
    #[test]
    fn prop_equality_ignores_value_and_time(
        a in arb_sample(),
        b in arb_sample(),
        t1 in arb_timestamp(),
        t2 in arb_timestamp()
    ) {
        let reg = registry();
        let h1 = ArtifactHandler::builder("Sample").value(a).created_at(t1).construct(&reg).unwrap();
        let h2 = ArtifactHandler::builder("Sample").value(b).created_at(t2).construct(&reg).unwrap();

        prop_assert!(h1.same_content(&h2));
    }
}
