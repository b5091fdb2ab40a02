//! Artifact Round-Trip Example
//!
//! Logs a fitted model twice: once under the original environment, once after
//! a simulated package upgrade, and shows how dirty detection reacts.
//!
//! Run with: RUST_LOG=debug cargo run --example artifact_roundtrip

use std::fs::File;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use trueno_artifact::artifact::{ArtifactHandler, ArtifactRecord};
use trueno_artifact::environment::PackageRegistry;

/// Example crates are named after the example target.
const DEMO_CRATE: &str = "artifact_roundtrip";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RidgeModel {
    alpha: f64,
    coef: Vec<f64>,
}

impl RidgeModel {
    fn fit(alpha: f64, x: &[f64], y: &[f64]) -> Self {
        let sxx: f64 = x.iter().map(|v| v * v).sum();
        let sxy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
        Self {
            alpha,
            coef: vec![sxy / (sxx + alpha)],
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Trueno-Artifact Round Trip ===\n");

    let workdir = std::env::temp_dir().join("trueno-artifact-demo");
    std::fs::create_dir_all(&workdir).context("creating demo directory")?;

    // -------------------------------------------------------------------------
    // 1. Log a fitted model
    // -------------------------------------------------------------------------
    println!("1. Logging model artifact...");

    let x = [1.0, 2.0, 3.0, 4.0];
    let y = [2.1, 3.9, 6.2, 7.8];
    let model = RidgeModel::fit(0.1, &x, &y);

    let env_v1 = PackageRegistry::new().with_package(DEMO_CRATE, "1.0.0");
    let mut handler = ArtifactHandler::builder("Ridge model")
        .value(model.clone())
        .writer_kwarg("compress", "zstd")
        .construct(&env_v1)?;

    let path = workdir.join(handler.fname());
    handler.write(&model, File::create(&path)?)?;
    handler.assign_version(0);

    println!("   File: {}", path.display());
    println!("   Package: {} {}", handler.package(), handler.package_version());

    // -------------------------------------------------------------------------
    // 2. Persist metadata as the owning project would
    // -------------------------------------------------------------------------
    println!("\n2. Metadata record:");

    let json = serde_json::to_string_pretty(&handler.to_record())?;
    println!("{json}");
    let stored: ArtifactRecord = serde_json::from_str(&json)?;

    // -------------------------------------------------------------------------
    // 3. Reload and read back
    // -------------------------------------------------------------------------
    println!("\n3. Reading artifact back...");

    let reloaded = ArtifactHandler::<RidgeModel>::from_record(stored.clone())?;
    reloaded.check_environment(&env_v1)?;
    let restored = reloaded.read(File::open(workdir.join(reloaded.fname()))?)?;
    println!("   Restored coef: {:?} (alpha = {})", restored.coef, restored.alpha);

    // -------------------------------------------------------------------------
    // 4. Re-log after an upgrade
    // -------------------------------------------------------------------------
    println!("\n4. Re-logging after upgrade...");

    let env_v2 = PackageRegistry::new().with_package(DEMO_CRATE, "1.1.0");
    let mut relogged = ArtifactHandler::builder("Ridge model")
        .value(model)
        .writer_kwarg("compress", "zstd")
        .construct(&env_v2)?;
    let dirty = relogged.mark_dirty_against(Some(&stored));
    println!("   Dirty: {dirty}");

    if let Err(e) = reloaded.check_environment(&env_v2) {
        println!("   Load check: {e}");
    }

    println!("\n=== Round Trip Complete ===");
    Ok(())
}
