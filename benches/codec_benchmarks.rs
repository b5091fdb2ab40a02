//! Artifact payload benchmarks
//!
//! Write/read throughput of the handler across compression settings:
//! - raw bincode
//! - LZ4
//! - ZSTD (level 3)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use trueno_artifact::artifact::ArtifactHandler;
use trueno_artifact::environment::PackageRegistry;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Weights {
    layers: Vec<Vec<f32>>,
}

/// Create model weights with the given number of parameters per layer
#[allow(clippy::cast_precision_loss)]
fn create_weights(params: usize) -> Weights {
    Weights {
        layers: (0..8)
            .map(|layer| (0..params).map(|i| ((i * layer) % 97) as f32 / 97.0).collect())
            .collect(),
    }
}

fn build_handler(weights: &Weights, compress: serde_json::Value) -> ArtifactHandler<Weights> {
    let registry = PackageRegistry::new().with_package("codec_benchmarks", "0.1.0");
    ArtifactHandler::builder("Weights")
        .value(weights.clone())
        .writer_kwarg("compress", compress)
        .construct(&registry)
        .unwrap()
}

fn settings() -> [(&'static str, serde_json::Value); 3] {
    [
        ("none", serde_json::json!(false)),
        ("lz4", serde_json::json!("lz4")),
        ("zstd", serde_json::json!(3)),
    ]
}

/// Benchmark artifact writes
fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("artifact_write");
    let weights = create_weights(100_000);

    for (label, compress) in settings() {
        let handler = build_handler(&weights, compress);
        group.bench_with_input(BenchmarkId::from_parameter(label), &weights, |b, w| {
            b.iter(|| {
                let mut buf: Vec<u8> = Vec::new();
                handler.write(black_box(w), &mut buf).unwrap();
                buf
            });
        });
    }

    group.finish();
}

/// Benchmark artifact reads
fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("artifact_read");
    let weights = create_weights(100_000);

    for (label, compress) in settings() {
        let handler = build_handler(&weights, compress);
        let mut payload: Vec<u8> = Vec::new();
        handler.write(&weights, &mut payload).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(label), &payload, |b, p| {
            b.iter(|| handler.read(black_box(p.as_slice())).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_write, bench_read);
criterion_main!(benches);
