//! Utilization reconciliation benchmarks.
//!
//! Benchmarks each reconciliation mode on a single layer.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use vdyp_control::UtilizationVector;
use vdyp_control::app::services::reconciliation::reconcile_components;

type Layer = (UtilizationVector, UtilizationVector, UtilizationVector);

fn layer(ba: [f32; 5], tph: [f32; 5], dq: [f32; 5]) -> Layer {
    let vector = |v: [f32; 5]| UtilizationVector::from_all_and_bands(v[0], [v[1], v[2], v[3], v[4]]);
    (vector(ba), vector(tph), vector(dq))
}

fn mode_1_layer() -> Layer {
    layer(
        [2.20898318, 0.220842764, 0.433804274, 0.691931725, 0.862404406],
        [154.454025, 83.4198151, 51.0201035, 14.6700592, 4.25086117],
        [13.4943399, 10.2766619, 14.67033, 19.4037666, 25.719244],
    )
}

fn mode_2_layer() -> Layer {
    layer(
        [0.397305071, 0.00485289097, 0.0131751001, 0.0221586525, 0.357118428],
        [5.04602766, 0.61060524, 0.748872101, 0.709191978, 2.13305807],
        [31.6622887, 10.0594692, 14.966774, 19.9454956, 46.1699982],
    )
}

fn mode_3_layer() -> Layer {
    layer(
        [2.20898318, 2.20898318, 0.0, 0.0, 0.0],
        [179.71648, 182.91916, 0.0, 0.0, 0.0],
        [12.51, 12.4, 0.0, 0.0, 0.0],
    )
}

/// Benchmark a full reconciliation per mode.
fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconciliation/components");

    for (name, setup) in [
        ("mode_1", mode_1_layer as fn() -> Layer),
        ("mode_2", mode_2_layer),
        ("mode_3", mode_3_layer),
    ] {
        group.bench_function(name, |b| {
            b.iter_batched(
                setup,
                |(mut ba, mut tph, mut dq)| {
                    let result = reconcile_components(&mut ba, &mut tph, &mut dq);
                    black_box((result.is_ok(), ba, tph, dq))
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
