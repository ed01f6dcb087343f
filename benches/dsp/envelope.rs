//! Benchmarks for envelope evaluation.

use std::hint::black_box;

use audiolab::{dsp::Envelope, synth::NOT_RELEASED};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let envelope = Envelope::adsr(0.01, 0.1, 0.7, 0.3);
    let dt = 1.0 / SAMPLE_RATE as f64;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Held through attack and decay
        group.bench_with_input(BenchmarkId::new("held", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let out = envelope.evaluate(black_box(i as f64 * dt), 0.0, NOT_RELEASED);
                    *sample = out.amplitude;
                }
                black_box(&buffer);
            })
        });

        // Release ramp
        group.bench_with_input(BenchmarkId::new("released", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let out = envelope.evaluate(black_box(0.5 + i as f64 * dt), 0.0, 0.45);
                    *sample = out.amplitude;
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
