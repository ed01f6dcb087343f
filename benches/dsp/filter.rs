//! Benchmarks for the one-pole filters.

use std::hint::black_box;

use audiolab::dsp::{FilterParams, FilterState};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| ((i * 7919) % 200) as f32 / 100.0 - 1.0).collect();
        let mut buffer = vec![0.0f32; size];

        for (name, filter) in [
            ("lowpass", FilterParams::lowpass(0.2)),
            ("highpass", FilterParams::highpass(0.2)),
        ] {
            let mut state = FilterState::default();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for (out, &x) in buffer.iter_mut().zip(input.iter()) {
                        *out = filter.apply(&mut state, black_box(x));
                    }
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}
