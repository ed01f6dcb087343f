//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use audiolab::dsp::{Oscillator, WaveType};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - sin() per sample, Square - branch per sample, Noise - PRNG
        for wave in [
            WaveType::Sine,
            WaveType::Saw,
            WaveType::Square,
            WaveType::Triangle,
            WaveType::Noise,
        ] {
            let mut osc = Oscillator::new(SAMPLE_RATE);
            group.bench_with_input(BenchmarkId::new(wave.name(), size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = osc.wave(black_box(440.0), wave);
                    }
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}
