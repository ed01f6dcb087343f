//! Benchmarks for one note on each instrument preset.

use std::hint::black_box;

use audiolab::{
    synth::{InstrumentId, Note},
    voices::InstrumentPreset,
};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_instruments(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/instruments");
    let dt = 1.0 / SAMPLE_RATE as f64;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for preset in InstrumentPreset::ALL {
            let instrument = preset.instrument();
            let mut note = Note::new(&instrument, InstrumentId(0), 220.0, 0, 0.0, SAMPLE_RATE, 1);
            let mut time = 0.0;
            group.bench_with_input(BenchmarkId::new(preset.name(), size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = instrument.sound(&mut note, black_box(time));
                        time += dt;
                    }
                    // Stay in the sustain stage
                    if time > 0.5 {
                        time = 0.5;
                    }
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}
