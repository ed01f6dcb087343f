//! Benchmarks for the master mix and clip rendering.

use std::hint::black_box;

use audiolab::{voices::InstrumentPreset, LabConfig, Studio};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn config() -> LabConfig {
    LabConfig::new()
        .sample_rate(SAMPLE_RATE)
        .record_duration(2.0)
        .cell_duration(0.125)
        .clips(4)
}

pub fn bench_master_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/master_mix");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === 8 held keys on the harmonica, all clip buffers playing ===
        let Ok((mut studio, mut lab)) = Studio::new(config()) else {
            return;
        };
        let _ = studio.set_preset(0, InstrumentPreset::Harmonica);
        for code in *b"ZSXDCVGB" {
            let _ = studio.key_down(code as u32);
        }
        for clip in 0..4 {
            let _ = studio.play_clip(clip);
        }

        group.bench_with_input(BenchmarkId::new("8_keys_4_clips", size), &size, |b, _| {
            b.iter(|| {
                lab.render_block(black_box(&mut buffer));
                studio.collect_garbage();
            })
        });
    }

    group.finish();
}

pub fn bench_clip_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/clip_render");
    group.sample_size(10);

    let Ok((mut studio, _lab)) = Studio::new(config()) else {
        return;
    };
    // A busy bar: one note per cell, walking down the rows
    for cell in 0..16 {
        let x = cell as f32 * 24.0 + 12.0;
        let y = (cell % 12) as f32 * 16.0 + 8.0;
        studio.mouse_press(x, y);
        studio.mouse_release();
    }

    let clip = studio.current_clip();
    group.bench_function(BenchmarkId::new("2s_16_notes", "base"), |b| {
        b.iter(|| clip.map(|clip| black_box(clip.render())))
    });

    group.finish();
}
