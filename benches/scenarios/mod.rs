//! Real-world scenario benchmarks.
//!
//! These model what the engine does per device buffer: presets sounding
//! notes, the full master mix, and rendering a clip on the control thread.

mod instruments;
mod mix;

pub use instruments::bench_instruments;
pub use mix::{bench_clip_render, bench_master_mix};
