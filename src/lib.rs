pub mod config;
pub mod dsp; // Oscillators, envelopes and filters
pub mod engine; // Realtime mixer and its control-side owner
pub mod error;
pub mod io;
pub mod params;
pub mod sequencing; // Clips, piano roll and arrangement
pub mod synth; // Instruments, notes and engine messages
pub mod voices;

pub use config::LabConfig;
pub use engine::{AudioLab, Studio};
pub use error::{LabError, Result};

pub const MAX_BLOCK_SIZE: usize = 2048;
/// Upper bound on partials (oscillators) per instrument.
pub const MAX_PARTIALS: usize = 8;
/// Upper bound on the filter chain length of one instrument.
pub const MAX_FILTERS: usize = 4;
/// Clip playback state is published as a 64-bit mask.
pub const MAX_CLIPS: usize = 64;
pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;
