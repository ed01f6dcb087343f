//! Harmonica voice.
//!
//! Reedy square waves plus a breath of noise, softened by a low-pass.
//!
//! # How It Works
//!
//! 1. Square fundamental gives the hollow reed tone
//! 2. A quieter square a fifth above (1.5x) thickens it
//! 3. A little noise at 2x is the breath
//! 4. Low-pass takes the edge off the square harmonics

use crate::{
    dsp::{Envelope, FilterParams, WaveType},
    synth::{Instrument, WaveParams},
    voices::InstrumentPreset,
};

/// Create a harmonica instrument.
pub fn harmonica() -> Instrument {
    Instrument::new(
        InstrumentPreset::Harmonica,
        Envelope::adsr(0.05, 1.0, 0.95, 0.1),
        &[
            WaveParams::new(WaveType::Square, 0.6, 1.0),
            WaveParams::new(WaveType::Square, 0.3, 1.5),
            WaveParams::new(WaveType::Noise, 0.05, 2.0),
        ],
    )
    .with_filter(FilterParams::lowpass(0.6))
}
