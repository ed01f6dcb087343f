//! Bell voice.
//!
//! Three sine partials stacked in octaves (1x, 2x, 4x) with falling weights.
//! No sustain: the bell rings out over a long decay whether or not the key is
//! still held.
//!
//! # How It Works
//!
//! 1. Fundamental at full level gives the pitch
//! 2. Octave partials at half and quarter level give the metallic ring
//! 3. Near-instant attack, one second decay to silence

use crate::{
    dsp::{Envelope, WaveType},
    synth::{Instrument, WaveParams},
    voices::InstrumentPreset,
};

/// Create a bell instrument.
pub fn bell() -> Instrument {
    Instrument::new(
        InstrumentPreset::Bell,
        Envelope::adsr(0.01, 1.0, 0.0, 1.0),
        &[
            WaveParams::new(WaveType::Sine, 1.0, 1.0),
            WaveParams::new(WaveType::Sine, 0.5, 2.0),
            WaveParams::new(WaveType::Sine, 0.25, 4.0),
        ],
    )
}
