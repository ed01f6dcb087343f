//! Drum voice.
//!
//! A synthesized kick: a sine whose pitch falls with the amplitude decay,
//! plus a short burst of noise for the beater click.
//!
//! # How It Works
//!
//! 1. Frequency decay bends the sine down as the envelope decays
//! 2. Zero sustain: the hit dies away even if the key is held
//! 3. Noise partial at low level adds attack transient
//!
//! # Variations
//!
//! - Longer decay = boomy 808-style kick
//! - More noise, less sine = snare-like

use crate::{
    dsp::{Envelope, WaveType},
    synth::{Instrument, WaveParams},
    voices::InstrumentPreset,
};

/// Create a drum instrument.
pub fn drum() -> Instrument {
    Instrument::new(
        InstrumentPreset::Drum,
        Envelope::adsr(0.0, 0.25, 0.0, 0.05).with_frequency_decay(0.8),
        &[
            WaveParams::new(WaveType::Sine, 0.9, 0.5),
            WaveParams::new(WaveType::Noise, 0.1, 1.0),
        ],
    )
    .with_frequency_decay(true)
}
