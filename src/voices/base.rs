//! Base voice.
//!
//! The plain starting point: one sine partial with a gentle envelope. Every
//! other preset is a variation on this recipe.
//!
//! # Variations
//!
//! - Swap the wave for a triangle = softer flute-like tone
//! - Add a partial at frequency 2.0 = an octave of shimmer
//! - Drop the sustain to zero = plucked sound

use crate::{
    dsp::{Envelope, WaveType},
    synth::{Instrument, WaveParams},
    voices::InstrumentPreset,
};

/// Create the base instrument.
pub fn base() -> Instrument {
    Instrument::new(
        InstrumentPreset::Base,
        // Soft attack, slight dip into sustain
        Envelope::adsr(0.1, 0.1, 0.8, 0.2),
        &[WaveParams::new(WaveType::Sine, 1.0, 1.0)],
    )
}
