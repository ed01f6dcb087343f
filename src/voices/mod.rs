//! Instrument presets.
//!
//! Every preset is the same `Instrument` type with different settings, so an
//! editor can start from one and tweak it into another. Study them to see how
//! partials, envelopes and filters combine into a timbre.
//!
//! # Example
//!
//! ```ignore
//! use audiolab::voices::{self, InstrumentPreset};
//!
//! let bell = voices::bell();
//! let drum = InstrumentPreset::Drum.instrument();
//! ```

mod base;
mod bell;
mod drum;
mod harmonica;

pub use base::base;
pub use bell::bell;
pub use drum::drum;
pub use harmonica::harmonica;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::synth::Instrument;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstrumentPreset {
    #[default]
    Base,
    Bell,
    Harmonica,
    Drum,
}

impl InstrumentPreset {
    pub const ALL: [InstrumentPreset; 4] = [
        InstrumentPreset::Base,
        InstrumentPreset::Bell,
        InstrumentPreset::Harmonica,
        InstrumentPreset::Drum,
    ];

    pub fn instrument(self) -> Instrument {
        match self {
            InstrumentPreset::Base => base(),
            InstrumentPreset::Bell => bell(),
            InstrumentPreset::Harmonica => harmonica(),
            InstrumentPreset::Drum => drum(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InstrumentPreset::Base => "base",
            InstrumentPreset::Bell => "bell",
            InstrumentPreset::Harmonica => "harmonica",
            InstrumentPreset::Drum => "drum",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{InstrumentId, Note};

    #[test]
    fn presets_report_their_own_kind() {
        for preset in InstrumentPreset::ALL {
            assert_eq!(preset.instrument().preset, preset);
        }
    }

    #[test]
    fn presets_render_finite_audio() {
        let sample_rate = 44_100.0;
        for preset in InstrumentPreset::ALL {
            let instrument = preset.instrument();
            let mut note = Note::new(&instrument, InstrumentId(0), 220.0, 0, 0.0, sample_rate, 3);
            let mut energy = 0.0;
            for i in 0..4_410 {
                let sample = instrument.sound(&mut note, i as f64 / sample_rate as f64);
                assert!(sample.is_finite());
                energy += sample * sample;
            }
            assert!(energy > 0.0, "{} was silent", preset.name());
        }
    }

    #[test]
    fn next_cycles_through_all() {
        let mut preset = InstrumentPreset::Base;
        for _ in 0..InstrumentPreset::ALL.len() {
            preset = preset.next();
        }
        assert_eq!(preset, InstrumentPreset::Base);
    }
}
