#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::params::{ParameterInfo, Tweakable};

/*
| type      | passes        | rejects       | output               |
| --------- | ------------- | ------------- | -------------------- |
| low-pass  | below cutoff  | above cutoff  | y += c * (x - y)     |
| high-pass | above cutoff  | below cutoff  | x - lowpass(x)       |

Both are one-pole smoothers. `cutoff` is normalized to [0, 1]: 1.0 passes the
input straight through (low-pass) or silences it (high-pass), 0.0 freezes the
low-pass output and lets the high-pass pass everything.

Filter parameters live on the instrument, the memory (`FilterState`) lives on
each note, so two notes on one instrument never smear into each other.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    LowPass,
    HighPass,
}

impl FilterKind {
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::LowPass => "low-pass",
            FilterKind::HighPass => "high-pass",
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub kind: FilterKind,
    pub enabled: bool,
    pub cutoff: f32,
}

/// Per-note filter memory.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterState {
    lowpass: f32,
}

impl FilterParams {
    pub fn lowpass(cutoff: f32) -> Self {
        Self {
            kind: FilterKind::LowPass,
            enabled: true,
            cutoff: cutoff.clamp(0.0, 1.0),
        }
    }

    pub fn highpass(cutoff: f32) -> Self {
        Self {
            kind: FilterKind::HighPass,
            enabled: true,
            cutoff: cutoff.clamp(0.0, 1.0),
        }
    }

    /// Filter one sample. Disabled filters pass the input through untouched
    /// and leave `state` alone.
    #[inline]
    pub fn apply(&self, state: &mut FilterState, sample: f32) -> f32 {
        if !self.enabled {
            return sample;
        }

        state.lowpass += self.cutoff * (sample - state.lowpass);
        match self.kind {
            FilterKind::LowPass => state.lowpass,
            FilterKind::HighPass => sample - state.lowpass,
        }
    }
}

impl Tweakable for FilterParams {
    fn parameter_count(&self) -> usize {
        2
    }

    fn parameter(&self, index: usize) -> Option<ParameterInfo> {
        match index {
            0 => Some(ParameterInfo::new(
                "enabled",
                if self.enabled { 1.0 } else { 0.0 },
                0.0,
                1.0,
            )),
            1 => Some(ParameterInfo::new("cutoff", self.cutoff, 0.0, 1.0)),
            _ => None,
        }
    }

    fn set_parameter(&mut self, index: usize, value: f32) -> bool {
        match index {
            0 => self.enabled = value >= 0.5,
            1 => self.cutoff = value.clamp(0.0, 1.0),
            _ => return false,
        }
        true
    }
}
