#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::params::{ParameterInfo, Tweakable};

/*
ADSR Envelope as a Pure Function
================================

An instrument owns one set of envelope parameters, but many notes may be
sounding on it at once, each at a different point in its life. So the envelope
holds no runtime state at all: every note asks "what is my level at `time`,
given that I was pressed at `start` and released at `end`?"

  lifetime = time - start

Held (time < end)
-----------------

  Level
   start ┐   ╱╲
         │  ╱  ╲_____________
   amp   │ ╱                 ╲
         │╱                   ╲
     0.0 └─────────────────────╲──→ Time
          Attack Decay Sustain  Release

  Attack    lifetime <= attack            0 → start_amplitude
  Decay     attack < lifetime <= a + d    start_amplitude → amplitude
  Sustain   afterwards                    amplitude

A zero attack jumps straight to `start_amplitude`, so an instrument with
attack = decay = 0 is at full sustain on its very first sample.

The decay ramp doubles as a pitch envelope: its interpolated value is also
reported as `frequency_multiplier`, which instruments with frequency decay
enabled blend into the note's pitch (drums drop in pitch as they decay).
Outside the decay stage the multiplier is 1.0.

Released (time >= end)
----------------------

The level falls linearly from the sustain `amplitude` down to 0 over `release`
seconds, whatever stage the note had reached when it was let go. A key released
during the attack therefore jumps to the sustain level before fading.

    progress = (time - end) / release
    finished = progress >= 1

Once `finished` is reported the owning container drops the note.

Anything at or below 0.0001 is snapped to exactly 0 so silent tails never
linger as denormals.
*/

/// Levels at or below this are reported as silence.
pub const SILENCE_THRESHOLD: f32 = 0.0001;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub attack: f32,
    pub decay: f32,
    pub release: f32,
    pub start_amplitude: f32,
    /// Sustain level.
    pub amplitude: f32,
    /// Weight of the decay ramp on pitch, 0.0 (none) to 1.0 (full).
    pub frequency_decay: f32,
}

/// Result of evaluating an envelope for one note at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeOutput {
    pub amplitude: f32,
    pub finished: bool,
    pub frequency_multiplier: f32,
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            attack: 0.1,
            decay: 0.1,
            release: 0.2,
            start_amplitude: 1.0,
            amplitude: 0.8,
            frequency_decay: 0.0,
        }
    }

    pub fn adsr(attack: f32, decay: f32, amplitude: f32, release: f32) -> Self {
        Self {
            attack: attack.max(0.0),
            decay: decay.max(0.0),
            release: release.max(0.0),
            start_amplitude: 1.0,
            amplitude: amplitude.max(0.0),
            frequency_decay: 0.0,
        }
    }

    pub fn with_start_amplitude(mut self, start_amplitude: f32) -> Self {
        self.start_amplitude = start_amplitude.max(0.0);
        self
    }

    pub fn with_frequency_decay(mut self, frequency_decay: f32) -> Self {
        self.frequency_decay = frequency_decay.clamp(0.0, 1.0);
        self
    }

    /// Level and pitch multiplier of a note at `time`.
    pub fn evaluate(&self, time: f64, start_time: f64, end_time: f64) -> EnvelopeOutput {
        let mut output = if time < end_time {
            self.held(time - start_time)
        } else {
            self.released(time, end_time)
        };

        if output.amplitude <= SILENCE_THRESHOLD {
            output.amplitude = 0.0;
        }
        output
    }

    fn held(&self, lifetime: f64) -> EnvelopeOutput {
        let lifetime = lifetime.max(0.0) as f32;

        if lifetime <= self.attack {
            let amplitude = if self.attack > 0.0 {
                (lifetime / self.attack) * self.start_amplitude
            } else {
                self.start_amplitude
            };
            return EnvelopeOutput {
                amplitude,
                finished: false,
                frequency_multiplier: 1.0,
            };
        }

        if lifetime <= self.attack + self.decay {
            // decay > 0 here, otherwise the attack branch would have matched
            let progress = (lifetime - self.attack) / self.decay;
            let level =
                self.start_amplitude + progress * (self.amplitude - self.start_amplitude);
            return EnvelopeOutput {
                amplitude: level,
                finished: false,
                frequency_multiplier: level,
            };
        }

        EnvelopeOutput {
            amplitude: self.amplitude,
            finished: false,
            frequency_multiplier: 1.0,
        }
    }

    fn released(&self, time: f64, end_time: f64) -> EnvelopeOutput {
        if self.release <= 0.0 {
            return EnvelopeOutput {
                amplitude: 0.0,
                finished: true,
                frequency_multiplier: 1.0,
            };
        }

        let progress = (time - end_time) as f32 / self.release;
        EnvelopeOutput {
            amplitude: (self.amplitude * (1.0 - progress)).max(0.0),
            finished: progress >= 1.0,
            frequency_multiplier: 1.0,
        }
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

impl Tweakable for Envelope {
    fn parameter_count(&self) -> usize {
        6
    }

    fn parameter(&self, index: usize) -> Option<ParameterInfo> {
        let info = match index {
            0 => ParameterInfo::new("attack", self.attack, 0.0, 2.0),
            1 => ParameterInfo::new("decay", self.decay, 0.0, 2.0),
            2 => ParameterInfo::new("release", self.release, 0.0, 4.0),
            3 => ParameterInfo::new("start amplitude", self.start_amplitude, 0.0, 1.0),
            4 => ParameterInfo::new("amplitude", self.amplitude, 0.0, 1.0),
            5 => ParameterInfo::new("frequency decay", self.frequency_decay, 0.0, 1.0),
            _ => return None,
        };
        Some(info)
    }

    fn set_parameter(&mut self, index: usize, value: f32) -> bool {
        let Some(info) = self.parameter(index) else {
            return false;
        };
        let value = value.clamp(info.min, info.max);
        match index {
            0 => self.attack = value,
            1 => self.decay = value,
            2 => self.release = value,
            3 => self.start_amplitude = value,
            4 => self.amplitude = value,
            _ => self.frequency_decay = value,
        }
        true
    }
}
