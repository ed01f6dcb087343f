use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulator Oscillator
============================

Every periodic waveform here is derived from a single number: the phase. Phase
walks from 0.0 towards 1.0 and wraps, and the waveform is a function of where
in that cycle we are.

  delta   How far the phase moves per sample:

              delta = 1 / (sample_rate / frequency) = frequency / sample_rate

          At 44.1kHz a 441 Hz tone has delta = 0.01, so one cycle takes 100
          samples.

Because the phase only moves when `wave()` is called, the oscillator is
call-order dependent. It is NOT random-access in time: rendering the same
logical instant twice advances it twice. Callers ask for exactly one sample per
output sample, in increasing time order.

The shapes
----------

  Sine / Cosine   sin|cos(phase * 2π), read before the phase advances.
  Saw             The phase itself. It runs at double rate and wraps from +1
                  to -1 by subtracting 2, giving a bipolar ramp.
  Triangle        Two ramps meeting at phase 0.5:
                      phase < 0.5:  (phase - 0.25) * 4
                      otherwise:    ((1 - phase) - 0.25) * 4
  Square          -1 for the first half of the cycle, +1 for the second.
  Noise           Uniform random in [-1, 1]. Phase is ignored.
  Impulse         1.0 on the single sample where phase < delta, else 0.0.
  Phasor          The raw unipolar ramp 0 → 1.
  Rect            Constant 1.0 (a degenerate "always on" wave).

Noise comes from a small per-oscillator PRNG, so a note seeded the same way
renders the same samples every time.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveType {
    #[default]
    Sine,
    Cosine,
    Saw,
    Triangle,
    Square,
    Noise,
    Impulse,
    Phasor,
    Rect,
}

impl WaveType {
    pub const ALL: [WaveType; 9] = [
        WaveType::Sine,
        WaveType::Cosine,
        WaveType::Saw,
        WaveType::Triangle,
        WaveType::Square,
        WaveType::Noise,
        WaveType::Impulse,
        WaveType::Phasor,
        WaveType::Rect,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WaveType::Sine => "sine",
            WaveType::Cosine => "cosine",
            WaveType::Saw => "saw",
            WaveType::Triangle => "triangle",
            WaveType::Square => "square",
            WaveType::Noise => "noise",
            WaveType::Impulse => "impulse",
            WaveType::Phasor => "phasor",
            WaveType::Rect => "rect",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|w| *w == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    phase: f32,
    sample_rate: f32,
    rng: oorandom::Rand32,
}

impl Oscillator {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_seed(sample_rate, 0)
    }

    /// Seed only matters for `WaveType::Noise`.
    pub fn with_seed(sample_rate: f32, seed: u64) -> Self {
        Self {
            phase: 0.0,
            sample_rate,
            rng: oorandom::Rand32::new(seed),
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Produce one sample and advance the phase.
    pub fn wave(&mut self, frequency: f32, wave: WaveType) -> f32 {
        let delta = frequency / self.sample_rate;

        match wave {
            WaveType::Sine => {
                let value = (self.phase * TAU).sin();
                self.advance(delta);
                value
            }
            WaveType::Cosine => {
                let value = (self.phase * TAU).cos();
                self.advance(delta);
                value
            }
            WaveType::Saw => {
                let value = self.phase;
                self.phase += 2.0 * delta;
                if self.phase > 1.0 {
                    self.phase -= 2.0;
                }
                value
            }
            WaveType::Triangle => {
                let value = if self.phase < 0.5 {
                    (self.phase - 0.25) * 4.0
                } else {
                    ((1.0 - self.phase) - 0.25) * 4.0
                };
                self.advance(delta);
                value
            }
            WaveType::Square => {
                let value = if self.phase < 0.5 { -1.0 } else { 1.0 };
                self.advance(delta);
                value
            }
            WaveType::Noise => self.rng.rand_float() * 2.0 - 1.0,
            WaveType::Impulse => {
                let value = if self.phase < delta { 1.0 } else { 0.0 };
                self.advance(delta);
                value
            }
            WaveType::Phasor => {
                let value = self.phase;
                self.advance(delta);
                value
            }
            WaveType::Rect => 1.0,
        }
    }

    #[inline]
    fn advance(&mut self, delta: f32) {
        self.phase += delta;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        // A switch away from Saw can leave the phase negative.
        if self.phase < 0.0 {
            self.phase += 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    const SAMPLE_RATE: f32 = 44_000.0;

    fn render(wave: WaveType, frequency: f32, samples: usize) -> Vec<f32> {
        let mut osc = Oscillator::with_seed(SAMPLE_RATE, 7);
        (0..samples).map(|_| osc.wave(frequency, wave)).collect()
    }

    #[test]
    fn every_waveform_stays_in_range() {
        for wave in WaveType::ALL {
            for frequency in [1.0, 55.0, 440.0, 5_000.0, SAMPLE_RATE / 2.0 - 1.0] {
                for sample in render(wave, frequency, 2_000) {
                    assert!(
                        (-1.0..=1.0).contains(&sample),
                        "{} at {frequency} Hz produced {sample}",
                        wave.name()
                    );
                }
            }
        }
    }

    #[test]
    fn sine_starts_at_zero_and_completes_a_period() {
        // 440 Hz at 44kHz is exactly 100 samples per cycle
        let buffer = render(WaveType::Sine, 440.0, 101);
        assert!(approx_eq!(f32, buffer[0], 0.0, epsilon = 1e-6));
        assert!(buffer[100].abs() < 1e-3, "got {}", buffer[100]);
        assert!(approx_eq!(f32, buffer[25], 1.0, epsilon = 1e-3));
    }

    #[test]
    fn cosine_starts_at_one() {
        let buffer = render(WaveType::Cosine, 440.0, 2);
        assert!(approx_eq!(f32, buffer[0], 1.0, epsilon = 1e-6));
    }

    #[test]
    fn square_is_low_then_high() {
        let buffer = render(WaveType::Square, 440.0, 100);
        assert_eq!(buffer[0], -1.0);
        assert_eq!(buffer[49], -1.0);
        assert_eq!(buffer[51], 1.0);
    }

    #[test]
    fn saw_is_bipolar() {
        let buffer = render(WaveType::Saw, 440.0, 200);
        let min = buffer.iter().copied().fold(f32::MAX, f32::min);
        let max = buffer.iter().copied().fold(f32::MIN, f32::max);
        assert!(min < -0.9, "min was {min}");
        assert!(max > 0.9, "max was {max}");
    }

    #[test]
    fn impulse_fires_once_per_cycle() {
        let buffer = render(WaveType::Impulse, 440.0, 1_000);
        let hits = buffer.iter().filter(|&&s| s == 1.0).count();
        assert_eq!(hits, 10);
    }

    #[test]
    fn noise_is_reproducible_per_seed() {
        let a = render(WaveType::Noise, 440.0, 64);
        let b = render(WaveType::Noise, 440.0, 64);
        assert_eq!(a, b);
        assert!(a.iter().any(|s| *s != a[0]));
    }

    #[test]
    fn rect_is_constant() {
        assert!(render(WaveType::Rect, 440.0, 16).iter().all(|s| *s == 1.0));
    }

    #[test]
    fn phase_advances_per_call_not_per_time() {
        let mut osc = Oscillator::new(SAMPLE_RATE);
        osc.wave(440.0, WaveType::Sine);
        osc.wave(440.0, WaveType::Sine);
        assert!(approx_eq!(f32, osc.phase(), 0.02, epsilon = 1e-6));
    }
}
