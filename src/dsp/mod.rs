//! Low-level DSP primitives used by instruments.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside notes. They stay focused on the signal-processing
//! math; instruments layer partials, envelopes and filter chains on top.

/// Stateless attack/decay/sustain/release evaluator.
pub mod envelope;
/// One-pole low-pass and high-pass filters.
pub mod filter;
/// Phase-accumulator oscillator and its waveforms.
pub mod oscillator;

pub use envelope::{Envelope, EnvelopeOutput};
pub use filter::{FilterKind, FilterParams, FilterState};
pub use oscillator::{Oscillator, WaveType};
