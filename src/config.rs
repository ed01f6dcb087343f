//! Startup configuration for the lab.
//!
//! ```ignore
//! let config = LabConfig::new()
//!     .sample_rate(48_000.0)
//!     .record_duration(4.0)
//!     .cell_duration(0.25)
//!     .clips(3);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::LabError, DEFAULT_SAMPLE_RATE, MAX_CLIPS};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LabConfig {
    /// Output sample rate in Hz. Replaced by the device rate when a device is opened.
    pub sample_rate: f32,
    /// Gain applied to the master mix before clipping.
    pub master_amplitude: f32,
    /// Octave of the live keyboard (4 puts the first key on A440).
    pub octave: i32,
    /// Length of every clip, in seconds.
    pub record_duration: f64,
    /// Length of one sequencer cell, in seconds.
    pub cell_duration: f64,
    /// Number of key rows in the piano roll.
    pub rows: u32,
    /// Clips created at startup.
    pub clips: usize,
    /// Maximum number of simultaneously sounding live notes.
    pub max_live_notes: usize,
    /// Capacity of the control → audio message ring.
    pub queue_capacity: usize,
}

impl LabConfig {
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            master_amplitude: 0.5,
            octave: 4,
            record_duration: 4.0,
            cell_duration: 0.25,
            rows: 24,
            clips: 2,
            max_live_notes: 32,
            queue_capacity: 256,
        }
    }

    pub fn sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn master_amplitude(mut self, amplitude: f32) -> Self {
        self.master_amplitude = amplitude;
        self
    }

    pub fn octave(mut self, octave: i32) -> Self {
        self.octave = octave;
        self
    }

    pub fn record_duration(mut self, seconds: f64) -> Self {
        self.record_duration = seconds;
        self
    }

    pub fn cell_duration(mut self, seconds: f64) -> Self {
        self.cell_duration = seconds;
        self
    }

    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }

    pub fn clips(mut self, clips: usize) -> Self {
        self.clips = clips;
        self
    }

    pub fn max_live_notes(mut self, voices: usize) -> Self {
        self.max_live_notes = voices;
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), LabError> {
        check_grid(self.record_duration, self.cell_duration, self.rows)?;
        check_duration("sample_rate", self.sample_rate as f64)?;
        if self.clips > MAX_CLIPS {
            return Err(LabError::TooManyClips(MAX_CLIPS));
        }
        Ok(())
    }
}

impl Default for LabConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_duration(name: &'static str, value: f64) -> Result<(), LabError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LabError::InvalidDuration { name, value })
    }
}

/// Both durations positive, at least one cell fits in a recording, and every
/// cell of a `rows`-row grid has a distinct `u32` hash.
pub(crate) fn check_grid(record_duration: f64, cell_duration: f64, rows: u32) -> Result<(), LabError> {
    check_duration("record_duration", record_duration)?;
    check_duration("cell_duration", cell_duration)?;
    if cell_duration > record_duration {
        return Err(LabError::InvalidDuration {
            name: "cell_duration",
            value: cell_duration,
        });
    }
    let cells = record_duration / cell_duration;
    if cells * rows as f64 > u32::MAX as f64 {
        return Err(LabError::GridTooLarge { rows, cells });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(LabConfig::default().validate().is_ok());
    }

    #[test]
    fn builder_overrides_fields() {
        let config = LabConfig::new().sample_rate(48_000.0).octave(3).clips(5);
        assert_eq!(config.sample_rate, 48_000.0);
        assert_eq!(config.octave, 3);
        assert_eq!(config.clips, 5);
    }

    #[test]
    fn rejects_bad_durations_and_clip_counts() {
        assert!(matches!(
            LabConfig::new().cell_duration(0.0).validate(),
            Err(LabError::InvalidDuration { name: "cell_duration", .. })
        ));
        assert!(LabConfig::new().record_duration(f64::NAN).validate().is_err());
        assert!(LabConfig::new()
            .record_duration(1.0)
            .cell_duration(2.0)
            .validate()
            .is_err());
        assert!(matches!(
            LabConfig::new()
                .record_duration(1.0e6)
                .cell_duration(1.0e-3)
                .validate(),
            Err(LabError::GridTooLarge { rows: 24, .. })
        ));
        assert!(matches!(
            LabConfig::new().clips(MAX_CLIPS + 1).validate(),
            Err(LabError::TooManyClips(_))
        ));
    }
}
