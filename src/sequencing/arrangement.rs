use log::{debug, info};

use crate::{
    config::{check_grid, LabConfig},
    error::LabError,
    sequencing::clip::Clip,
    synth::Instrument,
    voices::InstrumentPreset,
    MAX_CLIPS,
};

/// Ordered clips sharing one grid.
///
/// Clips are parallel tracks over the same record duration; the mix-down
/// sums them sample by sample.
#[derive(Debug, Clone)]
pub struct Arrangement {
    config: LabConfig,
    clips: Vec<Clip>,
    current_clip: usize,
}

impl Arrangement {
    /// `config.clips` clips, cycling through the instrument presets.
    pub fn new(config: &LabConfig) -> Result<Self, LabError> {
        config.validate()?;
        let mut arrangement = Self {
            config: config.clone(),
            clips: Vec::with_capacity(config.clips),
            current_clip: 0,
        };
        for i in 0..config.clips {
            let preset = InstrumentPreset::ALL[i % InstrumentPreset::ALL.len()];
            arrangement.add_clip(preset.instrument())?;
        }
        Ok(arrangement)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn clip(&self, index: usize) -> Result<&Clip, LabError> {
        self.clips.get(index).ok_or(LabError::NoSuchClip(index))
    }

    pub fn clip_mut(&mut self, index: usize) -> Result<&mut Clip, LabError> {
        self.clips.get_mut(index).ok_or(LabError::NoSuchClip(index))
    }

    pub fn current_index(&self) -> usize {
        self.current_clip
    }

    pub fn current(&self) -> Option<&Clip> {
        self.clips.get(self.current_clip)
    }

    pub fn current_mut(&mut self) -> Option<&mut Clip> {
        self.clips.get_mut(self.current_clip)
    }

    pub fn select(&mut self, index: usize) -> Result<(), LabError> {
        self.clip(index)?;
        self.current_clip = index;
        Ok(())
    }

    pub fn record_duration(&self) -> f64 {
        self.config.record_duration
    }

    pub fn cell_duration(&self) -> f64 {
        self.config.cell_duration
    }

    /// Append a clip and return its index.
    pub fn add_clip(&mut self, instrument: Instrument) -> Result<usize, LabError> {
        if self.clips.len() >= MAX_CLIPS {
            return Err(LabError::TooManyClips(MAX_CLIPS));
        }
        let index = self.clips.len();
        let name = format!("clip {}", index + 1);
        self.clips.push(Clip::new(name, instrument, &self.config)?);
        debug!("added clip {index} ({})", instrument.preset.name());
        Ok(index)
    }

    /// Remove a clip. Later clips shift down by one; the selection follows
    /// the clip it pointed at, or the one before it if that was removed.
    pub fn remove_clip(&mut self, index: usize) -> Result<Clip, LabError> {
        self.clip(index)?;
        let clip = self.clips.remove(index);
        if self.current_clip > index || self.current_clip >= self.clips.len() {
            self.current_clip = self.current_clip.saturating_sub(1);
        }
        debug!("removed clip {index} ({:?})", clip.name());
        Ok(clip)
    }

    /// Re-grid every clip. Returns the total number of notes dropped.
    pub fn set_durations(&mut self, record_duration: f64, cell_duration: f64) -> Result<usize, LabError> {
        check_grid(record_duration, cell_duration, self.config.rows)?;
        self.config.record_duration = record_duration;
        self.config.cell_duration = cell_duration;

        let mut dropped = 0;
        for clip in &mut self.clips {
            dropped += clip.set_durations(record_duration, cell_duration)?;
        }
        info!("grid is now {record_duration}s in {cell_duration}s cells");
        Ok(dropped)
    }

    /// Render every clip and sum them into one clip-length buffer.
    pub fn mixdown(&self) -> Box<[f32]> {
        let len = self.clips.iter().map(Clip::buffer_len).max().unwrap_or(0);
        let mut out = vec![0.0; len].into_boxed_slice();
        for clip in &self.clips {
            for (mixed, sample) in out.iter_mut().zip(clip.render().iter()) {
                *mixed += sample;
            }
        }
        out
    }
}
