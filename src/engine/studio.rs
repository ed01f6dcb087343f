use std::sync::Arc;

use log::{debug, info, warn};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    config::LabConfig,
    dsp::FilterParams,
    engine::{AudioLab, PlaybackStatus},
    error::LabError,
    params::Tweakable,
    sequencing::{Arrangement, Clip, PianoRoll},
    synth::{Instrument, LabMessage},
    voices::InstrumentPreset,
    MAX_CLIPS,
};

/// Keyboard octaves the live keys can be shifted across.
pub const OCTAVE_RANGE: std::ops::RangeInclusive<i32> = 0..=8;

/// Control-thread owner of everything editable.
///
/// Built together with the [`AudioLab`] it drives. Every change that the
/// audio side needs to know about is sent over the message ring first and
/// applied locally only once the send succeeded, so the two sides never
/// disagree about which clips exist.
pub struct Studio {
    config: LabConfig,
    arrangement: Arrangement,
    editor: PianoRoll,
    tx: Producer<LabMessage>,
    garbage: Consumer<Box<[f32]>>,
    status: Arc<PlaybackStatus>,
    octave: i32,
    master_amplitude: f32,
    /// Clip whose preview note is sounding.
    previewing: Option<usize>,
}

impl Studio {
    pub fn new(config: LabConfig) -> Result<(Self, AudioLab), LabError> {
        config.validate()?;
        let arrangement = Arrangement::new(&config)?;

        let (tx, rx) = RingBuffer::new(config.queue_capacity.max(1));
        // Every buffer in flight can displace at most one other.
        let (garbage_tx, garbage) = RingBuffer::new(config.queue_capacity.max(1) + MAX_CLIPS + 1);
        let status = Arc::new(PlaybackStatus::new());

        let instruments: Vec<Instrument> = arrangement
            .clips()
            .iter()
            .map(|clip| *clip.instrument())
            .collect();
        let lab = AudioLab::new(&config, &instruments, rx, garbage_tx, status.clone());

        info!(
            "studio ready: {} clips, {}s at {} Hz",
            arrangement.len(),
            config.record_duration,
            config.sample_rate
        );

        let studio = Self {
            octave: config.octave,
            master_amplitude: config.master_amplitude,
            config,
            arrangement,
            editor: PianoRoll::default(),
            tx,
            garbage,
            status,
            previewing: None,
        };
        Ok((studio, lab))
    }

    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn editor(&self) -> &PianoRoll {
        &self.editor
    }

    /// Swap in an editor with a different cell geometry.
    pub fn set_editor(&mut self, editor: PianoRoll) {
        self.editor = editor;
    }

    pub fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn master_amplitude(&self) -> f32 {
        self.master_amplitude
    }

    pub fn current_index(&self) -> usize {
        self.arrangement.current_index()
    }

    pub fn current_clip(&self) -> Option<&Clip> {
        self.arrangement.current()
    }

    pub fn is_clip_playing(&self, index: usize) -> bool {
        self.status.is_clip_playing(index)
    }

    pub fn is_arrangement_playing(&self) -> bool {
        self.status.is_arrangement_playing()
    }

    /// Seconds of audio the engine has rendered.
    pub fn position(&self) -> f64 {
        self.status.position() as f64 / self.config.sample_rate as f64
    }

    /// Free buffers the engine is done with. Returns how many were freed.
    pub fn collect_garbage(&mut self) -> usize {
        let mut freed = 0;
        while let Ok(buffer) = self.garbage.pop() {
            drop(buffer);
            freed += 1;
        }
        freed
    }

    fn send(&mut self, message: LabMessage) -> Result<(), LabError> {
        self.collect_garbage();
        self.tx.push(message).map_err(|_| {
            warn!("engine queue full, message dropped");
            LabError::QueueFull
        })
    }

    // Live keyboard

    pub fn key_down(&mut self, code: u32) -> Result<(), LabError> {
        self.send(LabMessage::KeyDown { code })
    }

    pub fn key_up(&mut self, code: u32) -> Result<(), LabError> {
        self.send(LabMessage::KeyUp { code })
    }

    pub fn set_octave(&mut self, octave: i32) -> Result<(), LabError> {
        let octave = octave.clamp(*OCTAVE_RANGE.start(), *OCTAVE_RANGE.end());
        self.send(LabMessage::SetOctave(octave))?;
        self.octave = octave;
        Ok(())
    }

    pub fn shift_octave(&mut self, delta: i32) -> Result<(), LabError> {
        self.set_octave(self.octave + delta)
    }

    pub fn set_master_amplitude(&mut self, amplitude: f32) -> Result<(), LabError> {
        let amplitude = amplitude.clamp(0.0, 1.0);
        self.send(LabMessage::SetMasterAmplitude(amplitude))?;
        self.master_amplitude = amplitude;
        Ok(())
    }

    /// Release every live and preview note.
    pub fn all_notes_off(&mut self) -> Result<(), LabError> {
        self.previewing = None;
        self.send(LabMessage::AllNotesOff)
    }

    // Clips

    pub fn add_clip(&mut self, preset: InstrumentPreset) -> Result<usize, LabError> {
        if self.arrangement.len() >= MAX_CLIPS {
            return Err(LabError::TooManyClips(MAX_CLIPS));
        }
        let instrument = preset.instrument();
        self.send(LabMessage::AddClip { instrument })?;
        self.arrangement.add_clip(instrument)
    }

    pub fn remove_clip(&mut self, index: usize) -> Result<(), LabError> {
        self.arrangement.clip(index)?;
        self.send(LabMessage::RemoveClip(index))?;
        self.arrangement.remove_clip(index)?;

        self.previewing = match self.previewing {
            Some(clip) if clip == index => None,
            Some(clip) if clip > index => Some(clip - 1),
            other => other,
        };
        self.editor.release();
        Ok(())
    }

    pub fn select_clip(&mut self, index: usize) -> Result<(), LabError> {
        self.arrangement.clip(index)?;
        self.send(LabMessage::SelectClip(index))?;
        self.editor.release();
        self.arrangement.select(index)
    }

    pub fn rename_clip(&mut self, index: usize, name: impl Into<String>) -> Result<(), LabError> {
        self.arrangement.clip_mut(index)?.rename(name);
        Ok(())
    }

    pub fn clear_clip(&mut self, index: usize) -> Result<(), LabError> {
        self.arrangement.clip_mut(index)?.clear();
        Ok(())
    }

    /// Re-grid every clip. Returns how many notes no longer fit and were
    /// dropped.
    pub fn set_durations(&mut self, record_duration: f64, cell_duration: f64) -> Result<usize, LabError> {
        let dropped = self
            .arrangement
            .set_durations(record_duration, cell_duration)?;
        self.config.record_duration = record_duration;
        self.config.cell_duration = cell_duration;
        if let Some(clip) = self.arrangement.current() {
            self.editor.pan(0, clip);
        }
        Ok(dropped)
    }

    // Instruments

    pub fn set_preset(&mut self, index: usize, preset: InstrumentPreset) -> Result<(), LabError> {
        self.arrangement.clip(index)?;
        self.commit_instrument(index, preset.instrument())
    }

    /// Edit one flat parameter of a clip's instrument. Returns `false` when
    /// the parameter does not exist.
    pub fn set_parameter(&mut self, index: usize, parameter: usize, value: f32) -> Result<bool, LabError> {
        let mut instrument = *self.arrangement.clip(index)?.instrument();
        if !instrument.set_parameter(parameter, value) {
            return Ok(false);
        }
        self.commit_instrument(index, instrument)?;
        Ok(true)
    }

    pub fn nudge_parameter(&mut self, index: usize, parameter: usize, steps: f32) -> Result<bool, LabError> {
        let mut instrument = *self.arrangement.clip(index)?.instrument();
        if !instrument.nudge_parameter(parameter, steps) {
            return Ok(false);
        }
        self.commit_instrument(index, instrument)?;
        Ok(true)
    }

    pub fn add_filter(&mut self, index: usize, filter: FilterParams) -> Result<(), LabError> {
        let mut instrument = *self.arrangement.clip(index)?.instrument();
        instrument.add_filter(filter)?;
        self.commit_instrument(index, instrument)
    }

    pub fn remove_filter(&mut self, index: usize, filter: usize) -> Result<(), LabError> {
        let mut instrument = *self.arrangement.clip(index)?.instrument();
        if instrument.remove_filter(filter).is_some() {
            self.commit_instrument(index, instrument)?;
        }
        Ok(())
    }

    fn commit_instrument(&mut self, index: usize, instrument: Instrument) -> Result<(), LabError> {
        self.send(LabMessage::SetInstrument {
            clip: index,
            instrument,
        })?;
        self.arrangement.clip_mut(index)?.set_instrument(instrument);
        Ok(())
    }

    // Piano roll of the current clip

    pub fn mouse_press(&mut self, x: f32, y: f32) {
        if let Some(clip) = self.arrangement.current_mut() {
            self.editor.press(clip, x, y);
        }
    }

    pub fn mouse_drag(&mut self, x: f32, y: f32) {
        if let Some(clip) = self.arrangement.current_mut() {
            self.editor.drag(clip, x, y);
        }
    }

    pub fn mouse_release(&mut self) {
        self.editor.release();
    }

    pub fn pan(&mut self, cells: i64) {
        if let Some(clip) = self.arrangement.current() {
            self.editor.pan(cells, clip);
        }
    }

    /// Sound the key of `row` on the current clip until [`Self::preview_off`].
    pub fn preview_on(&mut self, row: u32) -> Result<(), LabError> {
        let index = self.arrangement.current_index();
        let clip = self
            .arrangement
            .current()
            .ok_or(LabError::NoSuchClip(index))?;
        if row >= clip.rows() {
            return Err(LabError::CellOutOfRange {
                column: 0,
                row: row as i64,
                total_cells: clip.total_cells(),
                rows: clip.rows(),
            });
        }

        let frequency = clip.row_frequency(row);
        self.send(LabMessage::PreviewOn {
            clip: index,
            key: row as i32,
            frequency,
        })?;
        self.previewing = Some(index);
        Ok(())
    }

    pub fn preview_off(&mut self) -> Result<(), LabError> {
        match self.previewing.take() {
            Some(clip) => self.send(LabMessage::PreviewOff { clip }),
            None => Ok(()),
        }
    }

    // Playback

    /// Render clip `index` and play it from the top.
    pub fn play_clip(&mut self, index: usize) -> Result<(), LabError> {
        let buffer = self.arrangement.clip(index)?.render();
        debug!("arming clip {index} ({} samples)", buffer.len());
        self.send(LabMessage::PlayClip {
            clip: index,
            buffer,
        })
    }

    pub fn stop_clip(&mut self, index: usize) -> Result<(), LabError> {
        self.arrangement.clip(index)?;
        self.send(LabMessage::StopClip(index))
    }

    /// Sum every clip into one mix-down and play it. Clip voices are muted
    /// until it ends or is stopped.
    pub fn play_arrangement(&mut self) -> Result<(), LabError> {
        let buffer = self.arrangement.mixdown();
        debug!("arming arrangement ({} samples)", buffer.len());
        self.send(LabMessage::PlayArrangement(buffer))
    }

    pub fn stop_arrangement(&mut self) -> Result<(), LabError> {
        self.send(LabMessage::StopArrangement)
    }
}
