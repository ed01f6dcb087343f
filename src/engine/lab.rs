use std::sync::Arc;

use rtrb::{Consumer, Producer};

use crate::{
    config::LabConfig,
    engine::{clip_voice::BufferPlayer, ClipVoice, PlaybackStatus},
    io::{key_frequency, key_index, KeyAction},
    synth::{Instrument, InstrumentId, LabMessage, MessageReceiver, Note},
    MAX_CLIPS, MAX_PARTIALS,
};

/*
Master Mix
==========

Once per output sample:

    out = Σ live notes                     (keyboard)
        + Σ clip voices                    (previews + clip playback)
          or the next mix-down sample      (while the arrangement plays)
    out = clamp(out * master_amplitude, -1, 1)

The lab runs on the audio thread. It never allocates after construction:

- live notes go into a vector preallocated to `max_live_notes`; a press that
  finds it full is dropped
- clip voices are preallocated to `MAX_CLIPS`
- rendered buffers arrive already boxed, and the buffers they displace go back
  to the control thread on the garbage ring to be freed there

Control messages are drained at the top of every block, so every event in a
block happens at the block's start time.
*/

pub struct AudioLab<R = Consumer<LabMessage>> {
    sample_rate: f32,
    /// Samples rendered since the session started.
    clock: u64,
    master_amplitude: f32,
    octave: i32,
    live_notes: Vec<Note>,
    max_live_notes: usize,
    clips: Vec<ClipVoice>,
    current_clip: usize,
    mixdown: BufferPlayer,
    next_seed: u64,
    rx: R,
    garbage: Producer<Box<[f32]>>,
    status: Arc<PlaybackStatus>,
}

impl<R: MessageReceiver> AudioLab<R> {
    pub fn new(
        config: &LabConfig,
        instruments: &[Instrument],
        rx: R,
        garbage: Producer<Box<[f32]>>,
        status: Arc<PlaybackStatus>,
    ) -> Self {
        let mut clips = Vec::with_capacity(MAX_CLIPS);
        clips.extend(instruments.iter().take(MAX_CLIPS).copied().map(ClipVoice::new));

        Self {
            sample_rate: config.sample_rate,
            clock: 0,
            master_amplitude: config.master_amplitude,
            octave: config.octave,
            live_notes: Vec::with_capacity(config.max_live_notes),
            max_live_notes: config.max_live_notes,
            clips,
            current_clip: 0,
            mixdown: BufferPlayer::new(),
            next_seed: 1,
            rx,
            garbage,
            status,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Seconds since the session started.
    pub fn time(&self) -> f64 {
        self.clock as f64 / self.sample_rate as f64
    }

    pub fn master_amplitude(&self) -> f32 {
        self.master_amplitude
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn live_notes(&self) -> &[Note] {
        &self.live_notes
    }

    pub fn clips(&self) -> &[ClipVoice] {
        &self.clips
    }

    pub fn current_clip(&self) -> usize {
        self.current_clip
    }

    pub fn is_arrangement_playing(&self) -> bool {
        self.mixdown.is_playing()
    }

    /// Render one block: apply pending messages, then one sample per slot.
    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Some(message) = self.rx.pop() {
            self.handle(message);
        }

        for sample in out.iter_mut() {
            let time = self.time();
            *sample = self.noise(time);
            self.clock += 1;
        }

        self.publish_status();
    }

    /// One sample of the master mix at `time`.
    ///
    /// Call once per sample with increasing `time`; every source advances.
    pub fn noise(&mut self, time: f64) -> f32 {
        let mut mixed = 0.0;

        for i in (0..self.live_notes.len()).rev() {
            let note = &mut self.live_notes[i];
            match self.clips.get(note.instrument.0) {
                Some(voice) => mixed += voice.instrument.sound(note, time),
                None => note.finished = true,
            }
            let finished = note.finished;
            if finished {
                self.live_notes.swap_remove(i);
            }
        }

        if self.mixdown.is_playing() {
            mixed += self.mixdown.next_sample();
        } else {
            for voice in &mut self.clips {
                mixed += voice.sound(time);
            }
        }

        let out = mixed * self.master_amplitude;
        if out.is_finite() {
            out.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    /// Live keyboard input. Keys outside the piano table are ignored, as are
    /// repeats of a key already held and presses that find every voice busy.
    pub fn key(&mut self, code: u32, action: KeyAction) {
        match action {
            KeyAction::Down => self.key_down(code),
            KeyAction::Up => {
                let time = self.time();
                if let Some(note) = self
                    .live_notes
                    .iter_mut()
                    .find(|n| n.key_code == Some(code) && !n.is_released())
                {
                    note.release(time);
                }
            }
        }
    }

    fn key_down(&mut self, code: u32) {
        let Some(n) = key_index(code) else {
            return;
        };
        let held = self
            .live_notes
            .iter()
            .any(|note| note.key_code == Some(code) && !note.is_released());
        if held || self.live_notes.len() >= self.max_live_notes {
            return;
        }
        let Some(voice) = self.clips.get(self.current_clip) else {
            return;
        };

        let note = Note::new(
            &voice.instrument,
            InstrumentId(self.current_clip),
            key_frequency(self.octave, n as i32),
            n as i32,
            self.time(),
            self.sample_rate,
            self.next_seed,
        )
        .with_key_code(code);
        self.next_seed = self.next_seed.wrapping_add(MAX_PARTIALS as u64);
        self.live_notes.push(note);
    }

    fn handle(&mut self, message: LabMessage) {
        let time = self.time();
        match message {
            LabMessage::KeyDown { code } => self.key(code, KeyAction::Down),
            LabMessage::KeyUp { code } => self.key(code, KeyAction::Up),
            LabMessage::SelectClip(clip) => {
                if clip < self.clips.len() {
                    self.current_clip = clip;
                }
            }
            LabMessage::SetInstrument { clip, instrument } => {
                if let Some(voice) = self.clips.get_mut(clip) {
                    voice.instrument = instrument;
                }
            }
            LabMessage::AddClip { instrument } => {
                if self.clips.len() < MAX_CLIPS {
                    self.clips.push(ClipVoice::new(instrument));
                }
            }
            LabMessage::RemoveClip(clip) => self.remove_clip(clip),
            LabMessage::PreviewOn {
                clip,
                key,
                frequency,
            } => {
                let seed = self.next_seed;
                if let Some(voice) = self.clips.get_mut(clip) {
                    let note = Note::new(
                        &voice.instrument,
                        InstrumentId(clip),
                        frequency,
                        key,
                        time,
                        self.sample_rate,
                        seed,
                    );
                    voice.preview_on(note);
                    self.next_seed = seed.wrapping_add(MAX_PARTIALS as u64);
                }
            }
            LabMessage::PreviewOff { clip } => {
                if let Some(voice) = self.clips.get_mut(clip) {
                    voice.preview_off(time);
                }
            }
            LabMessage::PlayClip { clip, buffer } => match self.clips.get_mut(clip) {
                Some(voice) => {
                    if let Some(old) = voice.player_mut().play(buffer) {
                        self.discard(old);
                    }
                }
                None => self.discard(buffer),
            },
            LabMessage::StopClip(clip) => {
                if let Some(voice) = self.clips.get_mut(clip) {
                    voice.player_mut().stop();
                }
            }
            LabMessage::PlayArrangement(buffer) => {
                if let Some(old) = self.mixdown.play(buffer) {
                    self.discard(old);
                }
            }
            LabMessage::StopArrangement => self.mixdown.stop(),
            LabMessage::SetMasterAmplitude(amplitude) => {
                if amplitude.is_finite() {
                    self.master_amplitude = amplitude.clamp(0.0, 1.0);
                }
            }
            LabMessage::SetOctave(octave) => self.octave = octave,
            LabMessage::AllNotesOff => {
                for note in &mut self.live_notes {
                    note.release(time);
                }
                for voice in &mut self.clips {
                    voice.preview_off(time);
                }
            }
        }
    }

    fn remove_clip(&mut self, clip: usize) {
        if clip >= self.clips.len() {
            return;
        }

        let mut voice = self.clips.remove(clip);
        if let Some(buffer) = voice.player_mut().take() {
            self.discard(buffer);
        }

        // Notes on the removed instrument go silent; later ones shift down.
        self.live_notes.retain(|note| note.instrument.0 != clip);
        for note in &mut self.live_notes {
            if note.instrument.0 > clip {
                note.instrument.0 -= 1;
            }
        }

        if self.current_clip > clip || self.current_clip >= self.clips.len() {
            self.current_clip = self.current_clip.saturating_sub(1);
        }
    }

    /// Hand a buffer back to the control thread for freeing. If the garbage
    /// ring is full the buffer is freed here instead.
    fn discard(&mut self, buffer: Box<[f32]>) {
        let _ = self.garbage.push(buffer);
    }

    fn publish_status(&self) {
        let clip_mask = self
            .clips
            .iter()
            .enumerate()
            .filter(|(_, voice)| voice.is_playing())
            .fold(0u64, |mask, (i, _)| mask | (1 << i));
        self.status
            .publish(self.mixdown.is_playing(), clip_mask, self.clock);
    }
}
