use crate::synth::{Instrument, Note};

/// Plays a pre-rendered buffer one sample per call, then stops by itself.
#[derive(Debug, Default)]
pub struct BufferPlayer {
    buffer: Option<Box<[f32]>>,
    cursor: usize,
    playing: bool,
}

impl BufferPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `buffer` from its first sample. Returns the buffer it replaced,
    /// which the caller must dispose of off the audio thread.
    pub fn play(&mut self, buffer: Box<[f32]>) -> Option<Box<[f32]>> {
        self.cursor = 0;
        self.playing = !buffer.is_empty();
        self.buffer.replace(buffer)
    }

    /// Stop and rewind. The buffer stays loaded.
    pub fn stop(&mut self) {
        self.playing = false;
        self.cursor = 0;
    }

    /// Stop and unload.
    pub fn take(&mut self) -> Option<Box<[f32]>> {
        self.stop();
        self.buffer.take()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The next buffered sample, or silence once the buffer is exhausted.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if !self.playing {
            return 0.0;
        }

        let Some(buffer) = self.buffer.as_deref() else {
            self.playing = false;
            return 0.0;
        };
        match buffer.get(self.cursor) {
            Some(&sample) => {
                self.cursor += 1;
                if self.cursor >= buffer.len() {
                    self.playing = false;
                }
                sample
            }
            None => {
                self.playing = false;
                0.0
            }
        }
    }
}

/// The audio thread's side of a clip: its instrument, a preview note from
/// the piano strip, and playback of the clip's last render.
#[derive(Debug)]
pub struct ClipVoice {
    pub instrument: Instrument,
    preview: Option<Note>,
    player: BufferPlayer,
}

impl ClipVoice {
    pub fn new(instrument: Instrument) -> Self {
        Self {
            instrument,
            preview: None,
            player: BufferPlayer::new(),
        }
    }

    /// Replaces any preview already sounding.
    pub fn preview_on(&mut self, note: Note) {
        self.preview = Some(note);
    }

    pub fn preview_off(&mut self, time: f64) {
        if let Some(note) = &mut self.preview {
            note.release(time);
        }
    }

    pub fn preview(&self) -> Option<&Note> {
        self.preview.as_ref()
    }

    pub fn player_mut(&mut self) -> &mut BufferPlayer {
        &mut self.player
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// Preview note plus, while playing, the next buffered sample.
    #[inline]
    pub fn sound(&mut self, time: f64) -> f32 {
        let mut out = 0.0;
        let mut finished = false;
        if let Some(note) = &mut self.preview {
            out += self.instrument.sound(note, time);
            finished = note.finished;
        }
        if finished {
            self.preview = None;
        }
        out + self.player.next_sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::InstrumentId;

    #[test]
    fn player_stops_at_buffer_end() {
        let mut player = BufferPlayer::new();
        assert!(player.play(vec![0.1, 0.2, 0.3].into_boxed_slice()).is_none());

        let samples: Vec<f32> = (0..5).map(|_| player.next_sample()).collect();
        assert_eq!(samples, [0.1, 0.2, 0.3, 0.0, 0.0]);
        assert!(!player.is_playing());
    }

    #[test]
    fn replaying_hands_back_the_old_buffer() {
        let mut player = BufferPlayer::new();
        player.play(vec![1.0].into_boxed_slice());
        let old = player.play(vec![2.0, 2.0].into_boxed_slice());
        assert_eq!(old.as_deref(), Some(&[1.0][..]));
        assert_eq!(player.next_sample(), 2.0);
    }

    #[test]
    fn empty_buffer_never_plays() {
        let mut player = BufferPlayer::new();
        player.play(Box::new([]));
        assert!(!player.is_playing());
        assert_eq!(player.next_sample(), 0.0);
    }

    #[test]
    fn stop_rewinds_but_keeps_the_buffer() {
        let mut player = BufferPlayer::new();
        player.play(vec![1.0, 2.0].into_boxed_slice());
        player.next_sample();
        player.stop();
        assert_eq!(player.cursor(), 0);
        assert_eq!(player.next_sample(), 0.0);
        assert!(player.take().is_some());
    }

    #[test]
    fn finished_preview_is_dropped() {
        let mut voice = ClipVoice::new(Instrument::default());
        let note = Note::new(&voice.instrument, InstrumentId(0), 440.0, 0, 0.0, 1_000.0, 1);
        voice.preview_on(note);
        voice.preview_off(0.0);

        // Base release is 0.2 s.
        for i in 0..=200 {
            voice.sound(i as f64 / 1_000.0);
        }
        assert!(voice.preview().is_none());
    }
}
