use rtrb::Consumer;

use crate::synth::Instrument;

/// Commands sent from the control thread to the audio thread.
///
/// Everything here is either `Copy` or an already-built boxed buffer, so
/// handling a message never allocates on the audio side.
#[derive(Debug)]
pub enum LabMessage {
    /// Live key press. `code` is an upper-case ASCII key code.
    KeyDown { code: u32 },
    KeyUp { code: u32 },
    /// Clip whose instrument plays live keys.
    SelectClip(usize),
    SetInstrument { clip: usize, instrument: Instrument },
    AddClip { instrument: Instrument },
    RemoveClip(usize),
    PreviewOn { clip: usize, key: i32, frequency: f32 },
    PreviewOff { clip: usize },
    /// Start playing a rendered clip buffer from its first sample.
    PlayClip { clip: usize, buffer: Box<[f32]> },
    StopClip(usize),
    /// Start playing the rendered arrangement. Mutes per-clip sound while it runs.
    PlayArrangement(Box<[f32]>),
    StopArrangement,
    SetMasterAmplitude(f32),
    SetOctave(i32),
    AllNotesOff,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<LabMessage>;
}

impl MessageReceiver for Consumer<LabMessage> {
    fn pop(&mut self) -> Option<LabMessage> {
        Consumer::pop(self).ok()
    }
}
