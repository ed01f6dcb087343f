// Purpose: instruments, the notes they sound, and the messages that drive them
// This layer sits between the DSP primitives and the engine

pub mod instrument;
pub mod message;
pub mod note;

pub use instrument::{Instrument, WaveParams};
pub use message::{LabMessage, MessageReceiver};
pub use note::{InstrumentId, Note, NOT_RELEASED};
