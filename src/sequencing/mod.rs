//! Clips, the piano-roll editor and the arrangement.
//!
//! Everything in here lives on the control thread. Clips render to plain
//! sample buffers which are then handed to the engine for playback.

pub mod arrangement;
pub mod clip;
pub mod editor;

pub use arrangement::Arrangement;
pub use clip::{Clip, Edge, Toggle};
pub use editor::{EditState, PianoRoll, EDGE_TOLERANCE};
