// Purpose - external interfaces: the output device and the computer keyboard

pub mod device;
pub mod keyboard;

pub use device::{AudioPlayer, OutputDevice};
pub use keyboard::{key_frequency, key_index, KeyAction, KEY_TABLE};
