// Purpose: the realtime mixer and the control-side owner that feeds it
//
// `Studio` lives on the control thread and owns everything editable. `AudioLab`
// lives on the audio thread and owns everything it reads. They share only the
// message ring, the garbage ring and `PlaybackStatus`.

pub mod clip_voice;
pub mod lab;
pub mod status;
pub mod studio;

pub use clip_voice::{BufferPlayer, ClipVoice};
pub use lab::AudioLab;
pub use status::PlaybackStatus;
pub use studio::Studio;
