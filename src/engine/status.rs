use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Playback state published by the audio thread once per block.
///
/// The control thread only reads it, so a stop at the end of a buffer shows
/// up in the UI within one device buffer.
#[derive(Debug, Default)]
pub struct PlaybackStatus {
    arrangement_playing: AtomicBool,
    /// Bit `i` set while clip `i` plays its rendered buffer.
    clip_mask: AtomicU64,
    /// Samples rendered since the session started.
    position: AtomicU64,
}

impl PlaybackStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_arrangement_playing(&self) -> bool {
        self.arrangement_playing.load(Ordering::Relaxed)
    }

    pub fn is_clip_playing(&self, clip: usize) -> bool {
        clip < u64::BITS as usize && self.clip_mask() & (1 << clip) != 0
    }

    pub fn clip_mask(&self) -> u64 {
        self.clip_mask.load(Ordering::Relaxed)
    }

    pub fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    pub(crate) fn publish(&self, arrangement_playing: bool, clip_mask: u64, position: u64) {
        self.arrangement_playing
            .store(arrangement_playing, Ordering::Relaxed);
        self.clip_mask.store(clip_mask, Ordering::Relaxed);
        self.position.store(position, Ordering::Relaxed);
    }
}
