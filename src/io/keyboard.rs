//! Computer keyboard as a one-octave piano.
//!
//! The bottom letter row holds the white keys and the row above it the black
//! keys, the way most trackers lay them out:
//!
//! ```text
//!  S D   G H J
//! Z X C V B N M
//! ```

/// Key codes (upper-case ASCII) in semitone order, starting at A.
pub const KEY_TABLE: [u8; 12] = *b"ZSXDCVGBHNJM";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyAction {
    Up = 0,
    Down = 1,
}

/// Semitone index of a key code, if it is one of the twelve piano keys.
pub fn key_index(code: u32) -> Option<usize> {
    let code = u8::try_from(code).ok()?;
    KEY_TABLE.iter().position(|&k| k == code)
}

/// `440 * 2^(((octave - 4) * 12 + n) / 12)`
///
/// Octave 4 with `n = 0` is concert A.
pub fn key_frequency(octave: i32, n: i32) -> f32 {
    let semitones = (octave - 4) * 12 + n;
    440.0 * 2f32.powf(semitones as f32 / 12.0)
}
