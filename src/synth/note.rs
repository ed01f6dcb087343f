use crate::{
    dsp::{FilterState, Oscillator},
    synth::instrument::Instrument,
    MAX_FILTERS, MAX_PARTIALS,
};

/// `end_time` of a note whose key is still down.
pub const NOT_RELEASED: f64 = f64::MAX;

/// Index of the instrument (one per clip) a note plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InstrumentId(pub usize);

/// A sounding event.
///
/// Lifecycle: created on press, `release()` stamps `end_time`, and once the
/// instrument's envelope reports `finished` the owning container drops it.
///
/// A note carries one oscillator per partial of its instrument, counted when
/// the note is created. If the instrument later grows more partials, this note
/// keeps sounding with the ones it was born with.
#[derive(Debug, Clone)]
pub struct Note {
    pub start_time: f64,
    pub end_time: f64,
    pub frequency: f32,
    /// Semitone offset (sequencer row or keyboard key).
    pub key: i32,
    /// Raw key code for notes played from the keyboard.
    pub key_code: Option<u32>,
    pub finished: bool,
    pub instrument: InstrumentId,
    seed: u64,
    partial_count: usize,
    oscillators: [Oscillator; MAX_PARTIALS],
    filter_states: [FilterState; MAX_FILTERS],
}

impl Note {
    pub fn new(
        instrument: &Instrument,
        id: InstrumentId,
        frequency: f32,
        key: i32,
        start_time: f64,
        sample_rate: f32,
        seed: u64,
    ) -> Self {
        Self {
            start_time,
            end_time: NOT_RELEASED,
            frequency,
            key,
            key_code: None,
            finished: false,
            instrument: id,
            seed,
            partial_count: instrument.num_notes(),
            oscillators: fresh_oscillators(sample_rate, seed),
            filter_states: [FilterState::default(); MAX_FILTERS],
        }
    }

    pub fn with_key_code(mut self, code: u32) -> Self {
        self.key_code = Some(code);
        self
    }

    /// A note that already has both ends, as recorded in a clip.
    pub fn with_end_time(mut self, end_time: f64) -> Self {
        self.end_time = end_time;
        self
    }

    /// Key up. Releasing twice keeps the first release time.
    pub fn release(&mut self, time: f64) {
        if !self.is_released() {
            self.end_time = time.max(self.start_time);
        }
    }

    pub fn is_released(&self) -> bool {
        self.end_time != NOT_RELEASED
    }

    pub fn partial_count(&self) -> usize {
        self.partial_count
    }

    /// Seed of the note's noise generators.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub(crate) fn voices_mut(&mut self) -> (&mut [Oscillator], &mut [FilterState]) {
        (
            &mut self.oscillators[..self.partial_count],
            &mut self.filter_states[..],
        )
    }
}

fn fresh_oscillators(sample_rate: f32, seed: u64) -> [Oscillator; MAX_PARTIALS] {
    std::array::from_fn(|i| Oscillator::with_seed(sample_rate, seed.wrapping_add(i as u64)))
}
