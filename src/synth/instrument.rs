#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{Envelope, FilterParams, WaveType},
    error::LabError,
    params::{ParameterInfo, Tweakable},
    synth::note::Note,
    voices::InstrumentPreset,
    MAX_FILTERS, MAX_PARTIALS,
};

/*
Multi-Partial Instrument
========================

An instrument is a recipe, not a voice. It holds no per-note state, so one
instrument can be shared by every note played on it. The note brings its own
oscillators and filter memory; the instrument says what to do with them.

For each sample:

    env    = envelope.evaluate(time, note.start_time, note.end_time)
    pitch  = note.frequency * decay_scale             (see below)
    wave   = Σ  amplitude_modulation[i] * env.amplitude
                * osc[i].wave(pitch * frequency_modulation[i], wave_type[i])
    out    = filters[n-1](... filters[0](wave))

With frequency decay enabled the decay ramp bends the pitch:

    decay_scale = (1 - frequency_decay) + env.frequency_multiplier * frequency_decay

A partial is one oscillator with its own waveform, level and frequency ratio.
Ratios of 1, 2, 4 give octaves (bells), non-integer ratios give inharmonic
clangs.

Everything here is fixed size and `Copy`, so the control thread can ship a whole
edited instrument to the audio thread through a ring buffer without either side
allocating.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub wave: WaveType,
    pub amplitude_modulation: f32,
    pub frequency_modulation: f32,
}

impl WaveParams {
    pub fn new(wave: WaveType, amplitude_modulation: f32, frequency_modulation: f32) -> Self {
        Self {
            wave,
            amplitude_modulation,
            frequency_modulation,
        }
    }
}

impl Default for WaveParams {
    fn default() -> Self {
        Self::new(WaveType::Sine, 1.0, 1.0)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instrument {
    pub preset: InstrumentPreset,
    pub envelope: Envelope,
    pub do_frequency_decay: bool,
    partials: [WaveParams; MAX_PARTIALS],
    num_notes: usize,
    filters: [FilterParams; MAX_FILTERS],
    num_filters: usize,
}

impl Instrument {
    pub fn new(preset: InstrumentPreset, envelope: Envelope, partials: &[WaveParams]) -> Self {
        let mut instrument = Self {
            preset,
            envelope,
            do_frequency_decay: false,
            partials: [WaveParams::default(); MAX_PARTIALS],
            num_notes: 1,
            filters: [FilterParams::lowpass(1.0); MAX_FILTERS],
            num_filters: 0,
        };
        let count = partials.len().clamp(1, MAX_PARTIALS);
        instrument.partials[..partials.len().min(MAX_PARTIALS)]
            .copy_from_slice(&partials[..partials.len().min(MAX_PARTIALS)]);
        instrument.num_notes = count;
        instrument
    }

    pub fn with_frequency_decay(mut self, enabled: bool) -> Self {
        self.do_frequency_decay = enabled;
        self
    }

    pub fn with_filter(mut self, filter: FilterParams) -> Self {
        // Presets never exceed the chain length
        let _ = self.add_filter(filter);
        self
    }

    /// Number of partials.
    pub fn num_notes(&self) -> usize {
        self.num_notes
    }

    /// Grow or shrink the partial bank (1 to `MAX_PARTIALS`). Partials that
    /// come back into use keep their last settings.
    pub fn set_num_notes(&mut self, count: usize) {
        self.num_notes = count.clamp(1, MAX_PARTIALS);
    }

    pub fn partials(&self) -> &[WaveParams] {
        &self.partials[..self.num_notes]
    }

    pub fn partial_mut(&mut self, index: usize) -> Option<&mut WaveParams> {
        self.partials[..self.num_notes].get_mut(index)
    }

    pub fn filters(&self) -> &[FilterParams] {
        &self.filters[..self.num_filters]
    }

    pub fn filter_mut(&mut self, index: usize) -> Option<&mut FilterParams> {
        self.filters[..self.num_filters].get_mut(index)
    }

    /// Append a filter to the end of the chain.
    pub fn add_filter(&mut self, filter: FilterParams) -> Result<(), LabError> {
        if self.num_filters == MAX_FILTERS {
            return Err(LabError::FilterBankFull(MAX_FILTERS));
        }
        self.filters[self.num_filters] = filter;
        self.num_filters += 1;
        Ok(())
    }

    pub fn remove_filter(&mut self, index: usize) -> Option<FilterParams> {
        if index >= self.num_filters {
            return None;
        }
        let removed = self.filters[index];
        self.filters.copy_within(index + 1..self.num_filters, index);
        self.num_filters -= 1;
        Some(removed)
    }

    /// One sample of `note` at `time`.
    ///
    /// Advances the note's oscillators, so call it exactly once per rendered
    /// sample, in increasing time order. Sets `note.finished` once the
    /// release has run out.
    pub fn sound(&self, note: &mut Note, time: f64) -> f32 {
        let env = self
            .envelope
            .evaluate(time, note.start_time, note.end_time);
        if env.finished {
            note.finished = true;
        }

        let frequency = if self.do_frequency_decay {
            let decay = self.envelope.frequency_decay;
            note.frequency * ((1.0 - decay) + env.frequency_multiplier * decay)
        } else {
            note.frequency
        };

        let (oscillators, filter_states) = note.voices_mut();
        let mut wave = 0.0;
        for (params, osc) in self.partials[..self.num_notes]
            .iter()
            .zip(oscillators.iter_mut())
        {
            let nyquist = osc.sample_rate() * 0.5;
            let partial_frequency =
                sanitize_frequency(frequency * params.frequency_modulation, nyquist);
            wave += params.amplitude_modulation
                * env.amplitude
                * osc.wave(partial_frequency, params.wave);
        }

        for (filter, state) in self.filters[..self.num_filters]
            .iter()
            .zip(filter_states.iter_mut())
        {
            wave = filter.apply(state, wave);
        }

        wave
    }
}

impl Default for Instrument {
    fn default() -> Self {
        InstrumentPreset::Base.instrument()
    }
}

/// Negative, NaN and infinite frequencies become silence-producing 0 Hz;
/// anything above Nyquist is pinned there.
#[inline]
fn sanitize_frequency(frequency: f32, nyquist: f32) -> f32 {
    if frequency.is_finite() && frequency > 0.0 {
        frequency.min(nyquist)
    } else {
        0.0
    }
}

const ENVELOPE_PARAMS: usize = 6;
// num_notes, frequency decay toggle
const GLOBAL_PARAMS: usize = 2;
const PARTIAL_PARAMS: usize = 3;
const FILTER_PARAMS: usize = 2;

/// Where a flat parameter index lands.
enum Slot {
    Envelope(usize),
    NumNotes,
    FrequencyDecay,
    Partial(usize, usize),
    Filter(usize, usize),
}

impl Instrument {
    fn slot(&self, index: usize) -> Option<Slot> {
        if index < ENVELOPE_PARAMS {
            return Some(Slot::Envelope(index));
        }
        let index = index - ENVELOPE_PARAMS;
        match index {
            0 => return Some(Slot::NumNotes),
            1 => return Some(Slot::FrequencyDecay),
            _ => {}
        }
        let index = index - GLOBAL_PARAMS;
        let partial_params = self.num_notes * PARTIAL_PARAMS;
        if index < partial_params {
            return Some(Slot::Partial(index / PARTIAL_PARAMS, index % PARTIAL_PARAMS));
        }
        let index = index - partial_params;
        if index < self.num_filters * FILTER_PARAMS {
            return Some(Slot::Filter(index / FILTER_PARAMS, index % FILTER_PARAMS));
        }
        None
    }
}

impl Tweakable for Instrument {
    fn parameter_count(&self) -> usize {
        ENVELOPE_PARAMS
            + GLOBAL_PARAMS
            + self.num_notes * PARTIAL_PARAMS
            + self.num_filters * FILTER_PARAMS
    }

    fn parameter(&self, index: usize) -> Option<ParameterInfo> {
        match self.slot(index)? {
            Slot::Envelope(i) => self.envelope.parameter(i),
            Slot::NumNotes => Some(ParameterInfo::new(
                "partials",
                self.num_notes as f32,
                1.0,
                MAX_PARTIALS as f32,
            )),
            Slot::FrequencyDecay => Some(ParameterInfo::new(
                "pitch follows decay",
                if self.do_frequency_decay { 1.0 } else { 0.0 },
                0.0,
                1.0,
            )),
            Slot::Partial(p, field) => {
                let partial = &self.partials[p];
                let info = match field {
                    0 => ParameterInfo::new(
                        "wave",
                        partial.wave.index() as f32,
                        0.0,
                        (WaveType::ALL.len() - 1) as f32,
                    ),
                    1 => ParameterInfo::new("amplitude", partial.amplitude_modulation, 0.0, 1.0),
                    _ => ParameterInfo::new("frequency", partial.frequency_modulation, 0.0, 8.0),
                };
                Some(info.in_slot(p))
            }
            Slot::Filter(f, field) => self.filters[f]
                .parameter(field)
                .map(|info| info.in_slot(f)),
        }
    }

    fn set_parameter(&mut self, index: usize, value: f32) -> bool {
        let Some(slot) = self.slot(index) else {
            return false;
        };
        match slot {
            Slot::Envelope(i) => return self.envelope.set_parameter(i, value),
            Slot::NumNotes => self.set_num_notes(value.round().max(1.0) as usize),
            Slot::FrequencyDecay => self.do_frequency_decay = value >= 0.5,
            Slot::Partial(p, field) => {
                let partial = &mut self.partials[p];
                match field {
                    0 => {
                        let max = (WaveType::ALL.len() - 1) as f32;
                        partial.wave = WaveType::from_index(value.round().clamp(0.0, max) as usize)
                    }
                    1 => partial.amplitude_modulation = value.clamp(0.0, 1.0),
                    _ => partial.frequency_modulation = value.clamp(0.0, 8.0),
                }
            }
            Slot::Filter(f, field) => return self.filters[f].set_parameter(field, value),
        }
        true
    }

    /// Discrete parameters step by one whole unit.
    fn nudge_parameter(&mut self, index: usize, steps: f32) -> bool {
        let Some(info) = self.parameter(index) else {
            return false;
        };
        let delta = match self.slot(index) {
            Some(Slot::NumNotes)
            | Some(Slot::FrequencyDecay)
            | Some(Slot::Partial(_, 0))
            | Some(Slot::Filter(_, 0)) => steps.signum(),
            _ => info.step() * steps,
        };
        self.set_parameter(index, info.value + delta)
    }
}
