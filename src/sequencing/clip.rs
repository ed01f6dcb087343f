use std::collections::BTreeMap;

use log::{debug, warn};

use crate::{
    config::{check_grid, LabConfig},
    error::LabError,
    io::key_frequency,
    synth::{Instrument, InstrumentId, Note},
    MAX_PARTIALS,
};

/*
Clip Grid
=========

A clip is a fixed-length recording laid out on a grid:

    columns  record_duration / cell_duration cells of time
    rows     pitches, row 0 at the top (highest)

Each note is stored under the hash of the cell it starts in:

    hash   = row * total_cells + column        (column < total_cells)
    column = hash % total_cells
    row    = hash / total_cells

so a cell holds at most one note, and the hash alone recovers both where the
note starts and which key it plays. Resizing may stretch a note across many
cells; only its start cell matters for the key.

The bottom row sounds the keyboard octave's A one octave down; every row up
adds a semitone.
*/

/// Floating point slack when mapping times onto cells, so 0.3 / 0.1 lands in
/// cell 3 rather than 2.
const GRID_EPSILON: f64 = 1e-6;

/// Result of clicking a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added(u32),
    Removed(u32),
}

/// Which end of a note a resize moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

impl Edge {
    fn opposite(self) -> Self {
        match self {
            Edge::Start => Edge::End,
            Edge::End => Edge::Start,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Clip {
    name: String,
    instrument: Instrument,
    notes: BTreeMap<u32, Note>,
    record_duration: f64,
    cell_duration: f64,
    rows: u32,
    octave: i32,
    sample_rate: f32,
    next_seed: u64,
}

impl Clip {
    pub fn new(
        name: impl Into<String>,
        instrument: Instrument,
        config: &LabConfig,
    ) -> Result<Self, LabError> {
        check_grid(config.record_duration, config.cell_duration, config.rows)?;
        Ok(Self {
            name: name.into(),
            instrument,
            notes: BTreeMap::new(),
            record_duration: config.record_duration,
            cell_duration: config.cell_duration,
            rows: config.rows,
            octave: config.octave,
            sample_rate: config.sample_rate,
            next_seed: 1,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Edits apply to the next render; recorded notes pick up the new
    /// partial count automatically.
    pub fn instrument_mut(&mut self) -> &mut Instrument {
        &mut self.instrument
    }

    pub fn set_instrument(&mut self, instrument: Instrument) {
        self.instrument = instrument;
    }

    pub fn record_duration(&self) -> f64 {
        self.record_duration
    }

    pub fn cell_duration(&self) -> f64 {
        self.cell_duration
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn total_cells(&self) -> u32 {
        cells_in(self.record_duration, self.cell_duration)
    }

    /// Length of a rendered buffer in samples.
    pub fn buffer_len(&self) -> usize {
        (self.sample_rate as f64 * self.record_duration).round() as usize
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Recorded notes in hash order (row by row, then by start cell).
    pub fn notes(&self) -> impl Iterator<Item = (u32, &Note)> + '_ {
        self.notes.iter().map(|(&hash, note)| (hash, note))
    }

    pub fn note(&self, hash: u32) -> Option<&Note> {
        self.notes.get(&hash)
    }

    pub fn clear(&mut self) {
        debug!("clearing {} notes from clip {:?}", self.notes.len(), self.name);
        self.notes.clear();
    }

    /// Hash of the cell at `column`, `row`.
    pub fn hash(&self, column: i64, row: i64) -> Result<u32, LabError> {
        let total_cells = self.total_cells();
        let out_of_range = LabError::CellOutOfRange {
            column,
            row,
            total_cells,
            rows: self.rows,
        };
        if column < 0 || column >= total_cells as i64 || row < 0 || row >= self.rows as i64 {
            return Err(out_of_range);
        }
        (row as u32)
            .checked_mul(total_cells)
            .and_then(|base| base.checked_add(column as u32))
            .ok_or(out_of_range)
    }

    /// `(column, row)` of a hash.
    pub fn cell(&self, hash: u32) -> (u32, u32) {
        let total_cells = self.total_cells();
        (hash % total_cells, hash / total_cells)
    }

    /// Column a point in time falls in.
    pub fn column_at(&self, time: f64) -> i64 {
        (time / self.cell_duration + GRID_EPSILON).floor() as i64
    }

    pub fn row_frequency(&self, row: u32) -> f32 {
        let semitone = self.rows.saturating_sub(1).saturating_sub(row) as i32;
        key_frequency(self.octave - 1, semitone)
    }

    /// Add a one-cell note at `column`, `row`, or erase the note starting
    /// there. Clicking the same cell twice leaves the clip as it was.
    pub fn toggle_cell(&mut self, column: i64, row: i64) -> Result<Toggle, LabError> {
        let hash = self.hash(column, row)?;
        if self.notes.remove(&hash).is_some() {
            debug!("removed note {hash} from clip {:?}", self.name);
            return Ok(Toggle::Removed(hash));
        }

        let (column, row) = self.cell(hash);
        let start = column as f64 * self.cell_duration;
        let seed = self.take_seed();
        let note = Note::new(
            &self.instrument,
            InstrumentId::default(),
            self.row_frequency(row),
            row as i32,
            start,
            self.sample_rate,
            seed,
        )
        .with_end_time(start + self.cell_duration);
        self.notes.insert(hash, note);
        debug!("added note {hash} to clip {:?}", self.name);
        Ok(Toggle::Added(hash))
    }

    /// Move one end of the note stored under `hash` to `time`, snapped to the
    /// nearest cell boundary inside the clip.
    ///
    /// Returns the note's hash afterwards (moving the start re-keys it) and
    /// the edge now being dragged, which flips when the ends cross. A move
    /// that would collapse the note to nothing is ignored. A move whose new
    /// start cell is taken fails with [`LabError::NoteCollision`] and leaves
    /// the clip untouched.
    pub fn resize_note(&mut self, hash: u32, edge: Edge, time: f64) -> Result<(u32, Edge), LabError> {
        let note = self.notes.get(&hash).ok_or(LabError::UnknownNote(hash))?;
        let time = self.snap(time);

        let (mut start, mut end) = (note.start_time, note.end_time);
        let mut edge = edge;
        match edge {
            Edge::Start => start = time,
            Edge::End => end = time,
        }
        if end < start {
            std::mem::swap(&mut start, &mut end);
            edge = edge.opposite();
        }
        if end - start < self.cell_duration * 0.5 {
            return Ok((hash, edge));
        }

        let (_, row) = self.cell(hash);
        let new_hash = self.hash(self.column_at(start), row as i64)?;
        if new_hash != hash && self.notes.contains_key(&new_hash) {
            return Err(LabError::NoteCollision(new_hash));
        }

        if let Some(mut note) = self.notes.remove(&hash) {
            note.start_time = start;
            note.end_time = end;
            self.notes.insert(new_hash, note);
        }
        Ok((new_hash, edge))
    }

    /// Change the grid. Notes keep their times and are re-keyed onto the new
    /// grid; notes starting past the new end, or landing on a cell another
    /// note already took, are dropped. Returns how many were dropped.
    pub fn set_durations(&mut self, record_duration: f64, cell_duration: f64) -> Result<usize, LabError> {
        check_grid(record_duration, cell_duration, self.rows)?;
        self.record_duration = record_duration;
        self.cell_duration = cell_duration;

        let old = std::mem::take(&mut self.notes);
        let mut dropped = 0;
        for (_, mut note) in old {
            let hash = match self.hash(self.column_at(note.start_time), note.key as i64) {
                Ok(hash) if !self.notes.contains_key(&hash) => hash,
                _ => {
                    dropped += 1;
                    continue;
                }
            };
            note.end_time = note.end_time.min(record_duration);
            self.notes.insert(hash, note);
        }

        if dropped > 0 {
            warn!(
                "clip {:?}: dropped {dropped} notes that no longer fit the grid",
                self.name
            );
        }
        Ok(dropped)
    }

    /// Render every recorded note into a buffer of `buffer_len()` samples.
    ///
    /// Each render plays fresh copies of the notes, so rendering twice gives
    /// identical buffers.
    pub fn render(&self) -> Box<[f32]> {
        let sample_rate = self.sample_rate as f64;
        let mut buffer = vec![0.0f32; self.buffer_len()].into_boxed_slice();

        for recorded in self.notes.values() {
            let mut note = self.fresh_copy(recorded);
            let first = (note.start_time * sample_rate).ceil() as usize;
            for (i, out) in buffer.iter_mut().enumerate().skip(first) {
                *out += self.instrument.sound(&mut note, i as f64 / sample_rate);
                if note.finished {
                    break;
                }
            }
        }

        debug!(
            "rendered clip {:?}: {} notes, {} samples",
            self.name,
            self.notes.len(),
            buffer.len()
        );
        buffer
    }

    fn fresh_copy(&self, recorded: &Note) -> Note {
        Note::new(
            &self.instrument,
            recorded.instrument,
            recorded.frequency,
            recorded.key,
            recorded.start_time,
            self.sample_rate,
            recorded.seed(),
        )
        .with_end_time(recorded.end_time)
    }

    fn snap(&self, time: f64) -> f64 {
        let cells = (time / self.cell_duration)
            .round()
            .clamp(0.0, self.total_cells() as f64);
        cells * self.cell_duration
    }

    fn take_seed(&mut self) -> u64 {
        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(MAX_PARTIALS as u64);
        seed
    }
}

fn cells_in(record_duration: f64, cell_duration: f64) -> u32 {
    ((record_duration / cell_duration + GRID_EPSILON).floor() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voices::InstrumentPreset;
    use float_cmp::approx_eq;

    fn config() -> LabConfig {
        LabConfig::new()
            .sample_rate(1_000.0)
            .record_duration(1.0)
            .cell_duration(0.25)
            .rows(12)
    }

    fn clip() -> Clip {
        Clip::new("test", InstrumentPreset::Base.instrument(), &config()).unwrap()
    }

    #[test]
    fn hash_round_trips_and_rejects_out_of_range_cells() {
        let clip = clip();
        assert_eq!(clip.total_cells(), 4);
        let hash = clip.hash(3, 2).unwrap();
        assert_eq!(hash, 11);
        assert_eq!(clip.cell(hash), (3, 2));

        assert!(matches!(
            clip.hash(4, 0),
            Err(LabError::CellOutOfRange { column: 4, .. })
        ));
        assert!(clip.hash(-1, 0).is_err());
        assert!(clip.hash(0, 12).is_err());
    }

    #[test]
    fn awkward_durations_still_fill_the_grid() {
        let config = config().record_duration(0.3).cell_duration(0.1);
        let clip = Clip::new("test", Instrument::default(), &config).unwrap();
        assert_eq!(clip.total_cells(), 3);
        assert_eq!(clip.column_at(0.2), 2);
    }

    #[test]
    fn toggle_adds_one_cell_note() {
        let mut clip = clip();
        let toggle = clip.toggle_cell(2, 5).unwrap();
        let Toggle::Added(hash) = toggle else {
            panic!("expected a new note, got {toggle:?}");
        };
        let note = clip.note(hash).unwrap();
        assert_eq!(note.key, 5);
        assert_eq!(note.start_time, 0.5);
        assert_eq!(note.end_time, 0.75);
        assert_eq!(note.frequency, clip.row_frequency(5));
    }

    #[test]
    fn toggling_twice_restores_the_map() {
        let mut clip = clip();
        clip.toggle_cell(0, 0).unwrap();
        let before: Vec<u32> = clip.notes().map(|(h, _)| h).collect();

        clip.toggle_cell(1, 3).unwrap();
        assert_eq!(clip.toggle_cell(1, 3).unwrap(), Toggle::Removed(clip.hash(1, 3).unwrap()));

        let after: Vec<u32> = clip.notes().map(|(h, _)| h).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn out_of_range_toggle_leaves_clip_alone() {
        let mut clip = clip();
        assert!(clip.toggle_cell(9, 0).is_err());
        assert!(clip.is_empty());
    }

    #[test]
    fn higher_rows_sound_lower() {
        let clip = clip();
        assert!(clip.row_frequency(0) > clip.row_frequency(11));
        assert!(approx_eq!(f32, clip.row_frequency(11), 220.0, epsilon = 1e-3));
    }

    #[test]
    fn resizing_end_snaps_to_cells() {
        let mut clip = clip();
        clip.toggle_cell(0, 1).unwrap();
        let hash = clip.hash(0, 1).unwrap();

        let (hash, edge) = clip.resize_note(hash, Edge::End, 0.6).unwrap();
        assert_eq!(edge, Edge::End);
        assert_eq!(clip.note(hash).unwrap().end_time, 0.5);

        // Past the end of the clip clamps to the clip length.
        let (hash, _) = clip.resize_note(hash, Edge::End, 9.0).unwrap();
        assert_eq!(clip.note(hash).unwrap().end_time, 1.0);
    }

    #[test]
    fn moving_start_rekeys_the_note() {
        let mut clip = clip();
        clip.toggle_cell(3, 1).unwrap();
        let old = clip.hash(3, 1).unwrap();

        let (new, edge) = clip.resize_note(old, Edge::Start, 0.25).unwrap();
        assert_eq!(edge, Edge::Start);
        assert_eq!(new, clip.hash(1, 1).unwrap());
        assert!(clip.note(old).is_none());
        let note = clip.note(new).unwrap();
        assert_eq!((note.start_time, note.end_time), (0.25, 1.0));
    }

    #[test]
    fn crossing_ends_swaps_them() {
        let mut clip = clip();
        clip.toggle_cell(1, 0).unwrap();
        let hash = clip.hash(1, 0).unwrap();

        let (hash, edge) = clip.resize_note(hash, Edge::End, 0.0).unwrap();
        assert_eq!(edge, Edge::Start);
        let note = clip.note(hash).unwrap();
        assert_eq!((note.start_time, note.end_time), (0.0, 0.25));
        assert_eq!(hash, clip.hash(0, 0).unwrap());
    }

    #[test]
    fn collapsing_a_note_is_ignored() {
        let mut clip = clip();
        clip.toggle_cell(1, 0).unwrap();
        let hash = clip.hash(1, 0).unwrap();
        let (same, _) = clip.resize_note(hash, Edge::End, 0.26).unwrap();
        assert_eq!(same, hash);
        let note = clip.note(hash).unwrap();
        assert_eq!((note.start_time, note.end_time), (0.25, 0.5));
    }

    #[test]
    fn rekey_collision_is_rejected() {
        let mut clip = clip();
        clip.toggle_cell(0, 2).unwrap();
        clip.toggle_cell(2, 2).unwrap();
        let moving = clip.hash(2, 2).unwrap();

        let err = clip.resize_note(moving, Edge::Start, 0.0).unwrap_err();
        assert!(matches!(err, LabError::NoteCollision(h) if h == clip.hash(0, 2).unwrap()));
        let note = clip.note(moving).unwrap();
        assert_eq!((note.start_time, note.end_time), (0.5, 0.75));
        assert_eq!(clip.len(), 2);
    }

    #[test]
    fn unknown_hash_is_reported() {
        let mut clip = clip();
        assert!(matches!(
            clip.resize_note(7, Edge::End, 0.5),
            Err(LabError::UnknownNote(7))
        ));
    }

    #[test]
    fn shrinking_the_grid_drops_notes_past_the_end() {
        let mut clip = clip();
        clip.toggle_cell(0, 0).unwrap();
        clip.toggle_cell(3, 0).unwrap();

        let dropped = clip.set_durations(0.5, 0.125).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(clip.total_cells(), 4);
        let (hash, note) = clip.notes().next().unwrap();
        assert_eq!(hash, 0);
        assert_eq!(note.end_time, 0.25);
    }

    #[test]
    fn regridding_moves_keys_to_new_columns() {
        let mut clip = clip();
        clip.toggle_cell(2, 1).unwrap();
        clip.set_durations(1.0, 0.125).unwrap();
        assert!(clip.note(clip.hash(4, 1).unwrap()).is_some());
    }

    #[test]
    fn bad_grid_is_rejected_without_changes() {
        let mut clip = clip();
        clip.toggle_cell(0, 0).unwrap();
        assert!(clip.set_durations(1.0, 0.0).is_err());
        assert_eq!(clip.cell_duration(), 0.25);
        assert_eq!(clip.len(), 1);
    }

    #[test]
    fn grid_hashes_stay_within_u32() {
        let wide = config().record_duration(300_000_000.0).cell_duration(1.0);
        let mut clip = Clip::new("wide", InstrumentPreset::Base.instrument(), &wide).unwrap();
        let last = clip.hash(299_999_999, 11).unwrap();
        assert_eq!(last, 3_599_999_999);
        assert_eq!(clip.cell(last), (299_999_999, 11));

        assert!(matches!(
            clip.set_durations(400_000_000.0, 1.0),
            Err(LabError::GridTooLarge { rows: 12, .. })
        ));
        assert_eq!(clip.total_cells(), 300_000_000);
    }

    #[test]
    fn render_is_repeatable_and_starts_at_note_start() {
        let mut clip = clip();
        clip.set_instrument(InstrumentPreset::Harmonica.instrument());
        clip.toggle_cell(2, 4).unwrap();

        let first = clip.render();
        let second = clip.render();
        assert_eq!(first.len(), 1_000);
        assert_eq!(first, second);
        assert!(first[..500].iter().all(|&s| s == 0.0));
        assert!(first[500..750].iter().any(|&s| s != 0.0));
    }

    #[test]
    fn empty_clip_renders_silence() {
        let clip = clip();
        assert!(clip.render().iter().all(|&s| s == 0.0));
    }
}
