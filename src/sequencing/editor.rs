//! Mouse-driven piano roll over a [`Clip`].
//!
//! Positions are pixels relative to the top-left corner of the grid. The roll
//! may be panned horizontally by whole cells (`start_x`), so the cell under
//! the pointer is `(x / cell_width + start_x, y / row_height)`.
//!
//! ```text
//!            press near a note edge
//!   Idle ──────────────────────────────▶ Resizing ──┐ move: drag the edge
//!    │ ▲                                   │   ▲    │
//!    │ └──────────── release ──────────────┘   └────┘
//!    │ ▲
//!    │ └── release ── PlacingNote
//!    └── press on the grid ─▲   (toggles the cell once)
//! ```
//!
//! Edits that would break the grid (clicks outside it, a resize landing on
//! another note's cell) are logged and ignored; the clip never changes
//! half-way.

use log::{debug, warn};

use crate::sequencing::clip::{Clip, Edge};

/// How close (in pixels) a press must be to a note's edge to grab it.
pub const EDGE_TOLERANCE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    PlacingNote,
    Resizing { hash: u32, edge: Edge },
}

#[derive(Debug, Clone)]
pub struct PianoRoll {
    state: EditState,
    start_x: u32,
    cell_width: f32,
    row_height: f32,
}

impl PianoRoll {
    pub fn new(cell_width: f32, row_height: f32) -> Self {
        Self {
            state: EditState::Idle,
            start_x: 0,
            cell_width: cell_width.max(1.0),
            row_height: row_height.max(1.0),
        }
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    /// First visible column.
    pub fn start_x(&self) -> u32 {
        self.start_x
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Scroll by `cells`, keeping at least one column of `clip` in view.
    pub fn pan(&mut self, cells: i64, clip: &Clip) {
        let last = clip.total_cells().saturating_sub(1) as i64;
        self.start_x = (self.start_x as i64 + cells).clamp(0, last) as u32;
    }

    /// Cell under a pixel position, counted from the grid origin (not
    /// adjusted for panning).
    pub fn hovered(&self, x: f32, y: f32) -> (i64, i64) {
        (
            (x / self.cell_width).floor() as i64,
            (y / self.row_height).floor() as i64,
        )
    }

    /// Pixel x of a point in time, accounting for the pan offset.
    pub fn time_to_x(&self, time: f64, clip: &Clip) -> f32 {
        ((time / clip.cell_duration()) as f32 - self.start_x as f32) * self.cell_width
    }

    /// Primary button down.
    pub fn press(&mut self, clip: &mut Clip, x: f32, y: f32) {
        if self.state != EditState::Idle {
            return;
        }

        let (hovered_x, hovered_y) = self.hovered(x, y);
        if let Some((hash, edge)) = self.edge_under(clip, x, hovered_y) {
            debug!("grabbing {edge:?} of note {hash}");
            self.state = EditState::Resizing { hash, edge };
            return;
        }

        let corrected_x = hovered_x + self.start_x as i64;
        match clip.toggle_cell(corrected_x, hovered_y) {
            Ok(_) => self.state = EditState::PlacingNote,
            Err(err) => warn!("ignoring click at ({x}, {y}): {err}"),
        }
    }

    /// Pointer moved, button held or not.
    pub fn drag(&mut self, clip: &mut Clip, x: f32, _y: f32) {
        let EditState::Resizing { hash, edge } = self.state else {
            return;
        };

        let cells = x / self.cell_width + self.start_x as f32;
        let time = cells as f64 * clip.cell_duration();
        match clip.resize_note(hash, edge, time) {
            Ok((hash, edge)) => self.state = EditState::Resizing { hash, edge },
            Err(err) => warn!("ignoring resize of note {hash}: {err}"),
        }
    }

    /// Primary button up.
    pub fn release(&mut self) {
        self.state = EditState::Idle;
    }

    /// Nearest note edge on `row` within [`EDGE_TOLERANCE`] of `x`.
    fn edge_under(&self, clip: &Clip, x: f32, row: i64) -> Option<(u32, Edge)> {
        let mut best: Option<(f32, u32, Edge)> = None;
        for (hash, note) in clip.notes().filter(|(_, n)| n.key as i64 == row) {
            let edges = [
                (note.start_time, Edge::Start),
                (note.end_time, Edge::End),
            ];
            for (time, edge) in edges {
                let distance = (x - self.time_to_x(time, clip)).abs();
                let closer = best.map_or(true, |(d, _, _)| distance < d);
                if distance <= EDGE_TOLERANCE && closer {
                    best = Some((distance, hash, edge));
                }
            }
        }
        best.map(|(_, hash, edge)| (hash, edge))
    }
}

impl Default for PianoRoll {
    /// 24 px cells on 16 px rows.
    fn default() -> Self {
        Self::new(24.0, 16.0)
    }
}
