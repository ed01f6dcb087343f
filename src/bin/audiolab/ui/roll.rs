//! Piano roll widget - the current clip's grid with a clickable key strip

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use audiolab::Studio;

use super::Areas;
use crate::app::CELL_COLUMNS;

const STRIP_WIDTH: u16 = 4;
/// Semitone names counted up from A.
const NOTE_NAMES: [&str; 12] = [
    "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
];

/// Render the piano roll and return where the strip and grid landed
pub fn render_roll(frame: &mut Frame, area: Rect, studio: &Studio) -> Areas {
    let Some(clip) = studio.current_clip() else {
        let block = Block::default().title(" Piano roll ").borders(Borders::ALL);
        frame.render_widget(Paragraph::new(" [a] adds a clip").block(block), area);
        return Areas::default();
    };

    let block = Block::default()
        .title(format!(" {} ", clip.name()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width <= STRIP_WIDTH || inner.height == 0 {
        return Areas::default();
    }

    let rows = (clip.rows() as u16).min(inner.height);
    let strip = Rect::new(inner.x, inner.y, STRIP_WIDTH, rows);
    let grid = Rect::new(
        inner.x + STRIP_WIDTH,
        inner.y,
        inner.width - STRIP_WIDTH,
        rows,
    );

    let start_x = studio.editor().start_x();
    let visible_cells = (grid.width / CELL_COLUMNS) as u32;
    let last_cell = clip.total_cells().min(start_x + visible_cells);

    let mut strip_lines = Vec::with_capacity(rows as usize);
    let mut grid_lines = Vec::with_capacity(rows as usize);
    for row in 0..rows as u32 {
        let semitone = clip.rows() - 1 - row;
        let name = NOTE_NAMES[semitone as usize % NOTE_NAMES.len()];
        let black = name.ends_with('#');
        strip_lines.push(Line::from(Span::styled(
            format!("{:<4}", name),
            if black {
                Style::default().fg(Color::White).bg(Color::Black)
            } else {
                Style::default().fg(Color::Black).bg(Color::White)
            },
        )));

        let mut spans = Vec::with_capacity(visible_cells as usize);
        for cell in start_x..last_cell {
            let cell_time = cell as f64 * clip.cell_duration();
            let sounding = clip.notes().any(|(_, note)| {
                note.key as u32 == row && note.start_time <= cell_time && cell_time < note.end_time
            });
            let starts_here = clip.hash(cell as i64, row as i64).is_ok_and(|h| clip.note(h).is_some());

            let span = if starts_here {
                Span::styled("▐██", Style::default().fg(Color::Cyan))
            } else if sounding {
                Span::styled("███", Style::default().fg(Color::Cyan))
            } else if cell % 4 == 0 {
                Span::styled("┊  ", Style::default().fg(Color::DarkGray))
            } else {
                Span::styled("·  ", Style::default().fg(Color::DarkGray))
            };
            spans.push(span);
        }
        grid_lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(strip_lines), strip);
    frame.render_widget(Paragraph::new(grid_lines), grid);

    Areas { strip, grid }
}
