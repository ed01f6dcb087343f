//! Transport bar widget - shows the current clip, play state and levels

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the transport bar
pub fn render_transport(frame: &mut Frame, area: Rect, app: &App) {
    let studio = &app.studio;
    let block = Block::default().title(" audiolab ").borders(Borders::ALL);

    let current = studio.current_index();
    let (clip_name, preset) = match studio.current_clip() {
        Some(clip) => (clip.name().to_string(), clip.instrument().preset.name()),
        None => ("no clips".to_string(), "-"),
    };

    let (play_symbol, play_state, color) = if studio.is_arrangement_playing() {
        ("▶", "Song", Color::Green)
    } else if studio.is_clip_playing(current) {
        ("▶", "Clip", Color::Green)
    } else {
        ("■", "Stopped", Color::Yellow)
    };

    let mut spans = vec![
        Span::styled(
            format!("{} {}  ", play_symbol, play_state),
            Style::default().fg(color),
        ),
        Span::styled(
            format!(
                "{} ({}/{})  ",
                clip_name,
                current + 1,
                studio.arrangement().len()
            ),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("{}  ", preset), Style::default().fg(Color::White)),
        Span::styled(
            format!(
                "Oct {}  Vol {:.2}  ",
                studio.octave(),
                studio.master_amplitude()
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}s", studio.position()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(
            format!("  {}", notice),
            Style::default().fg(Color::Red),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
