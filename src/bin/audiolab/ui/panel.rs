//! Instrument panel widget - flat parameter list of the current clip's instrument

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use audiolab::{params::Tweakable, Studio};

/// Render the instrument panel
pub fn render_panel(frame: &mut Frame, area: Rect, studio: &Studio, selected: usize) {
    let block = Block::default().title(" Instrument ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(clip) = studio.current_clip() else {
        return;
    };
    let instrument = clip.instrument();

    // Keep the selection in view
    let height = inner.height as usize;
    let first = selected.saturating_sub(height.saturating_sub(1));

    let lines: Vec<Line> = (first..instrument.parameter_count())
        .take(height)
        .filter_map(|index| instrument.parameter(index).map(|info| (index, info)))
        .map(|(index, info)| {
            let label = match info.slot {
                Some(slot) => format!("{} {}", info.name, slot + 1),
                None => info.name.to_string(),
            };
            let style = if index == selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(format!("{:<22}", label), style),
                Span::styled(
                    format!("{:>8.3}", info.value),
                    Style::default().fg(Color::Magenta),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
