//! App state and input handling

use std::{
    io::stdout,
    time::{Duration, Instant},
};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use ratatui::{
    layout::{Position, Rect},
    DefaultTerminal,
};

use audiolab::{
    io::key_index,
    params::Tweakable,
    sequencing::PianoRoll,
    LabError, Studio,
};

use crate::ui::{self, Areas};

/// Pixel size of one terminal cell as seen by the piano roll.
pub const COLUMN_PX: f32 = 8.0;
pub const ROW_PX: f32 = 16.0;
/// Terminal columns per grid cell.
pub const CELL_COLUMNS: u16 = 3;

/// Terminals that never report key releases get one synthesized after the
/// key has gone this long without a repeat.
const HOLD_TIMEOUT: Duration = Duration::from_millis(600);

struct HeldKey {
    code: u32,
    last_seen: Instant,
}

pub struct App {
    pub studio: Studio,
    /// Flat parameter index in the instrument panel.
    pub selected_parameter: usize,
    /// Last error, shown in the transport bar.
    pub notice: Option<String>,
    held: Vec<HeldKey>,
    reports_release: bool,
    previewing: bool,
    areas: Areas,
    should_quit: bool,
}

impl App {
    pub fn new(mut studio: Studio) -> Self {
        studio.set_editor(PianoRoll::new(
            CELL_COLUMNS as f32 * COLUMN_PX,
            ROW_PX,
        ));
        Self {
            studio,
            selected_parameter: 0,
            notice: None,
            held: Vec::new(),
            reports_release: false,
            previewing: false,
            areas: Areas::default(),
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        self.reports_release = supports_keyboard_enhancement().unwrap_or(false);
        if self.reports_release {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        execute!(stdout(), EnableMouseCapture)?;

        let result = self.event_loop(terminal);

        execute!(stdout(), DisableMouseCapture)?;
        if self.reports_release {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
        }
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.studio.collect_garbage();
            self.expire_held_keys();

            let mut areas = Areas::default();
            terminal
                .draw(|frame| areas = ui::render(frame, self))
                .wrap_err("failed to draw the terminal")?;
            self.areas = areas;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn report(&mut self, result: Result<(), LabError>) {
        if let Err(err) = result {
            self.notice = Some(err.to_string());
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if let Some(code) = piano_code(&key) {
            self.handle_piano_key(code, key.kind);
            return;
        }
        if key.kind != KeyEventKind::Press {
            return;
        }

        let current = self.studio.current_index();
        let steps = if key.modifiers.contains(KeyModifiers::SHIFT) {
            10.0
        } else {
            1.0
        };

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                let result = if self.studio.is_clip_playing(current) {
                    self.studio.stop_clip(current)
                } else {
                    self.studio.play_clip(current)
                };
                self.report(result);
            }
            KeyCode::Enter => {
                let result = if self.studio.is_arrangement_playing() {
                    self.studio.stop_arrangement()
                } else {
                    self.studio.play_arrangement()
                };
                self.report(result);
            }
            KeyCode::Char('[') => {
                let result = self.studio.shift_octave(-1);
                self.report(result);
            }
            KeyCode::Char(']') => {
                let result = self.studio.shift_octave(1);
                self.report(result);
            }
            KeyCode::Char('-') => {
                let amplitude = self.studio.master_amplitude() - 0.05;
                let result = self.studio.set_master_amplitude(amplitude);
                self.report(result);
            }
            KeyCode::Char('=') => {
                let amplitude = self.studio.master_amplitude() + 0.05;
                let result = self.studio.set_master_amplitude(amplitude);
                self.report(result);
            }
            KeyCode::Tab | KeyCode::BackTab => {
                let count = self.studio.arrangement().len();
                if count > 0 {
                    let next = if key.code == KeyCode::Tab {
                        (current + 1) % count
                    } else {
                        (current + count - 1) % count
                    };
                    let result = self.studio.select_clip(next);
                    self.report(result);
                    self.selected_parameter = 0;
                }
            }
            KeyCode::Char('a') => {
                let result = self
                    .studio
                    .add_clip(Default::default())
                    .and_then(|index| self.studio.select_clip(index));
                self.report(result);
            }
            KeyCode::Char('r') => {
                let result = self.studio.remove_clip(current);
                self.report(result);
            }
            KeyCode::Char('i') => {
                if let Some(preset) = self.studio.current_clip().map(|c| c.instrument().preset) {
                    let result = self.studio.set_preset(current, preset.next());
                    self.report(result);
                    self.selected_parameter = 0;
                }
            }
            KeyCode::Char('k') => {
                let result = self.studio.clear_clip(current);
                self.report(result);
            }
            KeyCode::Char('f') => {
                let filter = audiolab::dsp::FilterParams::lowpass(0.5);
                let result = self.studio.add_filter(current, filter);
                self.report(result);
            }
            KeyCode::Char('u') => {
                let last = self
                    .studio
                    .current_clip()
                    .map(|c| c.instrument().filters().len())
                    .unwrap_or(0);
                if last > 0 {
                    let result = self.studio.remove_filter(current, last - 1);
                    self.report(result);
                    self.clamp_selection();
                }
            }
            KeyCode::Char('p') => {
                self.held.clear();
                let result = self.studio.all_notes_off();
                self.report(result);
            }
            KeyCode::Char(',') => self.studio.pan(-1),
            KeyCode::Char('.') => self.studio.pan(1),
            KeyCode::Up => {
                self.selected_parameter = self.selected_parameter.saturating_sub(1);
            }
            KeyCode::Down => {
                self.selected_parameter += 1;
                self.clamp_selection();
            }
            KeyCode::Left | KeyCode::Right => {
                let steps = if key.code == KeyCode::Left { -steps } else { steps };
                let result = self
                    .studio
                    .nudge_parameter(current, self.selected_parameter, steps)
                    .map(|_| ());
                self.report(result);
                self.clamp_selection();
            }
            _ => {}
        }
    }

    fn handle_piano_key(&mut self, code: u32, kind: KeyEventKind) {
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                let now = Instant::now();
                if let Some(held) = self.held.iter_mut().find(|h| h.code == code) {
                    held.last_seen = now;
                    return;
                }
                self.held.push(HeldKey {
                    code,
                    last_seen: now,
                });
                let result = self.studio.key_down(code);
                self.report(result);
            }
            KeyEventKind::Release => {
                self.held.retain(|h| h.code != code);
                let result = self.studio.key_up(code);
                self.report(result);
            }
        }
    }

    fn expire_held_keys(&mut self) {
        if self.reports_release {
            return;
        }
        let now = Instant::now();
        let mut expired = Vec::new();
        self.held.retain(|h| {
            let keep = now.duration_since(h.last_seen) < HOLD_TIMEOUT;
            if !keep {
                expired.push(h.code);
            }
            keep
        });
        for code in expired {
            let result = self.studio.key_up(code);
            self.report(result);
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.areas.strip.contains(position) {
                    let row = (mouse.row - self.areas.strip.y) as u32;
                    let result = self.studio.preview_on(row);
                    self.previewing = result.is_ok();
                    self.report(result);
                } else if self.areas.grid.contains(position) {
                    let (x, y) = to_pixels(self.areas.grid, mouse.column, mouse.row);
                    self.studio.mouse_press(x, y);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (x, y) = to_pixels(self.areas.grid, mouse.column, mouse.row);
                self.studio.mouse_drag(x, y);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.previewing {
                    self.previewing = false;
                    let result = self.studio.preview_off();
                    self.report(result);
                }
                self.studio.mouse_release();
            }
            MouseEventKind::ScrollDown => self.studio.pan(1),
            MouseEventKind::ScrollUp => self.studio.pan(-1),
            _ => {}
        }
    }

    fn clamp_selection(&mut self) {
        let count = self
            .studio
            .current_clip()
            .map(|c| c.instrument().parameter_count())
            .unwrap_or(0);
        self.selected_parameter = self.selected_parameter.min(count.saturating_sub(1));
    }
}

/// Upper-case key code of a piano key, ignoring anything with Ctrl or Alt.
fn piano_code(key: &KeyEvent) -> Option<u32> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    let code = c.to_ascii_uppercase() as u32;
    key_index(code).map(|_| code)
}

/// Center of a terminal cell, in piano roll pixels relative to `grid`.
fn to_pixels(grid: Rect, column: u16, row: u16) -> (f32, f32) {
    (
        (column as f32 - grid.x as f32) * COLUMN_PX + COLUMN_PX * 0.5,
        (row as f32 - grid.y as f32) * ROW_PX + ROW_PX * 0.5,
    )
}
