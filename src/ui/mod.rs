//! Terminal interface for Overtone
//!
//! Shows a scrollable column of amplitude sliders (one per harmonic
//! channel), beat readouts for the controlled channels, and a status bar.
//! The `UiState` struct is the core's display surface: the scheduler's
//! 100 ms mirror pushes into it, the event loop's per-frame mirror polls
//! into it, and direct user input always wins over both for that instant.

mod slider;

pub use slider::AmplitudeSlider;

use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::display::{amplitude_text, DisplaySurface};
use crate::engine::Player;
use crate::session::Session;

/// Step one arrow keypress moves a slider
const SLIDER_STEP: f64 = 0.005;

/// Mirrored display state, owned by the event loop
pub struct UiState {
    channel_count: usize,
    ceiling: f64,
    controlled: Vec<usize>,
    sliders: Vec<f64>,
    amplitudes: Vec<f64>,
    sound_beats: Vec<u32>,
    silence_beats: Vec<u32>,
    selected: usize,
    offset: usize,
    /// Channel the user adjusted this frame; mirrors yield to it
    adjusted: Option<usize>,
}

impl UiState {
    pub fn new(channel_count: usize, ceiling: f64, controlled: Vec<usize>) -> Self {
        Self {
            channel_count,
            ceiling,
            controlled,
            sliders: vec![0.0; channel_count],
            amplitudes: vec![0.0; channel_count],
            sound_beats: vec![0; channel_count],
            silence_beats: vec![0; channel_count],
            selected: 0,
            offset: 0,
            adjusted: None,
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.channel_count {
            self.selected += 1;
        }
    }

    /// Nudge the selected slider and report the new value
    fn adjust(&mut self, delta: f64) -> (usize, f64) {
        let i = self.selected;
        let value = (self.sliders[i] + delta).clamp(0.0, self.ceiling);
        self.sliders[i] = value;
        self.amplitudes[i] = value;
        self.adjusted = Some(i);
        (i, value)
    }

    /// Keep the selection inside the visible window
    fn scroll_to_selection(&mut self, visible_rows: usize) {
        if visible_rows == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + visible_rows {
            self.offset = self.selected + 1 - visible_rows;
        }
    }
}

impl DisplaySurface for UiState {
    fn beats_of_sound(&mut self, channel: usize, beats: u32) {
        if let Some(slot) = self.sound_beats.get_mut(channel) {
            *slot = beats;
        }
    }

    fn beats_of_silence(&mut self, channel: usize, beats: u32) {
        if let Some(slot) = self.silence_beats.get_mut(channel) {
            *slot = beats;
        }
    }

    fn amplitude(&mut self, channel: usize, value: f64) {
        if self.adjusted == Some(channel) {
            return;
        }
        if let Some(slot) = self.amplitudes.get_mut(channel) {
            *slot = value;
        }
    }

    fn slider(&mut self, channel: usize, value: f64) {
        if self.adjusted == Some(channel) {
            return;
        }
        if let Some(slot) = self.sliders.get_mut(channel) {
            *slot = value;
        }
    }

    fn clear(&mut self) {
        self.sliders.fill(0.0);
        self.amplitudes.fill(0.0);
        self.sound_beats.fill(0);
        self.silence_beats.fill(0);
    }
}

/// Run the interactive TUI with live audio until the user quits
pub fn run(session: &mut Session, device: Option<&str>) -> Result<()> {
    let controlled: Vec<usize> = session
        .scheduler()
        .runners()
        .iter()
        .map(|r| r.channel_index())
        .collect();
    let mut state = UiState::new(
        session.bank().channel_count(),
        session.bank().ceiling(),
        controlled,
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut player = Player::new();
    player.start_on(session.engine(), device)?;

    let result = event_loop(session, &mut state, &mut terminal);

    // Cleanup
    player.stop();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn event_loop(
    session: &mut Session,
    state: &mut UiState,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
) -> Result<()> {
    loop {
        // Pump the scheduler's deadlines (beats, 100 ms mirror, retrigger)
        session.tick(state);

        // Per-frame mirror, independent of the scheduler's 100 ms one
        for i in 0..state.channel_count {
            if state.adjusted != Some(i) {
                let value = session.poll_amplitude(i);
                state.sliders[i] = value;
                state.amplitudes[i] = value;
            }
        }
        state.adjusted = None;

        let sawtooth_running = session.sawtooth_running();
        let now = session.now();
        terminal.draw(|f| draw_ui(f, state, sawtooth_running, now))?;

        // Handle input
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Any keypress is a user gesture: init once, resume always
                session.ensure_started(state);

                match (key.code, key.modifiers) {
                    (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => break,
                    (KeyCode::Char('c'), KeyModifiers::CONTROL) => break,
                    (KeyCode::Up, _) => state.select_prev(),
                    (KeyCode::Down, _) => state.select_next(),
                    (KeyCode::Left, _) => {
                        let (i, value) = state.adjust(-SLIDER_STEP);
                        session.set_amplitude(i, value);
                    }
                    (KeyCode::Right, _) => {
                        let (i, value) = state.adjust(SLIDER_STEP);
                        session.set_amplitude(i, value);
                    }
                    (KeyCode::Char('s'), _) => session.start_sawtooth(),
                    (KeyCode::Char('x'), _) => session.stop_sawtooth(),
                    (KeyCode::Char('r'), _) => session.trigger_rise_all(),
                    (KeyCode::Char('f'), _) => session.trigger_fall_all(),
                    (KeyCode::Char('b'), _) => session.start_envelopes(state),
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

fn draw_ui(f: &mut Frame, state: &mut UiState, sawtooth_running: bool, now: f64) {
    let area = f.area();

    let beat_rows = state.controlled.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Status
            Constraint::Min(5),                // Channel sliders
            Constraint::Length(beat_rows + 2), // Beat readouts
            Constraint::Length(3),             // Key help
        ])
        .split(area);

    draw_status(f, chunks[0], sawtooth_running, now);
    draw_channels(f, chunks[1], state);
    draw_beats(f, chunks[2], state);
    draw_help(f, chunks[3]);
}

fn draw_status(f: &mut Frame, area: Rect, sawtooth_running: bool, now: f64) {
    let (saw_text, saw_color) = if sawtooth_running {
        ("SOUNDING", Color::Green)
    } else {
        ("STOPPED", Color::DarkGray)
    };

    let text = Line::from(vec![
        Span::raw("  Clock: "),
        Span::styled(format!("{:7.2}s", now), Style::default().fg(Color::Cyan)),
        Span::raw("  |  Sawtooth: "),
        Span::styled(saw_text, Style::default().fg(saw_color)),
    ]);

    let paragraph =
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Overtone "));
    f.render_widget(paragraph, area);
}

fn draw_channels(f: &mut Frame, area: Rect, state: &mut UiState) {
    let block = Block::default().borders(Borders::ALL).title(" Harmonics ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible = inner.height as usize;
    state.scroll_to_selection(visible);

    for row in 0..visible {
        let i = state.offset + row;
        if i >= state.channel_count {
            break;
        }

        let row_area = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(10)])
            .split(row_area);

        let marker = if i == state.selected { "▶ " } else { "  " };
        let style = if i == state.selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        let label = format!("{}{}", marker, amplitude_text(i, state.amplitudes[i]));
        f.render_widget(Paragraph::new(label).style(style), cols[0]);

        let slider = AmplitudeSlider::new(state.sliders[i], state.ceiling).style(
            if i == state.selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Cyan)
            },
        );
        f.render_widget(slider, cols[1]);
    }
}

fn draw_beats(f: &mut Frame, area: Rect, state: &UiState) {
    let lines: Vec<Line> = state
        .controlled
        .iter()
        .map(|&ch| {
            Line::from(vec![
                Span::raw(format!("  Oscillator {}: ", ch + 1)),
                Span::styled(
                    format!("beats of sound: {}", state.sound_beats[ch]),
                    Style::default().fg(Color::Green),
                ),
                Span::raw("  |  "),
                Span::styled(
                    format!("beats of silence: {}", state.silence_beats[ch]),
                    Style::default().fg(Color::Blue),
                ),
            ])
        })
        .collect();

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Envelopes "));
    f.render_widget(paragraph, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let text = Line::from(
        "  up/down: select  |  left/right: amplitude  |  s/x: sawtooth  |  \
         r: rise all  |  f: fall all  |  b: envelopes  |  q: quit",
    );

    let paragraph = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
