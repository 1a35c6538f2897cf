//! Terminal implementation of the engine's `Ui`
//!
//! The engine writes positioned text into an 80x24 character canvas. The
//! canvas is pushed to the terminal through ratatui before every blocking
//! read, so a whole menu redraw reaches the screen at once.
//!
//! Messages and prompts share the top line. A message stays there until the
//! player has seen it: the next prompt first shows it with `-more-` and
//! waits for a key.

use std::collections::VecDeque;
use std::io::{self, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use hb_core::errors::UiError;
use hb_core::io::{Color, Display, Input, Key};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::input::map_key;
use crate::theme::Theme;

pub const SCREEN_WIDTH: usize = 80;
pub const SCREEN_HEIGHT: usize = 24;

const MORE: &str = " -more-";

/// Where key events come from
pub trait EventSource {
    fn next_event(&mut self) -> io::Result<Event>;
}

/// Blocking reads from the real terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn next_event(&mut self) -> io::Result<Event> {
        event::read()
    }
}

/// Canned events, for tests and replays
impl EventSource for VecDeque<Event> {
    fn next_event(&mut self) -> io::Result<Event> {
        self.pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more events"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    color: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            color: Color::White,
        }
    }
}

/// Character grid the engine draws into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    rows: Vec<Vec<Cell>>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            rows: vec![vec![Cell::default(); SCREEN_WIDTH]; SCREEN_HEIGHT],
        }
    }
}

impl Canvas {
    /// Write `text` at (row, col), clipped to the screen
    pub fn put(&mut self, row: u16, col: u16, text: &str, color: Color) {
        let Some(cells) = self.rows.get_mut(usize::from(row)) else {
            return;
        };
        for (offset, ch) in text.chars().enumerate() {
            match cells.get_mut(usize::from(col) + offset) {
                Some(cell) => *cell = Cell { ch, color },
                None => break,
            }
        }
    }

    /// Blank `count` rows from `row`, starting at `col`
    pub fn clear(&mut self, row: u16, col: u16, count: u16) {
        let start = usize::from(row);
        let end = (start + usize::from(count)).min(SCREEN_HEIGHT);
        for cells in self.rows.iter_mut().take(end).skip(start) {
            for cell in cells.iter_mut().skip(usize::from(col)) {
                *cell = Cell::default();
            }
        }
    }

    /// Replace the whole top line
    pub fn set_top_line(&mut self, text: &str, color: Color) {
        self.clear(0, 0, 1);
        self.put(0, 0, text, color);
    }

    /// Text of one row, trailing blanks removed
    pub fn row_text(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|cells| cells.iter().map(|c| c.ch).collect::<String>())
            .unwrap_or_default()
            .trim_end()
            .to_string()
    }

    fn to_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        self.rows
            .iter()
            .map(|cells| {
                let mut spans = Vec::new();
                let mut run = String::new();
                let mut color = cells.first().map(|c| c.color).unwrap_or_default();
                for cell in cells {
                    if cell.color != color && !run.is_empty() {
                        spans.push(Span::styled(std::mem::take(&mut run), Style::default().fg(theme.color(color))));
                    }
                    color = cell.color;
                    run.push(cell.ch);
                }
                spans.push(Span::styled(run, Style::default().fg(theme.color(color))));
                Line::from(spans)
            })
            .collect()
    }
}

/// The engine's `Ui` over a ratatui terminal
pub struct TerminalUi<B: Backend, E: EventSource> {
    terminal: Terminal<B>,
    events: E,
    theme: Theme,
    canvas: Canvas,
    saved: Vec<Canvas>,
    /// Message on the top line the player has not acknowledged
    pending: Option<String>,
    /// Write BEL to stdout on `ring_bell`
    audible: bool,
    bells: usize,
}

impl<B: Backend, E: EventSource> TerminalUi<B, E> {
    pub fn new(terminal: Terminal<B>, events: E, theme: Theme) -> Self {
        Self {
            terminal,
            events,
            theme,
            canvas: Canvas::default(),
            saved: Vec::new(),
            pending: None,
            audible: false,
            bells: 0,
        }
    }

    pub fn with_audible_bell(mut self, audible: bool) -> Self {
        self.audible = audible;
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    pub fn bells(&self) -> usize {
        self.bells
    }

    /// Push the canvas to the terminal
    pub fn flush(&mut self) -> Result<(), UiError> {
        let lines = self.canvas.to_lines(&self.theme);
        self.terminal.draw(|frame| {
            frame.render_widget(Paragraph::new(lines), frame.area());
        })?;
        Ok(())
    }

    /// Show the pending message with `-more-` and wait for any key
    fn more(&mut self) -> Result<(), UiError> {
        let Some(text) = self.pending.take() else {
            return Ok(());
        };
        self.canvas.set_top_line(&format!("{}{}", text, MORE), Color::Yellow);
        self.flush()?;
        loop {
            if let Event::Key(event) = self.next_event()?
                && map_key(event).is_some()
            {
                self.canvas.clear(0, 0, 1);
                return Ok(());
            }
        }
    }

    fn next_event(&mut self) -> Result<Event, UiError> {
        self.events.next_event().map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => UiError::InputClosed,
            _ => UiError::Io(err),
        })
    }
}

impl<B: Backend, E: EventSource> Input for TerminalUi<B, E> {
    fn read_key(&mut self) -> Result<Key, UiError> {
        self.flush()?;
        // On screen during this read
        self.pending = None;
        loop {
            if let Event::Key(event) = self.next_event()?
                && let Some(key) = map_key(event)
            {
                return Ok(key);
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, UiError> {
        self.more()?;
        let mut buffer = String::new();
        loop {
            self.canvas.set_top_line(&format!("{}{}", prompt, buffer), Color::White);
            self.flush()?;
            let Event::Key(event) = self.next_event()? else {
                continue;
            };
            if event.kind == KeyEventKind::Release {
                continue;
            }
            match event.code {
                KeyCode::Enter => return Ok(Some(buffer)),
                KeyCode::Esc => return Ok(None),
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(c) if buffer.chars().count() + prompt.len() < SCREEN_WIDTH - 1 => {
                    buffer.push(c);
                }
                _ => {}
            }
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, UiError> {
        self.more()?;
        self.canvas.set_top_line(&format!("{}[y/n] ", prompt), Color::White);
        let key = self.read_key()?;
        self.canvas.clear(0, 0, 1);
        Ok(matches!(key, Key::Char('y' | 'Y')))
    }
}

impl<B: Backend, E: EventSource> Display for TerminalUi<B, E> {
    fn clear_region(&mut self, row: u16, col: u16, rows: u16) -> Result<(), UiError> {
        self.canvas.clear(row, col, rows);
        Ok(())
    }

    fn put_text(&mut self, row: u16, col: u16, text: &str, color: Color) -> Result<(), UiError> {
        self.canvas.put(row, col, text, color);
        Ok(())
    }

    fn save_screen(&mut self) -> Result<(), UiError> {
        self.saved.push(self.canvas.clone());
        Ok(())
    }

    fn restore_screen(&mut self) -> Result<(), UiError> {
        if let Some(canvas) = self.saved.pop() {
            self.canvas = canvas;
        }
        Ok(())
    }

    fn ring_bell(&mut self) -> Result<(), UiError> {
        self.bells += 1;
        if self.audible {
            let mut stdout = io::stdout();
            stdout.write_all(b"\x07")?;
            stdout.flush()?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<(), UiError> {
        self.more()?;
        self.canvas.set_top_line(text, Color::White);
        Ok(())
    }

    fn message(&mut self, text: &str) -> Result<(), UiError> {
        tracing::debug!(text, "message");
        let line = match self.pending.take() {
            Some(current)
                if current.chars().count() + 1 + text.chars().count() + MORE.len() <= SCREEN_WIDTH =>
            {
                format!("{} {}", current, text)
            }
            Some(current) => {
                self.pending = Some(current);
                self.more()?;
                text.to_string()
            }
            None => text.to_string(),
        };
        self.canvas.set_top_line(&line, Color::Yellow);
        self.pending = Some(line);
        Ok(())
    }
}
