use crate::config::scheme_color;
use crate::driver::{Flow, RenderSink};
use crate::engine::Frame;
use crate::error::LifeResult;
use crate::grid::{neighbor_count, Torus};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyModifiers},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Glyph>>,
}

/// A single character cell in the terminal buffer
#[derive(Clone)]
pub struct Glyph {
    pub ch: char,
    pub fg: Option<Color>,
    pub bold: bool,
}

impl Default for Glyph {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bold: false,
        }
    }
}

impl Terminal {
    /// Take over the screen: raw mode, alternate screen, hidden cursor.
    /// Dropping the terminal restores all three.
    pub fn new() -> io::Result<Self> {
        let (width, height) = size()?;

        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide)?;

        let buffer = vec![vec![Glyph::default(); width as usize]; height as usize];

        Ok(Self {
            width,
            height,
            buffer,
        })
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Reallocate the buffer for new dimensions
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = vec![vec![Glyph::default(); width as usize]; height as usize];
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        for row in &mut self.buffer {
            for glyph in row {
                *glyph = Glyph::default();
            }
        }
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    /// Set a character at position with optional color
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bold: bool) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize][x as usize] = Glyph { ch, fg, bold };
        }
    }

    /// Set a string starting at position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, bold);
        }
    }

    /// Render the entire buffer to screen
    pub fn render(&self) -> io::Result<()> {
        let mut stdout = stdout();

        for (y, row) in self.buffer.iter().enumerate() {
            queue!(stdout, MoveTo(0, y as u16))?;

            for glyph in row {
                if glyph.bold {
                    queue!(stdout, SetAttribute(Attribute::Bold))?;
                }

                if let Some(color) = glyph.fg {
                    queue!(stdout, SetForegroundColor(color), Print(glyph.ch), ResetColor)?;
                } else {
                    queue!(stdout, Print(glyph.ch))?;
                }

                if glyph.bold {
                    queue!(stdout, SetAttribute(Attribute::Reset))?;
                }
            }
        }

        stdout.flush()?;
        Ok(())
    }

    /// Check for keypress (non-blocking), returns (code, modifiers)
    pub fn check_key(&self) -> io::Result<Option<(KeyCode, KeyModifiers)>> {
        self.wait_key(0)
    }

    /// Wait for a keypress with timeout
    pub fn wait_key(&self, timeout_ms: u64) -> io::Result<Option<(KeyCode, KeyModifiers)>> {
        if poll(Duration::from_millis(timeout_ms))? {
            if let Event::Key(key_event) = read()? {
                return Ok(Some((key_event.code, key_event.modifiers)));
            }
        }
        Ok(None)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Keys the live view reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quit,
    TogglePause,
    Scheme(u8),
    None,
}

/// Raw mode swallows SIGINT, so Ctrl-C arrives here as a key.
fn command_for(code: KeyCode, modifiers: KeyModifiers) -> Command {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char(' ') => Command::TogglePause,
        KeyCode::Char(c) if c.is_ascii_digit() => Command::Scheme(c as u8 - b'0'),
        _ => Command::None,
    }
}

/// Live full-screen view: each cell is two glyphs wide, with a status line
/// below the universe.
pub struct TerminalSink {
    term: Terminal,
    draw_char: char,
    color_scheme: u8,
    paused: bool,
}

impl TerminalSink {
    pub fn new(draw_char: char, color_scheme: u8) -> io::Result<Self> {
        let term = Terminal::new()?;
        term.clear_screen()?;
        Ok(Self {
            term,
            draw_char,
            color_scheme,
            paused: false,
        })
    }

    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        let (w, h) = size().unwrap_or(self.term.size());
        if (w, h) != self.term.size() {
            self.term.resize(w, h);
            self.term.clear_screen()?;
        }

        self.term.clear();
        let grid = &frame.grid;
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if !grid.is_alive(x, y) {
                    continue;
                }
                let intensity = match neighbor_count(grid, x, y) {
                    2 => 1,
                    3 => 2,
                    _ => 0,
                };
                let (color, bold) = scheme_color(self.color_scheme, intensity);
                let (sx, sy) = (2 * x as i32, y as i32);
                self.term.set(sx, sy, self.draw_char, Some(color), bold);
                self.term.set(sx + 1, sy, self.draw_char, Some(color), bold);
            }
        }

        let status = format!(
            "Generation: {}  Score: {}{}",
            frame.generation,
            frame.live,
            if self.paused { "  [paused]" } else { "" }
        );
        let status_y = (grid.height() as i32).min(h as i32 - 1);
        self.term.set_str(0, status_y, &status, Some(Color::White), true);
        self.term.render()
    }

    /// Handle one key; returns true on quit.
    fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return true,
            Command::TogglePause => self.paused = !self.paused,
            Command::Scheme(n) => self.color_scheme = n,
            Command::None => {}
        }
        false
    }
}

impl RenderSink for TerminalSink {
    fn present(&mut self, frame: &Frame) -> LifeResult<Flow> {
        self.draw(frame)?;

        while let Some((code, mods)) = self.term.check_key()? {
            if self.apply(command_for(code, mods)) {
                return Ok(Flow::Quit);
            }
        }

        // Hold the current generation on screen until unpaused.
        while self.paused {
            self.draw(frame)?;
            if let Some((code, mods)) = self.term.wait_key(100)? {
                if self.apply(command_for(code, mods)) {
                    return Ok(Flow::Quit);
                }
            }
        }
        Ok(Flow::Continue)
    }
}
