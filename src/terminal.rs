//! Terminal host: capability check, raw-mode surface and the fallback message.

use crate::app::{HostEvent, Platform, Surface};
use crate::error::InitError;
use crate::graphics::{Color, Framebuffer};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEventKind,
};
use crossterm::style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::tty::IsTty;
use crossterm::{execute, queue};
use log::{debug, warn};
use std::io::{self, BufWriter, Stdout, Write};
use std::time::{Duration, Instant};

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '\u{2580}';

const FALLBACK_LINES: [(&str, Color); 2] = [
    (
        "3D rendering is not supported on this terminal.",
        Color::from_hex(0x6c5ce7),
    ),
    (
        "Please use an interactive terminal with color and mouse support.",
        Color::from_hex(0x909090),
    ),
];

/// The process's controlling terminal
#[derive(Default)]
pub struct TerminalPlatform;

impl TerminalPlatform {
    pub fn new() -> Self {
        TerminalPlatform
    }
}

impl Platform for TerminalPlatform {
    type Surface = TerminalSurface;

    fn check_capability(&self) -> Result<(), InitError> {
        if !io::stdout().is_tty() {
            return Err(InitError::Unsupported("standard output is not a terminal"));
        }
        if std::env::var("TERM").map_or(false, |term| term == "dumb") {
            return Err(InitError::Unsupported("terminal type is dumb"));
        }
        if termsize::get().is_none() {
            return Err(InitError::Unsupported("terminal size cannot be measured"));
        }
        Ok(())
    }

    fn create_surface(&mut self) -> Result<TerminalSurface, InitError> {
        let size = termsize::get().ok_or(InitError::Unsupported("terminal size cannot be measured"))?;
        if size.cols == 0 || size.rows == 0 {
            return Err(InitError::EmptyViewport {
                cols: size.cols,
                rows: size.rows,
            });
        }
        debug!("Terminal measures {}x{} cells", size.cols, size.rows);

        terminal::enable_raw_mode()?;
        // From here on dropping the surface restores the terminal
        let mut surface = TerminalSurface {
            out: BufWriter::with_capacity(1 << 16, io::stdout()),
            cols: size.cols,
            rows: size.rows,
        };
        execute!(surface.out, EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(surface)
    }

    fn show_fallback(&mut self) {
        let size = if io::stdout().is_tty() {
            termsize::get().map(|size| (size.cols, size.rows))
        } else {
            None
        };
        if let Err(e) = print_fallback(&mut io::stdout(), size) {
            warn!("Could not print the fallback message: {e}");
        }
    }
}

/// Centers the fallback message in a `(cols, rows)` screen, or prints it as
/// plain lines when the output is not a sized terminal.
fn print_fallback<W: Write>(out: &mut W, size: Option<(u16, u16)>) -> io::Result<()> {
    match size {
        Some((cols, rows)) if rows >= 2 => {
            queue!(out, Clear(ClearType::All))?;
            let top = rows / 2 - 1;
            for (index, (text, color)) in FALLBACK_LINES.iter().enumerate() {
                let width = text.chars().count() as u16;
                let left = cols.saturating_sub(width) / 2;
                queue!(
                    out,
                    MoveTo(left, top + index as u16),
                    SetForegroundColor(to_terminal(*color)),
                    Print(text),
                    ResetColor
                )?;
            }
            queue!(out, MoveTo(0, rows - 1))?;
        }
        _ => {
            for (text, _) in FALLBACK_LINES.iter() {
                writeln!(out, "{text}")?;
            }
        }
    }
    out.flush()
}

fn to_terminal(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Alternate screen in raw mode with mouse capture, restored on drop
pub struct TerminalSurface {
    out: BufWriter<Stdout>,
    cols: u16,
    rows: u16,
}

impl Surface for TerminalSurface {
    fn grid(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    fn resolution(&self) -> (usize, usize) {
        (self.cols as usize, self.rows as usize * 2)
    }

    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<HostEvent>> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(None);
            }
            if let Some(host_event) = translate(event::read()?) {
                if let HostEvent::Resize { cols, rows } = host_event {
                    self.cols = cols;
                    self.rows = rows;
                }
                return Ok(Some(host_event));
            }
        }
    }

    fn present(&mut self, framebuffer: &Framebuffer, overlay: &[String]) -> io::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let cols = framebuffer.width().min(self.cols as usize);
        let rows = (framebuffer.height() / 2).min(self.rows as usize);
        let mut current: Option<(Color, Color)> = None;

        for row in 0..rows {
            queue!(self.out, MoveTo(0, row as u16))?;
            for col in 0..cols {
                let top = framebuffer.pixel(col, row * 2);
                let bottom = framebuffer.pixel(col, row * 2 + 1);
                match current {
                    Some((fg, bg)) if fg == top && bg == bottom => {}
                    Some((fg, _)) if fg == top => {
                        queue!(self.out, SetBackgroundColor(to_terminal(bottom)))?;
                    }
                    Some((_, bg)) if bg == bottom => {
                        queue!(self.out, SetForegroundColor(to_terminal(top)))?;
                    }
                    _ => {
                        queue!(
                            self.out,
                            SetForegroundColor(to_terminal(top)),
                            SetBackgroundColor(to_terminal(bottom))
                        )?;
                    }
                }
                current = Some((top, bottom));
                queue!(self.out, Print(HALF_BLOCK))?;
            }
        }

        queue!(self.out, ResetColor)?;
        for (index, line) in overlay.iter().enumerate().take(self.rows as usize) {
            let visible: String = line.chars().take(self.cols.saturating_sub(1) as usize).collect();
            queue!(
                self.out,
                MoveTo(1, index as u16),
                SetForegroundColor(style::Color::White),
                SetBackgroundColor(style::Color::Black),
                Print(visible)
            )?;
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if let Err(e) = execute!(
            self.out,
            ResetColor,
            Show,
            DisableMouseCapture,
            LeaveAlternateScreen
        ) {
            warn!("Could not restore the terminal screen: {e}");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Could not leave raw mode: {e}");
        }
    }
}

/// Maps a terminal event to the input the frame loop understands
fn translate(event: Event) -> Option<HostEvent> {
    match event {
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(HostEvent::Pointer {
                col: mouse.column,
                row: mouse.row,
            }),
            MouseEventKind::ScrollDown => Some(HostEvent::Scroll(1)),
            MouseEventKind::ScrollUp => Some(HostEvent::Scroll(-1)),
            _ => None,
        },
        Event::Resize(cols, rows) => Some(HostEvent::Resize { cols, rows }),
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(HostEvent::Quit)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(HostEvent::Quit),
            KeyCode::Char('d') | KeyCode::Char('D') => Some(HostEvent::ToggleDebug),
            _ => None,
        },
        _ => None,
    }
}
