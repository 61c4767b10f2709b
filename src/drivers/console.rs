use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::{Command, execute};

use super::InputDriver;
use crate::state::{PointerShape, SurfaceStyle};

/// OSC 22 request for the terminal's mouse pointer shape. Terminals without
/// support ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPointerShape(pub PointerShape);

impl Command for SetPointerShape {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "\x1b]22;{}\x1b\\", self.0.css_name())
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Input and surface styling over the process's own terminal.
pub struct ConsoleDriver<W: Write = io::Stdout> {
    out: W,
    /// Capture mode the application asked for.
    capture_preferred: bool,
    /// Capture mode currently written to the terminal.
    capture_active: Option<bool>,
    selection_suppressed: bool,
    pointer: PointerShape,
}

impl Default for ConsoleDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleDriver {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write> ConsoleDriver<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            capture_preferred: true,
            capture_active: None,
            selection_suppressed: false,
            pointer: PointerShape::Default,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn capture_preferred(&self) -> bool {
        self.capture_preferred
    }

    pub fn pointer(&self) -> PointerShape {
        self.pointer
    }

    fn sync_capture(&mut self) -> io::Result<()> {
        let wanted = self.capture_preferred || self.selection_suppressed;
        if self.capture_active == Some(wanted) {
            return Ok(());
        }
        if wanted {
            execute!(self.out, EnableMouseCapture)?;
        } else {
            execute!(self.out, DisableMouseCapture)?;
        }
        self.capture_active = Some(wanted);
        Ok(())
    }
}

impl<W: Write> InputDriver for ConsoleDriver<W> {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        loop {
            let evt = crossterm::event::read()?;
            // Release events only arrive with keyboard enhancement and would
            // double every key press.
            if let Event::Key(key) = &evt
                && key.kind == KeyEventKind::Release
            {
                continue;
            }
            return Ok(evt);
        }
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        self.capture_preferred = enabled;
        self.sync_capture()
    }

    fn set_pointer_shape(&mut self, shape: PointerShape) -> io::Result<()> {
        if self.pointer == shape {
            return Ok(());
        }
        execute!(self.out, SetPointerShape(shape))?;
        self.pointer = shape;
        Ok(())
    }

    /// A drag keeps capture on even when the application turned it off, and
    /// the application's choice comes back once the drag lets go.
    fn apply_surface_style(&mut self, style: SurfaceStyle) -> io::Result<()> {
        self.set_pointer_shape(style.pointer)?;
        self.selection_suppressed = style.selection_suppressed;
        self.sync_capture()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(driver: &ConsoleDriver<Vec<u8>>) -> String {
        String::from_utf8_lossy(driver.writer()).into_owned()
    }

    #[test]
    fn pointer_shape_command_is_osc_22() {
        let mut s = String::new();
        SetPointerShape(PointerShape::Grabbing)
            .write_ansi(&mut s)
            .unwrap();
        assert_eq!(s, "\x1b]22;grabbing\x1b\\");
    }

    #[test]
    fn pointer_shape_is_written_once_per_change() {
        let mut d = ConsoleDriver::with_writer(Vec::new());
        d.set_pointer_shape(PointerShape::Grab).unwrap();
        d.set_pointer_shape(PointerShape::Grab).unwrap();
        assert_eq!(output(&d).matches("\x1b]22;grab\x1b\\").count(), 1);
        assert_eq!(d.pointer(), PointerShape::Grab);
    }

    #[test]
    fn drag_forces_capture_and_restores_preference() {
        let mut d = ConsoleDriver::with_writer(Vec::new());
        d.set_mouse_capture(false).unwrap();
        let after_disable = output(&d).len();
        d.apply_surface_style(SurfaceStyle {
            pointer: PointerShape::Grabbing,
            selection_suppressed: true,
        })
        .unwrap();
        let during = output(&d)[after_disable..].to_string();
        assert!(during.contains("grabbing"));
        assert!(during.len() > "\x1b]22;grabbing\x1b\\".len());
        d.apply_surface_style(SurfaceStyle::default()).unwrap();
        assert!(!d.capture_preferred());
        assert_eq!(d.capture_active, Some(false));
        assert_eq!(d.pointer(), PointerShape::Default);
    }
}
