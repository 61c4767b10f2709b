pub mod console;
pub mod mouse;

use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::state::{PointerShape, SurfaceStyle};

pub trait InputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
    fn set_mouse_capture(&mut self, _enabled: bool) -> io::Result<()> {
        Ok(())
    }
    fn set_pointer_shape(&mut self, _shape: PointerShape) -> io::Result<()> {
        Ok(())
    }

    /// Push surface styling to the terminal. Suppressing selection means
    /// keeping mouse capture on, so the emulator does not start a native
    /// text selection under a drag.
    fn apply_surface_style(&mut self, style: SurfaceStyle) -> io::Result<()> {
        self.set_pointer_shape(style.pointer)?;
        if style.selection_suppressed {
            self.set_mouse_capture(true)?;
        }
        Ok(())
    }
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        (**self).read()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        (**self).set_mouse_capture(enabled)
    }

    fn set_pointer_shape(&mut self, shape: PointerShape) -> io::Result<()> {
        (**self).set_pointer_shape(shape)
    }

    fn apply_surface_style(&mut self, style: SurfaceStyle) -> io::Result<()> {
        (**self).apply_surface_style(style)
    }
}
