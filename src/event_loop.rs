use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;
use crate::state::take_surface_change;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// Polls the input driver and dispatches events on the UI thread.
///
/// Each iteration calls the handler with `None` first (a chance to draw),
/// then drains every queued event. Pending surface styling is pushed to the
/// driver after each handler call, so the pointer shape changes on the same
/// event that started or ended a drag.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    fn flush_surface(&mut self) -> io::Result<()> {
        if let Some(style) = take_surface_change() {
            self.driver.apply_surface_style(style)?;
        }
        Ok(())
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            let flow = handler(&mut self.driver, None)?;
            self.flush_surface()?;
            if let ControlFlow::Quit = flow {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain bursts (drag moves arrive many per frame) before the
                // next draw so rendering does not fall behind the pointer.
                loop {
                    let event = self.driver.read()?;
                    let flow = handler(&mut self.driver, Some(event))?;
                    self.flush_surface()?;
                    if let ControlFlow::Quit = flow {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
