//! Pointer-driven drag positioning for floating terminal panels.
//!
//! [`drag::DragEngine`] turns press/move/release events into a clamped
//! translation that it writes back to the host's element tree. The rest of
//! the crate is the terminal host: a [`scene::Scene`] to measure and place
//! elements, crossterm [`drivers`], an [`event_loop`] and a couple of
//! ready-made [`components`].

pub mod components;
pub mod constants;
pub mod drag;
pub mod drivers;
pub mod event_loop;
pub mod geometry;
pub mod log_buffer;
pub mod logging;
pub mod scene;
pub mod state;
