//! Drag positioning for floating panels.
//!
//! - [`codec`] reads and writes the movable element's transform string.
//! - [`clamp`] keeps a candidate offset inside an optional container.
//! - [`session`] holds the anchors of the drag in progress.
//! - [`grab`] is the scoped hold on the surface-wide pointer styling.
//! - [`engine`] ties them together behind `bind` / `handle_event` / `unbind`.

pub mod clamp;
pub mod codec;
pub mod engine;
pub mod grab;
pub mod session;

pub use clamp::clamp;
pub use engine::{DragEngine, DragOptions, DragState};
pub use grab::GrabGuard;
pub use session::DragSession;
