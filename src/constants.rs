//! Shared crate-wide constants.

/// Lines kept by a [`crate::log_buffer::LogBuffer`] created with `default()`.
pub const LOG_BUFFER_MAX_LINES: usize = 500;

/// Rows at the top of a floating panel that act as its drag handle.
pub const PANEL_HEADER_HEIGHT: u16 = 1;

/// Preferred chat bubble size in cells. Shrinks to fit small terminals.
pub const CHAT_PANEL_WIDTH: u16 = 42;
pub const CHAT_PANEL_HEIGHT: u16 = 12;

/// Preferred modal dialog size in cells.
pub const DIALOG_WIDTH: u16 = 56;
pub const DIALOG_HEIGHT: u16 = 9;

/// Gap between the chat bubble's resting place and the bottom-right corner.
pub const CHAT_PANEL_MARGIN: u16 = 2;
