use crossterm::event::{Event, MouseButton, MouseEvent, MouseEventKind};

use crate::geometry::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down(MouseButton),
    Move,
    Up(MouseButton),
}

/// A pointer event in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Position,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Down(MouseButton::Left),
            position: Position::new(x, y),
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Move,
            position: Position::new(x, y),
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Up(MouseButton::Left),
            position: Position::new(x, y),
        }
    }

    /// Pointer event carried by a terminal event. Scrolling and non-mouse
    /// events carry none.
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::Mouse(mouse) => Self::from_mouse(mouse),
            _ => None,
        }
    }

    pub fn from_mouse(mouse: &MouseEvent) -> Option<Self> {
        let kind = match mouse.kind {
            MouseEventKind::Down(button) => PointerKind::Down(button),
            MouseEventKind::Up(button) => PointerKind::Up(button),
            MouseEventKind::Drag(_) | MouseEventKind::Moved => PointerKind::Move,
            _ => return None,
        };
        Some(Self {
            kind,
            position: Position::new(mouse.column as f64, mouse.row as f64),
        })
    }
}
