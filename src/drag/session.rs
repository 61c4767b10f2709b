use super::grab::GrabGuard;
use crate::geometry::Position;

/// State of one drag, from the press on the handle to the matching release.
///
/// The session owns the surface grab, so ending the session in any way (a
/// release, unbinding, dropping the engine) restores the surface styling.
#[derive(Debug)]
pub struct DragSession {
    pointer_anchor: Position,
    offset_anchor: Position,
    _grab: GrabGuard,
}

impl DragSession {
    pub fn new(pointer_anchor: Position, offset_anchor: Position, grab: GrabGuard) -> Self {
        Self {
            pointer_anchor,
            offset_anchor,
            _grab: grab,
        }
    }

    pub fn pointer_anchor(&self) -> Position {
        self.pointer_anchor
    }

    pub fn offset_anchor(&self) -> Position {
        self.offset_anchor
    }

    /// Unclamped offset for the pointer at `pointer`.
    pub fn raw_offset(&self, pointer: Position) -> Position {
        pointer - self.pointer_anchor + self.offset_anchor
    }
}
