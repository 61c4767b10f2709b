//! Geometry shared by the drag engine and its hosts.
//!
//! Terminal layout works in whole cells (`ratatui::layout::Rect`), but a drag
//! offset is kept as `f64` so a host with finer pointer resolution loses
//! nothing when positions are encoded and decoded again.

use std::ops::{Add, Sub};

use ratatui::layout::Rect;

/// Translation offset from an element's untranslated layout placement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Replace any non-finite axis with the matching axis of `fallback`.
    pub fn finite_or(self, fallback: Position) -> Position {
        let pick = |value: f64, other: f64| if value.is_finite() { value } else { other };
        Position {
            x: pick(self.x, fallback.x),
            y: pick(self.y, fallback.y),
        }
    }

    /// Offset rounded to whole terminal cells.
    pub fn to_cells(self) -> (i32, i32) {
        (round_cell(self.x), round_cell(self.y))
    }
}

fn round_cell(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Rendered bounding box of an element, translation included.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementBox {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn translated(self, by: Position) -> ElementBox {
        ElementBox {
            left: self.left + by.x,
            top: self.top + by.y,
            ..self
        }
    }

    /// Half-open containment, matching how cells are hit-tested.
    pub fn contains(&self, point: Position) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 {
            return false;
        }
        point.x >= self.left
            && point.x < self.right()
            && point.y >= self.top
            && point.y < self.bottom()
    }
}

impl From<Rect> for ElementBox {
    fn from(rect: Rect) -> Self {
        ElementBox::new(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        )
    }
}

/// Containing rectangle that a dragged element must stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundsBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundsBox {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl From<ElementBox> for BoundsBox {
    fn from(b: ElementBox) -> Self {
        BoundsBox::new(b.left, b.top, b.right(), b.bottom())
    }
}

impl From<Rect> for BoundsBox {
    fn from(rect: Rect) -> Self {
        ElementBox::from(rect).into()
    }
}
