//! Host-side element tree.
//!
//! The drag engine never owns geometry. It asks an [`ElementTree`] for fresh
//! boxes and writes transforms back through it. [`Scene`] is the tree used by
//! the terminal panels: each element has a cell-aligned layout rect, an
//! optional transform string, and an optional parent whose translation it
//! inherits, so a header row nested in a panel moves with the panel.

use std::collections::BTreeMap;

use ratatui::layout::Rect;

use crate::drag::codec;
use crate::geometry::{ElementBox, Position};

/// What the drag engine needs from its host.
pub trait ElementTree<R> {
    /// Rendered box of `id`, or `None` when the element is not attached.
    fn bounding_box(&self, id: R) -> Option<ElementBox>;
    /// Current positional representation of `id`.
    fn transform(&self, id: R) -> Option<&str>;
    fn set_transform(&mut self, id: R, value: String);
}

/// Signed placement with unsigned size, used when a translated element
/// extends past the top or left edge of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl PlacedRect {
    /// Portion of the placement inside `area`.
    pub fn clip(self, area: Rect) -> Option<Rect> {
        let left = self.x.max(area.x as i32);
        let top = self.y.max(area.y as i32);
        let right = self
            .x
            .saturating_add(self.width as i32)
            .min(area.x as i32 + area.width as i32);
        let bottom = self
            .y
            .saturating_add(self.height as i32)
            .min(area.y as i32 + area.height as i32);
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect {
            x: left as u16,
            y: top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        })
    }
}

#[derive(Debug, Clone)]
struct SceneElement<R> {
    layout: Rect,
    transform: Option<String>,
    parent: Option<R>,
}

#[derive(Debug, Clone)]
pub struct Scene<R: Copy + Eq + Ord> {
    elements: BTreeMap<R, SceneElement<R>>,
}

impl<R: Copy + Eq + Ord> Default for Scene<R> {
    fn default() -> Self {
        Self {
            elements: BTreeMap::new(),
        }
    }
}

impl<R: Copy + Eq + Ord> Scene<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: R) -> bool {
        self.elements.contains_key(&id)
    }

    /// Attach `id` or move its untranslated layout. Transform and parent
    /// survive a layout change.
    pub fn set_layout(&mut self, id: R, layout: Rect) {
        self.elements
            .entry(id)
            .and_modify(|el| el.layout = layout)
            .or_insert(SceneElement {
                layout,
                transform: None,
                parent: None,
            });
    }

    pub fn layout(&self, id: R) -> Option<Rect> {
        self.elements.get(&id).map(|el| el.layout)
    }

    pub fn set_parent(&mut self, id: R, parent: Option<R>) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.parent = parent;
        }
    }

    pub fn remove(&mut self, id: R) {
        self.elements.remove(&id);
    }

    /// Translation applied to `id`, its own plus every ancestor's.
    pub fn translation(&self, id: R) -> Position {
        let mut total = Position::ORIGIN;
        let mut next = Some(id);
        // A parent cycle would otherwise never end.
        for _ in 0..=self.elements.len() {
            let Some(el) = next.and_then(|id| self.elements.get(&id)) else {
                break;
            };
            total = total + codec::decode(el.transform.as_deref());
            next = el.parent;
        }
        total
    }

    /// On-screen placement of `id`, rounded to whole cells.
    pub fn placed(&self, id: R) -> Option<PlacedRect> {
        let layout = self.layout(id)?;
        let (dx, dy) = self.translation(id).to_cells();
        Some(PlacedRect {
            x: (layout.x as i32).saturating_add(dx),
            y: (layout.y as i32).saturating_add(dy),
            width: layout.width,
            height: layout.height,
        })
    }

    pub fn placed_rect(&self, id: R, clip: Rect) -> Option<Rect> {
        self.placed(id)?.clip(clip)
    }
}

impl<R: Copy + Eq + Ord> ElementTree<R> for Scene<R> {
    fn bounding_box(&self, id: R) -> Option<ElementBox> {
        let layout = self.layout(id)?;
        Some(ElementBox::from(layout).translated(self.translation(id)))
    }

    fn transform(&self, id: R) -> Option<&str> {
        self.elements.get(&id)?.transform.as_deref()
    }

    fn set_transform(&mut self, id: R, value: String) {
        if let Some(el) = self.elements.get_mut(&id) {
            el.transform = Some(value);
        }
    }
}
