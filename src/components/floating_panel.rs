use std::fmt::Debug;

use ratatui::layout::Rect;

use crate::constants::PANEL_HEADER_HEIGHT;
use crate::drag::{DragEngine, DragOptions, DragState};
use crate::drivers::mouse::PointerEvent;
use crate::scene::Scene;

/// Element ids a floating panel occupies in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelIds<R> {
    pub panel: R,
    pub header: R,
}

/// Where a panel rests before it has been dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    BottomRight { margin: u16 },
}

impl Anchor {
    pub fn rect_for(self, area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width).max(1);
        let height = height.min(area.height).max(1);
        let (x, y) = match self {
            Anchor::Center => (
                area.x.saturating_add(area.width.saturating_sub(width) / 2),
                area.y
                    .saturating_add(area.height.saturating_sub(height) / 2),
            ),
            Anchor::BottomRight { margin } => (
                area.x
                    .saturating_add(area.width.saturating_sub(width.saturating_add(margin))),
                area.y
                    .saturating_add(area.height.saturating_sub(height.saturating_add(margin))),
            ),
        };
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

/// How the panel's base rect is chosen on each layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Follows its anchor as the screen changes size.
    Anchored,
    /// Stays where the drag left it.
    Dragged,
}

/// A show/hide panel moved by dragging its header row.
///
/// The panel mounts its elements into the scene while visible and unmounts
/// them (unbinding the drag engine) while hidden. Reopening a panel that has
/// never been dragged puts it back at its initial offset; a panel that has
/// been dragged reopens where it was left.
#[derive(Debug)]
pub struct FloatingPanel<R> {
    ids: PanelIds<R>,
    anchor: Anchor,
    size: (u16, u16),
    engine: DragEngine<R>,
    visible: bool,
    has_dragged: bool,
    frozen: Option<Rect>,
}

impl<R: Copy + Eq + Ord + Debug> FloatingPanel<R> {
    /// `options` supplies bounds, initial position and callbacks; the handle
    /// and movable elements are always the panel's own header and body.
    pub fn new(
        ids: PanelIds<R>,
        anchor: Anchor,
        size: (u16, u16),
        options: DragOptions<R>,
    ) -> Self {
        let mut engine = DragEngine::new(options);
        engine.set_elements(Some(ids.header), Some(ids.panel));
        Self {
            ids,
            anchor,
            size,
            engine,
            visible: false,
            has_dragged: false,
            frozen: None,
        }
    }

    pub fn engine(&self) -> &DragEngine<R> {
        &self.engine
    }

    pub fn drag_state(&self) -> DragState {
        self.engine.state()
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn has_dragged(&self) -> bool {
        self.has_dragged
    }

    pub fn placement(&self) -> Placement {
        if self.has_dragged {
            Placement::Dragged
        } else {
            Placement::Anchored
        }
    }

    pub fn show(&mut self, scene: &mut Scene<R>) {
        if self.visible {
            return;
        }
        self.visible = true;
        if !self.has_dragged {
            self.engine.reset_position(scene);
            self.frozen = None;
        }
    }

    pub fn hide(&mut self, scene: &mut Scene<R>) {
        if !self.visible {
            return;
        }
        self.visible = false;
        self.unmount(scene);
    }

    pub fn toggle(&mut self, scene: &mut Scene<R>) {
        if self.visible {
            self.hide(scene);
        } else {
            self.show(scene);
        }
    }

    /// Drop the remembered drag so the next reopen starts from the initial
    /// offset again.
    pub fn forget_drag(&mut self) {
        self.has_dragged = false;
    }

    /// Mount or unmount the panel for this frame and (re)bind its engine.
    pub fn sync(&mut self, scene: &mut Scene<R>, area: Rect) {
        if !self.visible {
            self.unmount(scene);
            return;
        }
        let (width, height) = self.size;
        let base = match (self.placement(), self.frozen) {
            (Placement::Dragged, Some(rect)) => rect,
            _ => self.anchor.rect_for(area, width, height),
        };
        scene.set_layout(self.ids.panel, base);
        scene.set_layout(
            self.ids.header,
            Rect {
                height: PANEL_HEADER_HEIGHT.min(base.height),
                ..base
            },
        );
        scene.set_parent(self.ids.header, Some(self.ids.panel));
        self.engine.bind(scene);
    }

    pub fn handle_event(&mut self, scene: &mut Scene<R>, event: &PointerEvent) -> bool {
        if !self.visible {
            return false;
        }
        let was_dragging = self.engine.is_dragging();
        let consumed = self.engine.handle_event(scene, event);
        if was_dragging && !self.engine.is_dragging() {
            self.has_dragged = true;
            if self.frozen.is_none() {
                self.frozen = scene.layout(self.ids.panel);
            }
        }
        consumed
    }

    /// On-screen rect of the whole panel, clipped to `clip`.
    pub fn placed_rect(&self, scene: &Scene<R>, clip: Rect) -> Option<Rect> {
        if !self.visible {
            return None;
        }
        scene.placed_rect(self.ids.panel, clip)
    }

    fn unmount(&mut self, scene: &mut Scene<R>) {
        self.engine.unbind();
        scene.remove(self.ids.header);
        scene.remove(self.ids.panel);
    }
}
