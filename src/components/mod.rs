use ratatui::Frame;
use ratatui::layout::Rect;

use crate::drivers::mouse::PointerEvent;
use crate::scene::Scene;

pub mod chat_panel;
pub mod floating_panel;
pub mod modal_dialog;

pub use chat_panel::ChatPanel;
pub use floating_panel::{Anchor, FloatingPanel, PanelIds, Placement};
pub use modal_dialog::ModalDialog;

/// Elements the demo panels mount into their scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ElementId {
    Screen,
    ChatPanel,
    ChatHeader,
    DialogPanel,
    DialogHeader,
}

/// A panel that can be shown, dragged and painted.
pub trait DraggablePanel {
    fn panel(&self) -> &FloatingPanel<ElementId>;
    fn panel_mut(&mut self) -> &mut FloatingPanel<ElementId>;
    fn render(&self, frame: &mut Frame, scene: &Scene<ElementId>);

    fn sync(&mut self, scene: &mut Scene<ElementId>, area: Rect) {
        self.panel_mut().sync(scene, area);
    }

    fn toggle(&mut self, scene: &mut Scene<ElementId>) {
        self.panel_mut().toggle(scene);
    }

    fn handle_event(&mut self, scene: &mut Scene<ElementId>, event: &PointerEvent) -> bool {
        self.panel_mut().handle_event(scene, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_ids_order_screen_first() {
        let mut ids = vec![
            ElementId::DialogHeader,
            ElementId::Screen,
            ElementId::ChatPanel,
        ];
        ids.sort();
        assert_eq!(ids[0], ElementId::Screen);
    }
}
