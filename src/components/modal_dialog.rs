use indoc::indoc;
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::floating_panel::{Anchor, FloatingPanel, PanelIds};
use super::{DraggablePanel, ElementId};
use crate::constants::{DIALOG_HEIGHT, DIALOG_WIDTH};
use crate::drag::DragOptions;
use crate::scene::Scene;

const DIALOG_TITLE: &str = " Drag me ";

const DIALOG_BODY: &str = indoc! {"
    Grab the title bar and move this dialog around.
    It stays inside the terminal while you drag.

    c: toggle chat   m: toggle dialog   q: quit
"};

/// Centered dialog confined to the screen while dragged.
#[derive(Debug)]
pub struct ModalDialog {
    panel: FloatingPanel<ElementId>,
}

impl Default for ModalDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalDialog {
    pub fn new() -> Self {
        let options = DragOptions::default()
            .with_bounds(ElementId::Screen)
            .on_drag_end(|p| tracing::info!(x = p.x, y = p.y, "dialog moved"));
        Self {
            panel: FloatingPanel::new(
                PanelIds {
                    panel: ElementId::DialogPanel,
                    header: ElementId::DialogHeader,
                },
                Anchor::Center,
                (DIALOG_WIDTH, DIALOG_HEIGHT),
                options,
            ),
        }
    }
}

impl DraggablePanel for ModalDialog {
    fn panel(&self) -> &FloatingPanel<ElementId> {
        &self.panel
    }

    fn panel_mut(&mut self) -> &mut FloatingPanel<ElementId> {
        &mut self.panel
    }

    fn render(&self, frame: &mut Frame, scene: &Scene<ElementId>) {
        let Some(area) = self.panel.placed_rect(scene, frame.area()) else {
            return;
        };
        frame.render_widget(Clear, area);
        let border = if self.panel.drag_state().is_dragging {
            Color::Yellow
        } else {
            Color::White
        };
        let block = Block::default()
            .title(DIALOG_TITLE)
            .title_style(Style::default().add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(Color::Black));
        let paragraph = Paragraph::new(DIALOG_BODY)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use super::*;
    use crate::drivers::mouse::PointerEvent;
    use crate::geometry::Position;

    fn screen() -> Rect {
        Rect::new(0, 0, 80, 24)
    }

    fn mounted() -> (Scene<ElementId>, ModalDialog) {
        let mut scene = Scene::new();
        scene.set_layout(ElementId::Screen, screen());
        let mut dialog = ModalDialog::new();
        dialog.toggle(&mut scene);
        dialog.sync(&mut scene, screen());
        (scene, dialog)
    }

    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn opens_centered() {
        let (scene, dialog) = mounted();
        let rect = dialog
            .panel()
            .placed_rect(&scene, screen())
            .expect("visible");
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (12, 7, 56, 9));

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| dialog.render(f, &scene)).unwrap();
        assert!(row_text(&terminal, 7).contains("Drag me"));
        assert!(row_text(&terminal, 11).contains("toggle chat"));
    }

    #[test]
    fn drag_is_confined_to_screen() {
        let (mut scene, mut dialog) = mounted();
        dialog.handle_event(&mut scene, &PointerEvent::down(14.0, 7.0));
        dialog.handle_event(&mut scene, &PointerEvent::moved(54.0, -13.0));
        assert_eq!(
            dialog.panel().drag_state().current_position,
            Position::new(12.0, -7.0)
        );
        dialog.handle_event(&mut scene, &PointerEvent::up(54.0, -13.0));
        let rect = dialog
            .panel()
            .placed_rect(&scene, screen())
            .expect("visible");
        assert_eq!((rect.x, rect.y), (24, 0));
    }

    #[test]
    fn press_on_body_does_not_drag() {
        let (mut scene, mut dialog) = mounted();
        assert!(!dialog.handle_event(&mut scene, &PointerEvent::down(14.0, 10.0)));
        assert!(!dialog.panel().drag_state().is_dragging);
    }
}
