use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::floating_panel::{Anchor, FloatingPanel, PanelIds};
use super::{DraggablePanel, ElementId};
use crate::constants::{CHAT_PANEL_HEIGHT, CHAT_PANEL_MARGIN, CHAT_PANEL_WIDTH};
use crate::drag::DragOptions;
use crate::scene::Scene;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChatLine {
    author: String,
    text: String,
}

/// Floating chat bubble resting in the bottom-right corner. It is not
/// confined, so it can be dragged partly off screen.
#[derive(Debug)]
pub struct ChatPanel {
    panel: FloatingPanel<ElementId>,
    transcript: Vec<ChatLine>,
}

impl Default for ChatPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatPanel {
    pub fn new() -> Self {
        let options = DragOptions::default()
            .on_drag_start(|| tracing::debug!("chat bubble picked up"))
            .on_drag_end(|p| tracing::info!(x = p.x, y = p.y, "chat bubble moved"));
        let panel = FloatingPanel::new(
            PanelIds {
                panel: ElementId::ChatPanel,
                header: ElementId::ChatHeader,
            },
            Anchor::BottomRight {
                margin: CHAT_PANEL_MARGIN,
            },
            (CHAT_PANEL_WIDTH, CHAT_PANEL_HEIGHT),
            options,
        );
        let mut chat = Self {
            panel,
            transcript: Vec::new(),
        };
        chat.push_message("assistant", "Hi! Drag me by my title bar.");
        chat
    }

    pub fn push_message(&mut self, author: impl Into<String>, text: impl Into<String>) {
        self.transcript.push(ChatLine {
            author: author.into(),
            text: text.into(),
        });
    }

    pub fn message_count(&self) -> usize {
        self.transcript.len()
    }

    fn title(&self) -> &'static str {
        if self.panel.drag_state().is_dragging {
            " Chat (moving) "
        } else {
            " Chat "
        }
    }
}

impl DraggablePanel for ChatPanel {
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
        let block = Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let author_style = Style::default().add_modifier(Modifier::BOLD);
        let lines: Vec<Line> = self
            .transcript
            .iter()
            .map(|line| {
                Line::from(vec![
                    Span::styled(format!("{}: ", line.author), author_style),
                    Span::raw(line.text.as_str()),
                ])
            })
            .collect();
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}
