use tui::buffer::Buffer;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Style};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap};

use crate::state::app_state::Dialog;

pub const DIALOG_WIDTH: u16 = 56;
pub const DIALOG_HEIGHT: u16 = 8;

/// Blocking alert or yes/no question drawn over everything else.
pub struct DialogView<'a> {
    pub dialog: &'a Dialog,
}

impl<'a> Widget for DialogView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, message, hint, color) = match self.dialog {
            Dialog::Alert { message, is_error: false } => {
                (" Notice ", message.as_str(), "[Enter] OK", Color::Green)
            }
            Dialog::Alert { message, is_error: true } => {
                (" Error ", message.as_str(), "[Enter] OK", Color::Red)
            }
            Dialog::Confirm { message, .. } => {
                (" Confirm ", message.as_str(), "[y] Yes   [n] No", Color::Yellow)
            }
        };

        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        let [body, hint_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);
        Paragraph::new(message)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .render(body, buf);
        Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .render(hint_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::messages::NetworkRequest;

    fn rendered(dialog: &Dialog) -> String {
        let area = Rect::new(0, 0, DIALOG_WIDTH, DIALOG_HEIGHT);
        let mut buf = Buffer::empty(area);
        DialogView { dialog }.render(area, &mut buf);
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn confirm_offers_yes_and_no() {
        let text = rendered(&Dialog::Confirm {
            message: "Are you sure you want to delete this team?".into(),
            request: NetworkRequest::DeleteTeam { id: 1 },
        });
        assert!(text.contains("Confirm"));
        assert!(text.contains("[y] Yes"));
        assert!(text.contains("delete this team?"));
    }

    #[test]
    fn error_alert_has_error_title() {
        let text = rendered(&Dialog::error("Error: Team name already exists"));
        assert!(text.contains(" Error "));
        assert!(text.contains("[Enter] OK"));
    }
}
