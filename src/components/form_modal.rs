use tui::buffer::Buffer;
use tui::layout::{Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap};

use crate::state::forms::{Field, FormKind, FormState};

/// Rows the widget needs for a form: one per field, the message line, the
/// key hint and the border.
pub fn form_height(form: &FormState) -> u16 {
    form.fields.len() as u16 + 5
}

const LABEL_WIDTH: usize = 16;

// ---------------------------------------------------------------------------
// FormView widget
// ---------------------------------------------------------------------------

/// Renders a create/edit form as a bordered popup. Also used full-size for
/// the login screen.
pub struct FormView<'a> {
    pub form: &'a FormState,
    /// Shown under the fields, e.g. a rejected login.
    pub message: Option<&'a str>,
}

impl<'a> Widget for FormView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", self.form.title()));
        let inner = block.inner(area);
        block.render(area, buf);

        let [fields_area, message_area, hint_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let lines: Vec<Line> = self
            .form
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| field_line(field, i == self.form.focus))
            .collect();
        Paragraph::new(lines).render(fields_area, buf);

        if let Some(message) = self.message {
            Paragraph::new(message)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .render(message_area, buf);
        }

        let choosing = self.form.focused().is_some_and(Field::is_choice);
        Paragraph::new(hint_text(self.form.kind, choosing))
            .style(Style::default().fg(Color::DarkGray))
            .render(hint_area, buf);
    }
}

fn field_line(field: &Field, focused: bool) -> Line<'static> {
    let marker = if field.required { "*" } else { " " };
    let label = format!("{:<width$}{marker} ", field.label, width = LABEL_WIDTH);
    let value = if field.is_choice() {
        format!("< {} >", field.display_value())
    } else if focused {
        format!("{}_", field.display_value())
    } else {
        field.display_value()
    };

    let (label_style, value_style) = if focused {
        (
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED),
        )
    } else {
        (Style::default().fg(Color::Gray), Style::default().fg(Color::White))
    };

    Line::from(vec![Span::styled(label, label_style), Span::styled(value, value_style)])
}

fn hint_text(kind: FormKind, choosing: bool) -> String {
    let submit = match kind {
        FormKind::Login => "Enter=log in  Esc=quit",
        _ => "Enter=save  Esc=cancel",
    };
    if choosing {
        format!("Tab=next  ←/→=choose  {submit}")
    } else {
        format!("Tab=next  {submit}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourney_api::Team;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.y..area.bottom())
            .map(|y| {
                (area.x..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_title_fields_and_choice() {
        let teams = vec![Team { id: 1, name: "Falcons".into(), ..Default::default() }];
        let mut form = FormState::player(None, &teams);
        form.set_value("name", "Asha");
        form.set_value("team_id", "1");

        let area = Rect::new(0, 0, 60, form_height(&form));
        let mut buf = Buffer::empty(area);
        FormView { form: &form, message: None }.render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Add Player"));
        assert!(text.contains("Asha_"));
        assert!(text.contains("< Falcons >"));
        assert!(text.contains("Enter=save"));
    }

    #[test]
    fn password_is_masked() {
        let mut form = FormState::login();
        form.set_value("username", "admin");
        form.set_value("password", "hunter2");

        let area = Rect::new(0, 0, 60, form_height(&form));
        let mut buf = Buffer::empty(area);
        FormView { form: &form, message: Some("Error: Invalid username or password") }
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(!text.contains("hunter2"));
        assert!(text.contains("*******"));
        assert!(text.contains("Invalid username or password"));
    }
}
