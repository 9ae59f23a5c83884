use crossterm::event::{Event, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input, InputRequest};

/// Which login field is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    /// Also used as the login username
    Email,

    /// Masked when rendered
    Password,
}

/// The email and password fields.
#[derive(Debug, Default)]
pub struct CredentialsForm {
    email: Input,
    password: Input,
}

impl CredentialsForm {
    /// Height needed to render both fields.
    pub const HEIGHT: u16 = 6;

    /// Current email.
    pub fn email(&self) -> &str {
        self.email.value()
    }

    /// Current password.
    pub fn password(&self) -> &str {
        self.password.value()
    }

    /// Render both fields. `active` gets the cursor and a highlighted border.
    #[expect(clippy::cast_possible_truncation)]
    pub fn render(&self, area: Rect, frame: &mut Frame<'_>, active: Option<CredentialField>) {
        let [email_area, password_area] =
            Layout::vertical(Constraint::from_lengths([3, 3])).areas(area);

        let width = area.width.saturating_sub(2 + 1) as usize; // -2 for the border, -1 for the cursor

        for (field, input, field_area) in [
            (CredentialField::Email, &self.email, email_area),
            (CredentialField::Password, &self.password, password_area),
        ] {
            // Scroll and cursor come from what's on screen, so the password
            // is measured as its mask rather than its (possibly wide) chars.
            let shown = match field {
                CredentialField::Email => input.clone(),
                CredentialField::Password => {
                    Input::new("*".repeat(input.value().chars().count()))
                        .with_cursor(input.cursor())
                }
            };

            let scroll = shown.visual_scroll(width);
            let is_active = active == Some(field);

            let widget = Paragraph::new(shown.value().to_owned()).scroll((0, scroll as u16)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(match field {
                        CredentialField::Email => "Email",
                        CredentialField::Password => "Password",
                    })
                    .border_style(if is_active {
                        Style::default().fg(Color::Blue)
                    } else {
                        Style::default()
                    }),
            );

            frame.render_widget(widget, field_area);

            if is_active {
                frame.set_cursor_position((
                    field_area.x
                        + (shown.visual_cursor().max(scroll) - scroll) as u16 // current end of text
                        + 1, // just past the border
                    field_area.y + 1, // +1 row for the border/title
                ));
            }
        }
    }

    /// Send a key to the given field.
    pub fn handle_event(&mut self, field: CredentialField, key: KeyEvent) {
        let event = Event::Key(key);

        match field {
            CredentialField::Email => self.email.handle_event(&event),
            CredentialField::Password => self.password.handle_event(&event),
        };
    }

    /// Insert pasted text into the given field at the cursor. Newlines make
    /// no sense in either field, so they're dropped.
    pub fn paste(&mut self, field: CredentialField, text: &str) {
        let input = match field {
            CredentialField::Email => &mut self.email,
            CredentialField::Password => &mut self.password,
        };

        for c in text.chars().filter(|c| *c != '\n' && *c != '\r') {
            input.handle(InputRequest::InsertChar(c));
        }
    }
}
