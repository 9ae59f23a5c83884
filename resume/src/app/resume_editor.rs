use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// A multi-line text box for pasting or typing a resume. Editing only
/// happens at the end of the text, which is all pasting needs.
#[derive(Debug, Default)]
pub struct ResumeEditor {
    text: String,
}

impl ResumeEditor {
    /// Current text.
    pub fn value(&self) -> &str {
        &self.text
    }

    /// Handle a key. Returns whether the text changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }

        match key.code {
            KeyCode::Char(c) => self.text.push(c),
            KeyCode::Enter => self.text.push('\n'),
            KeyCode::Backspace => return self.text.pop().is_some(),
            _ => return false,
        }

        true
    }

    /// Add pasted text to the end.
    pub fn paste(&mut self, text: &str) {
        self.text.push_str(&text.replace("\r\n", "\n"));
    }

    /// Render the text box. When `active`, scroll so the end of the text is
    /// visible and put the cursor there. Long lines wrap, so scrolling counts
    /// wrapped rows rather than lines.
    #[expect(clippy::cast_possible_truncation)]
    pub fn render(&self, area: Rect, frame: &mut Frame<'_>, active: bool) {
        let inner_width = area.width.saturating_sub(2);
        let inner_height = area.height.saturating_sub(2) as usize;

        let paragraph = Paragraph::new(self.text.as_str()).wrap(Wrap { trim: false });

        // A trailing newline starts a row that has no text on it yet.
        let rows = (paragraph.line_count(inner_width) + usize::from(self.text.ends_with('\n')))
            .max(1);
        let scroll = rows.saturating_sub(inner_height.max(1));

        let widget = paragraph.scroll((scroll as u16, 0)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Parse Resume (ctrl-s to send)")
                .border_style(if active {
                    Style::default().fg(Color::Blue)
                } else {
                    Style::default()
                }),
        );

        frame.render_widget(widget, area);

        if active && inner_width > 0 {
            let last_line = self.text.rsplit('\n').next().unwrap_or_default();
            let column = last_row_width(last_line, inner_width);

            frame.set_cursor_position((
                area.x + 1 + column.min(inner_width as usize - 1) as u16,
                area.y + 1 + (rows - 1 - scroll).min(inner_height.saturating_sub(1)) as u16,
            ));
        }
    }
}

/// How many columns the final wrapped row of `line` takes up, wrapping at
/// `width` columns.
fn last_row_width(line: &str, width: u16) -> usize {
    let width = usize::from(width);
    let len = line.chars().count();

    match len % width {
        0 if len > 0 => width,
        rem => rem,
    }
}
