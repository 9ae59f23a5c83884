/// Things that can happen to the app
mod action;
pub use action::Action;

/// Side effects the app asks the shell to perform
mod effect;
pub use effect::{Effect, EffectContext};

/// Email and password fields
mod credentials_form;
use credentials_form::{CredentialField, CredentialsForm};

/// Multi-line resume text box
mod resume_editor;
use resume_editor::ResumeEditor;

/// Things drawn over the forms
mod popover;
use popover::Popover;

use crate::form_fields;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use resume_core::session::{LastResult, Operation, Session};
use std::process::ExitCode;

/// How many rows page up/down move the response pane.
const RESULT_PAGE: usize = 10;

form_fields!(Focus, Email, Password, Resume);

impl Focus {
    /// The credential field this focus corresponds to, if any.
    fn credential(self) -> Option<CredentialField> {
        match self {
            Focus::Email => Some(CredentialField::Email),
            Focus::Password => Some(CredentialField::Password),
            Focus::Resume => None,
        }
    }
}

/// The "functional core" of the app.
pub struct App {
    /// Credentials, token, and the last result from the server
    session: Session,

    /// Login fields
    credentials: CredentialsForm,

    /// Resume text box. Only reachable once logged in.
    resume: ResumeEditor,

    /// Which field receives typing
    focus: Focus,

    /// What's drawn on top, if anything
    popover: Option<Popover>,

    /// How far down the response pane is scrolled. Reset whenever a new
    /// result arrives.
    result_scroll: usize,

    /// Status to display instead of the usual summary (visible at the bottom
    /// of the screen)
    status_line: Option<String>,

    /// Set when we want to quit
    exit: Option<ExitCode>,
}

impl App {
    /// Create a new instance of the app talking to `server`
    pub fn new(server: String) -> Self {
        Self {
            session: Session::new(server),
            credentials: CredentialsForm::default(),
            resume: ResumeEditor::default(),
            focus: Focus::Email,
            popover: None,
            result_scroll: 0,
            status_line: None,
            exit: None,
        }
    }

    /// Render the app's UI to the screen
    pub fn render(&mut self, frame: &mut Frame) {
        let parse_available = self.session.parse_available();

        let vertical = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(CredentialsForm::HEIGHT),
            if parse_available {
                Constraint::Percentage(40)
            } else {
                Constraint::Length(3)
            },
            Constraint::Min(3),
            Constraint::Length(1),
        ]);
        let [header_area, credentials_area, resume_area, result_area, status_area] =
            vertical.areas(frame.area());

        frame.render_widget(
            Paragraph::new("AI Resume Agent")
                .bold()
                .fg(Color::Indexed(54))
                .alignment(Alignment::Center),
            header_area,
        );

        self.credentials
            .render(credentials_area, frame, self.focus.credential());

        if parse_available {
            self.resume
                .render(resume_area, frame, self.focus == Focus::Resume);
        } else {
            frame.render_widget(
                Paragraph::new("Log in to parse a resume.")
                    .fg(Color::DarkGray)
                    .block(Block::default().borders(Borders::ALL)),
                resume_area,
            );
        }

        self.render_result(result_area, frame);

        let status = Paragraph::new(match &self.status_line {
            Some(line) => line.clone(),
            None => self.summary(),
        });
        frame.render_widget(status, status_area);

        if let Some(popover) = self.popover {
            let area = frame.area();
            popover.render(frame, area);
        }
    }

    /// The response pane: an error, the pretty-printed JSON, or nothing.
    /// Long responses wrap and can be scrolled with page up/down.
    #[expect(clippy::cast_possible_truncation)]
    fn render_result(&mut self, area: Rect, frame: &mut Frame) {
        let paragraph = match self.session.last_result() {
            LastResult::None => Paragraph::new("Nothing yet.").fg(Color::DarkGray),
            LastResult::Error(message) => Paragraph::new(Line::from(vec![
                Span::from("Error: ").bold(),
                Span::from(message.clone()),
            ]))
            .fg(Color::Red),
            LastResult::Response(body) => Paragraph::new(
                serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string()),
            ),
        }
        .wrap(Wrap { trim: false });

        let inner_width = area.width.saturating_sub(2);
        let inner_height = area.height.saturating_sub(2) as usize;
        let rows = paragraph.line_count(inner_width);
        self.result_scroll = self.result_scroll.min(rows.saturating_sub(inner_height));

        let title = if rows > inner_height {
            "Response (pgup/pgdn to scroll)"
        } else {
            "Response"
        };

        frame.render_widget(
            paragraph
                .scroll((self.result_scroll as u16, 0))
                .block(Block::default().borders(Borders::ALL).title(title)),
            area,
        );
    }

    /// What to show in the status line when nothing more urgent is going on.
    fn summary(&self) -> String {
        let mut parts = vec![format!("Connected to: {}", self.session.server())];

        if let Some(preview) = self.session.token_preview() {
            parts.push(format!("Token: {preview}"));
        }

        let in_flight: Vec<&str> = self.session.in_flight().map(Operation::label).collect();
        if !in_flight.is_empty() {
            parts.push(format!("{}…", in_flight.join(", ")));
        }

        parts.push("F1 for help".to_owned());

        parts.join(" · ")
    }

    /// Handle an `Action`, updating the app's state and producing some side effect(s)
    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Key(key) => self.handle_key(key),

            Action::Paste(text) => {
                match self.focus.credential() {
                    Some(field) => {
                        self.credentials.paste(field, &text);
                        self.sync_credentials();
                    }
                    None => {
                        self.resume.paste(&text);
                        self.session.set_resume_text(self.resume.value().to_owned());
                    }
                }

                vec![]
            }

            Action::Problem(problem) => {
                self.status_line = Some(problem);

                vec![]
            }

            Action::Succeeded(op, body) => {
                self.session.call_succeeded(op, body);
                self.status_line = None;
                self.result_scroll = 0;

                vec![]
            }

            Action::LoggedIn(logged_in) => {
                self.session.auth_succeeded(logged_in.token, logged_in.body);
                self.status_line = None;
                self.result_scroll = 0;

                if self.session.parse_available() {
                    tracing::debug!("logged in, moving to resume");
                    self.focus = Focus::Resume;
                }

                vec![]
            }

            Action::Failed(op, message) => {
                self.session.call_failed(op, message);
                self.status_line = None;
                self.result_scroll = 0;

                vec![]
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.kind != KeyEventKind::Press {
            return vec![];
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if self.popover.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
                self.popover = None;
            } else if ctrl && key.code == KeyCode::Char('c') {
                self.exit = Some(ExitCode::SUCCESS);
            }

            return vec![];
        }

        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.exit = Some(ExitCode::SUCCESS);
                vec![]
            }
            KeyCode::Esc => {
                self.exit = Some(ExitCode::SUCCESS);
                vec![]
            }
            KeyCode::F(1) => {
                self.popover = Some(Popover::Help);
                vec![]
            }
            KeyCode::PageDown => {
                self.result_scroll += RESULT_PAGE;
                vec![]
            }
            KeyCode::PageUp => {
                self.result_scroll = self.result_scroll.saturating_sub(RESULT_PAGE);
                vec![]
            }
            KeyCode::Char('r') if ctrl => self.start(Operation::Register),
            KeyCode::Char('l') if ctrl => self.start(Operation::Authenticate),
            KeyCode::Char('s' | 'p') if ctrl => self.start(Operation::SubmitResumeText),
            KeyCode::Enter if self.focus != Focus::Resume => self.start(Operation::Authenticate),
            KeyCode::Tab => {
                let available = self.session.parse_available();
                self.focus = self
                    .focus
                    .next_where(|focus| available || focus != Focus::Resume);
                vec![]
            }
            KeyCode::BackTab => {
                let available = self.session.parse_available();
                self.focus = self
                    .focus
                    .prev_where(|focus| available || focus != Focus::Resume);
                vec![]
            }
            _ => {
                match self.focus.credential() {
                    Some(field) => {
                        self.credentials.handle_event(field, key);
                        self.sync_credentials();
                    }
                    None => {
                        if self.resume.handle_key(key) {
                            self.session.set_resume_text(self.resume.value().to_owned());
                        }
                    }
                }

                vec![]
            }
        }
    }

    /// Try to start a call, explaining in the status line if we can't.
    fn start(&mut self, op: Operation) -> Vec<Effect> {
        if op == Operation::SubmitResumeText && !self.session.parse_available() {
            self.status_line = Some("Log in before parsing a resume".to_owned());
            return vec![];
        }

        match self.session.start(op) {
            Some(call) => {
                self.status_line = None;
                vec![Effect::Send(call)]
            }
            None => {
                self.status_line = Some(format!("Already {}, hang on…", op.label()));
                vec![]
            }
        }
    }

    fn sync_credentials(&mut self) {
        self.session.credentials_changed(
            self.credentials.email().to_owned(),
            self.credentials.password().to_owned(),
        );
    }

    /// Let the TUI manager know whether we're all wrapped up and can exit.
    pub fn should_exit(&self) -> Option<ExitCode> {
        self.exit
    }
}
