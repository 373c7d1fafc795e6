//! Ticket form view.
//!
//! Modal form for creating and editing tickets. The name is required; the
//! status checkbox only appears when editing, matching the ticket lifecycle
//! (a fresh ticket is always open). On submit the form emits either a create
//! draft or a patch of the changed fields; submitting an unchanged edit form
//! closes without issuing a request.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::api::{Ticket, TicketDraft, TicketPatch};
use crate::ui::components::{centered_rect, TextInput};

/// A focusable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Description,
    Status,
    Submit,
}

/// Actions returned from the form view.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    /// Close the form without submitting.
    Cancel,
    /// Submit the form.
    Submit(FormSubmit),
}

/// The payload produced by a submitted form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormSubmit {
    /// Create a new ticket.
    Create(TicketDraft),
    /// Patch an existing ticket with the changed fields.
    Update { id: String, patch: TicketPatch },
}

/// The create/edit ticket form.
#[derive(Debug, Default)]
pub struct TicketFormView {
    visible: bool,
    /// The ticket being edited; `None` in create mode.
    original: Option<Ticket>,
    name_input: TextInput,
    description_input: TextInput,
    status: bool,
    focus_index: usize,
    /// Validation message shown under the fields.
    error: Option<String>,
}

/// Focus order in create mode.
const CREATE_FIELDS: [FormField; 3] = [FormField::Name, FormField::Description, FormField::Submit];
/// Focus order in edit mode.
const EDIT_FIELDS: [FormField; 4] = [
    FormField::Name,
    FormField::Description,
    FormField::Status,
    FormField::Submit,
];

impl TicketFormView {
    pub fn new() -> Self {
        let mut form = Self::default();
        form.name_input.set_placeholder("Short description");
        form.description_input.set_placeholder("Details (optional)");
        form
    }

    /// Open the form empty, in create mode.
    pub fn open_create(&mut self) {
        self.reset();
        self.visible = true;
    }

    /// Open the form prefilled from an existing ticket, in edit mode.
    pub fn open_edit(&mut self, ticket: &Ticket) {
        self.reset();
        self.name_input.set_value(&ticket.name);
        self.description_input.set_value(&ticket.description);
        self.status = ticket.status;
        self.original = Some(ticket.clone());
        self.visible = true;
    }

    fn reset(&mut self) {
        self.name_input.clear();
        self.description_input.clear();
        self.status = false;
        self.original = None;
        self.focus_index = 0;
        self.error = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_edit(&self) -> bool {
        self.original.is_some()
    }

    fn fields(&self) -> &'static [FormField] {
        if self.is_edit() {
            &EDIT_FIELDS
        } else {
            &CREATE_FIELDS
        }
    }

    fn focus(&self) -> FormField {
        self.fields()[self.focus_index]
    }

    fn focus_next(&mut self) {
        self.focus_index = (self.focus_index + 1) % self.fields().len();
    }

    fn focus_prev(&mut self) {
        let len = self.fields().len();
        self.focus_index = self.focus_index.checked_sub(1).unwrap_or(len - 1);
    }

    /// Handle a key press while visible.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<FormAction> {
        match key.code {
            KeyCode::Esc => {
                self.visible = false;
                Some(FormAction::Cancel)
            }
            KeyCode::Tab => {
                self.focus_next();
                None
            }
            KeyCode::BackTab => {
                self.focus_prev();
                None
            }
            KeyCode::Enter => match self.focus() {
                FormField::Submit => self.submit(),
                FormField::Status => {
                    self.status = !self.status;
                    None
                }
                _ => {
                    self.focus_next();
                    None
                }
            },
            KeyCode::Char(' ') if self.focus() == FormField::Status => {
                self.status = !self.status;
                None
            }
            _ => {
                match self.focus() {
                    FormField::Name => {
                        if self.name_input.handle_input(key) {
                            self.error = None;
                        }
                    }
                    FormField::Description => {
                        self.description_input.handle_input(key);
                    }
                    FormField::Status | FormField::Submit => {}
                }
                None
            }
        }
    }

    fn submit(&mut self) -> Option<FormAction> {
        let name = self.name_input.value().trim().to_string();
        if name.is_empty() {
            self.error = Some("Name is required".to_string());
            return None;
        }
        let description = self.description_input.value().to_string();

        let submit = match self.original.take() {
            None => FormSubmit::Create(TicketDraft::new(name, description)),
            Some(original) => {
                let patch = TicketPatch {
                    name: (name != original.name).then_some(name),
                    description: (description != original.description).then_some(description),
                    status: (self.status != original.status).then_some(self.status),
                };
                if patch.is_empty() {
                    self.visible = false;
                    return Some(FormAction::Cancel);
                }
                FormSubmit::Update {
                    id: original.id,
                    patch,
                }
            }
        };

        self.visible = false;
        Some(FormAction::Submit(submit))
    }

    /// Render the form as an overlay.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let title = if self.is_edit() {
            " Edit ticket "
        } else {
            " New ticket "
        };

        let popup = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup);

        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        self.name_input
            .render(frame, rows[0], "Name", self.focus() == FormField::Name);
        self.description_input.render(
            frame,
            rows[1],
            "Description",
            self.focus() == FormField::Description,
        );

        if self.is_edit() {
            let glyph = if self.status { "[✓]" } else { "[ ]" };
            let style = if self.focus() == FormField::Status {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            frame.render_widget(
                Paragraph::new(format!("{} Completed (space to toggle)", glyph)).style(style),
                rows[2],
            );
        }

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    error.clone(),
                    Style::default().fg(Color::Red),
                )),
                rows[3],
            );
        }

        let submit_style = if self.focus() == FormField::Submit {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let footer = Paragraph::new(vec![
            Line::from(Span::styled(" [ Save ] ", submit_style)),
            Line::from(Span::styled(
                "Tab next field · Enter submit · Esc cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ]);
        frame.render_widget(footer, rows[5]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut TicketFormView, s: &str) {
        for c in s.chars() {
            form.handle_input(press(KeyCode::Char(c)));
        }
    }

    fn focus_submit(form: &mut TicketFormView) {
        while form.focus() != FormField::Submit {
            form.handle_input(press(KeyCode::Tab));
        }
    }

    fn ticket(id: &str, name: &str, description: &str, status: bool) -> Ticket {
        Ticket {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            status,
            created: 0,
        }
    }

    #[test]
    fn test_create_mode_skips_status_field() {
        let mut form = TicketFormView::new();
        form.open_create();
        assert!(!form.fields().contains(&FormField::Status));

        form.open_edit(&ticket("1", "A", "", false));
        assert!(form.fields().contains(&FormField::Status));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut form = TicketFormView::new();
        form.open_create();
        focus_submit(&mut form);

        let action = form.handle_input(press(KeyCode::Enter));
        assert_eq!(action, None);
        assert!(form.is_visible());
        assert!(form.error.is_some());
    }

    #[test]
    fn test_whitespace_name_is_rejected() {
        let mut form = TicketFormView::new();
        form.open_create();
        type_str(&mut form, "   ");
        focus_submit(&mut form);

        assert_eq!(form.handle_input(press(KeyCode::Enter)), None);
        assert!(form.error.is_some());
    }

    #[test]
    fn test_create_submit_builds_draft() {
        let mut form = TicketFormView::new();
        form.open_create();
        type_str(&mut form, "Printer on fire");
        form.handle_input(press(KeyCode::Tab));
        type_str(&mut form, "Third floor");
        focus_submit(&mut form);

        let action = form.handle_input(press(KeyCode::Enter)).unwrap();
        match action {
            FormAction::Submit(FormSubmit::Create(draft)) => {
                assert_eq!(draft.name, "Printer on fire");
                assert_eq!(draft.description, "Third floor");
            }
            other => panic!("unexpected action: {:?}", other),
        }
        assert!(!form.is_visible());
    }

    #[test]
    fn test_edit_submit_patches_changed_fields_only() {
        let mut form = TicketFormView::new();
        form.open_edit(&ticket("1", "A", "old", false));

        // Flip the status, leave name and description as they were.
        while form.focus() != FormField::Status {
            form.handle_input(press(KeyCode::Tab));
        }
        form.handle_input(press(KeyCode::Char(' ')));
        focus_submit(&mut form);

        let action = form.handle_input(press(KeyCode::Enter)).unwrap();
        match action {
            FormAction::Submit(FormSubmit::Update { id, patch }) => {
                assert_eq!(id, "1");
                assert_eq!(patch.status, Some(true));
                assert!(patch.name.is_none());
                assert!(patch.description.is_none());
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_unchanged_edit_closes_without_request() {
        let mut form = TicketFormView::new();
        form.open_edit(&ticket("1", "A", "desc", true));
        focus_submit(&mut form);

        let action = form.handle_input(press(KeyCode::Enter));
        assert_eq!(action, Some(FormAction::Cancel));
        assert!(!form.is_visible());
    }

    #[test]
    fn test_escape_cancels() {
        let mut form = TicketFormView::new();
        form.open_create();
        type_str(&mut form, "half-typed");

        let action = form.handle_input(press(KeyCode::Esc));
        assert_eq!(action, Some(FormAction::Cancel));
        assert!(!form.is_visible());
    }

    #[test]
    fn test_edit_prefills_fields() {
        let mut form = TicketFormView::new();
        form.open_edit(&ticket("1", "A", "desc", true));

        assert_eq!(form.name_input.value(), "A");
        assert_eq!(form.description_input.value(), "desc");
        assert!(form.status);
    }

    #[test]
    fn test_typing_clears_validation_error() {
        let mut form = TicketFormView::new();
        form.open_create();
        focus_submit(&mut form);
        form.handle_input(press(KeyCode::Enter));
        assert!(form.error.is_some());

        form.handle_input(press(KeyCode::BackTab));
        form.handle_input(press(KeyCode::BackTab));
        assert_eq!(form.focus(), FormField::Name);
        type_str(&mut form, "x");
        assert!(form.error.is_none());
    }
}
