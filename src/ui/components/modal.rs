//! Modal dialog components.
//!
//! Dialogs render as centered overlays on top of the list. Input routing is
//! the caller's job: when a dialog is visible the application forwards keys
//! to it before anything else.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Compute a centered rectangle with the given percentage size.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Outcome of a key handled by [`ConfirmDialog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// The user confirmed; carries the subject id.
    Confirm(String),
    /// The user backed out.
    Cancel,
}

/// Confirmation dialog shown before destructive actions.
#[derive(Debug, Default)]
pub struct ConfirmDialog {
    visible: bool,
    /// Id of the ticket the confirmation is about.
    subject_id: String,
    /// Name shown in the prompt.
    subject_name: String,
}

impl ConfirmDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the dialog for the given ticket.
    pub fn show(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.subject_id = id.into();
        self.subject_name = name.into();
        self.visible = true;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Handle a key press while visible.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<ConfirmAction> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') => {
                self.visible = false;
                Some(ConfirmAction::Confirm(std::mem::take(&mut self.subject_id)))
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('q') => {
                self.visible = false;
                Some(ConfirmAction::Cancel)
            }
            _ => None,
        }
    }

    /// Render the dialog as an overlay.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Confirm deletion ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let lines = vec![
            Line::from(vec![
                Span::raw("Ticket: "),
                Span::styled(
                    self.subject_name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from("Are you sure you want to delete this ticket?"),
            Line::from(""),
            Line::from(Span::styled(
                "Enter/y delete · Esc/n cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }
}

/// Modal dialog for operation failures.
#[derive(Debug, Default)]
pub struct ErrorDialog {
    visible: bool,
    title: String,
    message: String,
}

impl ErrorDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the dialog with the default title.
    pub fn show(&mut self, message: impl Into<String>) {
        self.show_message("Error", message);
    }

    /// Show the dialog with a custom title.
    pub fn show_message(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.title = title.into();
        self.message = message.into();
        self.visible = true;
    }

    /// Dismiss the dialog.
    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Handle a key press while visible; any close key dismisses.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => {
                self.dismiss();
                true
            }
            _ => false,
        }
    }

    /// Render the dialog as an overlay.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let lines = vec![
            Line::from(self.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to close",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_confirm_carries_subject_id() {
        let mut dialog = ConfirmDialog::new();
        dialog.show("17", "Printer on fire");
        assert!(dialog.is_visible());

        let action = dialog.handle_input(press(KeyCode::Enter));
        assert_eq!(action, Some(ConfirmAction::Confirm("17".to_string())));
        assert!(!dialog.is_visible());
    }

    #[test]
    fn test_cancel_closes_without_confirming() {
        let mut dialog = ConfirmDialog::new();
        dialog.show("17", "Printer on fire");

        let action = dialog.handle_input(press(KeyCode::Esc));
        assert_eq!(action, Some(ConfirmAction::Cancel));
        assert!(!dialog.is_visible());
    }

    #[test]
    fn test_unrelated_key_keeps_dialog_open() {
        let mut dialog = ConfirmDialog::new();
        dialog.show("17", "Printer on fire");

        assert_eq!(dialog.handle_input(press(KeyCode::Char('z'))), None);
        assert!(dialog.is_visible());
    }

    #[test]
    fn test_error_dialog_dismiss() {
        let mut dialog = ErrorDialog::new();
        dialog.show("Failed to update ticket");
        assert!(dialog.is_visible());

        assert!(dialog.handle_input(press(KeyCode::Enter)));
        assert!(!dialog.is_visible());
    }

    #[test]
    fn test_centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(50, 25, area);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);
        assert!(popup.x >= area.x && popup.y >= area.y);
    }
}
