//! Ticket list view.
//!
//! Renders the ticket collection as a table with a completion glyph, the
//! short description, and the creation time. Rows are rebuilt from scratch
//! on every render; the view itself only owns the selection.

use jiff::Timestamp;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::api::Ticket;

/// Glyph shown in the status column.
pub fn status_glyph(ticket: &Ticket) -> &'static str {
    if ticket.status {
        "[✓]"
    } else {
        "[ ]"
    }
}

/// Format a millisecond creation timestamp for display.
///
/// Unset timestamps (the normalization default) render as a dash.
pub fn format_created(created: i64) -> String {
    if created <= 0 {
        return "—".to_string();
    }
    match Timestamp::from_millisecond(created) {
        Ok(ts) => ts.strftime("%Y-%m-%d %H:%M").to_string(),
        Err(_) => "—".to_string(),
    }
}

/// The cells of one list row.
pub fn row_cells(ticket: &Ticket) -> [String; 3] {
    [
        status_glyph(ticket).to_string(),
        ticket.name.clone(),
        format_created(ticket.created),
    ]
}

/// The ticket list view.
#[derive(Debug, Default)]
pub struct TicketListView {
    /// Currently selected row.
    selected: usize,
    /// Whether a list fetch is in flight.
    loading: bool,
}

impl TicketListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Move the selection down, wrapping at the end.
    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the selection up, wrapping at the start.
    pub fn select_prev(&mut self, len: usize) {
        if len > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(len - 1);
        }
    }

    /// Keep the selection in range after the list changed.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// The ticket under the selection, if any.
    pub fn selected_ticket<'a>(&self, tickets: &'a [Ticket]) -> Option<&'a Ticket> {
        tickets.get(self.selected)
    }

    /// Render the list into the given area.
    pub fn render(&self, frame: &mut Frame, area: Rect, tickets: &[Ticket]) {
        let block = Block::default().title(" Tickets ").borders(Borders::ALL);

        if self.loading {
            let paragraph = Paragraph::new("Loading tickets...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        if tickets.is_empty() {
            let paragraph = Paragraph::new("No tickets yet. Press 'a' to add one.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let rows = tickets.iter().map(|ticket| {
            let [glyph, name, created] = row_cells(ticket);
            let style = if ticket.status {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            Row::new(vec![glyph, name, created]).style(style)
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(3),
                Constraint::Min(20),
                Constraint::Length(16),
            ],
        )
        .header(
            Row::new(vec!["", "Name", "Created"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .block(block);

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }
}
