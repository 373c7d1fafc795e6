//! Event handling for the application.
//!
//! Terminal input is polled and converted into application events; a tick
//! event fires when nothing happened within the poll interval so the main
//! loop can drain pending task results.

mod handler;

pub use handler::EventHandler;

use crossterm::event::KeyEvent;

/// An application-level event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    /// Nothing happened within the poll interval.
    Tick,
}
