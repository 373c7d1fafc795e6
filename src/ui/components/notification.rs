//! Notification/toast component for user feedback.
//!
//! Transient messages (success, info, error) stacked in the top-right
//! corner; each expires after its duration.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// The type of notification, which determines its appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Info,
    Success,
    Error,
}

impl NotificationType {
    /// Get the icon for this notification type.
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationType::Info => "ℹ",
            NotificationType::Success => "✓",
            NotificationType::Error => "✗",
        }
    }

    /// Get the color for this notification type.
    pub fn color(&self) -> Color {
        match self {
            NotificationType::Info => Color::Blue,
            NotificationType::Success => Color::Green,
            NotificationType::Error => Color::Red,
        }
    }
}

/// A single notification message.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    created_at: Instant,
    duration: Duration,
}

impl Notification {
    /// Create a new notification.
    pub fn new(
        message: impl Into<String>,
        notification_type: NotificationType,
        duration: Duration,
    ) -> Self {
        Self {
            message: message.into(),
            notification_type,
            created_at: Instant::now(),
            duration,
        }
    }

    /// Create an info notification with the default duration.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Info, Duration::from_secs(3))
    }

    /// Create a success notification with the default duration.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Success, Duration::from_secs(3))
    }

    /// Create an error notification with a longer default duration.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Error, Duration::from_secs(5))
    }

    /// Check if the notification has expired.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

/// Manages a bounded queue of notifications.
#[derive(Debug, Default)]
pub struct NotificationManager {
    notifications: VecDeque<Notification>,
}

/// Maximum number of simultaneously visible notifications.
const MAX_VISIBLE: usize = 3;

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notification, dropping the oldest past the visible limit.
    pub fn push(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
        while self.notifications.len() > MAX_VISIBLE {
            self.notifications.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Notification::info(message));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification::success(message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notification::error(message));
    }

    /// Drop expired notifications. Called from the main loop on tick.
    pub fn tick(&mut self) {
        self.notifications.retain(|n| !n.is_expired());
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Render the active notifications stacked in the top-right corner.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut y = area.y;
        for notification in &self.notifications {
            let text = format!(
                " {} {} ",
                notification.notification_type.icon(),
                notification.message
            );
            let width = (text.chars().count() as u16 + 2).min(area.width);
            let rect = Rect::new(area.right().saturating_sub(width), y, width, 3);
            if rect.bottom() > area.bottom() {
                break;
            }

            frame.render_widget(Clear, rect);
            let paragraph = Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(notification.notification_type.color())),
            );
            frame.render_widget(paragraph, rect);
            y += 3;
        }
    }
}
