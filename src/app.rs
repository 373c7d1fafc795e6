//! Main application state and event loop.
//!
//! The coordinator: owns the views, dispatches key events to gateway calls
//! via spawned tasks, and applies completed task results back to the view
//! state. The state machine is deliberately trivial — the list is always
//! there, and at most one modal (form, confirmation, or error dialog) sits
//! on top of it; modal visibility decides where keys are routed.

use std::io;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::{debug, info};

use crate::api::{HttpTransport, Ticket, TicketGateway, TicketPatch};
use crate::cache::{FileStore, TicketCache};
use crate::config::{Config, RefreshPolicy};
use crate::error::{AppError, Result};
use crate::events::{Event, EventHandler};
use crate::tasks::{self, ApiMessage, TaskSpawner};
use crate::ui::{
    ConfirmAction, ConfirmDialog, ErrorDialog, FormAction, FormSubmit, NotificationManager,
    TicketFormView, TicketListView,
};

/// The main application struct that holds all view state.
pub struct App {
    should_quit: bool,
    /// The tickets currently rendered. Replaced wholesale on every refresh.
    tickets: Vec<Ticket>,
    list_view: TicketListView,
    form: TicketFormView,
    confirm: ConfirmDialog,
    error_dialog: ErrorDialog,
    notifications: NotificationManager,
    /// Render policy for the ticket list.
    refresh: RefreshPolicy,
}

impl App {
    /// Create a new application instance.
    pub fn new(refresh: RefreshPolicy) -> Self {
        Self {
            should_quit: false,
            tickets: Vec::new(),
            list_view: TicketListView::new(),
            form: TicketFormView::new(),
            confirm: ConfirmDialog::new(),
            error_dialog: ErrorDialog::new(),
            notifications: NotificationManager::new(),
            refresh,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The tickets currently rendered.
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Re-render the ticket list through the configured policy.
    ///
    /// With `prefer-cache` (and no `force`) an existing snapshot is rendered
    /// directly — stale data over a round trip. Otherwise a fetch is
    /// spawned; its result becomes the new snapshot.
    pub fn refresh_tickets(
        &mut self,
        gateway: &Arc<TicketGateway>,
        spawner: &TaskSpawner,
        force: bool,
    ) {
        if !force && self.refresh == RefreshPolicy::PreferCache {
            if let Some(cached) = gateway.snapshot() {
                debug!(count = cached.len(), "rendering tickets from snapshot");
                self.set_tickets(cached);
                return;
            }
        }
        self.list_view.set_loading(true);
        spawner.spawn_list(gateway);
    }

    fn set_tickets(&mut self, tickets: Vec<Ticket>) {
        self.list_view.clamp(tickets.len());
        self.list_view.set_loading(false);
        self.tickets = tickets;
    }

    /// Apply a completed background task result.
    pub fn apply(&mut self, message: ApiMessage, gateway: &Arc<TicketGateway>, spawner: &TaskSpawner) {
        match message {
            ApiMessage::TicketsFetched(tickets) => {
                gateway.store_snapshot(&tickets);
                self.set_tickets(tickets);
            }
            ApiMessage::TicketFetched {
                ticket: Some(ticket),
                ..
            } => {
                self.form.open_edit(&ticket);
            }
            // The gateway already reported the failure through the sink.
            ApiMessage::TicketFetched { ticket: None, .. } => {}
            ApiMessage::TicketCreated(Some(ticket)) => {
                self.notifications
                    .success(format!("Ticket '{}' created", ticket.name));
                self.refresh_tickets(gateway, spawner, false);
            }
            ApiMessage::TicketCreated(None) => {}
            ApiMessage::TicketUpdated {
                outcome: Some(()), ..
            } => {
                self.notifications.success("Ticket updated");
                self.refresh_tickets(gateway, spawner, false);
            }
            ApiMessage::TicketUpdated { outcome: None, .. } => {}
            ApiMessage::TicketDeleted {
                outcome: Some(()), ..
            } => {
                self.notifications.success("Ticket deleted");
                self.refresh_tickets(gateway, spawner, false);
            }
            ApiMessage::TicketDeleted { outcome: None, .. } => {}
            ApiMessage::OperationFailed(message) => {
                self.error_dialog.show(message);
            }
        }
    }

    /// Route a key press to the topmost modal, or to the list.
    pub fn handle_key(&mut self, key: KeyEvent, gateway: &Arc<TicketGateway>, spawner: &TaskSpawner) {
        if self.error_dialog.is_visible() {
            self.error_dialog.handle_input(key);
            return;
        }

        if self.confirm.is_visible() {
            if let Some(ConfirmAction::Confirm(id)) = self.confirm.handle_input(key) {
                spawner.spawn_delete(gateway, id);
            }
            return;
        }

        if self.form.is_visible() {
            match self.form.handle_input(key) {
                Some(FormAction::Submit(FormSubmit::Create(draft))) => {
                    spawner.spawn_create(gateway, draft);
                }
                Some(FormAction::Submit(FormSubmit::Update { id, patch })) => {
                    spawner.spawn_update(gateway, id, patch);
                }
                Some(FormAction::Cancel) | None => {}
            }
            return;
        }

        let selected = self.list_view.selected_ticket(&self.tickets).cloned();
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('a') => {
                self.form.open_create();
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                // Edit works from a fresh fetch, not the rendered row.
                if let Some(ticket) = selected {
                    spawner.spawn_get(gateway, ticket.id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(ticket) = selected {
                    self.confirm.show(ticket.id, ticket.name);
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                if let Some(ticket) = selected {
                    spawner.spawn_update(gateway, ticket.id, TicketPatch::status(!ticket.status));
                }
            }
            KeyCode::Char('r') => {
                self.refresh_tickets(gateway, spawner, true);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.list_view.select_next(self.tickets.len());
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.list_view.select_prev(self.tickets.len());
            }
            _ => {}
        }
    }

    /// Advance time-based state (toast expiry).
    pub fn tick(&mut self) {
        self.notifications.tick();
    }

    /// Render the whole frame.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        self.list_view.render(frame, chunks[0], &self.tickets);

        let help = Paragraph::new(
            "a add · e edit · d delete · space toggle · r refresh · j/k move · q quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[1]);

        self.form.render(frame, area);
        self.confirm.render(frame, area);
        self.error_dialog.render(frame, area);
        self.notifications.render(frame, area);
    }
}

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().map_err(|e| AppError::terminal(e.to_string()))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| AppError::terminal(e.to_string()))?;
    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| AppError::terminal(e.to_string()))
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(|e| AppError::terminal(e.to_string()))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| AppError::terminal(e.to_string()))?;
    terminal
        .show_cursor()
        .map_err(|e| AppError::terminal(e.to_string()))
}

/// Run the application until the user quits.
///
/// Wires the gateway's error sink into the task channel, sets the terminal
/// up, and drives the event loop.
pub async fn run(config: Config, clear_cache: bool) -> Result<()> {
    let (rx, spawner) = tasks::create_task_channel();

    let transport = Arc::new(HttpTransport::new()?);
    let store = FileStore::new()?;
    let gateway = Arc::new(TicketGateway::new(
        transport,
        TicketCache::new(Box::new(store)),
        &config.settings.server_url,
        spawner.error_sink(),
    ));

    if clear_cache {
        gateway.clear_snapshot();
    }

    info!(server_url = %config.settings.server_url, "starting event loop");
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, config, gateway, rx, spawner).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut Tui,
    config: Config,
    gateway: Arc<TicketGateway>,
    mut rx: tokio::sync::mpsc::UnboundedReceiver<ApiMessage>,
    spawner: TaskSpawner,
) -> Result<()> {
    let mut app = App::new(config.settings.refresh);
    let events = EventHandler::new();

    app.refresh_tickets(&gateway, &spawner, false);

    while !app.should_quit() {
        terminal.draw(|frame| app.render(frame))?;

        while let Ok(message) = rx.try_recv() {
            app.apply(message, &gateway, &spawner);
        }

        match events.next()? {
            Event::Key(key) => app.handle_key(key, &gateway, &spawner),
            Event::Resize(_, _) => {}
            Event::Tick => app.tick(),
        }
    }

    Ok(())
}
