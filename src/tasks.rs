//! Async task management for non-blocking backend operations.
//!
//! Every gateway call runs in a background tokio task so the UI stays
//! responsive. Results come back to the main event loop as [`ApiMessage`]
//! values over an unbounded mpsc channel polled with `try_recv()`. Each
//! operation posts exactly one completion message; failure details travel
//! separately through the gateway's error sink, which is itself wired to
//! this channel via [`TaskSpawner::error_sink`].

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::{ErrorSink, Ticket, TicketDraft, TicketGateway, TicketPatch};

/// Messages sent from background tasks to the main event loop.
#[derive(Debug)]
pub enum ApiMessage {
    /// Full ticket list fetch completed.
    TicketsFetched(Vec<Ticket>),

    /// Single ticket fetch completed (for opening the edit form).
    TicketFetched {
        id: String,
        ticket: Option<Ticket>,
    },

    /// Create completed; `None` means the failure was already reported.
    TicketCreated(Option<Ticket>),

    /// Update completed.
    TicketUpdated {
        id: String,
        outcome: Option<()>,
    },

    /// Delete completed.
    TicketDeleted {
        id: String,
        outcome: Option<()>,
    },

    /// A failing operation reported through the error sink.
    OperationFailed(String),
}

/// Spawns background tasks for backend operations.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<ApiMessage>,
}

impl TaskSpawner {
    /// Create a new spawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<ApiMessage>) -> Self {
        Self { tx }
    }

    /// An error sink that forwards gateway failure messages to the main
    /// loop as [`ApiMessage::OperationFailed`].
    pub fn error_sink(&self) -> ErrorSink {
        let tx = self.tx.clone();
        Arc::new(move |message| {
            let _ = tx.send(ApiMessage::OperationFailed(message));
        })
    }

    /// Spawn a task to fetch the full ticket list.
    pub fn spawn_list(&self, gateway: &Arc<TicketGateway>) {
        let tx = self.tx.clone();
        let gateway = Arc::clone(gateway);
        tokio::spawn(async move {
            let tickets = gateway.list().await;
            let _ = tx.send(ApiMessage::TicketsFetched(tickets));
        });
    }

    /// Spawn a task to fetch a single ticket.
    pub fn spawn_get(&self, gateway: &Arc<TicketGateway>, id: String) {
        let tx = self.tx.clone();
        let gateway = Arc::clone(gateway);
        tokio::spawn(async move {
            let ticket = gateway.get(&id).await;
            let _ = tx.send(ApiMessage::TicketFetched { id, ticket });
        });
    }

    /// Spawn a task to create a ticket.
    pub fn spawn_create(&self, gateway: &Arc<TicketGateway>, draft: TicketDraft) {
        let tx = self.tx.clone();
        let gateway = Arc::clone(gateway);
        tokio::spawn(async move {
            let created = gateway.create(&draft).await;
            let _ = tx.send(ApiMessage::TicketCreated(created));
        });
    }

    /// Spawn a task to apply a partial update.
    pub fn spawn_update(&self, gateway: &Arc<TicketGateway>, id: String, patch: TicketPatch) {
        let tx = self.tx.clone();
        let gateway = Arc::clone(gateway);
        tokio::spawn(async move {
            let outcome = gateway.update(&id, &patch).await;
            let _ = tx.send(ApiMessage::TicketUpdated { id, outcome });
        });
    }

    /// Spawn a task to delete a ticket.
    pub fn spawn_delete(&self, gateway: &Arc<TicketGateway>, id: String) {
        let tx = self.tx.clone();
        let gateway = Arc::clone(gateway);
        tokio::spawn(async move {
            let outcome = gateway.delete(&id).await;
            let _ = tx.send(ApiMessage::TicketDeleted { id, outcome });
        });
    }
}

/// Create a new task channel and spawner.
///
/// The receiver is polled in the main event loop; the spawner is used to
/// launch background operations.
pub fn create_task_channel() -> (mpsc::UnboundedReceiver<ApiMessage>, TaskSpawner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_sink_forwards_to_channel() {
        let (mut rx, spawner) = create_task_channel();
        let sink = spawner.error_sink();

        sink("something broke".to_string());

        match rx.try_recv() {
            Ok(ApiMessage::OperationFailed(msg)) => assert_eq!(msg, "something broke"),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawned_list_posts_exactly_one_message() {
        use crate::api::{testing::ScriptedTransport, TicketGateway};
        use crate::cache::{MemoryStore, TicketCache};

        let (mut rx, spawner) = create_task_channel();
        let gateway = Arc::new(TicketGateway::new(
            Arc::new(ScriptedTransport::new(vec![serde_json::json!([
                { "id": "1", "name": "A" },
            ])])),
            TicketCache::new(Box::new(MemoryStore::new())),
            "http://localhost:7070",
            spawner.error_sink(),
        ));

        spawner.spawn_list(&gateway);

        match rx.recv().await {
            Some(ApiMessage::TicketsFetched(tickets)) => assert_eq!(tickets.len(), 1),
            other => panic!("unexpected message: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }
}
