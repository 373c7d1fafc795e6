//! Domain operations against the ticket service.
//!
//! [`TicketGateway`] translates list/get/create/update/delete into backend
//! requests and reconciles the persisted snapshot after each mutation. It
//! never raises: a failed operation reports a human-readable message exactly
//! once through the injected error sink and resolves to `None`, and `list`
//! inherits the transport's empty-on-failure behavior — an unreachable
//! backend is indistinguishable from an empty ticket collection, a known
//! limitation preserved from the system this client replaces.

use std::sync::Arc;

use tracing::{debug, warn};

use super::error::ApiError;
use super::transport::{RequestOptions, Transport};
use super::types::{Ticket, TicketDraft, TicketPatch};
use crate::cache::TicketCache;

/// Callback receiving a human-readable message for every failed operation.
///
/// The gateway never decides how errors are displayed, only that each
/// failing operation is reported exactly once.
pub type ErrorSink = Arc<dyn Fn(String) + Send + Sync>;

/// Gateway between the UI and the ticket service.
pub struct TicketGateway {
    transport: Arc<dyn Transport>,
    cache: TicketCache,
    base_url: String,
    error_sink: ErrorSink,
}

impl TicketGateway {
    pub fn new(
        transport: Arc<dyn Transport>,
        cache: TicketCache,
        base_url: impl Into<String>,
        error_sink: ErrorSink,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            cache,
            base_url,
            error_sink,
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/?method={}", self.base_url, method)
    }

    fn endpoint_with_id(&self, method: &str, id: &str) -> String {
        format!(
            "{}/?method={}&id={}",
            self.base_url,
            method,
            urlencoding::encode(id)
        )
    }

    fn report(&self, context: &str, error: &ApiError) {
        warn!(context, error = %error, "ticket operation failed");
        (self.error_sink)(format!("{context}: {error}"));
    }

    /// Fetch the full ticket collection.
    ///
    /// Never fails outward: records that do not normalize are dropped, and a
    /// failed round trip yields an empty list. The snapshot is not touched;
    /// the caller decides when a fetched list becomes the new snapshot.
    pub async fn list(&self) -> Vec<Ticket> {
        let value = self
            .transport
            .request(RequestOptions::get(self.endpoint("allTickets")))
            .await;
        let tickets = Ticket::from_collection(&value);
        debug!(count = tickets.len(), "fetched ticket list");
        tickets
    }

    /// Fetch a single ticket by id.
    pub async fn get(&self, id: &str) -> Option<Ticket> {
        let value = self
            .transport
            .request(RequestOptions::get(self.endpoint_with_id("ticketById", id)))
            .await;

        match Ticket::from_value(&value) {
            Some(ticket) => Some(ticket),
            None => {
                self.report("Failed to load ticket", &ApiError::NoMatch(id.to_string()));
                None
            }
        }
    }

    /// Create a ticket.
    ///
    /// On success the returned record is appended to the snapshot. On
    /// failure (response missing an `id`, or a failed round trip) the sink
    /// is invoked and the snapshot is left untouched.
    pub async fn create(&self, draft: &TicketDraft) -> Option<Ticket> {
        let body = serde_json::to_value(draft).unwrap_or_default();
        let value = self
            .transport
            .request(RequestOptions::post(self.endpoint("createTicket"), Some(body)))
            .await;

        match Ticket::from_value(&value) {
            Some(ticket) => {
                if let Err(e) = self.cache.append(&ticket) {
                    warn!(error = %e, "failed to persist created ticket");
                }
                debug!(id = %ticket.id, "created ticket");
                Some(ticket)
            }
            None => {
                self.report("Failed to create ticket", &ApiError::MissingId);
                None
            }
        }
    }

    /// Apply a partial update.
    ///
    /// The backend responds with the full updated collection. The response
    /// must be an array containing a record matching `id`; that record
    /// replaces the cached entry in place. Anything else is a failure that
    /// leaves the snapshot unchanged.
    pub async fn update(&self, id: &str, patch: &TicketPatch) -> Option<()> {
        let body = serde_json::to_value(patch).unwrap_or_default();
        let value = self
            .transport
            .request(RequestOptions::post(
                self.endpoint_with_id("updateById", id),
                Some(body),
            ))
            .await;

        let Some(records) = value.as_array() else {
            self.report("Failed to update ticket", &ApiError::MalformedResponse);
            return None;
        };

        let Some(updated) = records
            .iter()
            .filter_map(Ticket::from_value)
            .find(|t| t.id == id)
        else {
            self.report("Failed to update ticket", &ApiError::NoMatch(id.to_string()));
            return None;
        };

        if let Err(e) = self.cache.replace(&updated) {
            warn!(error = %e, "failed to persist updated ticket");
        }
        debug!(id = %updated.id, "updated ticket");
        Some(())
    }

    /// Delete a ticket.
    ///
    /// The backend responds with the remaining collection; every cached
    /// entry with a matching id is removed. Deleting an id that is no longer
    /// cached fails without touching the snapshot.
    pub async fn delete(&self, id: &str) -> Option<()> {
        let value = self
            .transport
            .request(RequestOptions::post(
                self.endpoint_with_id("deleteById", id),
                None,
            ))
            .await;

        let Some(records) = value.as_array() else {
            self.report("Failed to delete ticket", &ApiError::MalformedResponse);
            return None;
        };

        let cached = self.cache.load().unwrap_or_default();
        if !cached.iter().any(|t| t.id == id) {
            self.report("Failed to delete ticket", &ApiError::NoMatch(id.to_string()));
            return None;
        }

        // An empty response is either a failed round trip or a genuinely
        // emptied collection; trust it only when the snapshot agrees.
        if records.is_empty() && cached.iter().any(|t| t.id != id) {
            self.report("Failed to delete ticket", &ApiError::MalformedResponse);
            return None;
        }

        match self.cache.remove(id) {
            Ok(_) => {
                debug!(%id, "deleted ticket");
                Some(())
            }
            Err(e) => {
                warn!(error = %e, "failed to persist deletion");
                Some(())
            }
        }
    }

    /// The current snapshot, if one exists.
    pub fn snapshot(&self) -> Option<Vec<Ticket>> {
        self.cache.load()
    }

    /// Overwrite the snapshot with a freshly fetched collection.
    pub fn store_snapshot(&self, tickets: &[Ticket]) {
        if let Err(e) = self.cache.save(tickets) {
            warn!(error = %e, "failed to persist ticket snapshot");
        }
    }

    /// Drop the snapshot entirely.
    pub fn clear_snapshot(&self) {
        if let Err(e) = self.cache.clear() {
            warn!(error = %e, "failed to clear ticket snapshot");
        }
    }
}
