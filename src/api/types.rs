//! Ticket service request and response types.
//!
//! The backend returns loosely-shaped JSON records; [`Ticket`] is the stable
//! normalized form the rest of the application works with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A support ticket.
///
/// Returned by the backend either as a single record or as part of the full
/// ticket collection. Records missing optional fields normalize to the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Server-assigned identifier, immutable after creation.
    pub id: String,
    /// Short description shown in the list. Required, non-empty.
    pub name: String,
    /// Long description. Defaults to empty when the backend omits it.
    #[serde(default)]
    pub description: String,
    /// Completion status; `false` means the ticket is still open.
    #[serde(default)]
    pub status: bool,
    /// Creation time as a millisecond Unix timestamp, set by the backend.
    #[serde(default)]
    pub created: i64,
}

impl Ticket {
    /// Normalize a raw server record.
    ///
    /// Returns `None` when the record is not an object, lacks an `id` or
    /// `name`, or otherwise fails to deserialize.
    pub fn from_value(value: &Value) -> Option<Self> {
        let ticket: Ticket = serde_json::from_value(value.clone()).ok()?;
        if ticket.id.is_empty() {
            return None;
        }
        Some(ticket)
    }

    /// Normalize a full server collection, dropping records that do not parse.
    ///
    /// A value that is not an array yields an empty list.
    pub fn from_collection(value: &Value) -> Vec<Self> {
        value
            .as_array()
            .map(|records| records.iter().filter_map(Ticket::from_value).collect())
            .unwrap_or_default()
    }
}

/// Fields submitted when creating a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketDraft {
    /// Short description. Required, non-empty.
    pub name: String,
    /// Long description, may be empty.
    pub description: String,
}

impl TicketDraft {
    /// Create a draft from form values.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Changed fields for a partial update.
///
/// Fields left as `None` are omitted from the request body entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

impl TicketPatch {
    /// A patch that only flips the completion status.
    pub fn status(status: bool) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Check whether the patch carries any change at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full_record() {
        let value = json!({
            "id": "42",
            "name": "Printer on fire",
            "description": "Third floor",
            "status": true,
            "created": 1700000000000i64,
        });

        let ticket = Ticket::from_value(&value).unwrap();
        assert_eq!(ticket.id, "42");
        assert_eq!(ticket.name, "Printer on fire");
        assert_eq!(ticket.description, "Third floor");
        assert!(ticket.status);
        assert_eq!(ticket.created, 1700000000000);
    }

    #[test]
    fn test_from_value_defaults_optional_fields() {
        let value = json!({ "id": "1", "name": "Minimal" });

        let ticket = Ticket::from_value(&value).unwrap();
        assert_eq!(ticket.description, "");
        assert!(!ticket.status);
        assert_eq!(ticket.created, 0);
    }

    #[test]
    fn test_from_value_rejects_missing_id() {
        assert!(Ticket::from_value(&json!({ "name": "No id" })).is_none());
        assert!(Ticket::from_value(&json!({ "id": "", "name": "Blank id" })).is_none());
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert!(Ticket::from_value(&json!([])).is_none());
        assert!(Ticket::from_value(&json!("oops")).is_none());
        assert!(Ticket::from_value(&Value::Null).is_none());
    }

    #[test]
    fn test_from_collection_drops_bad_records() {
        let value = json!([
            { "id": "1", "name": "Good" },
            { "name": "Missing id" },
            "not even an object",
            { "id": "2", "name": "Also good", "status": true },
        ]);

        let tickets = Ticket::from_collection(&value);
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0].id, "1");
        assert_eq!(tickets[1].id, "2");
    }

    #[test]
    fn test_from_collection_non_array_is_empty() {
        assert!(Ticket::from_collection(&json!({ "error": "nope" })).is_empty());
        assert!(Ticket::from_collection(&Value::Null).is_empty());
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = TicketPatch::status(true);
        let body = serde_json::to_value(&patch).unwrap();

        assert_eq!(body, json!({ "status": true }));
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(TicketPatch::default().is_empty());
        assert!(!TicketPatch::status(false).is_empty());
    }

    #[test]
    fn test_draft_serializes_both_fields() {
        let draft = TicketDraft::new("New ticket", "");
        let body = serde_json::to_value(&draft).unwrap();

        assert_eq!(body, json!({ "name": "New ticket", "description": "" }));
    }
}
