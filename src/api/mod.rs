//! Ticket service client and types.
//!
//! This module provides the interface for communicating with the ticket
//! service backend and reconciling the persisted snapshot.

pub mod error;
mod gateway;
mod transport;
mod types;

pub use error::ApiError;
pub use gateway::{ErrorSink, TicketGateway};
pub use transport::{HttpTransport, RequestOptions, Transport};
pub use types::{Ticket, TicketDraft, TicketPatch};

#[cfg(test)]
pub(crate) use transport::testing;
