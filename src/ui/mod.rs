//! User interface components and views.
//!
//! All rendering logic lives here: the ticket list, the create/edit form,
//! and the reusable dialog/toast components.

pub mod components;
pub mod views;

pub use components::{ConfirmAction, ConfirmDialog, ErrorDialog, NotificationManager, TextInput};
pub use views::{FormAction, FormSubmit, TicketFormView, TicketListView};
