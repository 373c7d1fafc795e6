//! Application views.

mod form;
mod list;

pub use form::{FormAction, FormField, FormSubmit, TicketFormView};
pub use list::{format_created, row_cells, status_glyph, TicketListView};
