//! Queue rules shared by the server and the dashboard
//!
//! - [`ticket`]: pure ticket numbering and its scope
//! - [`lifecycle`]: status transitions behind the desk buttons
//! - [`filter`]: list filters and paging

pub mod filter;
pub mod lifecycle;
pub mod ticket;

pub use filter::{DateFilter, ListParams, ListQuery, Page, QueueView};
pub use lifecycle::Transition;
pub use ticket::{TicketScope, format_ticket, next_sequence, next_ticket};
