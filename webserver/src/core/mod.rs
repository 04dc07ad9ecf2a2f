//! Core business logic: projection and result-state ownership
//!
//! Pure where possible; the only async pieces are the store lock and the
//! dispatcher's single backend call.

pub mod dispatcher;
pub mod projector;
pub mod store;

pub use dispatcher::{DispatchOutcome, QueryDispatcher};
pub use store::{QueryTicket, ResultStore};
