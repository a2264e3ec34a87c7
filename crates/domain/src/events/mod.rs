//! Domain Events
//!
//! Return types from aggregate mutations, communicating what happened when
//! progression state was modified so callers can log and render it.

pub mod progression_events;

pub use progression_events::*;
