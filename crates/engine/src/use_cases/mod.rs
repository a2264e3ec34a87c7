//! Use cases - User story orchestration.
//!
//! Each use case loads a character snapshot, applies a domain operation to a
//! copy, persists the copy and only then hands it back.

pub mod progression;

pub use progression::{Applied, LedgerTarget, ProgressionError, ProgressionUseCases, SheetView};
