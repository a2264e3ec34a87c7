//! Common utility functions shared across the domain modules.
//!
//! Pure functions only - no side effects, no I/O.

pub mod string;

pub use string::{fold_key, none_if_blank, parse_lenient_int};
