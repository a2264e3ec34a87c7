//! Aggregate roots
//!
//! `Character` is the only aggregate. Its mutations validate first, write
//! second, and report what happened through the types in `events`.

pub mod character;

pub use character::{Character, LevelUpRequest};
