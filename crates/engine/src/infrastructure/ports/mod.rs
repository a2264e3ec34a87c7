//! Port traits for infrastructure boundaries.
//!
//! Character storage is the only abstraction in the engine; everything else
//! is a concrete type.

mod error;
mod repos;

pub use error::RepoError;
pub use repos::CharacterRepo;

#[cfg(test)]
pub use repos::MockCharacterRepo;
