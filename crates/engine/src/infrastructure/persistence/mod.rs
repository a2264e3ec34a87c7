//! Character store adapters.

mod in_memory;
mod json_file;

pub use in_memory::InMemoryCharacterRepo;
pub use json_file::JsonFileCharacterRepo;
