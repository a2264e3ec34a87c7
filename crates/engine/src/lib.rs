//! Sheetwright engine library.
//!
//! Application layer around `sheetwright-domain`: loads character snapshots,
//! applies progression rules, and persists the result.
//!
//! ## Structure
//!
//! - `use_cases/` - Load, apply, save orchestration
//! - `infrastructure/` - Storage port, store adapters, configuration
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
