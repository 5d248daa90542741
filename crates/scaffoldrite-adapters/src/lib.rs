//! Infrastructure adapters for Scaffoldrite.
//!
//! This crate implements the ports defined in `scaffoldrite-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod history;
pub mod layout;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use history::JsonHistoryWriter;
pub use layout::ProjectLayout;
