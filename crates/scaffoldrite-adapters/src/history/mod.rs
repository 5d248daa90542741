//! History adapters.

mod json;

pub use json::JsonHistoryWriter;
