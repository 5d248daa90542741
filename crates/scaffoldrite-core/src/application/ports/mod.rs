//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `scaffoldrite-adapters`
//! implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: directory listing and mutation
//!   - `HistoryWriter`: audit snapshots of mutating commands
//!   - `ProgressObserver`: reconcile progress (implemented by the CLI)

pub mod output;

pub use output::{
    to_native, DirEntry, Filesystem, HistoryEntry, HistoryOperation, HistoryWriter, NoHistory,
    NoProgress, OperationKind, ProgressEvent, ProgressObserver, Scan, ScannedEntry,
};

#[cfg(test)]
pub use output::MockFilesystem;
