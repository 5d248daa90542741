//! Application layer for Scaffoldrite.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (import, reconcile, FS validation)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! structure logic itself. All structure rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    FsImporter, FsValidationOptions, FsValidator, Operation, ReconcileOptions, ReconcileReport,
    ReconcileService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    to_native, DirEntry, Filesystem, HistoryEntry, HistoryOperation, HistoryWriter, NoHistory,
    NoProgress, OperationKind, ProgressEvent, ProgressObserver, Scan, ScannedEntry,
};

pub use error::ApplicationError;
