//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "import a directory" or "sync a directory to
//! the declared tree".

pub mod fs_validation_service;
pub mod import_service;
pub mod reconcile_service;

pub use fs_validation_service::{FsValidationOptions, FsValidator};
pub use import_service::FsImporter;
pub use reconcile_service::{Operation, ReconcileOptions, ReconcileReport, ReconcileService};
