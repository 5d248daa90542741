//! Scaffoldrite Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Scaffoldrite:
//! a small DSL that declares a project layout, a constraint language that
//! polices it, and a reconciler that syncs a real directory to it.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        scaffoldrite-cli (CLI)           │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (FsImporter, ReconcileService,          │
//! │  FsValidator)                           │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, HistoryWriter, Progress)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   scaffoldrite-adapters (Infrastructure)│
//! │ (LocalFilesystem, MemoryFilesystem, ...)│
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Structure, Folder, Constraint, DSL)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scaffoldrite_core::prelude::*;
//! # fn run(fs: Box<dyn Filesystem>) -> RiteResult<()> {
//! let structure = Structure::parse("folder src {\n  file main.rs\n}\n")?;
//! structure.validate()?;
//!
//! let service = ReconcileService::new(fs);
//! let report = service.apply(
//!     &structure.root,
//!     "./out".as_ref(),
//!     &ReconcileOptions::default(),
//!     &mut NoProgress,
//! )?;
//! println!("{} changes", report.changes());
//! # Ok(())
//! # }
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        FsImporter, FsValidationOptions, FsValidator, NoProgress, OperationKind, ProgressEvent,
        ProgressObserver, ReconcileOptions, ReconcileReport, ReconcileService,
        ports::{Filesystem, HistoryEntry, HistoryWriter},
    };
    pub use crate::domain::{
        AddOptions, Constraint, Folder, IgnoreList, LogicalPath, Node, NodeKind, Structure,
    };
    pub use crate::error::{RiteError, RiteResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
