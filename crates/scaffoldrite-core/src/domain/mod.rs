// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Scaffoldrite.
//!
//! This module contains pure logic over the declared tree. Filesystem access
//! is handled via ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Owned trees**: Folders own their children; traversal is top-down only
//! - **Rich domain model**: Behavior lives in entities, not services
//!
// Public API - what the world sees
pub mod common;
pub mod constraints;
pub mod dsl;
pub mod entities;
pub mod error;
pub mod tree_ops;
pub mod value_objects;

mod validation;

// Re-exports for convenience
pub use common::LogicalPath;
pub use constraints::{compile_constraints, Constraint, ConstraintKind, Pattern};
pub use dsl::{parse, render_tree, serialize, TreeStyle};
pub use entities::{
    AddOptions, AddOutcome, File, Folder, Node, NodeKind, Structure, Walk, ROOT_NAME,
};
pub use error::{DomainError, ErrorCategory, MismatchKind};
pub use tree_ops::{diff, filter_ignored, flatten, merge, DiffEntry, TreeDiff};
pub use validation::ConstraintValidator;
pub use value_objects::{
    IgnoreList, Scope, CONFIG_DIR, DEFAULT_IGNORES, HISTORY_DIR, IGNORE_FILE, STRUCTURE_FILE,
};
