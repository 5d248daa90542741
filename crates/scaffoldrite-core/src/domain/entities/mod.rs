pub mod node;
pub mod structure;

pub use node::{File, Folder, Node, NodeKind, ROOT_NAME, Walk};
pub use structure::{AddOptions, AddOutcome, Structure};
