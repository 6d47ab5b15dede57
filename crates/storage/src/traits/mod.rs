//! Storage backend trait abstraction
//!
//! Async domain traits for storage operations, implemented by `PgStorage`.

pub mod access;
pub mod feature_flag;
pub mod folder;
pub mod project;
pub mod workspace;

pub use access::AccessStore;
pub use feature_flag::FeatureFlagStore;
pub use folder::FolderStore;
pub use project::{ProjectStore, TrashStore};
pub use workspace::WorkspaceStore;
