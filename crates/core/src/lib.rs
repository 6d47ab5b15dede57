//! Core types for onyx-ext.
//!
//! Domain types shared across all crates, plus the pure pieces of logic:
//! quality-tier resolution and the hours rollup.

mod access;
mod completion_time;
mod config;
mod constants;
mod content;
mod env_config;
mod error;
mod format;
mod project;
mod quality_tier;
pub mod rollup;

pub use access::*;
pub use completion_time::*;
pub use config::*;
pub use constants::*;
pub use content::*;
pub use env_config::*;
pub use error::*;
pub use format::*;
pub use project::*;
pub use quality_tier::*;
pub use rollup::{
    build_hours_report, effective_folder_tiers, rollup_project, subtree_folder_ids, FolderRollup,
    HoursReport, HoursTotals, ProjectRollup, ReportScope, TierBreakdown, TierTotals,
};
