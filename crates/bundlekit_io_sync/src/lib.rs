//! `bundlekit_io_sync` v1:
//! Incremental file-synchronization engine for build pipelines.
//!
//! Architecture:
//! - `sync`   : orchestration and skip/copy policy
//! - `walk`   : directory tree enumeration
//! - `spec`   : options and error types
//! - `report` : run-time report model
//! - `util`   : shared helper functions

pub mod report;
pub mod spec;
pub mod sync;
pub mod walk;
mod util;

pub use report::{ReportSync, ReportSyncBuilder};
pub use spec::{EnumSyncOp, SpecSyncOptions, SyncTreeError};
pub use sync::{sync_tree, sync_tree_with_log};
pub use walk::{EnumEntryKind, SpecWalkEntry, list_entries};
