//! Core domain logic for Quotebook.
//! This crate owns every quote invariant; front ends only render and collect input.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod sync;
pub mod transfer;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::quote::{CategoryFilter, Quote, QuoteValidationError, ALL_CATEGORIES};
pub use repo::pref_repo::{
    MemoryPreferenceRepository, PreferenceRepository, PrefsError, PrefsResult,
    SqlitePreferenceRepository, SELECTED_CATEGORY_KEY,
};
pub use service::display::{QuoteView, NO_QUOTES_MESSAGE};
pub use service::quotebook::{
    Notice, NoticeLevel, QuoteBook, QuoteBookError, QuoteBookResult, IMPORTED_MESSAGE,
    SYNCED_MESSAGE,
};
pub use store::quote_store::{MergeOutcome, QuoteStore, StoreError, StoreResult};
pub use sync::{
    Conflict, ConflictId, ConflictSet, HttpRemoteSource, RemoteSource, Resolution,
    ResolveOutcome, SyncAgent, SyncPhase, SyncReport, SyncSettings, SyncStatus, TransportError,
};
pub use transfer::{ExportError, ImportError, ImportOptions, ImportReport, EXPORT_FILE_NAME};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
