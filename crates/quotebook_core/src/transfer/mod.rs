//! JSON export/import of the quote store.
//!
//! # Responsibility
//! - Serialize the full store to the pretty-printed `quotes.json` format.
//! - Parse user-supplied files and merge valid records into the store.
//!
//! # Invariants
//! - A failed import leaves the store untouched.
//! - Export never mutates the store.

mod export;
mod import;

pub use export::{export_quotes, write_export, ExportError, EXPORT_FILE_NAME, EXPORT_MIME_TYPE};
pub use import::{import_quotes, read_import_file, ImportError, ImportOptions, ImportReport};
