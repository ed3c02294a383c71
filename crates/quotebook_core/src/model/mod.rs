//! Quote domain model.
//!
//! # Responsibility
//! - Define the canonical quote record shared by store, display, transfer and sync.
//! - Define the category filter used by display and the category index.
//!
//! # Invariants
//! - A stored quote always has non-empty, trimmed `text` and `category`.
//! - Quotes are never deleted; only their category may change.

pub mod quote;
