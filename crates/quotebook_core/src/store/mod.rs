//! In-memory quote store.
//!
//! # Responsibility
//! - Own the ordered quote collection for one session.
//! - Funnel every mutation through explicit methods.
//!
//! # Invariants
//! - Stored quotes satisfy `Quote::validate()`.
//! - Quotes are appended or re-categorized, never removed.

pub mod quote_store;
