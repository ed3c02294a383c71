//! Session-level services.
//!
//! # Responsibility
//! - Render random quotes and maintain the category selector.
//! - Orchestrate store, preferences, transfer and sync into user operations.
//!
//! # See also
//! - `crate::sync` for the cycle state machine.

pub mod category_index;
pub mod display;
pub mod quotebook;
