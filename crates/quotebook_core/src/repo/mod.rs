//! Durable preference repositories.
//!
//! # Responsibility
//! - Persist small string settings across process restarts.
//! - Keep SQL details out of the session facade.

pub mod pref_repo;
