//! Periodic synchronization with a remote quote endpoint.
//!
//! # Responsibility
//! - Define the remote source contract and its HTTP adapter.
//! - Drive one fetch/merge/resolve cycle at a time.
//! - Hold pending category conflicts until the user picks a side.
//!
//! # Invariants
//! - At most one cycle is in flight; overlapping ticks are skipped.
//! - Conflicting remote candidates never mutate the store before resolution.
//! - Transport failures are logged and retried on the next tick, never fatal.

pub mod agent;
pub mod conflict;
pub mod http;
pub mod remote;

pub use agent::{ResolveOutcome, SyncAgent, SyncPhase, SyncReport, SyncStatus};
pub use conflict::{Conflict, ConflictId, ConflictSet, Resolution};
pub use http::HttpRemoteSource;
pub use remote::{RemoteSource, SyncSettings, TransportError};
