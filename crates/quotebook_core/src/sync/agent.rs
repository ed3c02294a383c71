//! Sync cycle state machine.
//!
//! # Responsibility
//! - Gate timer ticks so only one cycle runs at a time.
//! - Merge fetched candidates into the store and collect conflicts.
//! - Apply user resolutions and settle the cycle.
//!
//! # Invariants
//! - `begin_cycle` refuses to start while `Fetching` or `AwaitingResolution`.
//! - The store is only mutated by `Added` merges and `KeepRemote` resolutions.
//! - Resolving an unknown or already-resolved conflict is a no-op.

use crate::model::quote::Quote;
use crate::store::quote_store::{MergeOutcome, QuoteStore, StoreResult};
use crate::sync::conflict::{Conflict, ConflictId, ConflictSet, Resolution};
use crate::sync::remote::TransportError;
use log::{debug, info, warn};
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Fetching,
    Merging,
    AwaitingResolution,
    Settled,
}

impl Display for SyncPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Merging => "merging",
            Self::AwaitingResolution => "awaiting_resolution",
            Self::Settled => "settled",
        };
        f.write_str(name)
    }
}

/// Merge accounting for one fetched batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub unchanged: usize,
    pub conflicts: usize,
}

impl SyncReport {
    pub fn store_changed(&self) -> bool {
        self.added > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Applied {
        conflict: Conflict,
        resolution: Resolution,
        /// No conflicts remain; the cycle has settled.
        settled: bool,
    },
    AlreadyResolved,
}

/// Read-only snapshot for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub phase: SyncPhase,
    pub pending_conflicts: usize,
    pub cycles_started: u64,
    pub cycles_skipped: u64,
    /// Epoch milliseconds of the last settled cycle.
    pub last_synced_at_ms: Option<i64>,
    pub last_error: Option<String>,
}

pub struct SyncAgent {
    phase: SyncPhase,
    conflicts: ConflictSet,
    baseline: Option<Vec<Quote>>,
    cycles_started: u64,
    cycles_skipped: u64,
    last_synced_at_ms: Option<i64>,
    last_error: Option<String>,
}

impl Default for SyncAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncAgent {
    pub fn new() -> Self {
        Self {
            phase: SyncPhase::Idle,
            conflicts: ConflictSet::new(),
            baseline: None,
            cycles_started: 0,
            cycles_skipped: 0,
            last_synced_at_ms: None,
            last_error: None,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn pending_conflicts(&self) -> &ConflictSet {
        &self.conflicts
    }

    /// Store contents as of the last settled cycle.
    pub fn baseline(&self) -> Option<&[Quote]> {
        self.baseline.as_deref()
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            phase: self.phase,
            pending_conflicts: self.conflicts.len(),
            cycles_started: self.cycles_started,
            cycles_skipped: self.cycles_skipped,
            last_synced_at_ms: self.last_synced_at_ms,
            last_error: self.last_error.clone(),
        }
    }

    /// Claims the single cycle slot for a timer tick.
    ///
    /// Returns `false` when a fetch is still in flight or conflicts from the
    /// previous cycle are unresolved.
    pub fn begin_cycle(&mut self) -> bool {
        match self.phase {
            SyncPhase::Fetching | SyncPhase::Merging | SyncPhase::AwaitingResolution => {
                self.cycles_skipped += 1;
                debug!(
                    "event=sync_tick module=sync status=skip phase={} skipped_total={}",
                    self.phase, self.cycles_skipped
                );
                false
            }
            SyncPhase::Idle | SyncPhase::Settled => {
                self.phase = SyncPhase::Fetching;
                self.cycles_started += 1;
                debug!(
                    "event=sync_tick module=sync status=start cycle={}",
                    self.cycles_started
                );
                true
            }
        }
    }

    /// Finishes the fetch step with its result and merges on success.
    ///
    /// A transport failure returns the agent to `Idle` and is handed back to
    /// the caller for a non-blocking notice.
    pub fn complete_fetch(
        &mut self,
        store: &mut QuoteStore,
        fetched: Result<Vec<Quote>, TransportError>,
    ) -> Result<SyncReport, TransportError> {
        let candidates = match fetched {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!("event=sync_fetch module=sync status=error error={err}");
                self.last_error = Some(err.to_string());
                self.phase = SyncPhase::Idle;
                return Err(err);
            }
        };

        self.phase = SyncPhase::Merging;
        let mut report = SyncReport::default();
        for candidate in &candidates {
            match store.merge_remote(candidate) {
                MergeOutcome::Added => report.added += 1,
                MergeOutcome::Unchanged => report.unchanged += 1,
                MergeOutcome::CategoryMismatch { local_category } => {
                    let conflict =
                        Conflict::new(&candidate.text, local_category, &candidate.category);
                    if self.conflicts.push(conflict) {
                        report.conflicts += 1;
                    }
                }
            }
        }
        self.last_error = None;

        info!(
            "event=sync_merge module=sync status=ok candidates={} added={} unchanged={} conflicts={}",
            candidates.len(),
            report.added,
            report.unchanged,
            report.conflicts
        );

        if self.conflicts.is_empty() {
            self.settle(store);
        } else {
            self.phase = SyncPhase::AwaitingResolution;
        }
        Ok(report)
    }

    /// Applies the user's choice for one pending conflict.
    pub fn resolve(
        &mut self,
        store: &mut QuoteStore,
        id: ConflictId,
        resolution: Resolution,
    ) -> StoreResult<ResolveOutcome> {
        let Some(conflict) = self.conflicts.get(id) else {
            debug!("event=conflict_resolve module=sync status=skip reason=not_pending");
            return Ok(ResolveOutcome::AlreadyResolved);
        };

        if resolution == Resolution::KeepRemote {
            store.set_category(&conflict.text, &conflict.remote_category)?;
        }
        let conflict = match self.conflicts.take(id) {
            Some(conflict) => conflict,
            None => return Ok(ResolveOutcome::AlreadyResolved),
        };
        info!(
            "event=conflict_resolve module=sync status=ok resolution={} remaining={}",
            resolution.as_str(),
            self.conflicts.len()
        );

        let settled = self.conflicts.is_empty();
        if settled {
            self.settle(store);
        }
        Ok(ResolveOutcome::Applied {
            conflict,
            resolution,
            settled,
        })
    }

    fn settle(&mut self, store: &QuoteStore) {
        self.baseline = Some(store.snapshot());
        self.last_synced_at_ms = Some(now_epoch_ms());
        self.phase = SyncPhase::Settled;
        info!(
            "event=sync_settled module=sync status=ok size={}",
            store.len()
        );
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{SyncAgent, SyncPhase};
    use crate::store::quote_store::QuoteStore;
    use crate::sync::remote::TransportError;

    #[test]
    fn overlapping_ticks_are_skipped_while_fetching() {
        let mut agent = SyncAgent::new();
        assert!(agent.begin_cycle());
        assert!(!agent.begin_cycle());
        assert_eq!(agent.phase(), SyncPhase::Fetching);

        let status = agent.status();
        assert_eq!(status.cycles_started, 1);
        assert_eq!(status.cycles_skipped, 1);
    }

    #[test]
    fn transport_failure_returns_to_idle_and_records_error() {
        let mut agent = SyncAgent::new();
        let mut store = QuoteStore::seeded();
        assert!(agent.begin_cycle());

        let err = agent
            .complete_fetch(
                &mut store,
                Err(TransportError::Request("offline".to_string())),
            )
            .unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
        assert_eq!(agent.phase(), SyncPhase::Idle);
        assert!(agent.status().last_error.unwrap().contains("offline"));
        assert_eq!(store.len(), 3);
        assert!(agent.begin_cycle());
    }
}
