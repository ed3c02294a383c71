//! Quote book session facade.
//!
//! # Responsibility
//! - Own the store, preferences, category selector and sync agent of one session.
//! - Run the follow-up refreshes each user operation implies.
//! - Queue transient notices for the front end to drain.
//!
//! # Invariants
//! - The category index is repopulated after every store mutation.
//! - A failed import or add leaves the store untouched.
//! - Background sync failures surface only as `Warning` notices.

use crate::model::quote::{CategoryFilter, Quote};
use crate::repo::pref_repo::{PreferenceRepository, PrefsError, SELECTED_CATEGORY_KEY};
use crate::service::category_index::CategoryIndex;
use crate::service::display::{show_random_quote, QuoteView};
use crate::store::quote_store::{QuoteStore, StoreError};
use crate::sync::agent::{ResolveOutcome, SyncAgent, SyncReport, SyncStatus};
use crate::sync::conflict::{ConflictId, ConflictSet, Resolution};
use crate::sync::remote::{RemoteSource, TransportError};
use crate::transfer::{
    export_quotes, import_quotes, read_import_file, write_export, ExportError, ImportError,
    ImportOptions, ImportReport,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const SYNCED_MESSAGE: &str = "Quotes synced with server.";
pub const IMPORTED_MESSAGE: &str = "Quotes imported successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    /// Subdued, non-blocking report of a background failure.
    Warning,
}

/// Transient notification for the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// User-facing operation failures.
#[derive(Debug)]
pub enum QuoteBookError {
    Store(StoreError),
    Import(ImportError),
    Export(ExportError),
    Prefs(PrefsError),
    /// No pending conflict at this 1-based position.
    ConflictNotFound(usize),
    /// The category is not among the selector options.
    UnknownCategory(String),
}

impl Display for QuoteBookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Import(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
            Self::Prefs(err) => write!(f, "{err}"),
            Self::ConflictNotFound(position) => write!(f, "no pending conflict #{position}"),
            Self::UnknownCategory(category) => write!(f, "unknown category: `{category}`"),
        }
    }
}

impl Error for QuoteBookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Import(err) => Some(err),
            Self::Export(err) => Some(err),
            Self::Prefs(err) => Some(err),
            Self::ConflictNotFound(_) | Self::UnknownCategory(_) => None,
        }
    }
}

impl From<StoreError> for QuoteBookError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ImportError> for QuoteBookError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<ExportError> for QuoteBookError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<PrefsError> for QuoteBookError {
    fn from(value: PrefsError) -> Self {
        Self::Prefs(value)
    }
}

pub type QuoteBookResult<T> = Result<T, QuoteBookError>;

/// One interactive quote book session.
pub struct QuoteBook<P: PreferenceRepository, R: Rng = StdRng> {
    store: QuoteStore,
    prefs: P,
    index: CategoryIndex,
    agent: SyncAgent,
    view: Option<QuoteView>,
    notices: VecDeque<Notice>,
    rng: R,
}

impl<P: PreferenceRepository> QuoteBook<P, StdRng> {
    /// Starts a session over the seed quotes with an entropy-seeded RNG.
    pub fn new(prefs: P) -> Self {
        Self::with_parts(QuoteStore::seeded(), prefs, StdRng::from_entropy())
    }
}

impl<P: PreferenceRepository, R: Rng> QuoteBook<P, R> {
    pub fn with_parts(store: QuoteStore, prefs: P, rng: R) -> Self {
        Self {
            store,
            prefs,
            index: CategoryIndex::new(),
            agent: SyncAgent::new(),
            view: None,
            notices: VecDeque::new(),
            rng,
        }
    }

    /// Builds the selector and restores the persisted category.
    pub fn initialize(&mut self) -> QuoteBookResult<()> {
        self.populate_categories()?;
        info!(
            "event=session_init module=quotebook status=ok size={} selected={}",
            self.store.len(),
            self.index.selected()
        );
        Ok(())
    }

    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    pub fn categories(&self) -> &[String] {
        self.index.options()
    }

    pub fn selected_category(&self) -> &CategoryFilter {
        self.index.selected()
    }

    /// Last rendered display content, if anything was shown yet.
    pub fn current_view(&self) -> Option<&QuoteView> {
        self.view.as_ref()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Draws a quote from the currently selected category.
    pub fn show_random_quote(&mut self) -> &QuoteView {
        let filter = self.index.selected().clone();
        self.show_random_in(&filter)
    }

    /// Draws a quote from `filter`, replacing the display content.
    pub fn show_random_in(&mut self, filter: &CategoryFilter) -> &QuoteView {
        let view = show_random_quote(&self.store, filter, &mut self.rng);
        self.view.insert(view)
    }

    /// Adds a quote from the form, then refreshes the selector and display.
    ///
    /// # Errors
    /// - `Store(Validation)` for blank text or category.
    /// - `Store(Duplicate)` when the text already exists.
    pub fn add_quote(&mut self, text: &str, category: &str) -> QuoteBookResult<Quote> {
        let quote = self.store.add(text, category)?.clone();
        self.populate_categories()?;
        self.show_random_in(&CategoryFilter::All);
        self.notify(NoticeLevel::Success, "Quote added.");
        Ok(quote)
    }

    /// Rebuilds the selector; a restored selection is re-applied.
    pub fn populate_categories(&mut self) -> QuoteBookResult<()> {
        if let Some(restored) = self.index.populate(&self.store, &self.prefs)? {
            self.apply_filter(restored)?;
        }
        Ok(())
    }

    /// Selects a category (or `all`), persists it and shows a matching quote.
    pub fn filter_quotes(&mut self, category: &str) -> QuoteBookResult<&QuoteView> {
        let filter = CategoryFilter::parse(category);
        if !self.index.contains(&filter) {
            return Err(QuoteBookError::UnknownCategory(filter.as_str().to_string()));
        }
        self.apply_filter(filter)
    }

    fn apply_filter(&mut self, filter: CategoryFilter) -> QuoteBookResult<&QuoteView> {
        self.prefs.set(SELECTED_CATEGORY_KEY, filter.as_str())?;
        self.index.select(filter.clone());
        Ok(self.show_random_in(&filter))
    }

    pub fn export_json(&self) -> QuoteBookResult<String> {
        Ok(export_quotes(&self.store)?)
    }

    /// Writes `quotes.json` into `dir`.
    pub fn export_to(&self, dir: impl AsRef<Path>) -> QuoteBookResult<PathBuf> {
        Ok(write_export(&self.store, dir)?)
    }

    /// Imports serialized quotes with duplicate suppression.
    pub fn import_json(&mut self, contents: &str) -> QuoteBookResult<ImportReport> {
        self.import_json_with(contents, ImportOptions::default())
    }

    pub fn import_json_with(
        &mut self,
        contents: &str,
        options: ImportOptions,
    ) -> QuoteBookResult<ImportReport> {
        let report = import_quotes(&mut self.store, contents, options)?;
        self.populate_categories()?;
        self.notify(NoticeLevel::Success, IMPORTED_MESSAGE);
        Ok(report)
    }

    pub fn import_file(&mut self, path: impl AsRef<Path>) -> QuoteBookResult<ImportReport> {
        let contents = read_import_file(path)?;
        self.import_json(&contents)
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.agent.status()
    }

    /// Store contents as of the last settled sync.
    pub fn last_synced_baseline(&self) -> Option<&[Quote]> {
        self.agent.baseline()
    }

    pub fn pending_conflicts(&self) -> &ConflictSet {
        self.agent.pending_conflicts()
    }

    /// Claims the sync slot for a timer tick; `false` means skip this tick.
    pub fn begin_sync(&mut self) -> bool {
        self.agent.begin_cycle()
    }

    /// Merges a finished fetch into the store.
    ///
    /// Transport failures become a `Warning` notice and `None`.
    pub fn complete_sync(
        &mut self,
        fetched: Result<Vec<Quote>, TransportError>,
    ) -> QuoteBookResult<Option<SyncReport>> {
        let report = match self.agent.complete_fetch(&mut self.store, fetched) {
            Ok(report) => report,
            Err(err) => {
                self.notify(
                    NoticeLevel::Warning,
                    format!("Sync unavailable ({err}); retrying later."),
                );
                return Ok(None);
            }
        };

        if report.conflicts > 0 {
            self.notify(
                NoticeLevel::Warning,
                format!(
                    "{} conflict(s) with server data need review.",
                    self.agent.pending_conflicts().len()
                ),
            );
        }
        if report.store_changed() || self.agent.pending_conflicts().is_empty() {
            self.populate_categories()?;
        }
        if self.agent.pending_conflicts().is_empty() {
            self.notify(NoticeLevel::Success, SYNCED_MESSAGE);
        }
        Ok(Some(report))
    }

    /// Runs one complete cycle in place; `None` if the tick was skipped or failed.
    pub async fn sync_now(
        &mut self,
        source: &dyn RemoteSource,
        batch_size: usize,
    ) -> QuoteBookResult<Option<SyncReport>> {
        if !self.begin_sync() {
            return Ok(None);
        }
        debug!(
            "event=sync_fetch module=quotebook status=start source={} batch_size={batch_size}",
            source.source_id()
        );
        let fetched = source.fetch_candidates(batch_size).await;
        self.complete_sync(fetched)
    }

    /// Applies a resolution to one pending conflict.
    pub fn resolve_conflict(
        &mut self,
        id: ConflictId,
        resolution: Resolution,
    ) -> QuoteBookResult<ResolveOutcome> {
        let outcome = self.agent.resolve(&mut self.store, id, resolution)?;
        if let ResolveOutcome::Applied {
            conflict,
            resolution,
            settled,
        } = &outcome
        {
            self.notify(
                NoticeLevel::Info,
                format!(
                    "Conflict resolved: \"{}\" keeps category {}.",
                    conflict.text,
                    conflict.chosen_category(*resolution)
                ),
            );
            if *resolution == Resolution::KeepRemote || *settled {
                self.populate_categories()?;
            }
            if *settled {
                self.notify(NoticeLevel::Success, SYNCED_MESSAGE);
            }
        }
        Ok(outcome)
    }

    /// Resolves the conflict at a 1-based listing position.
    pub fn resolve_conflict_at(
        &mut self,
        position: usize,
        resolution: Resolution,
    ) -> QuoteBookResult<ResolveOutcome> {
        let id = self
            .agent
            .pending_conflicts()
            .by_position(position)
            .map(|conflict| conflict.id)
            .ok_or(QuoteBookError::ConflictNotFound(position))?;
        self.resolve_conflict(id, resolution)
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push_back(Notice::new(level, message));
    }
}
