//! Ordered quote collection with add/merge/resolve mutation paths.
//!
//! # Responsibility
//! - Validate and append user-entered quotes.
//! - Answer category-filtered reads and derive the distinct category list.
//! - Apply category overwrites chosen during conflict resolution.
//!
//! # Invariants
//! - `add` rejects blank input and duplicate text.
//! - Insertion order is preserved; it drives category enumeration order.

use crate::model::quote::{CategoryFilter, Quote, QuoteValidationError};
use log::debug;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Quotes every new session starts with.
pub const SEED_QUOTES: &[(&str, &str)] = &[
    (
        "The only limit to our realization of tomorrow is our doubts of today.",
        "Motivation",
    ),
    ("In the middle of difficulty lies opportunity.", "Inspiration"),
    ("Knowledge is power.", "Education"),
];

pub type StoreResult<T> = Result<T, StoreError>;

/// Store mutation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(QuoteValidationError),
    /// A quote with the same text already exists.
    Duplicate(String),
    /// No quote with the given text exists.
    NotFound(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Duplicate(text) => write!(f, "quote already exists: \"{text}\""),
            Self::NotFound(text) => write!(f, "quote not found: \"{text}\""),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QuoteValidationError> for StoreError {
    fn from(value: QuoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Outcome of merging one remote candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No local quote had this text; the candidate was appended.
    Added,
    /// A local quote with the same text and category already exists.
    Unchanged,
    /// Same text, different category. The store was not touched.
    CategoryMismatch { local_category: String },
}

/// Session-owned quote collection.
#[derive(Debug, Clone, Default)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
}

impl QuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the three startup quotes.
    pub fn seeded() -> Self {
        let quotes = SEED_QUOTES
            .iter()
            .map(|(text, category)| Quote {
                text: (*text).to_string(),
                category: (*category).to_string(),
                id: None,
            })
            .collect();
        Self { quotes }
    }

    /// Validates and appends one quote entered by the user.
    ///
    /// # Errors
    /// - `Validation` when text or category is blank after trimming.
    /// - `Duplicate` when the text is already stored.
    pub fn add(&mut self, text: &str, category: &str) -> StoreResult<&Quote> {
        let quote = Quote::new(text, category)?;
        self.insert(quote)
    }

    /// Appends an already-built quote, enforcing validation and text uniqueness.
    pub fn insert(&mut self, quote: Quote) -> StoreResult<&Quote> {
        quote.validate()?;
        if self.contains_text(&quote.text) {
            return Err(StoreError::Duplicate(quote.text));
        }
        debug!(
            "event=quote_add module=store status=ok category={} size={}",
            quote.category,
            self.quotes.len() + 1
        );
        self.quotes.push(quote);
        Ok(&self.quotes[self.quotes.len() - 1])
    }

    /// Appends without the uniqueness check.
    ///
    /// Used by imports that opt out of duplicate suppression.
    pub(crate) fn push_unchecked(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }

    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Returns quotes in the filter's category, or every quote for `All`.
    pub fn matching(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        self.quotes.iter().filter(|q| filter.matches(q)).collect()
    }

    /// Convenience wrapper over `matching` taking raw selector input.
    pub fn all_matching_category(&self, category: &str) -> Vec<&Quote> {
        self.matching(&CategoryFilter::parse(category))
    }

    /// Distinct categories in order of first occurrence.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.quotes
            .iter()
            .filter(|q| seen.insert(q.category.as_str()))
            .map(|q| q.category.clone())
            .collect()
    }

    pub fn position_by_text(&self, text: &str) -> Option<usize> {
        self.quotes.iter().position(|q| q.text == text)
    }

    pub fn find_by_text(&self, text: &str) -> Option<&Quote> {
        self.position_by_text(text).map(|idx| &self.quotes[idx])
    }

    pub fn contains_text(&self, text: &str) -> bool {
        self.position_by_text(text).is_some()
    }

    /// Compares one remote candidate against the store and appends it when new.
    ///
    /// Matching text with a different category is reported, not applied.
    pub fn merge_remote(&mut self, candidate: &Quote) -> MergeOutcome {
        match self.find_by_text(&candidate.text) {
            None => {
                self.quotes.push(candidate.clone());
                MergeOutcome::Added
            }
            Some(local) if local.category == candidate.category => MergeOutcome::Unchanged,
            Some(local) => MergeOutcome::CategoryMismatch {
                local_category: local.category.clone(),
            },
        }
    }

    /// Overwrites the category of the quote with the given text.
    pub fn set_category(&mut self, text: &str, category: &str) -> StoreResult<()> {
        let category = category.trim();
        if category.is_empty() {
            return Err(StoreError::Validation(QuoteValidationError::EmptyCategory));
        }
        let idx = self
            .position_by_text(text)
            .ok_or_else(|| StoreError::NotFound(text.to_string()))?;
        self.quotes[idx].category = category.to_string();
        Ok(())
    }

    /// Clones the current contents.
    pub fn snapshot(&self) -> Vec<Quote> {
        self.quotes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{MergeOutcome, QuoteStore, StoreError};
    use crate::model::quote::Quote;

    #[test]
    fn seeded_store_has_three_distinct_categories() {
        let store = QuoteStore::seeded();
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.categories(),
            vec!["Motivation", "Inspiration", "Education"]
        );
    }

    #[test]
    fn categories_keep_first_occurrence_order() {
        let mut store = QuoteStore::new();
        store.add("a", "Zen").unwrap();
        store.add("b", "Art").unwrap();
        store.add("c", "Zen").unwrap();
        assert_eq!(store.categories(), vec!["Zen", "Art"]);
    }

    #[test]
    fn merge_remote_reports_mismatch_without_mutation() {
        let mut store = QuoteStore::new();
        store.add("X", "A").unwrap();

        let outcome = store.merge_remote(&Quote::from_remote(1, "X", "B").unwrap());
        assert_eq!(
            outcome,
            MergeOutcome::CategoryMismatch {
                local_category: "A".to_string()
            }
        );
        assert_eq!(store.find_by_text("X").unwrap().category, "A");

        let same = store.merge_remote(&Quote::new("X", "A").unwrap());
        assert_eq!(same, MergeOutcome::Unchanged);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_category_requires_existing_text() {
        let mut store = QuoteStore::seeded();
        let err = store.set_category("missing", "A").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
