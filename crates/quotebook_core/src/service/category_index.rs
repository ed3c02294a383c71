//! Category selector state.
//!
//! # Invariants
//! - `options()[0]` is always the `all` sentinel.
//! - Remaining options are distinct, in first-occurrence order of the store.
//! - `selected()` always names an option.

use crate::model::quote::{CategoryFilter, ALL_CATEGORIES};
use crate::repo::pref_repo::{PreferenceRepository, PrefsResult, SELECTED_CATEGORY_KEY};
use crate::store::quote_store::QuoteStore;
use log::debug;

#[derive(Debug, Clone)]
pub struct CategoryIndex {
    options: Vec<String>,
    selected: CategoryFilter,
}

impl Default for CategoryIndex {
    fn default() -> Self {
        Self {
            options: vec![ALL_CATEGORIES.to_string()],
            selected: CategoryFilter::All,
        }
    }
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the option list and reads back the persisted selection.
    ///
    /// Returns the restored filter when a saved category names a current
    /// option. The caller re-applies it. A saved category that no longer
    /// exists leaves the selection at `all`.
    pub fn populate<P: PreferenceRepository + ?Sized>(
        &mut self,
        store: &QuoteStore,
        prefs: &P,
    ) -> PrefsResult<Option<CategoryFilter>> {
        self.options = std::iter::once(ALL_CATEGORIES.to_string())
            .chain(store.categories())
            .collect();
        if !self.contains(&self.selected) {
            self.selected = CategoryFilter::All;
        }

        let Some(saved) = prefs.get(SELECTED_CATEGORY_KEY)? else {
            return Ok(None);
        };
        let restored = CategoryFilter::parse(&saved);
        if !self.contains(&restored) {
            debug!("event=category_restore module=category_index status=skip reason=unknown_category");
            return Ok(None);
        }
        self.selected = restored.clone();
        Ok(Some(restored))
    }

    /// Selects `filter` if it names a current option.
    pub fn select(&mut self, filter: CategoryFilter) -> bool {
        if !self.contains(&filter) {
            return false;
        }
        self.selected = filter;
        true
    }

    pub fn contains(&self, filter: &CategoryFilter) -> bool {
        self.options.iter().any(|option| option == filter.as_str())
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> &CategoryFilter {
        &self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::CategoryIndex;
    use crate::model::quote::CategoryFilter;
    use crate::repo::pref_repo::{
        MemoryPreferenceRepository, PreferenceRepository, SELECTED_CATEGORY_KEY,
    };
    use crate::store::quote_store::QuoteStore;

    #[test]
    fn options_start_with_all_sentinel() {
        let mut index = CategoryIndex::new();
        let prefs = MemoryPreferenceRepository::new();
        let restored = index.populate(&QuoteStore::seeded(), &prefs).unwrap();

        assert!(restored.is_none());
        assert_eq!(
            index.options(),
            ["all", "Motivation", "Inspiration", "Education"]
        );
        assert_eq!(index.selected(), &CategoryFilter::All);
    }

    #[test]
    fn restores_known_category_and_ignores_stale_one() {
        let store = QuoteStore::seeded();
        let mut prefs = MemoryPreferenceRepository::new();
        prefs.set(SELECTED_CATEGORY_KEY, "Education").unwrap();

        let mut index = CategoryIndex::new();
        let restored = index.populate(&store, &prefs).unwrap();
        assert_eq!(restored, Some(CategoryFilter::Only("Education".to_string())));
        assert_eq!(index.selected().as_str(), "Education");

        prefs.set(SELECTED_CATEGORY_KEY, "Gone").unwrap();
        let mut fresh = CategoryIndex::new();
        assert!(fresh.populate(&store, &prefs).unwrap().is_none());
        assert_eq!(fresh.selected(), &CategoryFilter::All);
    }

    #[test]
    fn select_rejects_unknown_category() {
        let mut index = CategoryIndex::new();
        index
            .populate(&QuoteStore::seeded(), &MemoryPreferenceRepository::new())
            .unwrap();
        assert!(!index.select(CategoryFilter::parse("Unknown")));
        assert!(index.select(CategoryFilter::parse("Motivation")));
    }
}
