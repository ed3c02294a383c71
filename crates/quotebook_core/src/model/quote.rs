//! Quote record and category filter.
//!
//! # Responsibility
//! - Hold the `{text, category}` pair and its optional server-side id.
//! - Validate user/import/sync input before it reaches the store.
//!
//! # Invariants
//! - `text` and `category` are trimmed and non-empty after `Quote::new`.
//! - Deduplication compares `text` only; category disagreement is a conflict.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sentinel value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Atomic unit of the quote book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
    /// Numeric id of the remote post this quote came from.
    ///
    /// Omitted from exported JSON for locally created quotes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

/// Validation failures for quote input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteValidationError {
    EmptyText,
    EmptyCategory,
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "quote text must not be empty"),
            Self::EmptyCategory => write!(f, "quote category must not be empty"),
        }
    }
}

impl Error for QuoteValidationError {}

impl Quote {
    /// Builds a validated local quote from raw input.
    ///
    /// Both fields are trimmed before validation.
    pub fn new(
        text: impl AsRef<str>,
        category: impl AsRef<str>,
    ) -> Result<Self, QuoteValidationError> {
        let quote = Self {
            text: text.as_ref().trim().to_string(),
            category: category.as_ref().trim().to_string(),
            id: None,
        };
        quote.validate()?;
        Ok(quote)
    }

    /// Builds a validated server-origin quote.
    pub fn from_remote(
        id: u64,
        text: impl AsRef<str>,
        category: impl AsRef<str>,
    ) -> Result<Self, QuoteValidationError> {
        let mut quote = Self::new(text, category)?;
        quote.id = Some(id);
        Ok(quote)
    }

    /// Checks the non-empty invariants on already-constructed values.
    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        if self.text.trim().is_empty() {
            return Err(QuoteValidationError::EmptyText);
        }
        if self.category.trim().is_empty() {
            return Err(QuoteValidationError::EmptyCategory);
        }
        Ok(())
    }

    /// Returns whether this quote came from the remote endpoint.
    pub fn is_remote(&self) -> bool {
        self.id.is_some()
    }
}

impl Display for Quote {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" - {}", self.text, self.category)
    }
}

/// Category filter applied by display and the selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parses selector input; blank input and the `all` sentinel mean no filter.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(trimmed.to_string())
        }
    }

    /// Returns the selector value, `all` for the sentinel.
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Only(category) => category.as_str(),
        }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => quote.category == *category,
        }
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoryFilter, Quote, QuoteValidationError};

    #[test]
    fn new_trims_and_validates() {
        let quote = Quote::new("  Stay hungry.  ", " Life ").unwrap();
        assert_eq!(quote.text, "Stay hungry.");
        assert_eq!(quote.category, "Life");
        assert!(!quote.is_remote());

        assert_eq!(
            Quote::new("   ", "Life").unwrap_err(),
            QuoteValidationError::EmptyText
        );
        assert_eq!(
            Quote::new("text", "\t").unwrap_err(),
            QuoteValidationError::EmptyCategory
        );
    }

    #[test]
    fn filter_parse_treats_blank_and_sentinel_as_all() {
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(" all "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("Education"),
            CategoryFilter::Only("Education".to_string())
        );
        assert_eq!(CategoryFilter::All.as_str(), "all");
    }

    #[test]
    fn local_quote_serializes_without_id() {
        let quote = Quote::new("Knowledge is power.", "Education").unwrap();
        let json = serde_json::to_string(&quote).unwrap();
        assert_eq!(
            json,
            r#"{"text":"Knowledge is power.","category":"Education"}"#
        );

        let remote = Quote::from_remote(7, "t", "Server").unwrap();
        let json = serde_json::to_string(&remote).unwrap();
        assert!(json.contains(r#""id":7"#));
    }
}
