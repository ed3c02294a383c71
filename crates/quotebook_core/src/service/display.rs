//! Random quote rendering.

use crate::model::quote::{CategoryFilter, Quote};
use crate::store::quote_store::QuoteStore;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::{Display, Formatter};

pub const NO_QUOTES_MESSAGE: &str = "No quotes available for this category.";

/// Content of the display surface after one draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteView {
    Quote(Quote),
    Empty,
}

impl QuoteView {
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Self::Quote(quote) => Some(quote),
            Self::Empty => None,
        }
    }
}

impl Display for QuoteView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quote(quote) => write!(f, "{quote}"),
            Self::Empty => f.write_str(NO_QUOTES_MESSAGE),
        }
    }
}

/// Picks one quote uniformly at random among those matching `filter`.
pub fn show_random_quote<R: Rng + ?Sized>(
    store: &QuoteStore,
    filter: &CategoryFilter,
    rng: &mut R,
) -> QuoteView {
    store
        .matching(filter)
        .choose(rng)
        .map_or(QuoteView::Empty, |quote| QuoteView::Quote((*quote).clone()))
}
