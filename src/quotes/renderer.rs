use std::fmt;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::storage::session::SessionStorage;
use crate::storage::LAST_VIEWED_KEY;

use super::category;
use super::item::Quote;
use super::store::QuoteStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteView {
    Quote(Quote),
    Empty,
}

impl fmt::Display for QuoteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteView::Quote(quote) => write!(f, "{}", quote),
            QuoteView::Empty => f.write_str("No quotes available."),
        }
    }
}

/// Picks a random quote under the current filter and remembers it for the session.
pub struct Renderer {
    store: Arc<QuoteStore>,
    session: Arc<SessionStorage>,
}

impl Renderer {
    pub fn new(store: Arc<QuoteStore>, session: Arc<SessionStorage>) -> Self {
        Self { store, session }
    }

    /// Render under the saved category filter.
    pub async fn show<R: Rng + ?Sized>(&self, rng: &mut R) -> QuoteView {
        let category = self.store.selected_category().await;
        self.show_in(&category, rng).await
    }

    pub async fn show_in<R: Rng + ?Sized>(&self, category: &str, rng: &mut R) -> QuoteView {
        let quotes = self.store.quotes().await;
        let Some(quote) = category::filter(&quotes, category).choose(rng).copied() else {
            return QuoteView::Empty;
        };

        match serde_json::to_string(quote) {
            Ok(json) => self.session.set(LAST_VIEWED_KEY, json),
            Err(e) => qwarn!("Could not remember last viewed quote: {}", e),
        }
        QuoteView::Quote(quote.clone())
    }

    pub fn last_viewed(&self) -> Option<Quote> {
        let raw = self.session.get(LAST_VIEWED_KEY)?;
        serde_json::from_str(&raw).ok()
    }
}
