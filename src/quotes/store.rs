use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::storage::database::Database;
use crate::storage::{QUOTES_KEY, SELECTED_CATEGORY_KEY};
use crate::sync::merge::{self, MergeReport};

use super::category::{CategoryIndex, ALL_CATEGORIES};
use super::item::{default_quotes, Quote};
use super::transfer;

struct State {
    quotes: Vec<Quote>,
    index: CategoryIndex,
}

impl State {
    fn new(quotes: Vec<Quote>) -> Self {
        let index = CategoryIndex::build(&quotes);
        Self { quotes, index }
    }

    fn set_quotes(&mut self, quotes: Vec<Quote>) {
        self.index = CategoryIndex::build(&quotes);
        self.quotes = quotes;
    }
}

/// Authoritative quote list with a durable mirror.
///
/// All mutations go through one async mutex that is held until the mirror
/// has been rewritten, so a local add and a sync merge can never overwrite
/// each other's results.
pub struct QuoteStore {
    db: Arc<Database>,
    state: Mutex<State>,
}

impl QuoteStore {
    /// Load the mirror, falling back to the built-in quotes when it is
    /// missing or unreadable.
    pub fn load(db: Arc<Database>) -> Self {
        let quotes = Self::read_mirror(&db);
        qlog!("Loaded {} quotes", quotes.len());
        Self {
            db,
            state: Mutex::new(State::new(quotes)),
        }
    }

    fn read_mirror(db: &Database) -> Vec<Quote> {
        let raw = match db.get_setting(QUOTES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default_quotes(),
            Err(e) => {
                qwarn!("Could not read stored quotes, using defaults: {}", e);
                return default_quotes();
            }
        };
        match serde_json::from_str::<Vec<Quote>>(&raw) {
            Ok(quotes) => quotes,
            Err(e) => {
                qwarn!("Stored quotes unreadable, using defaults: {}", e);
                default_quotes()
            }
        }
    }

    fn write_mirror(&self, quotes: &[Quote]) -> Result<()> {
        let json = serde_json::to_string(quotes)?;
        self.db.set_setting(QUOTES_KEY, &json)?;
        Ok(())
    }

    pub async fn quotes(&self) -> Vec<Quote> {
        self.state.lock().await.quotes.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.quotes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn categories(&self) -> CategoryIndex {
        self.state.lock().await.index.clone()
    }

    /// Rewrite the durable mirror from the in-memory list.
    pub async fn persist(&self) -> Result<()> {
        let state = self.state.lock().await;
        self.write_mirror(&state.quotes)
    }

    /// Validate and append a quote, then persist.
    pub async fn add(&self, text: &str, category: &str) -> Result<Quote> {
        let quote = Quote::new(text, category)?;
        self.append(quote.clone()).await?;
        Ok(quote)
    }

    /// Append an already validated quote, then persist. The append is
    /// undone if the mirror cannot be written.
    pub async fn append(&self, quote: Quote) -> Result<()> {
        let mut state = self.state.lock().await;
        let mut quotes = state.quotes.clone();
        quotes.push(quote);
        self.write_mirror(&quotes)?;
        state.set_quotes(quotes);
        Ok(())
    }

    /// Replace the whole list, then persist.
    pub async fn replace_all(&self, quotes: Vec<Quote>) -> Result<()> {
        let mut state = self.state.lock().await;
        self.write_mirror(&quotes)?;
        state.set_quotes(quotes);
        Ok(())
    }

    /// Merge remote titles under the writer lock and persist the result.
    pub async fn merge_remote(&self, titles: &[String]) -> Result<MergeReport> {
        let mut state = self.state.lock().await;
        let mut quotes = state.quotes.clone();
        let report = merge::merge_remote(&mut quotes, titles.iter().map(String::as_str));
        self.write_mirror(&quotes)?;
        state.set_quotes(quotes);
        Ok(report)
    }

    /// The saved category filter, or `"all"` if none was saved or the saved
    /// one no longer exists.
    pub async fn selected_category(&self) -> String {
        let saved = self.db.get_setting(SELECTED_CATEGORY_KEY).unwrap_or_else(|e| {
            qwarn!("Could not read selected category: {}", e);
            None
        });
        let state = self.state.lock().await;
        match saved {
            Some(category) if state.index.contains(&category) => category,
            _ => ALL_CATEGORIES.to_string(),
        }
    }

    pub async fn select_category(&self, category: &str) -> Result<()> {
        let state = self.state.lock().await;
        if !state.index.contains(category) {
            return Err(Error::UnknownCategory(category.to_string()));
        }
        self.db.set_setting(SELECTED_CATEGORY_KEY, category)?;
        Ok(())
    }

    /// Write the export document to `path`. Returns the number of quotes.
    pub async fn export_to(&self, path: &Path) -> Result<usize> {
        let state = self.state.lock().await;
        let doc = transfer::to_export_document(&state.quotes)?;
        tokio::fs::write(path, doc).await?;
        qlog!("Exported {} quotes to {}", state.quotes.len(), path.display());
        Ok(state.quotes.len())
    }

    /// Replace the list with the quotes in `doc`. Returns the number imported.
    pub async fn import_json(&self, doc: &str) -> Result<usize> {
        let quotes = transfer::parse_import_document(doc)?;
        let count = quotes.len();
        self.replace_all(quotes).await?;
        qlog!("Imported {} quotes", count);
        Ok(count)
    }

    pub async fn import_from(&self, path: &Path) -> Result<usize> {
        let doc = tokio::fs::read_to_string(path).await?;
        self.import_json(&doc).await
    }
}
