pub mod database;
pub mod session;

/// Durable key holding the JSON-encoded quote list.
pub const QUOTES_KEY: &str = "quotes";
/// Durable key holding the last selected category filter.
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";
/// Session key holding the JSON-encoded last displayed quote.
pub const LAST_VIEWED_KEY: &str = "lastViewedQuote";
