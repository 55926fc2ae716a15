use crate::error::{Error, Result};

use super::item::Quote;

/// Serialize quotes as the pretty-printed export document.
pub fn to_export_document(quotes: &[Quote]) -> Result<String> {
    Ok(serde_json::to_string_pretty(quotes)?)
}

/// Parse an import document. Anything other than a JSON array of
/// `{text, category}` objects with non-blank fields is rejected.
pub fn parse_import_document(doc: &str) -> Result<Vec<Quote>> {
    let value: serde_json::Value =
        serde_json::from_str(doc).map_err(|e| Error::ImportFormat(format!("not valid JSON: {e}")))?;

    if !value.is_array() {
        return Err(Error::ImportFormat(
            "expected a JSON array of quotes".to_string(),
        ));
    }

    let quotes: Vec<Quote> = serde_json::from_value(value)
        .map_err(|e| Error::ImportFormat(format!("unexpected quote shape: {e}")))?;

    if let Some(pos) = quotes.iter().position(|q| !q.is_valid()) {
        return Err(Error::ImportFormat(format!(
            "quote #{} has an empty text or category",
            pos + 1
        )));
    }

    Ok(quotes)
}
