use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

/// Identity of a quote: SHA-256 over the trimmed text and category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteKey(String);

impl Quote {
    /// Build a quote from user input, trimming both fields.
    pub fn new(text: &str, category: &str) -> Result<Self> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() || category.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && !self.category.trim().is_empty()
    }

    pub fn key(&self) -> QuoteKey {
        let mut hasher = Sha256::new();
        hasher.update(self.text.trim().as_bytes());
        // Separator byte cannot appear in either field's UTF-8.
        hasher.update([0xffu8]);
        hasher.update(self.category.trim().as_bytes());
        QuoteKey(format!("{:x}", hasher.finalize()))
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" - {}", self.text, self.category)
    }
}

/// The quotes a fresh install starts with.
pub fn default_quotes() -> Vec<Quote> {
    [
        ("Believe in yourself.", "Motivation"),
        ("Knowledge is power.", "Wisdom"),
        ("Success is a journey, not a destination.", "Success"),
        ("Happiness depends upon ourselves.", "Happiness"),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        text: text.to_string(),
        category: category.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_fields() {
        let quote = Quote::new("  Stay hungry.  ", "\tGrit ").unwrap();
        assert_eq!(quote.text, "Stay hungry.");
        assert_eq!(quote.category, "Grit");
    }

    #[test]
    fn test_new_rejects_blank_fields() {
        assert!(matches!(Quote::new("   ", "Wisdom"), Err(Error::EmptyInput)));
        assert!(matches!(Quote::new("Text", ""), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_key_ignores_surrounding_whitespace() {
        let a = Quote {
            text: "A".into(),
            category: "X".into(),
        };
        let b = Quote {
            text: " A ".into(),
            category: "X\n".into(),
        };
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_key_distinguishes_field_boundaries() {
        let a = Quote {
            text: "ab".into(),
            category: "c".into(),
        };
        let b = Quote {
            text: "a".into(),
            category: "bc".into(),
        };
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_display_format() {
        let quote = Quote::new("Knowledge is power.", "Wisdom").unwrap();
        assert_eq!(quote.to_string(), "\"Knowledge is power.\" - Wisdom");
    }

    #[test]
    fn test_four_defaults() {
        let defaults = default_quotes();
        assert_eq!(defaults.len(), 4);
        assert!(defaults.iter().all(Quote::is_valid));
    }
}
