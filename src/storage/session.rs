use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory key-value storage scoped to one process run.
#[derive(Default)]
pub struct SessionStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: String) {
        self.entries().insert(key.to_string(), value);
    }

    /// Drop every entry. Called when the session ends.
    pub fn clear(&self) {
        self.entries().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_forgets_everything() {
        let session = SessionStorage::new();
        session.set("lastViewedQuote", "{}".to_string());
        assert_eq!(session.get("lastViewedQuote").as_deref(), Some("{}"));
        session.clear();
        assert_eq!(session.get("lastViewedQuote"), None);
    }
}
