use std::collections::HashSet;

use crate::quotes::item::Quote;

/// Category stamped on every quote the remote knows about.
pub const SERVER_CATEGORY: &str = "Server";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Remote titles that had no local match.
    pub added: usize,
    /// Local quotes whose category was overwritten by the remote.
    pub conflicts: usize,
    pub duplicates_removed: usize,
}

impl MergeReport {
    pub fn has_conflicts(&self) -> bool {
        self.conflicts > 0
    }
}

/// Fold remote titles into `local`. Remote wins: a local quote with the same
/// text has its category replaced by `"Server"`. Titles are trimmed like
/// local input; blank ones are skipped.
pub fn merge_remote<'a, I>(local: &mut Vec<Quote>, remote_titles: I) -> MergeReport
where
    I: IntoIterator<Item = &'a str>,
{
    let mut report = MergeReport::default();

    for title in remote_titles {
        let title = title.trim();
        if title.is_empty() {
            continue;
        }

        let mut matched = false;
        for quote in local.iter_mut().filter(|q| q.text == title) {
            matched = true;
            if quote.category != SERVER_CATEGORY {
                quote.category = SERVER_CATEGORY.to_string();
                report.conflicts += 1;
            }
        }

        if !matched {
            local.push(Quote {
                text: title.to_string(),
                category: SERVER_CATEGORY.to_string(),
            });
            report.added += 1;
        }
    }

    report.duplicates_removed = dedup(local);
    report
}

/// Drop later quotes whose key was already seen. Returns how many were removed.
pub fn dedup(quotes: &mut Vec<Quote>) -> usize {
    let before = quotes.len();
    let mut seen = HashSet::with_capacity(before);
    quotes.retain(|q| seen.insert(q.key()));
    before - quotes.len()
}
