use super::item::Quote;

/// Sentinel that matches every category.
pub const ALL_CATEGORIES: &str = "all";

/// Distinct categories in order of first occurrence, always led by `"all"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryIndex {
    categories: Vec<String>,
}

impl CategoryIndex {
    pub fn build(quotes: &[Quote]) -> Self {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for quote in quotes {
            if !categories.iter().any(|c| c == &quote.category) {
                categories.push(quote.category.clone());
            }
        }
        Self { categories }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// Quotes visible under `category`.
pub fn filter<'a>(quotes: &'a [Quote], category: &str) -> Vec<&'a Quote> {
    if category == ALL_CATEGORIES {
        return quotes.iter().collect();
    }
    quotes.iter().filter(|q| q.category == category).collect()
}
