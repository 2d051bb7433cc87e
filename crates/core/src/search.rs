//! Recipe search and the recent-search history under `recentSearches`

use std::sync::Arc;

use crate::kv::{self, KeyValueStore, PersistenceError};
use crate::recipe::Recipe;

pub const RECENT_SEARCHES_KEY: &str = "recentSearches";

/// History length; older queries fall off the end.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Recipes whose name, description or any ingredient name contains `query`,
/// ignoring case. A blank query matches nothing.
pub fn search_recipes<'a>(recipes: &'a [Recipe], query: &str) -> Vec<&'a Recipe> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    recipes
        .iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&needle)
                || r.description.to_lowercase().contains(&needle)
                || r
                    .ingredients
                    .iter()
                    .any(|i| i.name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Most recent first, no duplicates.
pub struct RecentSearches {
    queries: Vec<String>,
    kv: Arc<dyn KeyValueStore>,
}

impl RecentSearches {
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let queries = kv::load_json(kv.as_ref(), RECENT_SEARCHES_KEY).unwrap_or_default();
        Self { queries, kv }
    }

    pub fn list(&self) -> &[String] {
        &self.queries
    }

    /// Move `query` to the front, dropping anything past the limit.
    /// Blank queries are not recorded.
    pub fn record(&mut self, query: &str) -> Result<(), PersistenceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }
        self.queries.retain(|q| q != query);
        self.queries.insert(0, query.to_string());
        self.queries.truncate(MAX_RECENT_SEARCHES);
        self.save()
    }

    /// Returns `Ok(false)` if the query wasn't in the history.
    pub fn remove(&mut self, query: &str) -> Result<bool, PersistenceError> {
        let before = self.queries.len();
        self.queries.retain(|q| q != query);
        if self.queries.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.queries.clear();
        self.kv.remove(RECENT_SEARCHES_KEY)
    }

    fn save(&self) -> Result<(), PersistenceError> {
        let result = kv::save_json(self.kv.as_ref(), RECENT_SEARCHES_KEY, &self.queries);
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "recent searches not saved");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> Vec<Recipe> {
        vec![
            Recipe::new("plov", false)
                .named("Plov")
                .described("Rice with lamb")
                .with_ingredient("Carrot", "3"),
            Recipe::new("borsch", true)
                .named("Borsch")
                .with_ingredient("Beet", "2"),
        ]
    }

    #[test]
    fn matches_name_description_and_ingredients() {
        let recipes = bundle();
        let ids = |q: &str| -> Vec<String> {
            search_recipes(&recipes, q).iter().map(|r| r.id.clone()).collect()
        };
        assert_eq!(ids("PLO"), vec!["plov"]);
        assert_eq!(ids("lamb"), vec!["plov"]);
        assert_eq!(ids("beet"), vec!["borsch"]);
        assert!(ids("fish").is_empty());
    }

    #[test]
    fn blank_query_matches_nothing() {
        assert!(search_recipes(&bundle(), "   ").is_empty());
    }
}
