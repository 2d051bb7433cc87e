//! Favorite recipes, persisted under the `favorites` key

use std::sync::Arc;

use crate::kv::{self, KeyValueStore, PersistenceError};
use crate::recipe::Recipe;

pub const FAVORITES_KEY: &str = "favorites";

/// Favorites keep whole recipe snapshots so they render without the catalog.
pub struct Favorites {
    recipes: Vec<Recipe>,
    /// Stored entries that aren't recipes we can read; written back untouched.
    unreadable: Vec<serde_json::Value>,
    kv: Arc<dyn KeyValueStore>,
}

impl Favorites {
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let list = kv::load_json_list(kv.as_ref(), FAVORITES_KEY);
        Self {
            recipes: list.items,
            unreadable: list.unreadable,
            kv,
        }
    }

    pub fn list(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn is_favorite(&self, recipe_id: &str) -> bool {
        self.recipes.iter().any(|r| r.id == recipe_id)
    }

    /// Add a recipe. Returns `Ok(false)` if it was already a favorite.
    pub fn add(&mut self, recipe: &Recipe) -> Result<bool, PersistenceError> {
        if self.is_favorite(&recipe.id) {
            return Ok(false);
        }
        self.recipes.push(recipe.clone());
        self.save()?;
        Ok(true)
    }

    /// Remove a recipe. Returns `Ok(false)` if it was not a favorite.
    pub fn remove(&mut self, recipe_id: &str) -> Result<bool, PersistenceError> {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != recipe_id);
        if self.recipes.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Flip favorite status. Returns `true` if the recipe is now a favorite.
    pub fn toggle(&mut self, recipe: &Recipe) -> Result<bool, PersistenceError> {
        if self.is_favorite(&recipe.id) {
            self.remove(&recipe.id)?;
            Ok(false)
        } else {
            self.add(recipe)?;
            Ok(true)
        }
    }

    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.recipes.clear();
        self.unreadable.clear();
        self.kv.remove(FAVORITES_KEY)
    }

    fn save(&self) -> Result<(), PersistenceError> {
        let result = kv::save_json_list(
            self.kv.as_ref(),
            FAVORITES_KEY,
            &self.recipes,
            &self.unreadable,
        );
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "favorites not saved");
        }
        result
    }
}
