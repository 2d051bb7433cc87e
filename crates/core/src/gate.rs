//! Content gate: decides whether a recipe renders locked

use crate::entitlement::Entitlement;
use crate::recipe::Recipe;

/// A recipe is locked when it is premium and the user has no entitlement.
pub fn is_locked(recipe: &Recipe, entitlement: Entitlement) -> bool {
    !recipe.is_free && !entitlement.has_premium
}

/// Free recipes first, keeping the original order within each group.
pub fn sort_free_first(recipes: &mut [Recipe]) {
    recipes.sort_by_key(|r| !r.is_free);
}

/// Free/premium counts shown on the paywall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogSummary {
    pub free: usize,
    pub premium: usize,
}

impl CatalogSummary {
    pub fn of(recipes: &[Recipe]) -> Self {
        let free = recipes.iter().filter(|r| r.is_free).count();
        Self {
            free,
            premium: recipes.len() - free,
        }
    }

    /// Recipes the given entitlement can open.
    pub fn unlocked(&self, entitlement: Entitlement) -> usize {
        if entitlement.has_premium {
            self.free + self.premium
        } else {
            self.free
        }
    }
}
