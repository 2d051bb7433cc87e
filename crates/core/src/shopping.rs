//! Shopping list, persisted under the `shoppingList` key

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::kv::{self, KeyValueStore, PersistenceError};
use crate::recipe::Recipe;

pub const SHOPPING_LIST_KEY: &str = "shoppingList";

/// Group key for items added by hand.
pub const CUSTOM_GROUP: &str = "custom";

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default, deserialize_with = "crate::recipe::deserialize_optional_id")]
    pub recipe_id: Option<String>,
    #[serde(default)]
    pub recipe_name: Option<String>,
    /// RFC 3339 UTC with milliseconds, e.g. `2024-05-01T10:00:00.000Z`
    #[serde(default, deserialize_with = "deserialize_added_at")]
    pub added_at: String,
}

/// Items sharing a source recipe (or the custom group).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemGroup<'a> {
    pub recipe_name: Option<&'a str>,
    pub items: Vec<&'a ShoppingItem>,
}

pub struct ShoppingList {
    items: Vec<ShoppingItem>,
    /// Stored entries we couldn't decode; written back untouched.
    unreadable: Vec<serde_json::Value>,
    kv: Arc<dyn KeyValueStore>,
}

impl ShoppingList {
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let list = kv::load_json_list(kv.as_ref(), SHOPPING_LIST_KEY);
        Self {
            items: list.items,
            unreadable: list.unreadable,
            kv,
        }
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    /// Add one item, optionally attributed to a recipe.
    pub fn add_item(
        &mut self,
        name: &str,
        amount: &str,
        recipe: Option<&Recipe>,
    ) -> Result<ShoppingItem, PersistenceError> {
        let item = new_item(name, amount, recipe);
        self.items.push(item.clone());
        self.save()?;
        Ok(item)
    }

    /// Add every ingredient of a recipe. Returns how many items were added.
    pub fn add_ingredients(&mut self, recipe: &Recipe) -> Result<usize, PersistenceError> {
        let added: Vec<ShoppingItem> = recipe
            .ingredients
            .iter()
            .map(|ing| new_item(&ing.name, &ing.amount, Some(recipe)))
            .collect();
        let count = added.len();
        if count == 0 {
            return Ok(0);
        }
        self.items.extend(added);
        self.save()?;
        Ok(count)
    }

    /// Flip the checked flag. Returns the new state, or `None` if no such item.
    pub fn toggle(&mut self, item_id: &str) -> Result<Option<bool>, PersistenceError> {
        let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) else {
            return Ok(None);
        };
        item.checked = !item.checked;
        let checked = item.checked;
        self.save()?;
        Ok(Some(checked))
    }

    pub fn remove(&mut self, item_id: &str) -> Result<bool, PersistenceError> {
        let before = self.items.len();
        self.items.retain(|i| i.id != item_id);
        if self.items.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub fn clear_all(&mut self) -> Result<(), PersistenceError> {
        self.items.clear();
        self.unreadable.clear();
        self.kv.remove(SHOPPING_LIST_KEY)
    }

    /// Drop checked items. Returns how many were removed.
    pub fn clear_checked(&mut self) -> Result<usize, PersistenceError> {
        let before = self.items.len();
        self.items.retain(|i| !i.checked);
        let removed = before - self.items.len();
        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }

    /// Group items by source recipe id; hand-added items go under [`CUSTOM_GROUP`].
    pub fn grouped_by_recipe(&self) -> BTreeMap<&str, ItemGroup<'_>> {
        let mut groups: BTreeMap<&str, ItemGroup<'_>> = BTreeMap::new();
        for item in &self.items {
            let key = item.recipe_id.as_deref().unwrap_or(CUSTOM_GROUP);
            groups
                .entry(key)
                .or_insert_with(|| ItemGroup {
                    recipe_name: item.recipe_name.as_deref(),
                    items: Vec::new(),
                })
                .items
                .push(item);
        }
        groups
    }

    fn save(&self) -> Result<(), PersistenceError> {
        let result = kv::save_json_list(
            self.kv.as_ref(),
            SHOPPING_LIST_KEY,
            &self.items,
            &self.unreadable,
        );
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "shopping list not saved");
        }
        result
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts the RFC 3339 string form and, for lists written as Unix seconds,
/// a number.
fn deserialize_added_at<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Secs(i64),
    }

    Ok(match Option::<Repr>::deserialize(deserializer)? {
        Some(Repr::Text(s)) => s,
        Some(Repr::Secs(secs)) => DateTime::from_timestamp(secs, 0)
            .map(timestamp)
            .unwrap_or_default(),
        None => String::new(),
    })
}

fn new_item(name: &str, amount: &str, recipe: Option<&Recipe>) -> ShoppingItem {
    let now = Utc::now();
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    ShoppingItem {
        id: format!("{}_{}", now.timestamp_millis(), seq),
        name: name.to_string(),
        amount: amount.to_string(),
        checked: false,
        recipe_id: recipe.map(|r| r.id.clone()),
        recipe_name: recipe.map(|r| r.name.clone()),
        added_at: timestamp(now),
    }
}
