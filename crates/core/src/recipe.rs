//! Recipe records as supplied by the host's content bundle

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub amount: String,
}

/// A recipe. Only `id` and `is_free` matter to the library; the rest is carried
/// through for favorites and the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

impl Recipe {
    pub fn new(id: impl Into<String>, is_free: bool) -> Self {
        Self {
            id: id.into(),
            is_free,
            name: String::new(),
            description: String::new(),
            ingredients: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_ingredient(mut self, name: impl Into<String>, amount: impl Into<String>) -> Self {
        self.ingredients.push(Ingredient {
            name: name.into(),
            amount: amount.into(),
        });
        self
    }
}

/// Load a JSON array of recipes.
pub fn load_recipes(path: &Path) -> Result<Vec<Recipe>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading recipes {}", path.display()))?;
    let recipes: Vec<Recipe> =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(recipes)
}

/// Find a recipe by id in a loaded bundle.
pub fn find_recipe<'a>(recipes: &'a [Recipe], id: &str) -> Option<&'a Recipe> {
    recipes.iter().find(|r| r.id == id)
}

/// Bundles number their recipes; ids are compared as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(i64),
}

impl From<IdRepr> for String {
    fn from(id: IdRepr) -> Self {
        match id {
            IdRepr::Text(s) => s,
            IdRepr::Number(n) => n.to_string(),
        }
    }
}

pub(crate) fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    IdRepr::deserialize(deserializer).map(String::from)
}

pub(crate) fn deserialize_optional_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<IdRepr>::deserialize(deserializer)?.map(String::from))
}
