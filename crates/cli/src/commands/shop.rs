//! `pantry shop`: shopping list

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use pantry_core::recipe::{find_recipe, load_recipes};
use pantry_core::shopping::{ShoppingItem, CUSTOM_GROUP};
use pantry_core::Pantry;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShopAction {
    /// Show the list grouped by recipe (default)
    List,
    /// Add an item by hand
    Add {
        name: String,
        #[arg(default_value = "")]
        amount: String,
    },
    /// Add every ingredient of a recipe
    FromRecipe {
        /// JSON array of recipes
        file: PathBuf,
        id: String,
    },
    /// Check or uncheck an item
    Toggle { id: String },
    /// Remove an item
    Remove { id: String },
    /// Empty the list
    Clear {
        /// Only remove checked items
        #[arg(long)]
        checked: bool,
    },
}

fn item_line(item: &ShoppingItem) -> String {
    let mark = if item.checked { "[x]" } else { "[ ]" };
    let text = if item.amount.is_empty() {
        item.name.clone()
    } else {
        format!("{} ({})", item.name, item.amount)
    };
    let text = if item.checked {
        text.dimmed().strikethrough().to_string()
    } else {
        text
    };
    format!("{} {}  {}", mark, text, item.id.dimmed())
}

pub fn run(app: &Pantry, action: Option<&ShopAction>) -> Result<()> {
    let mut list = app.shopping_list();

    match action.unwrap_or(&ShopAction::List) {
        ShopAction::List => {
            if list.items().is_empty() {
                eprintln!("  Shopping list is empty.");
                return Ok(());
            }
            for (key, group) in list.grouped_by_recipe() {
                let title = match group.recipe_name {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ if key == CUSTOM_GROUP => "Other".to_string(),
                    _ => key.to_string(),
                };
                eprintln!("  {}", title.bold());
                for item in group.items {
                    eprintln!("    {}", item_line(item));
                }
            }
        }
        ShopAction::Add { name, amount } => {
            let item = list.add_item(name, amount, None)?;
            eprintln!("  {} Added {}", "\u{2713}".green(), item.name.bold());
        }
        ShopAction::FromRecipe { file, id } => {
            let recipes = load_recipes(file)?;
            let Some(recipe) = find_recipe(&recipes, id) else {
                bail!("no recipe '{}' in {}", id, file.display());
            };
            let added = list.add_ingredients(recipe)?;
            if added == 0 {
                eprintln!("  {} has no ingredients", id.bold());
            } else {
                eprintln!("  {} Added {} item(s) from {}", "\u{2713}".green(), added, id.bold());
            }
        }
        ShopAction::Toggle { id } => match list.toggle(id)? {
            Some(true) => eprintln!("  {} Checked {}", "\u{2713}".green(), id),
            Some(false) => eprintln!("  Unchecked {}", id),
            None => eprintln!("  No item '{}'", id),
        },
        ShopAction::Remove { id } => {
            if list.remove(id)? {
                eprintln!("  {} Removed {}", "\u{2713}".green(), id);
            } else {
                eprintln!("  No item '{}'", id);
            }
        }
        ShopAction::Clear { checked: true } => {
            let removed = list.clear_checked()?;
            eprintln!("  {} Removed {} checked item(s)", "\u{2713}".green(), removed);
        }
        ShopAction::Clear { checked: false } => {
            list.clear_all()?;
            eprintln!("  {} Shopping list cleared", "\u{2713}".green());
        }
    }
    Ok(())
}
