//! `pantry favorites`: favorite recipes

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use pantry_core::recipe::{find_recipe, load_recipes};
use pantry_core::{is_locked, Pantry, Recipe};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum FavoritesAction {
    /// List favorites (default)
    List,
    /// Add a recipe from a bundle
    Add {
        /// JSON array of recipes
        file: PathBuf,
        id: String,
    },
    /// Remove a recipe by id
    Remove { id: String },
    /// Add if missing, remove if present
    Toggle {
        /// JSON array of recipes
        file: PathBuf,
        id: String,
    },
    /// Remove every favorite
    Clear,
}

fn recipe_from_bundle(file: &Path, id: &str) -> Result<Recipe> {
    let recipes = load_recipes(file)?;
    match find_recipe(&recipes, id) {
        Some(r) => Ok(r.clone()),
        None => bail!("no recipe '{}' in {}", id, file.display()),
    }
}

pub fn run(app: &Pantry, action: Option<&FavoritesAction>) -> Result<()> {
    let mut favorites = app.favorites();

    match action.unwrap_or(&FavoritesAction::List) {
        FavoritesAction::List => {
            if favorites.list().is_empty() {
                eprintln!("  No favorites yet.");
                return Ok(());
            }
            let entitlement = app.premium().entitlement();
            for r in favorites.list() {
                let marker = if is_locked(r, entitlement) { "\u{1f512}" } else { "  " };
                eprintln!("  {} {:<16} {}", marker, r.id.cyan(), r.name);
            }
        }
        FavoritesAction::Add { file, id } => {
            let recipe = recipe_from_bundle(file, id)?;
            if favorites.add(&recipe)? {
                eprintln!("  {} Added {}", "\u{2605}".yellow(), id.bold());
            } else {
                eprintln!("  {} is already a favorite", id.bold());
            }
        }
        FavoritesAction::Remove { id } => {
            if favorites.remove(id)? {
                eprintln!("  {} Removed {}", "\u{2713}".green(), id.bold());
            } else {
                eprintln!("  {} is not a favorite", id.bold());
            }
        }
        FavoritesAction::Toggle { file, id } => {
            let recipe = recipe_from_bundle(file, id)?;
            if favorites.toggle(&recipe)? {
                eprintln!("  {} Added {}", "\u{2605}".yellow(), id.bold());
            } else {
                eprintln!("  {} Removed {}", "\u{2713}".green(), id.bold());
            }
        }
        FavoritesAction::Clear => {
            let count = favorites.list().len();
            favorites.clear()?;
            eprintln!("  {} Cleared {} favorite(s)", "\u{2713}".green(), count);
        }
    }
    Ok(())
}
