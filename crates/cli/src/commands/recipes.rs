//! `pantry recipes`: list a recipe bundle with lock state

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use pantry_core::gate::sort_free_first;
use pantry_core::recipe::load_recipes;
use pantry_core::{is_locked, CatalogSummary, Entitlement, Pantry, Recipe};

/// One printed line of the recipe list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRow {
    pub id: String,
    pub name: String,
    pub locked: bool,
    pub favorite: bool,
}

/// Rows in display order. `free_first` keeps relative order within each group.
pub fn recipe_rows(
    mut recipes: Vec<Recipe>,
    entitlement: Entitlement,
    free_first: bool,
    is_favorite: impl Fn(&str) -> bool,
) -> Vec<RecipeRow> {
    if free_first {
        sort_free_first(&mut recipes);
    }
    recipes
        .into_iter()
        .map(|r| RecipeRow {
            locked: is_locked(&r, entitlement),
            favorite: is_favorite(&r.id),
            name: if r.name.is_empty() { r.id.clone() } else { r.name },
            id: r.id,
        })
        .collect()
}

pub fn run(app: &Pantry, file: &Path, free_first: bool) -> Result<()> {
    let recipes = load_recipes(file)?;
    let summary = CatalogSummary::of(&recipes);
    let entitlement = app.premium().entitlement();
    let favorites = app.favorites();

    let rows = recipe_rows(recipes, entitlement, free_first, |id| {
        favorites.is_favorite(id)
    });

    for row in &rows {
        let marker = if row.locked { "\u{1f512}" } else { "  " };
        let star = if row.favorite { "\u{2605}".yellow() } else { " ".normal() };
        let name = if row.locked {
            row.name.dimmed()
        } else {
            row.name.normal()
        };
        eprintln!("  {} {} {:<16} {}", marker, star, row.id.cyan(), name);
    }

    eprintln!();
    eprintln!(
        "  {} free, {} premium, {} unlocked",
        summary.free,
        summary.premium,
        summary.unlocked(entitlement).to_string().bold()
    );
    if !entitlement.has_premium && summary.premium > 0 {
        eprintln!("  Run '{}' to unlock the rest.", "pantry purchase".bold());
    }
    Ok(())
}
