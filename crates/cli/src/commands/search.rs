//! `pantry search` and `pantry history`

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use std::path::Path;

use pantry_core::recipe::load_recipes;
use pantry_core::search::search_recipes;
use pantry_core::{is_locked, Pantry};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    /// Show recent searches (default)
    List,
    /// Forget one query
    Remove { query: String },
    /// Forget every query
    Clear,
}

pub fn run(app: &Pantry, file: &Path, query: &str) -> Result<()> {
    let recipes = load_recipes(file)?;
    let found = search_recipes(&recipes, query);

    // History is a convenience; losing it must not fail the search.
    let _ = app.recent_searches().record(query);

    if found.is_empty() {
        eprintln!("  Nothing found for '{}'", query.trim());
        return Ok(());
    }
    let entitlement = app.premium().entitlement();
    for r in &found {
        let marker = if is_locked(r, entitlement) { "\u{1f512}" } else { "  " };
        eprintln!("  {} {:<16} {}", marker, r.id.cyan(), r.name);
    }
    eprintln!();
    eprintln!("  {} match(es)", found.len());
    Ok(())
}

pub fn run_history(app: &Pantry, action: Option<&HistoryAction>) -> Result<()> {
    let mut history = app.recent_searches();

    match action.unwrap_or(&HistoryAction::List) {
        HistoryAction::List => {
            if history.list().is_empty() {
                eprintln!("  No recent searches.");
            }
            for q in history.list() {
                eprintln!("  {}", q);
            }
        }
        HistoryAction::Remove { query } => {
            if history.remove(query)? {
                eprintln!("  {} Forgot '{}'", "\u{2713}".green(), query);
            } else {
                eprintln!("  '{}' is not in the history", query);
            }
        }
        HistoryAction::Clear => {
            history.clear()?;
            eprintln!("  {} Search history cleared", "\u{2713}".green());
        }
    }
    Ok(())
}
