//! Pantry CLI library: exposed for integration tests

pub mod commands;
pub mod logging;
pub mod output;
pub mod progress;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::favorites::FavoritesAction;
use commands::search::HistoryAction;
use commands::shop::ShopAction;

#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Recipe app state: premium access, favorites and shopping list", long_about = None)]
#[command(version = pantry_core::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: ~/.config/pantry/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// State file (default: ~/.config/pantry/state.json)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file
    Init {
        /// Where to write it (default: ~/.config/pantry/config.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Reconcile with the store and show premium status (default command)
    Status {
        /// Recipe bundle for locked/unlocked counts
        #[arg(long)]
        recipes: Option<PathBuf>,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// List purchasable products and prices
    Offerings,

    /// Buy premium access
    Purchase {
        /// Product to buy (default: first configured product)
        product_id: Option<String>,
    },

    /// Restore purchases made on another device or before a reinstall
    Restore,

    /// Clear the local premium flag (testing only)
    Reset {
        /// Skip the confirmation notice
        #[arg(long)]
        yes: bool,
    },

    /// Show recipes with their lock state
    Recipes {
        /// JSON array of recipes
        file: PathBuf,

        /// Free recipes first
        #[arg(long)]
        free_first: bool,
    },

    /// Manage favorite recipes
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },

    /// Manage the shopping list
    Shop {
        #[command(subcommand)]
        action: Option<ShopAction>,
    },

    /// Search recipes by name, description or ingredient
    Search {
        /// JSON array of recipes
        file: PathBuf,
        query: String,
    },

    /// Recent searches
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Finish first-run setup
    Onboard {
        /// Name to greet you by
        #[arg(long)]
        name: Option<String>,

        /// Language to use (kk, ru, en)
        #[arg(long)]
        language: Option<String>,

        /// Show onboarding again next time
        #[arg(long)]
        reset: bool,
    },

    /// Show or change the app language (kk, ru, en)
    Language {
        code: Option<String>,
    },
}
