//! CLI commands

pub mod favorites;
pub mod init;
pub mod language;
pub mod onboard;
pub mod premium;
pub mod recipes;
pub mod search;
pub mod shop;

use anyhow::Result;
use pantry_core::{Pantry, PantryConfig};

use crate::Cli;

/// Load config and open app state for a command.
pub fn open(cli: &Cli) -> Result<Pantry> {
    let config = PantryConfig::load(cli.config.as_deref())?;
    tracing::debug!(provider = ?config.billing.provider, state = ?cli.state, "opening app state");
    Pantry::open(config, cli.state.clone())
}
