//! Write a default config file

use anyhow::{Context, Result};
use colored::Colorize;
use pantry_core::PantryConfig;
use std::path::{Path, PathBuf};

pub fn run(path: Option<&Path>, force: bool) -> Result<()> {
    let config_path: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => PantryConfig::default_path().context("Could not determine config directory")?,
    };

    if config_path.exists() && !force {
        eprintln!(
            "  {} {} already exists (use --force to overwrite)",
            "\u{26a0}".yellow(),
            config_path.display()
        );
        return Ok(());
    }

    PantryConfig::default().save(&config_path)?;

    eprintln!(
        "  {} Created {}",
        "\u{2713}".green(),
        config_path.display()
    );
    eprintln!();
    eprintln!("  Set {} to talk to a real billing backend.", "billing.provider = \"http\"".bold());
    Ok(())
}
