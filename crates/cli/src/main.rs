//! Pantry CLI - recipe app host

use anyhow::Result;
use clap::Parser;

use pantry_cli::{commands, logging, Cli, Commands};

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { ref path, force }) => {
            commands::init::run(path.as_deref(), force)?;
        }
        Some(Commands::Status { ref recipes, json }) => {
            let app = commands::open(&cli)?;
            commands::premium::run_status(&app, recipes.as_deref(), json)?;
        }
        Some(Commands::Offerings) => {
            let app = commands::open(&cli)?;
            commands::premium::run_offerings(&app)?;
        }
        Some(Commands::Purchase { ref product_id }) => {
            let app = commands::open(&cli)?;
            commands::premium::run_purchase(&app, product_id.as_deref())?;
        }
        Some(Commands::Restore) => {
            let app = commands::open(&cli)?;
            commands::premium::run_restore(&app)?;
        }
        Some(Commands::Reset { yes }) => {
            let app = commands::open(&cli)?;
            commands::premium::run_reset(&app, yes)?;
        }
        Some(Commands::Recipes { ref file, free_first }) => {
            let app = commands::open(&cli)?;
            commands::recipes::run(&app, file, free_first)?;
        }
        Some(Commands::Favorites { ref action }) => {
            let app = commands::open(&cli)?;
            commands::favorites::run(&app, action.as_ref())?;
        }
        Some(Commands::Shop { ref action }) => {
            let app = commands::open(&cli)?;
            commands::shop::run(&app, action.as_ref())?;
        }
        Some(Commands::Search { ref file, ref query }) => {
            let app = commands::open(&cli)?;
            commands::search::run(&app, file, query)?;
        }
        Some(Commands::History { ref action }) => {
            let app = commands::open(&cli)?;
            commands::search::run_history(&app, action.as_ref())?;
        }
        Some(Commands::Onboard {
            ref name,
            ref language,
            reset,
        }) => {
            let app = commands::open(&cli)?;
            commands::onboard::run(&app, name.as_deref(), language.as_deref(), reset)?;
        }
        Some(Commands::Language { ref code }) => {
            let app = commands::open(&cli)?;
            commands::language::run(&app, code.as_deref())?;
        }
        None => {
            // Default command is a silent status check
            let app = commands::open(&cli)?;
            commands::premium::run_status(&app, None, false)?;
        }
    }

    Ok(())
}
