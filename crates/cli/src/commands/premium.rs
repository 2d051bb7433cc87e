//! Premium commands: status, offerings, purchase, restore, reset

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use pantry_core::gate::CatalogSummary;
use pantry_core::recipe::load_recipes;
use pantry_core::{Pantry, PurchaseResult, RestoreOutcome};

use crate::output::{JsonOffering, JsonPrice, JsonRecipeCounts, JsonStatus};
use crate::progress::Step;

/// How a result should be presented. Only `Error` reads as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Cancellation is informational; only real failures are errors.
pub fn purchase_notice(result: &PurchaseResult) -> Notice {
    match result {
        PurchaseResult::Purchased => Notice::new(NoticeKind::Success, "Premium unlocked"),
        PurchaseResult::Pending => Notice::new(
            NoticeKind::Info,
            "Purchase is pending approval. Premium unlocks once the store confirms it.",
        ),
        PurchaseResult::Cancelled => Notice::new(NoticeKind::Info, "Purchase cancelled"),
        PurchaseResult::Failed(msg) => Notice::new(NoticeKind::Error, msg.clone()),
    }
}

/// "Not found" is a notice distinct from an error.
pub fn restore_notice(outcome: &RestoreOutcome) -> Notice {
    match outcome {
        RestoreOutcome::Restored => Notice::new(NoticeKind::Success, "Purchase restored"),
        RestoreOutcome::NotFound => Notice::new(NoticeKind::Info, "No purchases found"),
        RestoreOutcome::Failed(msg) => Notice::new(NoticeKind::Error, msg.clone()),
    }
}

fn finish_step(step: &Step, notice: &Notice) {
    match notice.kind {
        NoticeKind::Success => step.finish(&notice.message),
        NoticeKind::Info => step.note(&notice.message),
        NoticeKind::Error => step.fail(&notice.message),
    }
}

/// Silent startup: reconcile, load offerings, and collect what `status` shows.
///
/// Connectivity problems only surface as the `warning` field.
pub fn status_report(app: &Pantry, recipes: Option<&Path>) -> Result<JsonStatus> {
    let reconciliation = app.premium().reconcile();
    let has_premium = reconciliation.has_premium;
    if reconciliation.warning.is_none() {
        // Prices for the paywall; a failure here stays out of the output too.
        if let Err(e) = app.premium().list_offerings() {
            tracing::warn!(error = %e, "offerings not loaded at startup");
        }
    }
    let summary = match recipes {
        Some(path) => Some(CatalogSummary::of(&load_recipes(path)?)),
        None => None,
    };
    let price = app.price_display();

    Ok(JsonStatus {
        has_premium,
        warning: reconciliation.warning,
        language: app.language().get().code().to_string(),
        onboarded: !app.needs_onboarding(),
        user_name: app.onboarding().user_name().map(str::to_string),
        offerings: app.premium().offerings().iter().map(JsonOffering::from).collect(),
        price: price.has_price.then(|| JsonPrice::from(&price)),
        recipes: summary.map(|s| JsonRecipeCounts::new(s, has_premium)),
    })
}

/// `pantry status`
pub fn run_status(app: &Pantry, recipes: Option<&Path>, json: bool) -> Result<()> {
    let status = status_report(app, recipes)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    if let Some(ref name) = status.user_name {
        eprintln!("  Hello, {}!", name.bold());
    }
    let premium = if status.has_premium {
        "active".green().bold()
    } else {
        "not active".dimmed()
    };
    eprintln!("  {}: {}", "Premium".bold(), premium);
    let language = app.language().get();
    eprintln!(
        "  {}: {} ({})",
        "Language".bold(),
        language.native_name(),
        language.code()
    );
    if let Some(ref counts) = status.recipes {
        eprintln!(
            "  {}: {} free, {} premium ({} unlocked)",
            "Recipes".bold(),
            counts.free,
            counts.premium,
            counts.unlocked.to_string().cyan()
        );
    }
    if !status.has_premium {
        eprintln!();
        match status.price {
            Some(ref p) => eprintln!(
                "  Run '{}' to unlock all recipes for {} ({}).",
                "pantry purchase".bold(),
                p.price.cyan(),
                p.old_price.dimmed().strikethrough()
            ),
            None => eprintln!("  Run '{}' to unlock all recipes.", "pantry purchase".bold()),
        }
    }
    if !status.onboarded {
        eprintln!("  Run '{}' to finish setup.", "pantry onboard".bold());
    }
    eprintln!();
    Ok(())
}

/// `pantry offerings`
pub fn run_offerings(app: &Pantry) -> Result<()> {
    let step = Step::new("Loading offerings");
    let offerings = match app.premium().list_offerings() {
        Ok(o) => o,
        Err(e) => {
            step.fail(&e.to_string());
            return Ok(());
        }
    };

    if offerings.is_empty() {
        step.note("store has no products for this app");
        return Ok(());
    }
    step.finish(&format!("{} product(s)", offerings.len()));
    eprintln!();

    let display = app.price_display();
    for (i, o) in offerings.iter().enumerate() {
        let was = if i == 0 && display.has_price {
            format!(" (was {})", display.old_price)
        } else {
            String::new()
        };
        eprintln!(
            "  {:<24} {}{}",
            o.product_id.bold(),
            o.localized_price.cyan(),
            was.dimmed()
        );
    }
    eprintln!();
    Ok(())
}

/// `pantry purchase [PRODUCT_ID]`
pub fn run_purchase(app: &Pantry, product_id: Option<&str>) -> Result<()> {
    if app.premium().has_premium() {
        eprintln!("  {} Premium is already active.", "\u{2713}".green());
        return Ok(());
    }

    let Some(product_id) = product_id.or_else(|| {
        app.premium()
            .product_ids()
            .first()
            .map(String::as_str)
    }) else {
        eprintln!(
            "  {} No products configured. Set billing.product_ids in the config.",
            "Error:".red().bold()
        );
        return Ok(());
    };

    let step = Step::new(format!("Purchasing {}", product_id));
    let result = app.premium().purchase(product_id);
    finish_step(&step, &purchase_notice(&result));
    Ok(())
}

/// `pantry restore`
pub fn run_restore(app: &Pantry) -> Result<()> {
    let step = Step::new("Restoring purchases");
    let outcome = app.premium().restore();
    finish_step(&step, &restore_notice(&outcome));
    Ok(())
}

/// `pantry reset`: developer-facing.
pub fn run_reset(app: &Pantry, yes: bool) -> Result<()> {
    if !yes {
        eprintln!(
            "  {} This clears the local premium flag and is meant for testing.",
            "\u{26a0}".yellow()
        );
        eprintln!("  Re-run with {} to continue.", "--yes".bold());
        return Ok(());
    }

    match app.premium().reset() {
        Ok(()) => eprintln!("  {} Premium flag cleared.", "\u{2713}".green()),
        Err(e) => eprintln!(
            "  {} Cleared for this session, but not saved: {}",
            "\u{26a0}".yellow(),
            e
        ),
    }
    Ok(())
}
