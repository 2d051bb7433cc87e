//! `pantry onboard`: first-run setup

use anyhow::Result;
use colored::Colorize;

use pantry_core::language::Language;
use pantry_core::Pantry;

pub fn run(app: &Pantry, name: Option<&str>, language: Option<&str>, reset: bool) -> Result<()> {
    let mut onboarding = app.onboarding();

    if reset {
        onboarding.reset()?;
        eprintln!("  {} Onboarding will show again.", "\u{2713}".green());
        return Ok(());
    }

    let mut preference = app.language();
    match language {
        Some(code) => preference.set(code.parse::<Language>()?)?,
        // Accept the current language if none was ever picked.
        None if !preference.is_chosen() => preference.set(preference.get())?,
        None => {}
    }
    onboarding.complete(name)?;

    match onboarding.user_name() {
        Some(n) => eprintln!("  {} Welcome, {}!", "\u{2713}".green(), n.bold()),
        None => eprintln!("  {} Setup complete.", "\u{2713}".green()),
    }
    eprintln!(
        "  Language: {} ({})",
        preference.get().native_name(),
        preference.get().code()
    );
    Ok(())
}
