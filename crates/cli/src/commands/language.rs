//! `pantry language`: show or change the UI language

use anyhow::Result;
use colored::Colorize;

use pantry_core::language::Language;
use pantry_core::Pantry;

pub fn run(app: &Pantry, code: Option<&str>) -> Result<()> {
    let mut preference = app.language();

    let Some(code) = code else {
        let current = preference.get();
        for lang in Language::ALL {
            let marker = if lang == current { "\u{25cf}".green() } else { "\u{25cb}".dimmed() };
            eprintln!("  {} {}  {}", marker, lang.code().bold(), lang.native_name());
        }
        return Ok(());
    };

    let language: Language = code.parse()?;
    preference.set(language)?;
    eprintln!(
        "  {} Language set to {} ({})",
        "\u{2713}".green(),
        language.native_name(),
        language.code()
    );
    Ok(())
}
