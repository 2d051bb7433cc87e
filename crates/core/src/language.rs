//! UI language preference, persisted under the `selectedLanguage` key

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::kv::{KeyValueStore, PersistenceError};

pub const LANGUAGE_KEY: &str = "selectedLanguage";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Kk,
    #[default]
    Ru,
    En,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Kk, Language::Ru, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::Kk => "kk",
            Language::Ru => "ru",
            Language::En => "en",
        }
    }

    /// Name of the language in itself.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::Kk => "Қазақша",
            Language::Ru => "Русский",
            Language::En => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported language '{0}' (expected one of: kk, ru, en)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kk" => Ok(Language::Kk),
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

pub struct LanguagePreference {
    language: Language,
    chosen: bool,
    kv: Arc<dyn KeyValueStore>,
}

impl LanguagePreference {
    /// Load the stored language, falling back to `default` if unset or unknown.
    pub fn load(kv: Arc<dyn KeyValueStore>, default: Language) -> Self {
        let stored = match kv.get(LANGUAGE_KEY) {
            Ok(Some(code)) => code
                .parse::<Language>()
                .map_err(|e: UnknownLanguage| tracing::warn!(error = %e, "ignoring stored language"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "could not read language preference");
                None
            }
        };
        Self {
            language: stored.unwrap_or(default),
            chosen: stored.is_some(),
            kv,
        }
    }

    pub fn get(&self) -> Language {
        self.language
    }

    /// Whether the user has picked a language, as opposed to running on the default.
    pub fn is_chosen(&self) -> bool {
        self.chosen
    }

    pub fn set(&mut self, language: Language) -> Result<(), PersistenceError> {
        self.language = language;
        self.chosen = true;
        let result = self.kv.set(LANGUAGE_KEY, language.code());
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "language preference not saved");
        }
        result
    }
}
