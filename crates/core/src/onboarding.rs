//! First-run state: `hasSeenOnboarding` and the optional `userName`

use std::sync::Arc;

use crate::kv::{KeyValueStore, PersistenceError};
use crate::language::LanguagePreference;

pub const ONBOARDING_KEY: &str = "hasSeenOnboarding";
pub const USER_NAME_KEY: &str = "userName";

pub struct Onboarding {
    seen: bool,
    user_name: Option<String>,
    kv: Arc<dyn KeyValueStore>,
}

impl Onboarding {
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let seen = read(kv.as_ref(), ONBOARDING_KEY).as_deref() == Some("true");
        let user_name = read(kv.as_ref(), USER_NAME_KEY).filter(|n| !n.trim().is_empty());
        Self {
            seen,
            user_name,
            kv,
        }
    }

    pub fn has_seen(&self) -> bool {
        self.seen
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// Onboarding is done once it has been seen and a language was picked.
    pub fn is_complete(&self, language: &LanguagePreference) -> bool {
        self.seen && language.is_chosen()
    }

    /// Mark onboarding as seen. A blank name leaves any stored name alone.
    pub fn complete(&mut self, user_name: Option<&str>) -> Result<(), PersistenceError> {
        self.kv.set(ONBOARDING_KEY, "true").inspect_err(|e| {
            tracing::warn!(error = %e, "onboarding state not saved");
        })?;
        self.seen = true;

        if let Some(name) = user_name.map(str::trim).filter(|n| !n.is_empty()) {
            self.kv.set(USER_NAME_KEY, name).inspect_err(|e| {
                tracing::warn!(error = %e, "user name not saved");
            })?;
            self.user_name = Some(name.to_string());
        }
        Ok(())
    }

    /// Show onboarding again on next start. The user name is kept.
    pub fn reset(&mut self) -> Result<(), PersistenceError> {
        self.seen = false;
        self.kv.remove(ONBOARDING_KEY)
    }
}

fn read(kv: &dyn KeyValueStore, key: &str) -> Option<String> {
    kv.get(key)
        .inspect_err(|e| tracing::warn!(key, error = %e, "could not read onboarding state"))
        .ok()
        .flatten()
}
