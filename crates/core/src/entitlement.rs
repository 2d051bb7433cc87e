//! Entitlement store: the cached "has premium" flag with durable backing

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::kv::{KeyValueStore, PersistenceError};

/// Storage key for the premium flag.
pub const PREMIUM_KEY: &str = "hasPremium";

const PREMIUM_VALUE: &str = "true";

/// Snapshot of the current entitlement, as consumed by the content gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Entitlement {
    pub has_premium: bool,
}

impl Entitlement {
    pub const FREE: Entitlement = Entitlement { has_premium: false };
    pub const PREMIUM: Entitlement = Entitlement { has_premium: true };
}

/// Process-wide premium flag, constructed once and shared via `Arc`.
///
/// Reads never touch storage. Writes update memory first, then persist; a failed
/// write leaves the new value in memory and is reported to the caller.
pub struct EntitlementStore {
    has_premium: AtomicBool,
    kv: Arc<dyn KeyValueStore>,
}

impl EntitlementStore {
    /// Load the flag from storage. Anything other than `"true"` is false.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let has_premium = match kv.get(PREMIUM_KEY) {
            Ok(value) => value.as_deref() == Some(PREMIUM_VALUE),
            Err(e) => {
                tracing::warn!(error = %e, "could not read premium flag, assuming free");
                false
            }
        };
        tracing::debug!(has_premium, "entitlement loaded");
        Self {
            has_premium: AtomicBool::new(has_premium),
            kv,
        }
    }

    pub fn get(&self) -> bool {
        self.has_premium.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Entitlement {
        Entitlement {
            has_premium: self.get(),
        }
    }

    /// Update the flag and persist it. `false` removes the stored key.
    pub fn set(&self, value: bool) -> Result<(), PersistenceError> {
        let previous = self.has_premium.swap(value, Ordering::SeqCst);
        if previous != value {
            tracing::info!(has_premium = value, "entitlement changed");
        }
        let result = if value {
            self.kv.set(PREMIUM_KEY, PREMIUM_VALUE)
        } else {
            self.kv.remove(PREMIUM_KEY)
        };
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "premium flag not persisted; will re-reconcile on next launch");
        }
        result
    }

    /// Clear the persisted flag and drop back to free. Diagnostic use only.
    pub fn reset(&self) -> Result<(), PersistenceError> {
        self.has_premium.store(false, Ordering::SeqCst);
        tracing::info!("entitlement reset");
        let result = self.kv.remove(PREMIUM_KEY);
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "premium flag reset not persisted");
        }
        result
    }
}

impl std::fmt::Debug for EntitlementStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntitlementStore")
            .field("has_premium", &self.get())
            .finish_non_exhaustive()
    }
}
