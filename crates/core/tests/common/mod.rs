//! Shared fixtures for premium/reconciliation tests

#![allow(dead_code)]

use std::sync::Arc;

use pantry_core::billing::{SandboxGateway, PREMIUM_PRODUCT_ID};
use pantry_core::entitlement::PREMIUM_KEY;
use pantry_core::kv::{KeyValueStore, MemoryKv, PersistenceError};
use pantry_core::{EntitlementStore, PremiumService};

/// Storage whose writes always fail; reads see whatever it was seeded with.
pub struct FailingKv {
    inner: MemoryKv,
}

impl FailingKv {
    pub fn new() -> Self {
        Self {
            inner: MemoryKv::new(),
        }
    }
}

impl KeyValueStore for FailingKv {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), PersistenceError> {
        Err(PersistenceError::Io {
            path: "/read-only/state.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.set(key, "")
    }
}

pub fn product_ids() -> Vec<String> {
    vec![PREMIUM_PRODUCT_ID.to_string()]
}

/// Storage seeded with the given premium flag.
pub fn kv_with_premium(has_premium: bool) -> Arc<MemoryKv> {
    if has_premium {
        Arc::new(MemoryKv::with_entries([(PREMIUM_KEY, "true")]))
    } else {
        Arc::new(MemoryKv::new())
    }
}

/// A service over a sandbox handle the test keeps for scripting.
pub fn service(has_premium: bool) -> (PremiumService, SandboxGateway, Arc<MemoryKv>) {
    let kv = kv_with_premium(has_premium);
    let store = Arc::new(EntitlementStore::load(kv.clone()));
    let sandbox = SandboxGateway::new();
    let svc = PremiumService::new(sandbox.clone(), store, product_ids());
    (svc, sandbox, kv)
}
