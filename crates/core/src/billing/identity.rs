//! Anonymous app-user id for the billing backend
//!
//! Purchases are attributed to this id, so it must survive restarts. It is
//! minted once per install and kept in local state under `appUserId`.

use sha2::{Digest, Sha256};

use crate::kv::KeyValueStore;

pub const APP_USER_ID_KEY: &str = "appUserId";

/// Prefix marking ids minted on the device rather than assigned by an account.
pub const ANONYMOUS_PREFIX: &str = "$anon:";

/// The stored id, minting and saving a new one on first use.
///
/// A failed save still returns the fresh id; the next start mints another and
/// restore recovers any purchase made in between.
pub fn app_user_id(kv: &dyn KeyValueStore) -> String {
    match kv.get(APP_USER_ID_KEY) {
        Ok(Some(id)) if is_anonymous_id(&id) => return id,
        Ok(Some(_)) => tracing::warn!("stored app user id is malformed, minting a new one"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "could not read app user id"),
    }

    let id = mint(&install_entropy());
    match kv.set(APP_USER_ID_KEY, &id) {
        Ok(()) => tracing::info!(app_user_id = %id, "minted app user id"),
        Err(e) => tracing::warn!(error = %e, "app user id not saved"),
    }
    id
}

pub fn is_anonymous_id(id: &str) -> bool {
    id.strip_prefix(ANONYMOUS_PREFIX)
        .is_some_and(|hex| hex.len() == 32 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

fn install_entropy() -> String {
    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_default();
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}:{}:{}", host, std::process::id(), nanos)
}

fn mint(entropy: &str) -> String {
    let hash = Sha256::digest(entropy.as_bytes());
    let hex: String = hash[..16].iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}{}", ANONYMOUS_PREFIX, hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;

    #[test]
    fn id_is_minted_once_and_reused() {
        let kv = MemoryKv::new();
        let first = app_user_id(&kv);
        assert!(is_anonymous_id(&first), "unexpected id: {first}");
        assert_eq!(app_user_id(&kv), first);
        assert_eq!(kv.get(APP_USER_ID_KEY).unwrap().as_deref(), Some(first.as_str()));
    }

    #[test]
    fn malformed_id_is_replaced() {
        let kv = MemoryKv::with_entries([(APP_USER_ID_KEY, "garbage")]);
        let id = app_user_id(&kv);
        assert!(is_anonymous_id(&id));
        assert_ne!(id, "garbage");
    }

    #[test]
    fn different_entropy_differs() {
        assert_ne!(mint("a:1:1"), mint("a:1:2"));
        assert!(is_anonymous_id(&mint("")));
    }

    #[test]
    fn rejects_foreign_ids() {
        assert!(!is_anonymous_id("user-42"));
        assert!(!is_anonymous_id("$anon:xyz"));
    }
}
