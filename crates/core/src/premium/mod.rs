//! Premium access: purchase, restore and startup reconciliation
//!
//! Reconciliation flow:
//! 1. Read the cached flag (may be stale)
//! 2. Connect to the billing backend: on failure keep the cache
//! 3. List completed purchases: on failure keep the cache
//! 4. Any recognized product id → set the flag
//! 5. Backend says "no" → leave the cache alone (never downgrade)

pub mod outcome;
pub mod pricing;
pub mod service;

pub use outcome::{BackendError, PurchaseResult, Reconciliation, RestoreOutcome};
pub use pricing::{PriceDisplay, DEFAULT_OLD_PRICE_MULTIPLIER};
pub use service::PremiumService;
