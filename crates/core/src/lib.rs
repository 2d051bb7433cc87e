//! Pantry Core - entitlement and local state engine for the Pantry recipe app
//!
//! This crate provides everything below the presentation layer:
//! - Premium entitlement cache with durable backing
//! - Billing gateway abstraction (REST backend, in-process sandbox)
//! - Purchase, restore and startup reconciliation
//! - Content gating for premium recipes
//! - Favorites, shopping list, language, recent searches and onboarding stores
//! - Recipe search

pub mod app;
pub mod billing;
pub mod config;
pub mod entitlement;
pub mod favorites;
pub mod gate;
pub mod kv;
pub mod language;
pub mod onboarding;
pub mod premium;
pub mod recipe;
pub mod search;
pub mod shopping;

pub use app::Pantry;
pub use billing::{BillingGateway, Offering, PurchaseOutcome, PurchaseRecord};
pub use config::PantryConfig;
pub use entitlement::{Entitlement, EntitlementStore};
pub use gate::{is_locked, CatalogSummary};
pub use kv::{FileKv, KeyValueStore, MemoryKv, PersistenceError};
pub use premium::{PremiumService, PurchaseResult, Reconciliation, RestoreOutcome};
pub use recipe::Recipe;

/// Pantry version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
