use std::path::PathBuf;
use std::sync::Arc;

use pantry_cli::commands::favorites::{self, FavoritesAction};
use pantry_cli::commands::premium::{self, purchase_notice, restore_notice, NoticeKind};
use pantry_cli::commands::recipes::recipe_rows;
use pantry_cli::commands::shop::{self, ShopAction};
use pantry_cli::commands::language;
use pantry_cli::commands::onboard;
use pantry_cli::commands::search::{self, HistoryAction};
use pantry_cli::output::{JsonRecipeCounts, JsonStatus};
use pantry_core::billing::{SandboxGateway, SandboxPurchaseMode, PREMIUM_PRODUCT_ID};
use pantry_core::language::Language;
use pantry_core::{
    CatalogSummary, Entitlement, KeyValueStore, MemoryKv, Pantry, PantryConfig, PurchaseResult,
    Recipe, RestoreOutcome,
};

fn app() -> (Pantry, SandboxGateway, Arc<MemoryKv>) {
    let gateway = SandboxGateway::new();
    let kv = Arc::new(MemoryKv::new());
    let app = Pantry::with_parts(
        PantryConfig::default(),
        Arc::clone(&kv) as Arc<dyn KeyValueStore>,
        gateway.clone(),
    );
    (app, gateway, kv)
}

fn write_bundle(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("recipes.json");
    let recipes = vec![
        Recipe::new("borsch", false)
            .named("Borsch")
            .with_ingredient("Beet", "2")
            .with_ingredient("Cabbage", "300 g"),
        Recipe::new("plov", true).named("Plov"),
        Recipe::new("beshbarmak", false).named("Beshbarmak"),
    ];
    std::fs::write(&path, serde_json::to_string(&recipes).unwrap()).unwrap();
    path
}

#[test]
fn cancelled_purchase_is_not_an_error() {
    assert_eq!(purchase_notice(&PurchaseResult::Cancelled).kind, NoticeKind::Info);
    assert_eq!(purchase_notice(&PurchaseResult::Pending).kind, NoticeKind::Info);
    assert_eq!(purchase_notice(&PurchaseResult::Purchased).kind, NoticeKind::Success);

    let failed = purchase_notice(&PurchaseResult::Failed("card declined".into()));
    assert_eq!(failed.kind, NoticeKind::Error);
    assert_eq!(failed.message, "card declined");
}

#[test]
fn restore_not_found_differs_from_failure() {
    assert_eq!(restore_notice(&RestoreOutcome::Restored).kind, NoticeKind::Success);
    assert_eq!(restore_notice(&RestoreOutcome::NotFound).kind, NoticeKind::Info);
    assert_eq!(
        restore_notice(&RestoreOutcome::Failed("offline".into())).kind,
        NoticeKind::Error
    );
}

#[test]
fn purchase_command_unlocks_premium() {
    let (app, gateway, kv) = app();
    premium::run_purchase(&app, None).unwrap();

    assert!(app.premium().has_premium());
    assert_eq!(kv.get("hasPremium").unwrap().as_deref(), Some("true"));
    assert_eq!(gateway.ledger().len(), 1);
}

#[test]
fn purchase_command_skips_store_when_already_premium() {
    let (app, gateway, _kv) = app();
    app.premium().store().set(true).unwrap();

    premium::run_purchase(&app, None).unwrap();
    assert_eq!(gateway.purchase_calls(), 0);
}

#[test]
fn cancelled_purchase_command_leaves_state() {
    let (app, gateway, kv) = app();
    gateway.set_purchase_mode(SandboxPurchaseMode::Cancel);

    premium::run_purchase(&app, Some(PREMIUM_PRODUCT_ID)).unwrap();
    assert!(!app.premium().has_premium());
    assert_eq!(kv.get("hasPremium").unwrap(), None);
}

#[test]
fn status_upgrades_silently_when_store_offline() {
    let (app, gateway, _kv) = app();
    gateway.grant(PREMIUM_PRODUCT_ID);
    gateway.set_fail_connect(true);

    // Offline: cached false is kept and the command still succeeds
    premium::run_status(&app, None, false).unwrap();
    assert!(!app.premium().has_premium());

    gateway.set_fail_connect(false);
    premium::run_status(&app, None, true).unwrap();
    assert!(app.premium().has_premium());
}

#[test]
fn restore_command_recovers_purchase() {
    let (app, gateway, _kv) = app();
    gateway.grant(PREMIUM_PRODUCT_ID);
    premium::run_restore(&app).unwrap();
    assert!(app.premium().has_premium());
}

#[test]
fn reset_needs_confirmation() {
    let (app, _gateway, kv) = app();
    app.premium().store().set(true).unwrap();

    premium::run_reset(&app, false).unwrap();
    assert!(app.premium().has_premium());

    premium::run_reset(&app, true).unwrap();
    assert!(!app.premium().has_premium());
    assert_eq!(kv.get("hasPremium").unwrap(), None);
}

#[test]
fn recipe_rows_lock_premium_until_purchase() {
    let recipes = vec![
        Recipe::new("a", false),
        Recipe::new("b", true).named("Bee"),
        Recipe::new("c", false),
    ];

    let rows = recipe_rows(recipes.clone(), Entitlement::FREE, true, |id| id == "c");
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
    assert!(!rows[0].locked);
    assert_eq!(rows[0].name, "Bee");
    assert_eq!(rows[1].name, "a");
    assert!(rows[1].locked && rows[2].locked);
    assert!(rows[2].favorite);

    let rows = recipe_rows(recipes, Entitlement::PREMIUM, false, |_| false);
    assert!(rows.iter().all(|r| !r.locked));
    assert_eq!(rows[0].id, "a");
}

#[test]
fn favorites_command_adds_from_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = write_bundle(&dir);
    let (app, _gateway, _kv) = app();

    favorites::run(
        &app,
        Some(&FavoritesAction::Add {
            file: bundle.clone(),
            id: "plov".into(),
        }),
    )
    .unwrap();
    assert!(app.favorites().is_favorite("plov"));

    favorites::run(
        &app,
        Some(&FavoritesAction::Toggle {
            file: bundle.clone(),
            id: "plov".into(),
        }),
    )
    .unwrap();
    assert!(!app.favorites().is_favorite("plov"));

    let missing = favorites::run(
        &app,
        Some(&FavoritesAction::Add {
            file: bundle,
            id: "lagman".into(),
        }),
    );
    assert!(missing.is_err());

    favorites::run(&app, None).unwrap();
}

#[test]
fn shop_command_adds_recipe_ingredients() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = write_bundle(&dir);
    let (app, _gateway, _kv) = app();

    shop::run(
        &app,
        Some(&ShopAction::FromRecipe {
            file: bundle,
            id: "borsch".into(),
        }),
    )
    .unwrap();
    shop::run(
        &app,
        Some(&ShopAction::Add {
            name: "Bread".into(),
            amount: String::new(),
        }),
    )
    .unwrap();

    let list = app.shopping_list();
    assert_eq!(list.items().len(), 3);
    let first = list.items()[0].id.clone();

    shop::run(&app, Some(&ShopAction::Toggle { id: first })).unwrap();
    shop::run(&app, Some(&ShopAction::Clear { checked: true })).unwrap();
    assert_eq!(app.shopping_list().items().len(), 2);

    shop::run(&app, None).unwrap();
    shop::run(&app, Some(&ShopAction::Clear { checked: false })).unwrap();
    assert!(app.shopping_list().items().is_empty());
}

#[test]
fn language_command_persists_choice() {
    let (app, _gateway, kv) = app();
    assert_eq!(app.language().get(), Language::Ru);

    language::run(&app, Some("EN")).unwrap();
    assert_eq!(app.language().get(), Language::En);
    assert_eq!(kv.get("selectedLanguage").unwrap().as_deref(), Some("en"));

    assert!(language::run(&app, Some("de")).is_err());
    language::run(&app, None).unwrap();
}

#[test]
fn json_status_omits_absent_sections() {
    let status = JsonStatus {
        has_premium: false,
        warning: None,
        language: "ru".into(),
        onboarded: false,
        user_name: None,
        offerings: vec![],
        price: None,
        recipes: Some(JsonRecipeCounts::new(
            CatalogSummary { free: 2, premium: 5 },
            false,
        )),
    };
    let value = serde_json::to_value(&status).unwrap();
    assert!(value.get("warning").is_none());
    assert!(value.get("price").is_none());
    assert_eq!(value["recipes"]["unlocked"], 2);
    assert_eq!(value["language"], "ru");
}

#[test]
fn status_report_includes_offerings_and_price() {
    let (app, _gateway, _kv) = app();
    let status = premium::status_report(&app, None).unwrap();

    assert!(status.warning.is_none());
    assert_eq!(status.offerings.len(), 1);
    assert_eq!(status.offerings[0].product_id, PREMIUM_PRODUCT_ID);
    assert_eq!(status.offerings[0].localized_price, "$4.99");
    let price = status.price.expect("price shown once offerings are loaded");
    assert_eq!(price.price, "$4.99");
    assert_eq!(price.old_price, "8.33 USD");
}

#[test]
fn status_report_offline_keeps_cache_and_skips_offerings() {
    let (app, gateway, _kv) = app();
    app.premium().store().set(true).unwrap();
    gateway.set_fail_connect(true);

    let status = premium::status_report(&app, None).unwrap();
    assert!(status.has_premium);
    assert!(status.warning.is_some());
    assert!(status.offerings.is_empty());
    assert!(status.price.is_none());
    assert_eq!(gateway.connect_calls(), 1);
}

#[test]
fn search_command_records_history() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = write_bundle(&dir);
    let (app, _gateway, _kv) = app();

    search::run(&app, &bundle, "beet").unwrap();
    search::run(&app, &bundle, "nothing here").unwrap();
    assert_eq!(app.recent_searches().list(), ["nothing here", "beet"]);

    search::run_history(
        &app,
        Some(&HistoryAction::Remove {
            query: "beet".into(),
        }),
    )
    .unwrap();
    assert_eq!(app.recent_searches().list(), ["nothing here"]);

    search::run_history(&app, Some(&HistoryAction::Clear)).unwrap();
    assert!(app.recent_searches().list().is_empty());
    search::run_history(&app, None).unwrap();
}

#[test]
fn onboard_command_completes_setup() {
    let (app, _gateway, _kv) = app();
    assert!(app.needs_onboarding());

    onboard::run(&app, Some("Aruzhan"), None, false).unwrap();
    assert!(!app.needs_onboarding());
    assert_eq!(app.language().get(), Language::Ru);
    assert_eq!(app.onboarding().user_name(), Some("Aruzhan"));

    let status = premium::status_report(&app, None).unwrap();
    assert!(status.onboarded);
    assert_eq!(status.user_name.as_deref(), Some("Aruzhan"));

    onboard::run(&app, None, None, true).unwrap();
    assert!(app.needs_onboarding());

    assert!(onboard::run(&app, None, Some("fr"), false).is_err());
    onboard::run(&app, None, Some("kk"), false).unwrap();
    assert_eq!(app.language().get(), Language::Kk);
}
