//! Gateway adapters: HTTP wire types and the sandbox ledger

use pantry_core::billing::http::{
    finish_url, purchase_outcome, PurchaseRequest, PurchaseResponse, SessionRequest, SessionResponse,
    WireOffering, WirePurchase,
};
use pantry_core::billing::{
    BillingGateway, HttpGateway, HttpGatewayConfig, Offering, PurchaseError, PurchaseOutcome,
    QueryError, SandboxGateway, SandboxPurchaseMode, PREMIUM_PRODUCT_ID,
};
use std::time::Duration;

// --- HTTP wire format ---

#[test]
fn session_request_serialization() {
    let req = SessionRequest {
        app_user_id: "abc123",
        platform: "android",
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(json.contains("\"app_user_id\":\"abc123\""));
    assert!(json.contains("android"));

    let resp: SessionResponse = serde_json::from_str(r#"{"session_token": "s-1"}"#).unwrap();
    assert_eq!(resp.session_token, "s-1");
}

#[test]
fn finish_url_escapes_token() {
    let url = finish_url("https://billing.example.com", "a/b?c").unwrap();
    assert_eq!(
        url.as_str(),
        "https://billing.example.com/v1/purchases/a%2Fb%3Fc/finish"
    );

    let url = finish_url("https://billing.example.com/api/", "sandbox-000001").unwrap();
    assert_eq!(
        url.as_str(),
        "https://billing.example.com/api/v1/purchases/sandbox-000001/finish"
    );

    assert!(finish_url("not a url", "t").is_none());
}

#[test]
fn offering_deserialization() {
    let json = r#"[{"product_id": "premium-access", "localized_price": "1 990 ₸",
                   "price": 1990.0, "currency": "KZT"}]"#;
    let wire: Vec<WireOffering> = serde_json::from_str(json).unwrap();
    let offering: Offering = wire.into_iter().next().unwrap().into();
    assert_eq!(offering.product_id, "premium-access");
    assert_eq!(offering.localized_price, "1 990 ₸");
    assert!((offering.raw_price - 1990.0).abs() < f64::EPSILON);
    assert_eq!(offering.currency_code, "KZT");
}

#[test]
fn purchase_request_serialization() {
    let json = serde_json::to_string(&PurchaseRequest {
        product_id: "premium-access",
    })
    .unwrap();
    assert_eq!(json, r#"{"product_id":"premium-access"}"#);
}

#[test]
fn completed_purchase_maps_to_record() {
    let resp: PurchaseResponse = serde_json::from_str(
        r#"{"status": "completed", "product_id": "premium-access", "token": "GPA.1234"}"#,
    )
    .unwrap();
    let outcome = purchase_outcome("premium-access", resp).unwrap();
    match outcome {
        PurchaseOutcome::Completed(record) => {
            assert_eq!(record.product_id, "premium-access");
            assert_eq!(record.token, "GPA.1234");
        }
        other => panic!("expected completed, got {other:?}"),
    }
}

#[test]
fn completed_purchase_without_product_uses_requested_id() {
    let resp: PurchaseResponse =
        serde_json::from_str(r#"{"status": "completed", "token": "t"}"#).unwrap();
    let outcome = purchase_outcome("premium-access", resp).unwrap();
    assert!(
        matches!(outcome, PurchaseOutcome::Completed(ref r) if r.product_id == "premium-access")
    );
}

#[test]
fn completed_purchase_without_token_is_rejected() {
    let resp: PurchaseResponse = serde_json::from_str(r#"{"status": "completed"}"#).unwrap();
    assert!(matches!(
        purchase_outcome("premium-access", resp),
        Err(PurchaseError::Decode(_))
    ));
}

#[test]
fn pending_and_cancelled_statuses() {
    let pending: PurchaseResponse = serde_json::from_str(r#"{"status": "pending"}"#).unwrap();
    assert_eq!(
        purchase_outcome("p", pending).unwrap(),
        PurchaseOutcome::Pending
    );

    for status in ["cancelled", "canceled"] {
        let resp = PurchaseResponse {
            status: status.to_string(),
            product_id: None,
            token: None,
        };
        assert_eq!(purchase_outcome("p", resp).unwrap(), PurchaseOutcome::Cancelled);
    }
}

#[test]
fn unknown_status_is_decode_error() {
    let resp: PurchaseResponse = serde_json::from_str(r#"{"status": "refunded"}"#).unwrap();
    assert!(matches!(
        purchase_outcome("p", resp),
        Err(PurchaseError::Decode(_))
    ));
}

#[test]
fn completed_purchases_deserialization() {
    let json = r#"[{"product_id": "premium-access", "token": "a"}, {"product_id": "x", "token": "b"}]"#;
    let purchases: Vec<WirePurchase> = serde_json::from_str(json).unwrap();
    assert_eq!(purchases.len(), 2);
    assert_eq!(purchases[1].token, "b");
}

#[test]
fn http_gateway_fails_fast_when_disconnected() {
    let mut gw = HttpGateway::new(HttpGatewayConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: None,
        timeout: Duration::from_millis(200),
        purchase_timeout: None,
        app_user_id: "test".to_string(),
        platform: "linux".to_string(),
    });

    assert!(!gw.is_connected());
    assert!(matches!(
        gw.list_completed_purchases(),
        Err(QueryError::NotConnected)
    ));
    assert!(matches!(
        gw.list_offerings(&[PREMIUM_PRODUCT_ID.to_string()]),
        Err(QueryError::NotConnected)
    ));
    assert!(matches!(
        gw.purchase(PREMIUM_PRODUCT_ID),
        Err(PurchaseError::NotConnected)
    ));
}

// --- Sandbox ---

#[test]
fn sandbox_requires_connect() {
    let mut gw = SandboxGateway::new();
    assert!(matches!(
        gw.list_completed_purchases(),
        Err(QueryError::NotConnected)
    ));
    assert!(matches!(
        gw.purchase(PREMIUM_PRODUCT_ID),
        Err(PurchaseError::NotConnected)
    ));

    gw.connect().unwrap();
    gw.connect().unwrap();
    assert!(gw.is_connected());
    assert!(gw.list_completed_purchases().unwrap().is_empty());

    gw.disconnect();
    assert!(!gw.is_connected());
}

#[test]
fn sandbox_offerings_filter_by_requested_ids() {
    let mut gw = SandboxGateway::new();
    gw.connect().unwrap();

    assert_eq!(
        gw.list_offerings(&[PREMIUM_PRODUCT_ID.to_string()])
            .unwrap()
            .len(),
        1
    );
    assert!(gw
        .list_offerings(&["something-else".to_string()])
        .unwrap()
        .is_empty());
}

#[test]
fn sandbox_unknown_product_is_error() {
    let mut gw = SandboxGateway::new();
    gw.connect().unwrap();
    assert!(matches!(
        gw.purchase("nope"),
        Err(PurchaseError::UnknownProduct(_))
    ));
}

#[test]
fn sandbox_purchase_modes() {
    let mut gw = SandboxGateway::new();
    gw.connect().unwrap();

    gw.set_purchase_mode(SandboxPurchaseMode::Cancel);
    assert_eq!(gw.purchase(PREMIUM_PRODUCT_ID).unwrap(), PurchaseOutcome::Cancelled);
    gw.set_purchase_mode(SandboxPurchaseMode::Defer);
    assert_eq!(gw.purchase(PREMIUM_PRODUCT_ID).unwrap(), PurchaseOutcome::Pending);
    assert!(gw.ledger().is_empty());

    gw.set_purchase_mode(SandboxPurchaseMode::Approve);
    assert!(matches!(
        gw.purchase(PREMIUM_PRODUCT_ID).unwrap(),
        PurchaseOutcome::Completed(_)
    ));
    assert_eq!(gw.ledger().len(), 1);
    assert_eq!(gw.purchase_calls(), 3);
}

#[test]
fn sandbox_ledger_file_survives_restart() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = tmp.path().join("ledger.json");

    let first = SandboxGateway::new().with_ledger_file(&ledger);
    let granted = first.grant(PREMIUM_PRODUCT_ID);

    let mut second = SandboxGateway::new().with_ledger_file(&ledger);
    second.connect().unwrap();
    let purchases = second.list_completed_purchases().unwrap();
    assert_eq!(purchases, vec![granted.clone()]);

    // New tokens keep counting from the loaded ledger
    let next = second.grant(PREMIUM_PRODUCT_ID);
    assert_ne!(next.token, granted.token);
}

#[test]
fn sandbox_clones_share_state() {
    let handle = SandboxGateway::new();
    let mut owned = handle.clone();
    owned.connect().unwrap();

    handle.grant(PREMIUM_PRODUCT_ID);
    assert_eq!(owned.list_completed_purchases().unwrap().len(), 1);

    handle.set_fail_queries(true);
    assert!(matches!(
        owned.list_completed_purchases(),
        Err(QueryError::Backend(_))
    ));
}
