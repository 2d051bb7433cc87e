//! HTTP adapter for a receipt/entitlement REST backend

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::{
    BillingGateway, ConnectionError, Offering, PurchaseError, PurchaseOutcome, PurchaseRecord,
    QueryError,
};

/// Connection settings for `HttpGateway`.
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// e.g. `https://billing.example.com` (no trailing slash needed)
    pub base_url: String,
    pub api_key: Option<String>,
    /// Bound for session, catalog and ledger calls
    pub timeout: Duration,
    /// Bound for the purchase call; `None` waits for the user indefinitely
    pub purchase_timeout: Option<Duration>,
    pub app_user_id: String,
    pub platform: String,
}

#[derive(Debug, Serialize)]
pub struct SessionRequest<'a> {
    pub app_user_id: &'a str,
    pub platform: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    pub session_token: String,
}

#[derive(Debug, Deserialize)]
pub struct WireOffering {
    pub product_id: String,
    pub localized_price: String,
    pub price: f64,
    pub currency: String,
}

impl From<WireOffering> for Offering {
    fn from(w: WireOffering) -> Self {
        Offering {
            product_id: w.product_id,
            localized_price: w.localized_price,
            raw_price: w.price,
            currency_code: w.currency,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PurchaseRequest<'a> {
    pub product_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseResponse {
    pub status: String,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WirePurchase {
    pub product_id: String,
    pub token: String,
}

/// Maps the backend's purchase status onto a `PurchaseOutcome`.
///
/// A completed purchase without a token is rejected: there is nothing to
/// acknowledge and nothing that proves the transaction.
pub fn purchase_outcome(
    requested: &str,
    resp: PurchaseResponse,
) -> Result<PurchaseOutcome, PurchaseError> {
    match resp.status.as_str() {
        "completed" => {
            let token = resp
                .token
                .filter(|t| !t.is_empty())
                .ok_or_else(|| PurchaseError::Decode("completed purchase without token".into()))?;
            Ok(PurchaseOutcome::Completed(PurchaseRecord {
                product_id: resp.product_id.unwrap_or_else(|| requested.to_string()),
                token,
            }))
        }
        "pending" => Ok(PurchaseOutcome::Pending),
        "cancelled" | "canceled" => Ok(PurchaseOutcome::Cancelled),
        other => Err(PurchaseError::Decode(format!("unknown purchase status '{other}'"))),
    }
}

/// Acknowledgement endpoint for a purchase token.
///
/// The token is percent-encoded as one path segment. `None` if `base_url`
/// is not an absolute URL.
pub fn finish_url(base_url: &str, token: &str) -> Option<Url> {
    let mut url = Url::parse(base_url).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(["v1", "purchases", token, "finish"]);
    Some(url)
}

/// Billing gateway talking to the REST backend with a blocking client.
pub struct HttpGateway {
    config: HttpGatewayConfig,
    client: Option<Client>,
    session: Option<String>,
}

impl HttpGateway {
    pub fn new(config: HttpGatewayConfig) -> Self {
        Self {
            config,
            client: None,
            session: None,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, builder: RequestBuilder, session: &str) -> RequestBuilder {
        let builder = builder.bearer_auth(session);
        match self.config.api_key {
            Some(ref key) => builder.header("x-api-key", key),
            None => builder,
        }
    }

    /// Client and session token, or `None` when disconnected.
    fn session(&self) -> Option<(&Client, &str)> {
        Some((self.client.as_ref()?, self.session.as_deref()?))
    }

    fn finish(&self, client: &Client, session: &str, token: &str) {
        let Some(url) = finish_url(&self.config.base_url, token) else {
            tracing::warn!(base_url = %self.config.base_url, "invalid base url, purchase not acknowledged");
            return;
        };
        let req = client.post(url);
        match self.authorize(req, session).send() {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!("purchase acknowledged");
            }
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), "purchase acknowledgement rejected");
            }
            Err(e) => {
                tracing::warn!(error = %e, "purchase acknowledgement failed");
            }
        }
    }
}

fn check_status(resp: Response) -> Result<Response, String> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(format!("HTTP {}", resp.status()))
    }
}

impl BillingGateway for HttpGateway {
    fn connect(&mut self) -> Result<(), ConnectionError> {
        if self.is_connected() {
            return Ok(());
        }

        let client = Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| ConnectionError(e.to_string()))?;

        let body = SessionRequest {
            app_user_id: &self.config.app_user_id,
            platform: &self.config.platform,
        };
        let mut req = client.post(self.url("/v1/sessions")).json(&body);
        if let Some(ref key) = self.config.api_key {
            req = req.header("x-api-key", key);
        }

        let resp = req
            .send()
            .map_err(|e| ConnectionError(e.to_string()))
            .and_then(|r| check_status(r).map_err(ConnectionError))?;
        let data: SessionResponse = resp.json().map_err(|e| ConnectionError(e.to_string()))?;

        tracing::debug!(base_url = %self.config.base_url, "billing session established");
        self.client = Some(client);
        self.session = Some(data.session_token);
        Ok(())
    }

    fn disconnect(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("billing session released");
        }
        self.client = None;
    }

    fn is_connected(&self) -> bool {
        self.session().is_some()
    }

    fn list_offerings(&mut self, product_ids: &[String]) -> Result<Vec<Offering>, QueryError> {
        let (client, session) = self.session().ok_or(QueryError::NotConnected)?;
        let req = client
            .get(self.url("/v1/offerings"))
            .query(&[("product_ids", product_ids.join(","))]);

        let resp = self
            .authorize(req, session)
            .send()
            .map_err(|e| QueryError::Backend(e.to_string()))
            .and_then(|r| check_status(r).map_err(QueryError::Backend))?;
        let offerings: Vec<WireOffering> =
            resp.json().map_err(|e| QueryError::Decode(e.to_string()))?;

        Ok(offerings
            .into_iter()
            .filter(|o| product_ids.contains(&o.product_id))
            .map(Offering::from)
            .collect())
    }

    fn purchase(&mut self, product_id: &str) -> Result<PurchaseOutcome, PurchaseError> {
        let (client, session) = self.session().ok_or(PurchaseError::NotConnected)?;

        // The purchase sheet is user-driven, so it gets its own (possibly absent) bound.
        let purchase_client = Client::builder()
            .timeout(self.config.purchase_timeout)
            .build()
            .map_err(|e| PurchaseError::Backend(e.to_string()))?;

        let req = purchase_client
            .post(self.url("/v1/purchases"))
            .json(&PurchaseRequest { product_id });
        let resp = self
            .authorize(req, session)
            .send()
            .map_err(|e| PurchaseError::Backend(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PurchaseError::UnknownProduct(product_id.to_string()));
        }
        let resp = check_status(resp).map_err(PurchaseError::Backend)?;
        let data: PurchaseResponse = resp
            .json()
            .map_err(|e| PurchaseError::Decode(e.to_string()))?;

        let outcome = purchase_outcome(product_id, data)?;
        if let PurchaseOutcome::Completed(ref record) = outcome {
            self.finish(client, session, &record.token);
        }
        Ok(outcome)
    }

    fn list_completed_purchases(&mut self) -> Result<Vec<PurchaseRecord>, QueryError> {
        let (client, session) = self.session().ok_or(QueryError::NotConnected)?;
        let req = client.get(self.url("/v1/purchases"));

        let resp = self
            .authorize(req, session)
            .send()
            .map_err(|e| QueryError::Backend(e.to_string()))
            .and_then(|r| check_status(r).map_err(QueryError::Backend))?;
        let purchases: Vec<WirePurchase> =
            resp.json().map_err(|e| QueryError::Decode(e.to_string()))?;

        Ok(purchases
            .into_iter()
            .map(|p| PurchaseRecord {
                product_id: p.product_id,
                token: p.token,
            })
            .collect())
    }
}
