//! Account API HTTP Client
//!
//! `reqwest`-backed implementation of [`AccountGateway`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{GatewayError, GatewayResult};
use super::AccountGateway;
use crate::model::{Account, NewAccount, NewTransaction, Transaction};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

/// Configuration for the HTTP gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL for the account API (e.g., "http://localhost:5000/api")
    pub base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

/// Account API client over HTTP/JSON
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a new gateway with the given configuration
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            // Normalize: remove trailing slash
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn account_url(&self, user: &str) -> String {
        format!("{}/accounts/{}", self.base_url, urlencoding::encode(user))
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(url = %url, "POST");

        let response = self.client.post(url).json(body).send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Request failed");
            GatewayError::from(e)
        })?;

        decode(url, response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> GatewayResult<T> {
        tracing::debug!(url = %url, "GET");

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Request failed");
            GatewayError::from(e)
        })?;

        decode(url, response).await
    }
}

/// Decode a response body regardless of its status code.
///
/// An object with a set `error` member is an application error; anything
/// that is not JSON, or not the expected shape, is a network failure.
async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> GatewayResult<T> {
    let status = response.status();

    let body: serde_json::Value = response.json().await.map_err(|e| {
        tracing::warn!(url = %url, status = %status, error = %e, "Response is not JSON");
        GatewayError::from(e)
    })?;

    if let Some(message) = error_message(&body) {
        tracing::warn!(url = %url, status = %status, error = %message, "API returned error");
        return Err(GatewayError::Application(message));
    }

    serde_json::from_value(body).map_err(|e| {
        tracing::warn!(url = %url, status = %status, error = %e, "Unexpected response shape");
        GatewayError::Network(format!("Unexpected response: {}", e))
    })
}

/// Message of the body's `error` member. `null`, `false`, `0` and `""`
/// count as unset.
fn error_message(body: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match body.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) if message.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl AccountGateway for HttpGateway {
    async fn create_account(&self, account: &NewAccount) -> GatewayResult<Account> {
        let url = format!("{}/accounts", self.base_url);
        self.post_json(&url, account).await
    }

    async fn get_account(&self, user: &str) -> GatewayResult<Account> {
        let url = self.account_url(user);
        self.get_json(&url).await
    }

    async fn create_transaction(
        &self,
        user: &str,
        transaction: &NewTransaction,
    ) -> GatewayResult<Transaction> {
        let url = format!("{}/transactions", self.account_url(user));
        self.post_json(&url, transaction).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    fn test_account(user: &str) -> Value {
        json!({
            "user": user,
            "description": "Test account",
            "balance": 100.0,
            "currency": "$",
            "transactions": [
                {"date": "2024-01-01", "object": "Salary", "amount": 100.0}
            ]
        })
    }

    async fn get_account(Path(user): Path<String>) -> (StatusCode, Json<Value>) {
        if user == "test" || user == "jane doe" {
            (StatusCode::OK, Json(test_account(&user)))
        } else if user == "legacy" {
            let mut account = test_account(&user);
            account["error"] = Value::Null;
            (StatusCode::OK, Json(account))
        } else {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "User does not exist"})),
            )
        }
    }

    async fn create_account(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["user"] == "test" {
            return (
                StatusCode::CONFLICT,
                Json(json!({"error": "User already exists"})),
            );
        }
        let mut account = test_account(body["user"].as_str().unwrap_or_default());
        account["currency"] = body["currency"].clone();
        account["balance"] = json!(0.0);
        account["transactions"] = json!([]);
        (StatusCode::CREATED, Json(account))
    }

    async fn create_transaction(
        Path(user): Path<String>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if user != "test" {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "User does not exist"})),
            );
        }
        (StatusCode::CREATED, Json(body))
    }

    /// Start an in-process stub of the account API, returning its base URL
    async fn spawn_stub_api() -> String {
        let app = Router::new()
            .route("/api/accounts", post(create_account))
            .route("/api/accounts/:user", get(get_account))
            .route("/api/accounts/:user/transactions", post(create_transaction))
            .route("/text/accounts/:user", get(|| async { "not json" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let gateway = HttpGateway::new(GatewayConfig::new("http://localhost:5000/api/"));
        assert_eq!(gateway.base_url(), "http://localhost:5000/api");
    }

    #[test]
    fn test_user_is_path_escaped() {
        let gateway = HttpGateway::new(GatewayConfig::default());
        assert_eq!(
            gateway.account_url("jane doe/x"),
            "http://localhost:5000/api/accounts/jane%20doe%2Fx"
        );
    }

    #[tokio::test]
    async fn test_get_account() {
        let base = spawn_stub_api().await;
        let gateway = HttpGateway::new(GatewayConfig::new(format!("{}/api", base)));

        let account = gateway.get_account("test").await.unwrap();
        assert_eq!(account.user, "test");
        assert_eq!(account.balance, 100.0);
        assert_eq!(account.transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_get_account_escapes_user() {
        let base = spawn_stub_api().await;
        let gateway = HttpGateway::new(GatewayConfig::new(format!("{}/api", base)));

        let account = gateway.get_account("jane doe").await.unwrap();
        assert_eq!(account.user, "jane doe");
    }

    #[tokio::test]
    async fn test_get_unknown_account_is_application_error() {
        let base = spawn_stub_api().await;
        let gateway = HttpGateway::new(GatewayConfig::new(format!("{}/api", base)));

        let err = gateway.get_account("nobody").await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::Application("User does not exist".to_string())
        );
    }

    #[tokio::test]
    async fn test_null_error_member_is_success() {
        let base = spawn_stub_api().await;
        let gateway = HttpGateway::new(GatewayConfig::new(format!("{}/api", base)));

        let account = gateway.get_account("legacy").await.unwrap();
        assert_eq!(account.user, "legacy");
        assert_eq!(account.balance, 100.0);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(&json!({"error": "User does not exist"})).as_deref(),
            Some("User does not exist")
        );
        assert_eq!(error_message(&json!({"error": 42})).as_deref(), Some("42"));
        assert_eq!(error_message(&json!({"error": null})), None);
        assert_eq!(error_message(&json!({"error": ""})), None);
        assert_eq!(error_message(&json!({"error": false})), None);
        assert_eq!(error_message(&json!({"user": "test"})), None);
    }

    #[tokio::test]
    async fn test_create_account() {
        let base = spawn_stub_api().await;
        let gateway = HttpGateway::new(GatewayConfig::new(format!("{}/api", base)));

        let account = gateway
            .create_account(&NewAccount::new("alice", "EUR"))
            .await
            .unwrap();
        assert_eq!(account.user, "alice");
        assert_eq!(account.currency, "EUR");

        let err = gateway
            .create_account(&NewAccount::new("test", "EUR"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "User already exists");
    }

    #[tokio::test]
    async fn test_create_transaction() {
        let base = spawn_stub_api().await;
        let gateway = HttpGateway::new(GatewayConfig::new(format!("{}/api", base)));

        let transaction = gateway
            .create_transaction("test", &NewTransaction::new("2024-02-01", "Rent", -40.0))
            .await
            .unwrap();
        assert_eq!(transaction, Transaction::new("2024-02-01", "Rent", -40.0));
    }

    #[tokio::test]
    async fn test_non_json_response_is_network_error() {
        let base = spawn_stub_api().await;
        let gateway = HttpGateway::new(GatewayConfig::new(format!("{}/text", base)));

        let err = gateway.get_account("test").await.unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Bind then release a port so nothing is listening on it
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = HttpGateway::new(GatewayConfig::new(format!("http://{}/api", addr)));
        let err = gateway.get_account("test").await.unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)));
        assert!(!err.message().is_empty());
    }
}
