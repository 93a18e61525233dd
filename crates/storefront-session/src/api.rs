//! # Remote API
//!
//! The auth endpoint and the product data source, behind two async traits so
//! stores can be tested against fakes.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     DummyJSON-compatible API                            │
//! │                                                                         │
//! │  AuthApi                                                                │
//! │  ├── POST /auth/login            {username, password} → user + token   │
//! │  └── GET  /auth/me               Authorization: Bearer <token> → user  │
//! │                                                                         │
//! │  CatalogSource                                                          │
//! │  ├── GET  /products?limit=0              → {products: [...]}           │
//! │  ├── GET  /products/categories           → [{slug, name, url}]         │
//! │  └── GET  /products/category/{slug}      → {products: [...]}           │
//! │                                                                         │
//! │  No retries: a failed call is reported once and the caller decides.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use storefront_core::{Category, Product};
use tracing::debug;
use ts_rs::TS;

use crate::config::ApiSettings;
use crate::error::{SessionError, SessionResult};

const USER_AGENT_VALUE: &str = concat!("storefront/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Payloads
// =============================================================================

/// Credentials posted to the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,

    /// Requested token lifetime; the server default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in_mins: Option<u32>,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        LoginCredentials {
            username: username.into(),
            password: password.into(),
            expires_in_mins: None,
        }
    }
}

/// An authenticated shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl User {
    /// `"first last"`, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// First letter of each name, upper-cased.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Login response: the user's fields plus the session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: User,

    #[serde(alias = "accessToken")]
    pub token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductPage {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// =============================================================================
// Traits
// =============================================================================

/// Remote authentication endpoint.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &LoginCredentials) -> SessionResult<AuthResponse>;

    /// Resolves a bearer token to its user.
    async fn current_user(&self, token: &str) -> SessionResult<User>;
}

/// Remote product and category data source.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn products(&self) -> SessionResult<Vec<Product>>;

    async fn categories(&self) -> SessionResult<Vec<Category>>;

    async fn products_in_category(&self, slug: &str) -> SessionResult<Vec<Product>>;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// `reqwest` client for a DummyJSON-compatible backend.
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStorefrontApi {
    pub fn new(settings: &ApiSettings) -> SessionResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| SessionError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(HttpStorefrontApi {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> SessionResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }
}

/// Maps status codes onto [`SessionError`] and parses a success body.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> SessionResult<T> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SessionError::Unauthorized);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SessionError::UnexpectedResponse {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    Ok(response.json::<T>().await?)
}

/// Pulls `message` out of a JSON error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[async_trait]
impl AuthApi for HttpStorefrontApi {
    async fn login(&self, credentials: &LoginCredentials) -> SessionResult<AuthResponse> {
        debug!(username = %credentials.username, "POST /auth/login");
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await?;

        read_json(response).await.map_err(|e| match e {
            SessionError::Unauthorized => SessionError::LoginFailed("Invalid credentials".into()),
            SessionError::UnexpectedResponse { message, .. } => SessionError::LoginFailed(message),
            other => other,
        })
    }

    async fn current_user(&self, token: &str) -> SessionResult<User> {
        debug!("GET /auth/me");
        let response = self
            .client
            .get(self.url("/auth/me"))
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl CatalogSource for HttpStorefrontApi {
    async fn products(&self) -> SessionResult<Vec<Product>> {
        let page: ProductPage = self.get_json("/products?limit=0").await?;
        Ok(page.products)
    }

    async fn categories(&self) -> SessionResult<Vec<Category>> {
        self.get_json("/products/categories").await
    }

    async fn products_in_category(&self, slug: &str) -> SessionResult<Vec<Product>> {
        let path = format!("/products/category/{}?limit=0", urlencoding::encode(slug));
        let page: ProductPage = self.get_json(&path).await?;
        Ok(page.products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> User {
        User {
            id: 1,
            username: "emilys".into(),
            email: "emily@example.com".into(),
            first_name: first.into(),
            last_name: last.into(),
            gender: None,
            image: None,
        }
    }

    #[test]
    fn test_full_name_and_initials() {
        let emily = user("emily", "johnson");
        assert_eq!(emily.full_name(), "emily johnson");
        assert_eq!(emily.initials(), "EJ");

        let mononym = user("Cher", "");
        assert_eq!(mononym.full_name(), "Cher");
        assert_eq!(mononym.initials(), "C");
    }

    #[test]
    fn test_auth_response_accepts_access_token() {
        let response: AuthResponse = serde_json::from_str(
            r#"{
                "id": 1,
                "username": "emilys",
                "email": "emily.johnson@x.dummyjson.com",
                "firstName": "Emily",
                "lastName": "Johnson",
                "gender": "female",
                "image": "https://dummyjson.com/icon/emilys/128",
                "accessToken": "abc.def",
                "refreshToken": "ref.123"
            }"#,
        )
        .unwrap();

        assert_eq!(response.token, "abc.def");
        assert_eq!(response.refresh_token.as_deref(), Some("ref.123"));
        assert_eq!(response.user.first_name, "Emily");
    }

    #[test]
    fn test_auth_response_accepts_token() {
        let response: AuthResponse =
            serde_json::from_str(r#"{"id": 2, "username": "michaelw", "token": "t0k3n"}"#).unwrap();
        assert_eq!(response.token, "t0k3n");
        assert_eq!(response.user.username, "michaelw");
    }

    #[test]
    fn test_credentials_payload() {
        let json = serde_json::to_value(LoginCredentials::new("emilys", "emilyspass")).unwrap();
        assert_eq!(json, serde_json::json!({"username": "emilys", "password": "emilyspass"}));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"message": "Invalid credentials"}"#), "Invalid credentials");
        assert_eq!(error_message(" Bad Gateway "), "Bad Gateway");
    }

    #[test]
    fn test_base_url_is_normalised() {
        let api = HttpStorefrontApi::new(&ApiSettings {
            base_url: "https://dummyjson.com/".into(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(api.url("/auth/me"), "https://dummyjson.com/auth/me");
    }
}
