//! Session and authentication
//!
//! A [`Session`] owns the endpoint, the credentials and the current bearer
//! token. The token is an immutable snapshot that is swapped as a whole on
//! every successful [`Session::authenticate`]; requests read one snapshot
//! when they are built.

use super::error::{ApiError, Result};
use super::http::{sanitize_for_log, HalHttpClient};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

/// Default API version segment
pub const DEFAULT_API_VERSION: &str = "v3";

/// Default token endpoint path, relative to `/api/{version}/`
pub const DEFAULT_AUTH_PATH: &str = "cmp/apiToken";

/// Username and password exchanged for a bearer token
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

/// Connection state shared by every request of one client
#[derive(Clone)]
pub struct Session {
    base_url: Url,
    api_version: String,
    auth_path: String,
    credentials: Credentials,
    token: Arc<RwLock<Option<Arc<str>>>>,
}

impl Session {
    pub fn new(
        base_url: Url,
        api_version: impl Into<String>,
        auth_path: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            base_url,
            api_version: api_version.into(),
            auth_path: auth_path.into(),
            credentials,
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    /// Current token snapshot, `None` before the first authentication
    pub async fn token(&self) -> Option<Arc<str>> {
        self.token.read().await.clone()
    }

    /// Replace the token snapshot (never merged)
    pub async fn set_token(&self, token: impl Into<Arc<str>>) {
        *self.token.write().await = Some(token.into());
    }

    /// Path segments of the token endpoint
    fn auth_segments(&self) -> Vec<&str> {
        self.auth_path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Exchange the stored credentials for a fresh token.
    ///
    /// On success the token snapshot is overwritten and the response status is
    /// returned. A status >= 400 leaves the token untouched.
    pub async fn authenticate(&self, http: &HalHttpClient) -> Result<StatusCode> {
        let path = super::client::api_path(&self.api_version, &self.auth_segments());
        let url = self.base_url.join(&path)?;

        tracing::info!("Authenticating as {}", self.credentials.username);

        let payload = json!({
            "username": self.credentials.username,
            "password": self.credentials.password,
        });
        let response = http.post_anonymous(url.as_str(), &payload).await?;

        if response.status.as_u16() >= 400 {
            tracing::warn!(
                "Authentication failed: {} - {}",
                response.status,
                sanitize_for_log(&response.body)
            );
            return Err(ApiError::Authentication {
                status: response.status,
                body: response.body,
            });
        }

        let parsed: TokenResponse = response.json()?;
        let token = parsed.token.ok_or(ApiError::MissingToken)?;
        self.set_token(token).await;

        tracing::debug!("Session token replaced");
        Ok(response.status)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .field("api_version", &self.api_version)
            .field("auth_path", &self.auth_path)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
