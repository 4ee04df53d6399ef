//! API Client
//!
//! Main client for the management API, combining the session and the HTTP
//! transport. [`HalClient::execute`] is the self-reauthenticating request
//! executor every other operation goes through.

use super::auth::{Credentials, Session, DEFAULT_API_VERSION, DEFAULT_AUTH_PATH};
use super::error::{ApiError, Result};
use super::http::{HalHttpClient, RawResponse};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build `/api/{version}/{seg1}/.../{segN}/`.
///
/// Always rooted at `/api/{version}/` and always terminated by a slash.
pub fn api_path(version: &str, segments: &[&str]) -> String {
    let mut path = format!("/api/{}/", version);
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        path.push_str(segment);
        path.push('/');
    }
    path
}

/// Everything needed to construct a [`HalClient`]
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: Url,
    pub api_version: String,
    pub auth_path: String,
    pub credentials: Credentials,
    pub timeout: Duration,
}

impl ClientSettings {
    pub fn new(base_url: Url, credentials: Credentials) -> Self {
        Self {
            base_url,
            api_version: DEFAULT_API_VERSION.to_string(),
            auth_path: DEFAULT_AUTH_PATH.to_string(),
            credentials,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Main API client
#[derive(Clone, Debug)]
pub struct HalClient {
    session: Session,
    http: HalHttpClient,
}

impl HalClient {
    /// Create a new client. No request is sent until the first call.
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let http = HalHttpClient::new(settings.timeout)?;
        let session = Session::new(
            settings.base_url,
            settings.api_version,
            settings.auth_path,
            settings.credentials,
        );
        Ok(Self { session, http })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Exchange the stored credentials for a fresh token
    pub async fn authenticate(&self) -> Result<StatusCode> {
        self.session.authenticate(&self.http).await
    }

    async fn current_token(&self) -> String {
        self.session
            .token()
            .await
            .map(|t| t.to_string())
            .unwrap_or_default()
    }

    /// Execute one logical request.
    ///
    /// A 401 or 403 triggers exactly one reauthentication followed by exactly
    /// one replay of the same request; the replayed response is returned as-is
    /// whatever its status. Every other status is returned untouched.
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse> {
        let token = self.current_token().await;
        let response = self.http.send(method.clone(), url, &token, body).await?;

        if !response.is_auth_failure() {
            return Ok(response);
        }

        tracing::info!(
            "{} {} returned {}, reauthenticating",
            method,
            url,
            response.status
        );
        self.authenticate().await?;

        let token = self.current_token().await;
        let retried = self.http.send(method, url, &token, body).await?;
        if retried.is_auth_failure() {
            tracing::warn!(
                "Request still unauthorized after reauthentication: {}",
                retried.status
            );
        }
        Ok(retried)
    }

    /// Build an absolute URL for an API path or a `_links` href
    pub fn url(&self, href: &str) -> Result<Url> {
        Ok(self.session.base_url().join(href)?)
    }

    /// Build an absolute URL from path segments under `/api/{version}/`
    pub fn api_url(&self, segments: &[&str]) -> Result<Url> {
        self.url(&api_path(self.session.api_version(), segments))
    }

    async fn execute_checked(
        &self,
        method: Method,
        href: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse> {
        let url = self.url(href)?;
        let response = self.execute(method, url.as_str(), body).await?;
        if !response.status.is_success() {
            return Err(ApiError::from_status(response.status, response.body));
        }
        Ok(response)
    }

    /// GET a path or href and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, href: &str) -> Result<T> {
        self.execute_checked(Method::GET, href, None).await?.json()
    }

    /// POST a JSON body and decode the response
    pub async fn post_json<T: DeserializeOwned>(&self, href: &str, body: &Value) -> Result<T> {
        self.execute_checked(Method::POST, href, Some(body))
            .await?
            .json()
    }

    /// DELETE a resource. Empty responses come back as `Value::Null`.
    pub async fn delete(&self, href: &str) -> Result<Value> {
        self.execute_checked(Method::DELETE, href, None)
            .await?
            .json()
    }
}
