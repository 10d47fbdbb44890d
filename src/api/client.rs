//! Authenticated client for the portal backend
//!
//! Every request carries a bearer token minted by the identity provider.
//! Without a token the request is aborted locally. All failures, whether
//! local, transport, HTTP or payload related, come back as one
//! [`ApiError`] and are also surfaced through the [`Notifier`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::types::{CreatedProject, DiscordLinkStatus, NewProjectRequest, Project};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult, PortalError, Result};
use crate::identity::IdentityProvider;
use crate::notifier::Notifier;

/// A single backend request
///
/// The endpoint is split into path segments that are appended to the base
/// URL; dynamic segments added with [`ApiRequest::segment`] are
/// percent-encoded.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    fn new(method: Method, endpoint: &str) -> Self {
        Self {
            method,
            segments: endpoint
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            body: None,
        }
    }

    /// A `GET` request for `endpoint` (e.g. `/projects`).
    pub fn get(endpoint: &str) -> Self {
        Self::new(Method::GET, endpoint)
    }

    /// A `POST` request for `endpoint` with a JSON body.
    pub fn post(endpoint: &str, body: serde_json::Value) -> Self {
        let mut request = Self::new(Method::POST, endpoint);
        request.body = Some(body);
        request
    }

    /// Appends one raw path segment.
    pub fn segment(mut self, raw: &str) -> Self {
        self.segments.push(raw.to_string());
        self
    }

    /// Endpoint path as sent, for logging.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Backend API client
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use parel_portal::api::ApiClient;
/// use parel_portal::config::{ApiConfig, NotificationConfig};
/// use parel_portal::identity::{FakeIdentity, User};
/// use parel_portal::notifier::Notifier;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let config = ApiConfig { base_url: "https://api.example.com".into(), timeout_seconds: 30 };
/// let identity = Arc::new(FakeIdentity::signed_in(User::new("u1"), "tok"));
/// let client = ApiClient::new(&config, identity, Notifier::new(NotificationConfig::default()))?;
/// let projects = client.list_projects().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    identity: Arc<dyn IdentityProvider>,
    notifier: Notifier,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl ApiClient {
    /// Creates a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be built
    pub fn new(
        config: &ApiConfig,
        identity: Arc<dyn IdentityProvider>,
        notifier: Notifier,
    ) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(PortalError::Config(format!(
                "api.base_url cannot carry paths: {}",
                config.base_url
            ))
            .into());
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(PortalError::Http)?;

        Ok(Self {
            http,
            base_url,
            identity,
            notifier,
        })
    }

    /// Notifier failures are reported to.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Performs `request` and decodes the JSON response into `T`.
    ///
    /// Failures are pushed to the notifier before being returned.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotAuthenticated`] when no token is available; no
    ///   request is sent
    /// - [`ApiError::Status`] for non-2xx responses
    /// - [`ApiError::Network`] when no response was received
    /// - [`ApiError::MalformedPayload`] when a 2xx body does not decode
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let result = self.execute(&request).await;
        if let Err(e) = &result {
            tracing::warn!(endpoint = %request.path(), error = %e, "API call failed");
            self.notifier.error(e.user_message());
        }
        result
    }

    async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<T> {
        let token = self.bearer_token().await?;
        let url = self.url_for(request)?;

        tracing::debug!(method = %request.method, %url, "API request");

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .bearer_auth(token);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::MalformedPayload(e.to_string()))
    }

    async fn bearer_token(&self) -> ApiResult<String> {
        match self.identity.get_token().await {
            Ok(Some(token)) if !token.trim().is_empty() => Ok(token),
            Ok(_) => Err(ApiError::NotAuthenticated),
            Err(e) => {
                tracing::warn!(error = %e, "identity provider failed to mint a token");
                Err(ApiError::NotAuthenticated)
            }
        }
    }

    fn url_for(&self, request: &ApiRequest) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::Network("base URL cannot carry paths".to_string()))?;
            path.pop_if_empty();
            for segment in &request.segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// `GET /projects`
    pub async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.call(ApiRequest::get("/projects")).await
    }

    /// `GET /project/{id}`
    pub async fn get_project(&self, id: &str) -> ApiResult<Project> {
        self.call(ApiRequest::get("/project").segment(id)).await
    }

    /// `POST /projects`
    ///
    /// A success response without `projectId` is reported as
    /// [`ApiError::MalformedPayload`].
    pub async fn create_project(&self, request: &NewProjectRequest) -> ApiResult<CreatedProject> {
        let body = to_body(request)?;
        self.call(ApiRequest::post("/projects", body)).await
    }

    /// `GET /auth/discord-link-status`
    pub async fn discord_link_status(&self) -> ApiResult<DiscordLinkStatus> {
        self.call(ApiRequest::get("/auth/discord-link-status")).await
    }
}

fn to_body<T: Serialize>(value: &T) -> ApiResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| ApiError::MalformedPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotificationConfig;
    use crate::identity::{FakeIdentity, User};

    fn client(base: &str, identity: FakeIdentity) -> ApiClient {
        let config = ApiConfig {
            base_url: base.to_string(),
            timeout_seconds: 5,
        };
        ApiClient::new(
            &config,
            Arc::new(identity),
            Notifier::new(NotificationConfig::default()),
        )
        .unwrap()
    }

    #[test]
    fn test_request_path_splits_endpoint() {
        let request = ApiRequest::get("/auth/discord-link-status");
        assert_eq!(request.path(), "/auth/discord-link-status");
    }

    #[test]
    fn test_url_for_keeps_base_path() {
        let api = client("https://api.example.com/v1/", FakeIdentity::signed_out());
        let url = api.url_for(&ApiRequest::get("/projects")).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/projects");
    }

    #[test]
    fn test_url_for_encodes_dynamic_segment() {
        let api = client("https://api.example.com", FakeIdentity::signed_out());
        let url = api
            .url_for(&ApiRequest::get("/project").segment("a b/c"))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/project/a%20b%2Fc");
    }

    #[test]
    fn test_new_rejects_invalid_base() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            timeout_seconds: 5,
        };
        let result = ApiClient::new(
            &config,
            Arc::new(FakeIdentity::signed_out()),
            Notifier::new(NotificationConfig::default()),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_missing_token_fails_locally() {
        let identity = FakeIdentity::signed_in(User::new("u1"), "tok");
        identity.set_token(Some(String::new()));
        // Port 9 is discard; no request must be attempted anyway.
        let api = client("http://127.0.0.1:9", identity);

        let result = api.list_projects().await;
        assert_eq!(result, Err(ApiError::NotAuthenticated));

        let shown = api.notifier().snapshot();
        assert_eq!(shown.len(), 1);
        assert!(shown[0].message.starts_with("Authentication error"));
    }
}
