//! Main GraphClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use url::Url;

use crate::api::Executor;
use crate::api::GRAPH_BASE_URL;
use crate::api::GraphUrl;
use crate::api::RequestOptions;
use crate::auth::ClientCredentials;
use crate::auth::ClientCredentialsFlow;
use crate::auth::DEFAULT_AUTHORITY;
use crate::auth::DEFAULT_REFRESH_INTERVAL_SECS;
use crate::auth::DEFAULT_SCOPE;
use crate::auth::TokenManager;
use crate::auth::TokenPayload;
use crate::auth::TokenSource;
use crate::auth::bearer_header;
use crate::error::AuthError;
use crate::error::ConfigError;
use crate::error::Error;

/// The main client for interacting with Microsoft Graph.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks. Clones share one connection pool and one managed token.
/// Dropping the last clone stops the token refresh task.
///
/// # Example
///
/// ```ignore
/// use msgraph_lib::GraphClient;
///
/// let client = GraphClient::builder()
///     .token_refresh_interval(1800)
///     .logging(true)
///     .build()?;
///
/// client.manage_token(app_id, app_secret, tenant_id).await?;
///
/// let user = client.get_user("48d31887", &RequestOptions::new()).await?;
/// ```
#[derive(Clone)]
pub struct GraphClient {
    inner: Arc<GraphClientInner>,
}

struct GraphClientInner {
    base_url: String,
    authority: String,
    scope: String,
    executor: Executor,
    tokens: TokenManager,
    logging: bool,
}

impl GraphClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> GraphClientBuilder {
        GraphClientBuilder::new()
    }

    /// Creates a client with the default settings.
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    pub(crate) fn executor(&self) -> &Executor {
        &self.inner.executor
    }

    /// Returns the Graph base URL, without version segment.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the identity authority used for token acquisition.
    pub fn authority(&self) -> &str {
        &self.inner.authority
    }

    /// Returns the scope requested for tokens.
    pub fn scope(&self) -> &str {
        &self.inner.scope
    }

    /// Returns `true` if logging is enabled.
    pub fn logging(&self) -> bool {
        self.inner.logging
    }

    /// Builds a full URL against this client's base URL.
    pub fn url(&self, url: &GraphUrl) -> String {
        url.build(&self.inner.base_url)
    }

    /// Returns the token refresh interval in seconds.
    pub fn token_refresh_interval(&self) -> u64 {
        self.inner.tokens.refresh_interval()
    }

    /// Sets the token refresh interval in seconds.
    ///
    /// Must be between 60 and 3600. Takes effect the next time token management
    /// starts.
    pub fn set_token_refresh_interval(&self, secs: u64) -> Result<(), Error> {
        Ok(self.inner.tokens.set_refresh_interval(secs)?)
    }

    /// Returns `true` while the client keeps a token for you.
    pub fn is_managed(&self) -> bool {
        self.inner.tokens.is_managed()
    }

    /// Returns the current managed token, if any.
    pub fn token(&self) -> Option<String> {
        self.inner.tokens.token()
    }

    fn client_credentials_flow(
        &self,
        app_id: &str,
        app_secret: &str,
        tenant_id: &str,
    ) -> ClientCredentialsFlow {
        ClientCredentialsFlow::new(
            self.inner.executor.clone(),
            &self.inner.authority,
            self.inner.scope.clone(),
            ClientCredentials::new(app_id, app_secret, tenant_id),
        )
    }

    /// Gets a token from the identity authority.
    ///
    /// Performs a single client credentials exchange. Client state is left
    /// untouched.
    ///
    /// # Arguments
    ///
    /// * `app_id` - Application (client) ID; consent must have been granted
    /// * `app_secret` - Secret of the application
    /// * `tenant_id` - Tenant whose resources are accessed
    pub async fn acquire_token(
        &self,
        app_id: &str,
        app_secret: &str,
        tenant_id: &str,
    ) -> Result<(TokenPayload, StatusCode), Error> {
        self.client_credentials_flow(app_id, app_secret, tenant_id)
            .acquire_with_status()
            .await
    }

    /// Lets the client keep a valid token for you.
    ///
    /// Acquires a token immediately, then re-acquires it every
    /// [`token_refresh_interval`](Self::token_refresh_interval) seconds in the
    /// background. Once managed, authorized calls no longer need an explicit
    /// token. Refresh failures are logged and the previous token is kept.
    ///
    /// # Errors
    ///
    /// - [`AuthError::AlreadyManaged`] if the token is already managed
    /// - [`AuthError::TokenManagement`] wrapping the initial acquisition failure
    pub async fn manage_token(
        &self,
        app_id: &str,
        app_secret: &str,
        tenant_id: &str,
    ) -> Result<(), Error> {
        let flow = self.client_credentials_flow(app_id, app_secret, tenant_id);
        self.manage_token_with(flow).await
    }

    /// Lets the client keep a valid token drawn from a custom [`TokenSource`].
    ///
    /// Behaves like [`manage_token`](Self::manage_token), fetching from
    /// `source` instead of the client credentials flow.
    pub async fn manage_token_with<S: TokenSource>(&self, source: S) -> Result<(), Error> {
        self.inner.tokens.manage(source).await
    }

    /// Stops refreshing the managed token and forgets it.
    ///
    /// Token management can be started again afterwards.
    pub async fn stop_token_management(&self) {
        self.inner.tokens.stop().await;
    }

    /// Resolves the headers of an authorized call.
    ///
    /// Uses the explicit token of `options` first, then the managed token. An
    /// empty explicit token counts as absent. `Content-Type: application/json`
    /// is always set; the extra headers of `options` are applied last and
    /// replace any header of the same name.
    pub fn authorization(&self, options: &RequestOptions) -> Result<HeaderMap, Error> {
        let token = match options.token.as_deref().filter(|token| !token.is_empty()) {
            Some(token) => token.to_string(),
            None => self.token().ok_or(AuthError::AuthenticationRequired)?,
        };

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer_header(&token)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for name in options.extra_headers.keys() {
            headers.remove(name);
            for value in options.extra_headers.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        Ok(headers)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for constructing a [`GraphClient`].
///
/// # Example
///
/// ```ignore
/// let client = GraphClient::builder()
///     .base_url("http://127.0.0.1:8080")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct GraphClientBuilder {
    base_url: String,
    authority: String,
    scope: String,
    token_refresh_interval: u64,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
    logging: bool,
}

impl GraphClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: GRAPH_BASE_URL.to_string(),
            authority: DEFAULT_AUTHORITY.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            token_refresh_interval: DEFAULT_REFRESH_INTERVAL_SECS,
            timeout: None,
            connect_timeout: None,
            http_client: None,
            logging: false,
        }
    }

    /// Overrides the Graph base URL.
    ///
    /// Defaults to `https://graph.microsoft.com`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Overrides the identity authority.
    ///
    /// Defaults to `https://login.microsoftonline.com`.
    pub fn authority(mut self, url: impl Into<String>) -> Self {
        self.authority = url.into();
        self
    }

    /// Overrides the scope requested for tokens.
    ///
    /// Defaults to `https://graph.microsoft.com/.default`.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Sets the token refresh interval in seconds.
    ///
    /// Must be between 60 and 3600. Defaults to 3300.
    pub fn token_refresh_interval(mut self, secs: u64) -> Self {
        self.token_refresh_interval = secs;
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Enables logging through the `log` facade.
    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging = enabled;
        self
    }

    /// Builds the [`GraphClient`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidUrl`] if the base URL or authority is not an
    ///   absolute http(s) URL
    /// - [`ConfigError::RefreshInterval`] if the refresh interval is out of range
    /// - [`ConfigError::HttpClient`] if the HTTP client cannot be built
    pub fn build(self) -> Result<GraphClient, Error> {
        let base_url = validate_url(&self.base_url)?;
        let authority = validate_url(&self.authority)?;
        let tokens = TokenManager::new(self.token_refresh_interval, self.logging)?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ConfigError::HttpClient)?
            }
        };

        Ok(GraphClient {
            inner: Arc::new(GraphClientInner {
                base_url,
                authority,
                scope: self.scope,
                executor: Executor::new(http_client, self.timeout, self.logging),
                tokens,
                logging: self.logging,
            }),
        })
    }
}

impl Default for GraphClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks that `url` is an absolute http(s) URL and strips the trailing slash.
fn validate_url(url: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(url.trim_end_matches('/').to_string()),
        scheme => Err(invalid(format!("unsupported scheme '{}'", scheme))),
    }
}
