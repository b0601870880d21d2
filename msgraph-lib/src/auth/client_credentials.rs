//! OAuth2 client credentials flow

use async_trait::async_trait;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use super::TokenPayload;
use super::TokenSource;
use super::common::token_url;
use crate::api::DEFAULT_EXPECTED_STATUSES;
use crate::api::Executor;
use crate::api::RequestBody;
use crate::error::ApiError;
use crate::error::AuthError;
use crate::error::Error;

/// Application credentials registered in the tenant.
#[derive(Clone)]
pub struct ClientCredentials {
    /// Application (client) ID.
    pub client_id: String,
    /// Application secret.
    pub client_secret: String,
    /// Tenant whose resources are accessed.
    pub tenant_id: String,
}

impl ClientCredentials {
    /// Creates a new set of credentials.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        tenant_id: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            tenant_id: tenant_id.into(),
        }
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// Exchanges application credentials for a bearer token.
///
/// Admin consent must have been granted to the application for the requested
/// scope, otherwise the authority answers with an error.
#[derive(Debug, Clone)]
pub(crate) struct ClientCredentialsFlow {
    executor: Executor,
    token_url: String,
    scope: String,
    credentials: ClientCredentials,
}

impl ClientCredentialsFlow {
    pub(crate) fn new(
        executor: Executor,
        authority: &str,
        scope: impl Into<String>,
        credentials: ClientCredentials,
    ) -> Self {
        Self {
            executor,
            token_url: token_url(authority, &credentials.tenant_id),
            scope: scope.into(),
            credentials,
        }
    }

    /// Performs one token exchange.
    ///
    /// Non-success statuses surface as the typed HTTP error of the executor; a
    /// successful body without `access_token` fails with
    /// [`AuthError::MissingAccessToken`].
    pub(crate) async fn acquire_with_status(&self) -> Result<(TokenPayload, StatusCode), Error> {
        let params = vec![
            ("grant_type".to_string(), "client_credentials".to_string()),
            ("scope".to_string(), self.scope.clone()),
            ("client_id".to_string(), self.credentials.client_id.clone()),
            (
                "client_secret".to_string(),
                self.credentials.client_secret.clone(),
            ),
        ];

        let response = self
            .executor
            .execute(
                Method::POST,
                &self.token_url,
                HeaderMap::new(),
                Some(RequestBody::Form(params)),
                &DEFAULT_EXPECTED_STATUSES,
            )
            .await?;

        let (content, status) = response.into_parts();
        let body = content.into_json()?;

        if !body.get("access_token").is_some_and(|token| token.is_string()) {
            return Err(AuthError::MissingAccessToken.into());
        }

        let payload = serde_json::from_value(body)
            .map_err(|e| ApiError::parse(format!("invalid token response: {}", e)))?;

        Ok((payload, status))
    }
}

#[async_trait]
impl TokenSource for ClientCredentialsFlow {
    async fn fetch_token(&self) -> Result<String, Error> {
        let (payload, _) = self.acquire_with_status().await?;
        Ok(payload.access_token)
    }
}
