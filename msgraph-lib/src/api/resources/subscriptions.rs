//! Change notification subscriptions

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::DateTime;
use chrono::TimeDelta;
use chrono::Utc;
use reqwest::Method;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::GraphClient;
use crate::api::ApiVersion;
use crate::api::GraphUrl;
use crate::api::RequestBody;
use crate::api::RequestOptions;
use crate::error::ConfigError;
use crate::error::Error;
use crate::response::Response;

const SUBSCRIPTIONS: &str = "subscriptions";

/// `clientState` sent when the request does not set one.
pub const DEFAULT_CLIENT_STATE: &str = "secretClientValue";

/// Resources that can be subscribed to.
///
/// Resources with resource data included are served from `/beta` and need a
/// lifecycle notification URL and an encryption certificate. The others are
/// served from `/v1.0` and are addressed through a resource ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionResource {
    /// Every message of a user's mailbox.
    Mailbox,
    /// Messages of a user's inbox.
    Inbox,
    /// Root of a user's drive.
    DriveRoot,
    /// Root of a site's document library.
    SiteDocumentLibrary,
    /// Root of a group's drive.
    GroupDriveRoot,
    /// Channel messages across the tenant.
    TenantTeamsChannels,
    /// Chat messages across the tenant.
    TenantChats,
}

impl SubscriptionResource {
    /// Returns the resource template; `{}` stands for the resource ID.
    pub fn template(self) -> &'static str {
        match self {
            SubscriptionResource::Mailbox => "users('{}')/messages",
            SubscriptionResource::Inbox => "users('{}')/mailFolders('Inbox')/messages",
            SubscriptionResource::DriveRoot => "users/{}/drive/root",
            SubscriptionResource::SiteDocumentLibrary => "sites/{}/drive/root",
            SubscriptionResource::GroupDriveRoot => "groups/{}/drive/root",
            SubscriptionResource::TenantTeamsChannels => "teams/getAllMessages",
            SubscriptionResource::TenantChats => "chats/getAllMessages",
        }
    }

    /// Returns `true` if notifications carry the changed resource data.
    pub fn resource_data_included(self) -> bool {
        matches!(
            self,
            SubscriptionResource::TenantTeamsChannels | SubscriptionResource::TenantChats
        )
    }

    /// Returns the API version serving subscriptions on this resource.
    pub fn version(self) -> ApiVersion {
        if self.resource_data_included() {
            ApiVersion::Beta
        } else {
            ApiVersion::V1
        }
    }

    /// Returns the variant name.
    pub fn name(self) -> &'static str {
        match self {
            SubscriptionResource::Mailbox => "Mailbox",
            SubscriptionResource::Inbox => "Inbox",
            SubscriptionResource::DriveRoot => "DriveRoot",
            SubscriptionResource::SiteDocumentLibrary => "SiteDocumentLibrary",
            SubscriptionResource::GroupDriveRoot => "GroupDriveRoot",
            SubscriptionResource::TenantTeamsChannels => "TenantTeamsChannels",
            SubscriptionResource::TenantChats => "TenantChats",
        }
    }

    fn url(self, subscription_id: Option<&str>) -> GraphUrl {
        GraphUrl::new(self.version()).resource(SUBSCRIPTIONS, subscription_id)
    }
}

/// Formats `now + minutes` the way Graph expects expiration times.
fn expiration_date_time(now: DateTime<Utc>, minutes: i64) -> Result<String, ConfigError> {
    let expiration = TimeDelta::try_minutes(minutes)
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| {
            ConfigError::invalid_argument(format!("invalid minutes to expiration: {}", minutes))
        })?;

    Ok(expiration.format("%Y-%m-%dT%H:%M:%S%.6f0Z").to_string())
}

/// Parameters of a new subscription.
///
/// # Example
///
/// ```ignore
/// let request = SubscriptionRequest::new(
///     "created,updated",
///     "https://example.com/notify",
///     SubscriptionResource::Inbox,
///     60,
/// )
/// .resource_id(user_id);
///
/// let response = client.create_subscription(&request, &RequestOptions::new()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SubscriptionRequest {
    pub change_type: String,
    pub notification_url: String,
    pub resource: SubscriptionResource,
    pub minutes_to_expiration: i64,
    pub client_state: Option<String>,
    pub latest_supported_tls_version: Option<String>,
    /// Required for resources without resource data.
    pub resource_id: Option<String>,
    /// Required for resources with resource data.
    pub lifecycle_url: Option<String>,
    /// Plain PEM certificate, required for resources with resource data.
    pub certificate: Option<String>,
}

impl SubscriptionRequest {
    pub fn new(
        change_type: impl Into<String>,
        notification_url: impl Into<String>,
        resource: SubscriptionResource,
        minutes_to_expiration: i64,
    ) -> Self {
        Self {
            change_type: change_type.into(),
            notification_url: notification_url.into(),
            resource,
            minutes_to_expiration,
            client_state: None,
            latest_supported_tls_version: None,
            resource_id: None,
            lifecycle_url: None,
            certificate: None,
        }
    }

    pub fn client_state(mut self, client_state: impl Into<String>) -> Self {
        self.client_state = Some(client_state.into());
        self
    }

    pub fn latest_supported_tls_version(mut self, version: impl Into<String>) -> Self {
        self.latest_supported_tls_version = Some(version.into());
        self
    }

    pub fn resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    pub fn lifecycle_url(mut self, url: impl Into<String>) -> Self {
        self.lifecycle_url = Some(url.into());
        self
    }

    pub fn certificate(mut self, certificate: impl Into<String>) -> Self {
        self.certificate = Some(certificate.into());
        self
    }

    /// Builds the request body, expiring `minutes_to_expiration` after `now`.
    fn body(&self, now: DateTime<Utc>) -> Result<Value, ConfigError> {
        let mut body = Map::new();

        let resource = if self.resource.resource_data_included() {
            let (Some(lifecycle_url), Some(certificate)) =
                (self.lifecycle_url.as_deref(), self.certificate.as_deref())
            else {
                return Err(ConfigError::invalid_argument(format!(
                    "life cycle url and certificate must be specified with resource '{}'",
                    self.resource.name()
                )));
            };

            body.insert("includeResourceData".into(), json!(true));
            body.insert("lifecycleNotificationUrl".into(), json!(lifecycle_url));
            body.insert(
                "encryptionCertificate".into(),
                json!(STANDARD.encode(certificate.as_bytes())),
            );
            body.insert("encryptionCertificateId".into(), json!("CertificateId"));

            self.resource.template().to_string()
        } else {
            let id = self
                .resource_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    ConfigError::invalid_argument(format!(
                        "resource id must be specified with resource '{}'",
                        self.resource.name()
                    ))
                })?;

            self.resource.template().replace("{}", id)
        };

        body.insert("changeType".into(), json!(self.change_type));
        body.insert("notificationUrl".into(), json!(self.notification_url));
        body.insert("resource".into(), json!(resource));
        body.insert(
            "expirationDateTime".into(),
            json!(expiration_date_time(now, self.minutes_to_expiration)?),
        );
        body.insert(
            "clientState".into(),
            json!(self.client_state.as_deref().unwrap_or(DEFAULT_CLIENT_STATE)),
        );

        if let Some(ref version) = self.latest_supported_tls_version {
            body.insert("latestSupportedTlsVersion".into(), json!(version));
        }

        Ok(Value::Object(body))
    }
}

impl GraphClient {
    /// Creates a change notification subscription.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidArgument`] if the request lacks the resource ID, or
    /// the lifecycle URL and certificate, its resource needs.
    pub async fn create_subscription(
        &self,
        request: &SubscriptionRequest,
        options: &RequestOptions,
    ) -> Result<Response, Error> {
        let body = request.body(Utc::now())?;
        let url = self.url(&request.resource.url(None));
        self.send(Method::POST, &url, Some(RequestBody::Json(body)), options)
            .await
    }

    /// Extends a subscription to expire `minutes_to_expiration` from now.
    pub async fn renew_subscription(
        &self,
        subscription_id: &str,
        resource: SubscriptionResource,
        minutes_to_expiration: i64,
        options: &RequestOptions,
    ) -> Result<Response, Error> {
        let body = json!({
            "expirationDateTime": expiration_date_time(Utc::now(), minutes_to_expiration)?,
        });
        let url = self.url(&resource.url(Some(subscription_id)));
        self.send(Method::PATCH, &url, Some(RequestBody::Json(body)), options)
            .await
    }

    /// Deletes a subscription.
    pub async fn delete_subscription(
        &self,
        subscription_id: &str,
        resource: SubscriptionResource,
        options: &RequestOptions,
    ) -> Result<Response, Error> {
        let url = self.url(&resource.url(Some(subscription_id)));
        self.send(Method::DELETE, &url, None, options).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_expiration_format() {
        assert_eq!(
            expiration_date_time(now(), 90).unwrap(),
            "2024-03-01T13:30:00.0000000Z"
        );
        assert!(expiration_date_time(now(), i64::MAX).is_err());
    }

    #[test]
    fn test_resource_versions() {
        assert_eq!(SubscriptionResource::Inbox.version(), ApiVersion::V1);
        assert_eq!(SubscriptionResource::TenantChats.version(), ApiVersion::Beta);
        assert_eq!(
            SubscriptionResource::Mailbox
                .url(Some("s1"))
                .build("https://graph.microsoft.com"),
            "https://graph.microsoft.com/v1.0/subscriptions/s1"
        );
        assert_eq!(
            SubscriptionResource::TenantTeamsChannels
                .url(None)
                .build("https://graph.microsoft.com"),
            "https://graph.microsoft.com/beta/subscriptions"
        );
    }

    #[test]
    fn test_body_with_resource_id() {
        let request = SubscriptionRequest::new(
            "created",
            "https://example.com/notify",
            SubscriptionResource::Inbox,
            60,
        )
        .resource_id("u1");

        let body = request.body(now()).unwrap();

        assert_eq!(
            body,
            json!({
                "changeType": "created",
                "notificationUrl": "https://example.com/notify",
                "resource": "users('u1')/mailFolders('Inbox')/messages",
                "expirationDateTime": "2024-03-01T13:00:00.0000000Z",
                "clientState": "secretClientValue"
            })
        );
    }

    #[test]
    fn test_body_requires_resource_id() {
        let request = SubscriptionRequest::new(
            "updated",
            "https://example.com/notify",
            SubscriptionResource::DriveRoot,
            60,
        );

        assert!(matches!(
            request.body(now()),
            Err(ConfigError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_body_with_resource_data() {
        let request = SubscriptionRequest::new(
            "created",
            "https://example.com/notify",
            SubscriptionResource::TenantChats,
            30,
        )
        .lifecycle_url("https://example.com/lifecycle")
        .certificate("CERT")
        .client_state("state")
        .latest_supported_tls_version("v1_2");

        let body = request.body(now()).unwrap();

        assert_eq!(body["includeResourceData"], json!(true));
        assert_eq!(body["lifecycleNotificationUrl"], "https://example.com/lifecycle");
        assert_eq!(body["encryptionCertificate"], "Q0VSVA==");
        assert_eq!(body["encryptionCertificateId"], "CertificateId");
        assert_eq!(body["resource"], "chats/getAllMessages");
        assert_eq!(body["clientState"], "state");
        assert_eq!(body["latestSupportedTlsVersion"], "v1_2");
    }

    #[test]
    fn test_body_requires_certificate() {
        let request = SubscriptionRequest::new(
            "created",
            "https://example.com/notify",
            SubscriptionResource::TenantTeamsChannels,
            30,
        )
        .lifecycle_url("https://example.com/lifecycle");

        assert!(matches!(
            request.body(now()),
            Err(ConfigError::InvalidArgument(_))
        ));
    }
}
