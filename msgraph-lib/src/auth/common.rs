//! Shared authentication utilities

/// Default identity authority.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Default scope requested for Graph application permissions.
pub const DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Build v2 token endpoint URL.
pub(crate) fn token_url(authority: &str, tenant_id: &str) -> String {
    format!(
        "{}/{}/oauth2/v2.0/token",
        authority.trim_end_matches('/'),
        tenant_id
    )
}
