//! Token payload and bearer header

use reqwest::header::HeaderValue;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::AuthError;

/// Successful response of the identity token endpoint.
///
/// Members other than the ones below are preserved in [`TokenPayload::extra`].
#[derive(Clone, Deserialize)]
pub struct TokenPayload {
    /// The bearer token used for API authentication.
    pub access_token: String,
    /// Usually `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime of the token in seconds.
    #[serde(default, deserialize_with = "deserialize_seconds")]
    pub expires_in: Option<u64>,
    /// Extended lifetime of the token in seconds.
    #[serde(default, deserialize_with = "deserialize_seconds")]
    pub ext_expires_in: Option<u64>,
    /// Any other member of the response.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl std::fmt::Debug for TokenPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPayload")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("ext_expires_in", &self.ext_expires_in)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Deserializes a duration in seconds which can be either a number or a string.
fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(u64),
    }

    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrNumber::Number(n)) => Ok(Some(n)),
        Some(StringOrNumber::String(s)) => s
            .parse::<u64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid duration value: {}", s))),
    }
}

/// Builds the `Authorization` header value for a token.
///
/// A token already starting with `bearer` (any case) is used as-is; otherwise
/// `Bearer ` is prepended.
pub fn bearer_header(token: &str) -> Result<HeaderValue, AuthError> {
    let has_prefix = token
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("bearer"));

    let value = if has_prefix {
        HeaderValue::from_str(token)
    } else {
        HeaderValue::from_str(&format!("Bearer {}", token))
    };

    let mut value = value.map_err(|_| AuthError::InvalidToken)?;
    value.set_sensitive(true);
    Ok(value)
}
