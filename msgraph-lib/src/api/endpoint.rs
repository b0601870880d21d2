//! Graph URL composition.

use url::form_urlencoded;

use super::query::ODataQuery;

/// Default Graph endpoint.
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com";

/// Graph API version segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    /// `/v1.0`
    #[default]
    V1,
    /// `/beta`
    Beta,
}

impl ApiVersion {
    /// Returns the path segment, including the leading slash.
    pub fn as_str(self) -> &'static str {
        match self {
            ApiVersion::V1 => "/v1.0",
            ApiVersion::Beta => "/beta",
        }
    }
}

/// Builder for request URLs: base + version + resource path + query.
///
/// # Example
///
/// ```
/// use msgraph_lib::api::{ApiVersion, GraphUrl};
///
/// let url = GraphUrl::new(ApiVersion::V1)
///     .resource("users", Some("48d31887"))
///     .resource("messages", None::<&str>)
///     .build("https://graph.microsoft.com");
///
/// assert_eq!(url, "https://graph.microsoft.com/v1.0/users/48d31887/messages");
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphUrl {
    version: ApiVersion,
    path: String,
    value: bool,
    query: Vec<(&'static str, String)>,
    params: Vec<(String, String)>,
}

impl GraphUrl {
    /// Starts a URL for the given API version.
    pub fn new(version: ApiVersion) -> Self {
        Self {
            version,
            ..Default::default()
        }
    }

    /// Appends `/{segment}`.
    pub fn segment(mut self, segment: impl AsRef<str>) -> Self {
        self.path.push('/');
        self.path.push_str(&encode(segment.as_ref().trim_matches('/')));
        self
    }

    /// Appends `/{resource}` and, when given, `/{id}`.
    pub fn resource(self, resource: impl AsRef<str>, id: Option<impl AsRef<str>>) -> Self {
        let url = self.segment(resource);
        match id {
            Some(id) => url.segment(id),
            None => url,
        }
    }

    /// Appends `/$value` to address the raw content of an entity.
    pub fn value(mut self) -> Self {
        self.value = true;
        self
    }

    /// Attaches the OData query options. An empty query attaches nothing.
    pub fn query(mut self, query: &ODataQuery) -> Self {
        self.query = query.pairs();
        self
    }

    /// Adds a plain `key=value` query parameter after the OData options.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Produces the final URL against `base_url`.
    pub fn build(&self, base_url: &str) -> String {
        let mut url = format!(
            "{}{}{}",
            base_url.trim_end_matches('/'),
            self.version.as_str(),
            self.path
        );

        if self.value {
            url.push_str("/$value");
        }

        let options = self.query.iter().map(|(name, value)| (name.to_string(), encode(value)));
        let params = self.params.iter().map(|(key, value)| (encode(key), encode(value)));
        let pairs: Vec<String> = options
            .chain(params)
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();

        if !pairs.is_empty() {
            url.push('?');
            url.push_str(&pairs.join("&"));
        }

        url
    }
}

/// Percent-encodes a path segment or query value. Spaces become `%20`.
fn encode(input: &str) -> String {
    form_urlencoded::byte_serialize(input.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
