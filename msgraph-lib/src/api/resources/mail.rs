//! Mail operations

use futures::Stream;
use reqwest::Method;
use serde_json::Value;

use crate::GraphClient;
use crate::api::ApiVersion;
use crate::api::GraphUrl;
use crate::api::RequestOptions;
use crate::error::Error;
use crate::response::Response;

fn messages_url(user_id: &str, message_id: Option<&str>) -> GraphUrl {
    GraphUrl::new(ApiVersion::V1)
        .resource("users", Some(user_id))
        .resource("messages", message_id)
}

impl GraphClient {
    /// Lists the first page of a user's messages.
    pub async fn list_user_mails_bulk(
        &self,
        user_id: &str,
        options: &RequestOptions,
    ) -> Result<Response, Error> {
        let url = options.apply_query(messages_url(user_id, None));
        self.send(Method::GET, &self.url(&url), None, options).await
    }

    /// Fetches the page of messages at `next_url`.
    pub async fn list_more_user_mails(
        &self,
        next_url: &str,
        options: &RequestOptions,
    ) -> Result<Response, Error> {
        self.send(Method::GET, next_url, None, options).await
    }

    /// Streams every message of a user, following `@odata.nextLink` lazily.
    pub fn list_all_user_mails(
        &self,
        user_id: &str,
        options: &RequestOptions,
    ) -> impl Stream<Item = Result<Value, Error>> + use<> {
        let url = options.apply_query(messages_url(user_id, None));
        self.list_all(self.url(&url), options)
    }

    /// Gets a message.
    ///
    /// With `as_mime` the raw MIME content is requested (`/$value`) and the
    /// response content is bytes.
    pub async fn get_mail(
        &self,
        user_id: &str,
        message_id: &str,
        as_mime: bool,
        options: &RequestOptions,
    ) -> Result<Response, Error> {
        let mut url = messages_url(user_id, Some(message_id));
        if as_mime {
            url = url.value();
        }
        let url = options.apply_query(url);
        self.send(Method::GET, &self.url(&url), None, options).await
    }
}
