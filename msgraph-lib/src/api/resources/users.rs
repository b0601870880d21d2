//! User operations

use futures::Stream;
use reqwest::Method;
use serde_json::Value;

use crate::GraphClient;
use crate::api::ApiVersion;
use crate::api::GraphUrl;
use crate::api::RequestOptions;
use crate::error::Error;
use crate::response::Response;

const USERS: &str = "users";

impl GraphClient {
    /// Gets a user by ID or user principal name.
    pub async fn get_user(&self, user_id: &str, options: &RequestOptions) -> Result<Response, Error> {
        let url = options.apply_query(GraphUrl::new(ApiVersion::V1).resource(USERS, Some(user_id)));
        self.send(Method::GET, &self.url(&url), None, options).await
    }

    /// Lists the first page of users.
    ///
    /// The response carries `@odata.nextLink` when more users exist; pass it to
    /// [`list_more_users`](Self::list_more_users).
    pub async fn list_users_bulk(&self, options: &RequestOptions) -> Result<Response, Error> {
        let url = options.apply_query(GraphUrl::new(ApiVersion::V1).segment(USERS));
        self.send(Method::GET, &self.url(&url), None, options).await
    }

    /// Fetches the page of users at `next_url`.
    pub async fn list_more_users(
        &self,
        next_url: &str,
        options: &RequestOptions,
    ) -> Result<Response, Error> {
        self.send(Method::GET, next_url, None, options).await
    }

    /// Streams every user, following `@odata.nextLink` lazily.
    pub fn list_all_users(
        &self,
        options: &RequestOptions,
    ) -> impl Stream<Item = Result<Value, Error>> + use<> {
        let url = options.apply_query(GraphUrl::new(ApiVersion::V1).segment(USERS));
        self.list_all(self.url(&url), options)
    }
}
