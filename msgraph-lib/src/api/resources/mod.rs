//! Per-resource operations
//!
//! Thin compositions of URL building, authorization and the request executor.
//! Every operation takes [`RequestOptions`](super::RequestOptions) for the
//! per-call token, extra headers, expected statuses and OData query.

mod drive;
mod mail;
mod subscriptions;
mod users;

pub use drive::*;
pub use subscriptions::*;

use futures::Stream;
use reqwest::Method;
use serde_json::Value;

use super::ClientFetcher;
use super::DeltaItem;
use super::RequestBody;
use super::RequestOptions;
use crate::GraphClient;
use crate::error::Error;
use crate::response::Response;

impl GraphClient {
    /// Sends one authorized request.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<RequestBody>,
        options: &RequestOptions,
    ) -> Result<Response, Error> {
        let headers = self.authorization(options)?;
        self.execute(method, url, headers, body, Some(options.expected_statuses()))
            .await
    }

    /// Streams every item of a listing starting at `url`.
    pub(crate) fn list_all(
        &self,
        url: String,
        options: &RequestOptions,
    ) -> impl Stream<Item = Result<Value, Error>> + use<> {
        super::paginate(ClientFetcher::new(self.clone(), options.clone()), url)
    }

    /// Streams every change of a delta walk starting at `url`, then its delta link.
    pub(crate) fn list_changes(
        &self,
        url: String,
        options: &RequestOptions,
    ) -> impl Stream<Item = Result<DeltaItem, Error>> + use<> {
        super::delta(ClientFetcher::new(self.clone(), options.clone()), url)
    }
}
