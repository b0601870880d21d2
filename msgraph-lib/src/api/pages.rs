//! Cursor-driven pagination and delta sync.
//!
//! List endpoints return one page at a time with an `@odata.nextLink` while more
//! pages remain. Delta endpoints additionally return an `@odata.deltaLink` on the
//! last page, which resumes the change feed on the next sync round. Both walks
//! share [`PageWalker`]; [`paginate`] and [`delta`] flatten it into lazy item
//! streams.
//!
//! Streams are pulled lazily: a page is fetched only when the caller asks for an
//! item past the end of the current page, so dropping the stream early issues
//! no further requests.

use async_stream::try_stream;
use async_trait::async_trait;
use futures::Stream;
use log::debug;
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

use super::RequestOptions;
use crate::GraphClient;
use crate::error::ApiError;
use crate::error::Error;
use crate::response::Content;

/// One page of a list or delta response.
///
/// `value` is required; the cursor fields are optional and every other member
/// is kept as-is in [`Page::extra`].
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T = Value> {
    value: Vec<T>,
    /// Link to the next page.
    #[serde(rename = "@odata.nextLink", default)]
    next_link: Option<String>,
    /// Link resuming the change feed (last page of a delta walk only).
    #[serde(rename = "@odata.deltaLink", default)]
    delta_link: Option<String>,
    /// Total count (when `$count=true`).
    #[serde(rename = "@odata.count", default)]
    total_count: Option<u64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl<T: DeserializeOwned> Page<T> {
    /// Decodes a page from a response body.
    pub fn from_content(content: Content) -> Result<Self, Error> {
        let value = content.into_json()?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::parse(format!("invalid page: {}", e)).into())
    }
}

impl<T> Page<T> {
    /// Creates a page with items and no cursors.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            value: items,
            next_link: None,
            delta_link: None,
            total_count: None,
            extra: Map::new(),
        }
    }

    /// Sets the next link.
    pub fn with_next_link(mut self, next_link: impl Into<String>) -> Self {
        self.next_link = Some(next_link.into());
        self
    }

    /// Sets the delta link.
    pub fn with_delta_link(mut self, delta_link: impl Into<String>) -> Self {
        self.delta_link = Some(delta_link.into());
        self
    }

    /// Returns the items of this page, in server order.
    pub fn items(&self) -> &[T] {
        &self.value
    }

    /// Consumes the page and returns the items.
    pub fn into_items(self) -> Vec<T> {
        self.value
    }

    /// Returns the `@odata.nextLink`, if more pages remain.
    pub fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }

    /// Returns the `@odata.deltaLink`, if present.
    pub fn delta_link(&self) -> Option<&str> {
        self.delta_link.as_deref()
    }

    /// Returns the total count, if it was requested.
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Returns the members of the body that are not part of the page contract.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Returns `true` if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Returns `true` if there are more pages available.
    pub fn has_more(&self) -> bool {
        self.next_link.is_some()
    }
}

/// Fetches the raw body of one page.
///
/// The first call receives the listing URL; later calls receive cursor URLs
/// verbatim (they already carry every query parameter).
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page at `url`.
    async fn fetch_page(&self, url: &str) -> Result<Content, Error>;

    /// Whether page progress is logged.
    fn logging(&self) -> bool {
        false
    }
}

/// Async iterator over the pages of a listing.
///
/// # Example
///
/// ```ignore
/// let mut pages = PageWalker::new(fetcher, url);
///
/// while let Some(page) = pages.next::<Value>().await {
///     let page = page?;
///     println!("{} items, more: {}", page.len(), page.has_more());
/// }
/// ```
pub struct PageWalker<F> {
    fetcher: F,
    /// The next URL to fetch (initial URL, then each @odata.nextLink).
    next_url: Option<String>,
    /// Number of pages fetched so far.
    fetched: usize,
}

impl<F: PageFetcher> PageWalker<F> {
    /// Creates a walker starting at `url`.
    pub fn new(fetcher: F, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            next_url: Some(url.into()),
            fetched: 0,
        }
    }

    /// Returns the number of pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.fetched
    }

    /// Fetches the next page.
    ///
    /// Returns `None` once a page without `@odata.nextLink` has been returned,
    /// or after an error.
    pub async fn next<T: DeserializeOwned>(&mut self) -> Option<Result<Page<T>, Error>> {
        let url = self.next_url.take()?;

        let page = match self.fetcher.fetch_page(&url).await {
            Ok(content) => Page::<T>::from_content(content),
            Err(e) => Err(e),
        };

        if let Ok(ref page) = page {
            self.fetched += 1;
            self.next_url = page.next_link.clone();

            if self.fetcher.logging() {
                debug!(
                    "page {} fetched: {} items, next link: {}, delta link: {}",
                    self.fetched,
                    page.len(),
                    page.next_link.is_some(),
                    page.delta_link.is_some()
                );
            }
        }

        Some(page)
    }
}

/// Item of a delta walk: every changed item, then the cursor of the next round.
#[derive(Debug, Clone, PartialEq)]
pub enum DeltaItem<T = Value> {
    /// A changed item.
    Item(T),
    /// The `@odata.deltaLink` of the last page, always yielded last.
    DeltaLink(String),
}

impl<T> DeltaItem<T> {
    /// Returns the item, if this is one.
    pub fn into_item(self) -> Option<T> {
        match self {
            DeltaItem::Item(item) => Some(item),
            DeltaItem::DeltaLink(_) => None,
        }
    }

    /// Returns the delta link, if this is the final cursor.
    pub fn as_delta_link(&self) -> Option<&str> {
        match self {
            DeltaItem::Item(_) => None,
            DeltaItem::DeltaLink(link) => Some(link),
        }
    }
}

/// Streams every item of a plain listing, following `@odata.nextLink`.
///
/// Items come in page order, and in server order within a page.
pub fn paginate<F, T>(fetcher: F, url: impl Into<String>) -> impl Stream<Item = Result<T, Error>>
where
    F: PageFetcher,
    T: DeserializeOwned,
{
    let mut pages = PageWalker::new(fetcher, url);

    try_stream! {
        while let Some(page) = pages.next::<T>().await {
            for item in page?.into_items() {
                yield item;
            }
        }
    }
}

/// Streams every item of a delta walk, then the final `@odata.deltaLink`.
///
/// Fails with [`Error::MissingDeltaLink`] after the last item when the last page
/// carries no delta link.
pub fn delta<F, T>(
    fetcher: F,
    url: impl Into<String>,
) -> impl Stream<Item = Result<DeltaItem<T>, Error>>
where
    F: PageFetcher,
    T: DeserializeOwned,
{
    let mut pages = PageWalker::new(fetcher, url);

    try_stream! {
        let mut delta_link = None;

        while let Some(page) = pages.next::<T>().await {
            let page = page?;
            delta_link = page.delta_link.clone();
            for item in page.into_items() {
                yield DeltaItem::Item(item);
            }
        }

        let delta_link = delta_link.ok_or(Error::MissingDeltaLink)?;
        yield DeltaItem::DeltaLink(delta_link);
    }
}

/// Fetches pages through a client with the options of the originating call.
///
/// Authorization is resolved for every page so a token refreshed mid-walk is
/// picked up.
#[derive(Clone)]
pub(crate) struct ClientFetcher {
    client: GraphClient,
    options: RequestOptions,
}

impl ClientFetcher {
    pub(crate) fn new(client: GraphClient, options: RequestOptions) -> Self {
        Self { client, options }
    }
}

#[async_trait]
impl PageFetcher for ClientFetcher {
    async fn fetch_page(&self, url: &str) -> Result<Content, Error> {
        let headers = self.client.authorization(&self.options)?;
        let response = self
            .client
            .execute(
                Method::GET,
                url,
                headers,
                None,
                Some(self.options.expected_statuses()),
            )
            .await?;
        Ok(response.content)
    }

    fn logging(&self) -> bool {
        self.client.logging()
    }
}
