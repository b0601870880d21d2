//! Drive operations

use futures::Stream;
use futures::TryStreamExt;
use futures::pin_mut;
use reqwest::Method;

use crate::GraphClient;
use crate::api::ApiVersion;
use crate::api::DeltaItem;
use crate::api::GraphUrl;
use crate::api::RequestOptions;
use crate::error::Error;
use crate::response::Response;

/// Resources that own a drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOwner {
    /// A user's OneDrive.
    Users,
    /// A site's default document library.
    Sites,
    /// A group's drive.
    Groups,
}

impl DriveOwner {
    /// Returns the collection segment of the owner.
    pub fn as_str(self) -> &'static str {
        match self {
            DriveOwner::Users => "users",
            DriveOwner::Sites => "sites",
            DriveOwner::Groups => "groups",
        }
    }

    fn drive_url(self, id: &str) -> GraphUrl {
        GraphUrl::new(ApiVersion::V1)
            .resource(self.as_str(), Some(id))
            .segment("drive")
    }
}

impl GraphClient {
    /// Streams the drive item changes since `state_link` was issued.
    ///
    /// `state_link` is a delta or next link returned by a previous call. Every
    /// changed item is yielded, then the delta link to resume from next time.
    /// Fails with [`Error::MissingDeltaLink`] when the last page has none.
    pub fn list_drive_changes(
        &self,
        state_link: &str,
        options: &RequestOptions,
    ) -> impl Stream<Item = Result<DeltaItem, Error>> + use<> {
        self.list_changes(state_link.to_string(), options)
    }

    /// Gets a delta link pointing at the current state of a drive.
    ///
    /// Walks `drive/root/delta?token=latest`, which returns no items, and
    /// returns the final delta link.
    pub async fn get_latest_delta_link(
        &self,
        owner: DriveOwner,
        id: &str,
        options: &RequestOptions,
    ) -> Result<String, Error> {
        let url = owner
            .drive_url(id)
            .segment("root")
            .segment("delta")
            .param("token", "latest");

        let changes = self.list_changes(self.url(&url), options);
        pin_mut!(changes);

        let mut delta_link = None;
        while let Some(change) = changes.try_next().await? {
            if let DeltaItem::DeltaLink(link) = change {
                delta_link = Some(link);
            }
        }

        delta_link.ok_or(Error::MissingDeltaLink)
    }

    /// Downloads the content of a drive item.
    pub async fn get_drive_item_content(
        &self,
        owner: DriveOwner,
        id: &str,
        item_id: &str,
        options: &RequestOptions,
    ) -> Result<Response, Error> {
        let url = owner
            .drive_url(id)
            .resource("items", Some(item_id))
            .segment("content");
        self.send(Method::GET, &self.url(&url), None, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_urls() {
        let url = DriveOwner::Sites
            .drive_url("s1")
            .resource("items", Some("i1"))
            .segment("content");
        assert_eq!(
            url.build("https://graph.microsoft.com"),
            "https://graph.microsoft.com/v1.0/sites/s1/drive/items/i1/content"
        );

        let url = DriveOwner::Groups
            .drive_url("g1")
            .segment("root")
            .segment("delta")
            .param("token", "latest");
        assert_eq!(
            url.build("https://graph.microsoft.com"),
            "https://graph.microsoft.com/v1.0/groups/g1/drive/root/delta?token=latest"
        );
    }
}
