//! Shareable links to uploaded files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use super::files::File;
use crate::routes::expand_query;
use crate::shared::{Expandable, Identifiable, List, Metadata, Pagination, RangeQuery};
use crate::{Clearable, Endpoint, Result, Routes, Transport};

/// Marker of the file link routes.
pub enum FileLinks {}

/// File link operations.
pub type FileLinkRoutes<T> = Routes<T, FileLinks>;

/// A link giving access to a file without an API key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileLink {
    /// Unique identifier (`link_...`).
    pub id: String,
    /// Always `file_link`.
    pub object: String,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Whether the link has expired.
    pub expired: bool,
    /// Expiration time, if any.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Linked file.
    pub file: Expandable<File>,
    /// Live mode or test mode.
    pub livemode: bool,
    /// Attached key/value pairs.
    #[serde(default)]
    pub metadata: Metadata,
    /// Public URL of the file.
    pub url: Option<String>,
}

impl Identifiable for FileLink {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Parameters of `create`.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct CreateFileLink {
    /// File to link to.
    pub file: String,
    /// Expiration time of the link.
    pub expires_at: Option<DateTime<Utc>>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
}

impl CreateFileLink {
    /// Link to `file` that never expires.
    #[must_use]
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            expires_at: None,
            metadata: None,
        }
    }
}

/// Parameters of `update`. Only the fields set are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct UpdateFileLink {
    /// New expiration time. [`Clearable::Clear`] removes the expiration.
    pub expires_at: Option<Clearable<DateTime<Utc>>>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
}

/// Filters of `list_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ListFileLinks {
    /// Creation time range.
    pub created: Option<RangeQuery>,
    /// Only expired (or only live) links.
    pub expired: Option<bool>,
    /// Only links to this file.
    pub file: Option<String>,
    /// Page size and cursors.
    #[param(flatten)]
    pub page: Pagination,
}

impl<T: Transport> Routes<T, FileLinks> {
    /// Creates a file link.
    pub async fn create(&self, params: &CreateFileLink) -> Result<FileLink> {
        self.send(Endpoint::post("/file_links").form(params)?).await
    }

    /// Retrieves a file link.
    pub async fn retrieve(&self, link: &str, expand: &[&str]) -> Result<FileLink> {
        self.send(
            Endpoint::get("/file_links/{link}")
                .path_param("link", link)
                .query(&expand_query(expand))?,
        )
        .await
    }

    /// Updates a file link.
    pub async fn update(&self, link: &str, params: &UpdateFileLink) -> Result<FileLink> {
        self.send(
            Endpoint::post("/file_links/{link}")
                .path_param("link", link)
                .form(params)?,
        )
        .await
    }

    /// Lists file links, most recent first.
    pub async fn list_all(&self, filter: &ListFileLinks) -> Result<List<FileLink>> {
        self.send(Endpoint::get("/file_links").query(filter)?).await
    }
}
