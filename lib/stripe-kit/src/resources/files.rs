//! File uploads.
//!
//! Uploads are the only `multipart/form-data` call of the API and go to a
//! separate host ([`ApiHost::Files`](crate::ApiHost::Files)).
//!
//! ```ignore
//! use stripe_kit::resources::files::{CreateFile, FilePurpose};
//!
//! let bytes = tokio::fs::read("receipt.pdf").await?;
//! let file = client
//!     .files()
//!     .create(&CreateFile::new(FilePurpose::DisputeEvidence, bytes))
//!     .await?;
//! ```

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use super::file_links::FileLink;
use crate::routes::expand_query;
use crate::shared::{Identifiable, List, Metadata, Pagination, RangeQuery};
use crate::{Endpoint, Form, Result, Routes, ToParameterValue, Transport};

/// Marker of the file routes.
pub enum Files {}

/// File operations.
pub type FileRoutes<T> = Routes<T, Files>;

/// An uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// Unique identifier (`file_...`).
    pub id: String,
    /// Always `file`.
    pub object: String,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// When the file expires, if ever.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Name of the uploaded file.
    pub filename: Option<String>,
    /// Links to the file.
    pub links: Option<List<FileLink>>,
    /// What the file is used for.
    pub purpose: FilePurpose,
    /// Size in bytes.
    pub size: u64,
    /// Human-readable title.
    pub title: Option<String>,
    /// File type (`pdf`, `jpg`, ...).
    #[serde(rename = "type")]
    pub type_: Option<String>,
    /// URL to fetch the contents with a secret key.
    pub url: Option<String>,
}

impl Identifiable for File {
    fn id(&self) -> &str {
        &self.id
    }
}

/// What an uploaded file is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum FilePurpose {
    /// Account requirement document.
    AccountRequirement,
    /// Additional identity verification document.
    AdditionalVerification,
    /// Business icon.
    BusinessIcon,
    /// Business logo.
    BusinessLogo,
    /// Customer signature.
    CustomerSignature,
    /// Evidence for a dispute.
    DisputeEvidence,
    /// Identity document.
    IdentityDocument,
    /// PCI compliance document.
    PciDocument,
    /// Tax document.
    TaxDocumentUserUpload,
}

/// Link to create along with the upload.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct FileLinkData {
    /// Must be `true` for the link to be created.
    pub create: bool,
    /// Expiration time of the link.
    pub expires_at: Option<DateTime<Utc>>,
    /// Attached key/value pairs of the link.
    pub metadata: Option<Metadata>,
}

impl Default for FileLinkData {
    fn default() -> Self {
        Self {
            create: true,
            expires_at: None,
            metadata: None,
        }
    }
}

/// Parameters of `create`.
#[derive(Debug, Clone, PartialEq, Params)]
pub struct CreateFile {
    /// What the file is used for.
    pub purpose: FilePurpose,
    /// File contents.
    #[param(skip)]
    pub file: Bytes,
    /// Link to create along with the upload.
    #[param(skip)]
    pub file_link_data: Option<FileLinkData>,
}

impl CreateFile {
    /// Upload of `file` for `purpose`.
    #[must_use]
    pub fn new(purpose: FilePurpose, file: impl Into<Bytes>) -> Self {
        Self {
            purpose,
            file: file.into(),
            file_link_data: None,
        }
    }

    /// Lays out the multipart body: simple fields, then the file, then the
    /// link data.
    ///
    /// # Errors
    ///
    /// Returns an error if the link data cannot be flattened.
    pub fn to_form(&self) -> Result<Form> {
        let link = self
            .file_link_data
            .as_ref()
            .map(ToParameterValue::to_parameter_value);
        Form::file_upload(
            &self.to_parameter_value(),
            self.file.clone(),
            link.as_ref().map(|value| ("file_link_data", value)),
        )
    }
}

/// Filters of `list_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ListFiles {
    /// Creation time range.
    pub created: Option<RangeQuery>,
    /// Only files with this purpose.
    pub purpose: Option<FilePurpose>,
    /// Page size and cursors.
    #[param(flatten)]
    pub page: Pagination,
}

impl<T: Transport> Routes<T, Files> {
    /// Uploads a file.
    pub async fn create(&self, params: &CreateFile) -> Result<File> {
        self.send(
            Endpoint::post("/files")
                .multipart(params.to_form()?)
                .on_files_host(),
        )
        .await
    }

    /// Retrieves a file's metadata.
    pub async fn retrieve(&self, file: &str, expand: &[&str]) -> Result<File> {
        self.send(
            Endpoint::get("/files/{file}")
                .path_param("file", file)
                .query(&expand_query(expand))?,
        )
        .await
    }

    /// Lists uploaded files, most recent first.
    pub async fn list_all(&self, filter: &ListFiles) -> Result<List<File>> {
        self.send(Endpoint::get("/files").query(filter)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentType;

    #[test]
    fn upload_parts_in_order() {
        let params = CreateFile::new(FilePurpose::BusinessLogo, Bytes::from_static(b"\x89PNG"));

        let form = params.to_form().expect("form");
        let names: Vec<_> = form.parts().iter().map(|part| part.name()).collect();

        assert_eq!(names, ["purpose", "file"]);
        assert_eq!(form.parts()[0].data().as_ref(), b"business_logo");
        assert_eq!(form.parts()[1].filename(), Some("file"));
    }

    #[test]
    fn link_data_is_a_trailing_urlencoded_part() {
        let params = CreateFile {
            file_link_data: Some(FileLinkData::default()),
            ..CreateFile::new(FilePurpose::DisputeEvidence, Bytes::from_static(b"%PDF"))
        };

        let form = params.to_form().expect("form");
        let link = form.parts().last().expect("link part");

        assert_eq!(form.parts().len(), 3);
        assert_eq!(link.name(), "file_link_data");
        assert_eq!(link.content_type(), Some(ContentType::FormUrlEncoded.as_str()));
        assert_eq!(link.data().as_ref(), b"create=true");
    }
}
