//! `multipart/form-data` bodies, used only by file uploads.
//!
//! ```
//! use bytes::Bytes;
//! use stripe_kit_core::{Form, ParameterValue};
//!
//! let fields = ParameterValue::map().with("purpose", "dispute_evidence");
//! let form = Form::file_upload(&fields, Bytes::from_static(b"%PDF-1.7"), None).expect("form");
//!
//! let (content_type, body) = form.into_body();
//! assert!(content_type.starts_with("multipart/form-data;boundary="));
//! assert!(body.ends_with(b"--\r\n"));
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

use crate::{ContentType, ParameterValue, Result, encode_pairs, flatten};

/// Part name of the uploaded file.
pub const FILE_PART_NAME: &str = "file";

/// Filename sent with the file part. Its value is ignored by the API but its
/// presence marks the part as a file.
pub const FILE_PART_FILENAME: &str = "file";

/// One part of a [`Form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// A plain field such as `purpose`, sent without a content type.
    Field {
        /// Field name, possibly bracketed (`metadata[case]`).
        name: String,
        /// Field value.
        value: Bytes,
    },
    /// File content, sent as `application/octet-stream`.
    File {
        /// Part name.
        name: String,
        /// Filename of the `Content-Disposition`.
        filename: String,
        /// File content.
        data: Bytes,
    },
    /// A whole nested map, form-urlencoded into a single part.
    Encoded {
        /// Part name.
        name: String,
        /// The `key=value&...` encoding.
        form: Bytes,
    },
}

impl Part {
    /// Plain field.
    #[must_use]
    pub fn field(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Field {
            name: name.into(),
            value: Bytes::from(value.into()),
        }
    }

    /// File content.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self::File {
            name: name.into(),
            filename: filename.into(),
            data: data.into(),
        }
    }

    /// Part name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Field { name, .. } | Self::File { name, .. } | Self::Encoded { name, .. } => name,
        }
    }

    /// Filename, for file parts.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::File { filename, .. } => Some(filename.as_str()),
            Self::Field { .. } | Self::Encoded { .. } => None,
        }
    }

    /// Per-part `Content-Type`. Plain fields have none.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Field { .. } => None,
            Self::File { .. } => Some(ContentType::OctetStream.as_str()),
            Self::Encoded { .. } => Some(ContentType::FormUrlEncoded.as_str()),
        }
    }

    /// Content of the part.
    #[must_use]
    pub const fn data(&self) -> &Bytes {
        match self {
            Self::Field { value: data, .. }
            | Self::File { data, .. }
            | Self::Encoded { form: data, .. } => data,
        }
    }

    fn write_to(&self, buf: &mut BytesMut) {
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", self.name());
        if let Some(filename) = self.filename() {
            disposition.push_str(&format!("; filename=\"{filename}\""));
        }
        buf.put_slice(disposition.as_bytes());
        buf.put_slice(b"\r\n");
        if let Some(content_type) = self.content_type() {
            buf.put_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        buf.put_slice(b"\r\n");
        buf.put_slice(self.data());
        buf.put_slice(b"\r\n");
    }
}

/// Ordered parts and the boundary separating them.
///
/// Boundaries are random and never checked against the content.
#[derive(Debug, Clone)]
pub struct Form {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for Form {
    fn default() -> Self {
        Self::with_boundary(format!("StripeKitBoundary{}", Uuid::new_v4().simple()))
    }
}

impl Form {
    /// Empty form with a fresh boundary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty form with a fixed boundary.
    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    /// Body of a file upload, in the order the files host expects:
    ///
    /// 1. one field per flattened entry of `fields`, so `metadata[case]`
    ///    becomes its own part;
    /// 2. the file itself, named `file`;
    /// 3. when `nested` holds something, a single part named after it with
    ///    the map form-urlencoded inside.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidRequest`] when `fields` or the nested
    /// map holds binary data or is not a map.
    pub fn file_upload(
        fields: &ParameterValue,
        file: Bytes,
        nested: Option<(&str, &ParameterValue)>,
    ) -> Result<Self> {
        let mut form = Self::new();
        form.parts.extend(
            flatten(fields)?
                .into_iter()
                .map(|(name, value)| Part::field(name, value)),
        );
        form.parts.push(Part::file(FILE_PART_NAME, FILE_PART_FILENAME, file));

        if let Some((name, value)) = nested {
            let pairs = flatten(value)?;
            if !pairs.is_empty() {
                form.parts.push(Part::Encoded {
                    name: name.to_string(),
                    form: Bytes::from(encode_pairs(&pairs)),
                });
            }
        }
        Ok(form)
    }

    /// The boundary.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The parts, in order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// `multipart/form-data;boundary=<boundary>`, with no space after the `;`.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data;boundary={}", self.boundary)
    }

    /// Content type and encoded body.
    #[must_use]
    pub fn into_body(self) -> (String, Bytes) {
        let delimiter = format!("--{}", self.boundary);
        let mut buf = BytesMut::new();
        for part in &self.parts {
            buf.put_slice(delimiter.as_bytes());
            buf.put_slice(b"\r\n");
            part.write_to(&mut buf);
        }
        buf.put_slice(delimiter.as_bytes());
        buf.put_slice(b"--\r\n");

        (self.content_type(), buf.freeze())
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::Error;

    #[test]
    fn each_upload_gets_its_own_boundary() {
        let first = Form::new();
        let second = Form::new();

        check!(first.boundary().starts_with("StripeKitBoundary"));
        check!(first.boundary() != second.boundary());
        check!(Form::with_boundary("b0").content_type() == "multipart/form-data;boundary=b0");
    }

    #[test]
    fn body_layout() {
        let fields = ParameterValue::map().with("purpose", "dispute_evidence");
        let form = Form::file_upload(&fields, Bytes::from_static(b"0123456789"), None)
            .expect("form");
        let boundary = form.boundary().to_string();

        let (_, body) = form.into_body();
        let text = String::from_utf8_lossy(&body).replace(&boundary, "b0").replace("\r\n", "\n");

        insta::assert_snapshot!(text, @r#"
        --b0
        Content-Disposition: form-data; name="purpose"

        dispute_evidence
        --b0
        Content-Disposition: form-data; name="file"; filename="file"
        Content-Type: application/octet-stream

        0123456789
        --b0--
        "#);
        check!(body.ends_with(format!("\r\n--{boundary}--\r\n").as_bytes()));
    }

    #[test]
    fn nested_map_comes_last_as_one_encoded_part() {
        let fields = ParameterValue::map()
            .with("purpose", "dispute_evidence")
            .with("metadata", ParameterValue::map().with("case", "42"));
        let link = ParameterValue::map()
            .with("create", true)
            .with("expires_at", 1_900_000_000_i64);

        let form = Form::file_upload(
            &fields,
            Bytes::from_static(b"0123456789"),
            Some(("file_link_data", &link)),
        )
        .expect("form");

        let names: Vec<_> = form.parts().iter().map(Part::name).collect();
        check!(names == ["purpose", "metadata[case]", "file", "file_link_data"]);

        let_assert!(Some(nested) = form.parts().last());
        check!(nested.content_type() == Some("application/x-www-form-urlencoded"));
        check!(nested.data().as_ref() == b"create=true&expires_at=1900000000");
    }

    #[test]
    fn empty_nested_map_adds_no_part() {
        let fields = ParameterValue::map().with("purpose", "business_logo");
        let empty = ParameterValue::map().with("create", None::<bool>);

        let form = Form::file_upload(
            &fields,
            Bytes::from_static(b"png"),
            Some(("file_link_data", &empty)),
        )
        .expect("form");

        check!(form.parts().len() == 2);
    }

    #[test]
    fn binary_fields_are_rejected() {
        let fields = ParameterValue::map().with("purpose", Bytes::from_static(b"oops"));

        let_assert!(
            Err(Error::InvalidRequest(message)) =
                Form::file_upload(&fields, Bytes::new(), None)
        );
        check!(message.contains("purpose"));
    }
}
