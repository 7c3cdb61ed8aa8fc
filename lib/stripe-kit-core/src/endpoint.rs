//! Route-building helper shared by every resource.
//!
//! An [`Endpoint`] is one operation ready to be sent: verb, path template with
//! identifiers filled in, encoded query string and body, and the host it
//! targets. Resources build one per call:
//!
//! ```
//! use stripe_kit_core::{Endpoint, Method, ParameterValue};
//!
//! let endpoint = Endpoint::post("/customers/{customer}/sources/{id}")
//!     .path_param("customer", "cus_123")
//!     .path_param("id", "ba_456")
//!     .form(&ParameterValue::map().with("account_holder_name", "Jane"))
//!     .expect("form");
//!
//! assert_eq!(endpoint.method(), Method::Post);
//! assert_eq!(endpoint.path(), "/customers/cus_123/sources/ba_456");
//! ```

use std::collections::HashMap;
use std::fmt::Display;

use bytes::Bytes;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::Url;

use crate::{
    ContentType, Error, Form, Method, PathTemplate, Request, Result, ToParameterValue,
    to_query_string,
};

/// Characters escaped in a path segment: everything that would end the
/// segment or be read as a delimiter.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// Host an endpoint is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiHost {
    /// The main API host.
    #[default]
    Api,
    /// The host accepting file uploads.
    Files,
}

/// One API operation, resolved and encoded.
#[derive(Debug, Clone)]
pub struct Endpoint {
    method: Method,
    template: PathTemplate,
    path: String,
    query: Option<String>,
    body: Option<Bytes>,
    headers: Vec<(String, String)>,
    host: ApiHost,
    empty_params: Vec<String>,
}

impl Endpoint {
    /// Creates an endpoint for `template` with the given method.
    #[must_use]
    pub fn new(method: Method, template: &'static str) -> Self {
        Self {
            method,
            template: PathTemplate::new(template),
            path: template.to_string(),
            query: None,
            body: None,
            headers: Vec::new(),
            host: ApiHost::Api,
            empty_params: Vec::new(),
        }
    }

    /// `GET` endpoint.
    #[must_use]
    pub fn get(template: &'static str) -> Self {
        Self::new(Method::Get, template)
    }

    /// `POST` endpoint.
    #[must_use]
    pub fn post(template: &'static str) -> Self {
        Self::new(Method::Post, template)
    }

    /// `DELETE` endpoint.
    #[must_use]
    pub fn delete(template: &'static str) -> Self {
        Self::new(Method::Delete, template)
    }

    /// Substitutes the `{name}` placeholder with `value`, percent-encoded as a
    /// single path segment.
    ///
    /// An empty `value` makes [`Endpoint::into_request`] fail.
    #[must_use]
    pub fn path_param(mut self, name: &str, value: impl Display) -> Self {
        let placeholder = format!("{{{name}}}");
        let value = value.to_string();
        if value.is_empty() {
            self.empty_params.push(name.to_string());
        }
        let encoded = utf8_percent_encode(&value, PATH_SEGMENT_ENCODE_SET).to_string();
        self.path = self.path.replace(&placeholder, &encoded);
        self
    }

    /// Flattens `params` into the query string. No query is set when nothing
    /// remains after flattening.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters cannot be flattened.
    pub fn query<P: ToParameterValue + ?Sized>(mut self, params: &P) -> Result<Self> {
        let query = to_query_string(params)?;
        self.query = (!query.is_empty()).then_some(query);
        Ok(self)
    }

    /// Flattens `params` into a form-urlencoded body.
    ///
    /// The body is attached even when empty, so `POST` actions without
    /// parameters still send `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns an error if the method carries no body or the parameters
    /// cannot be flattened.
    pub fn form<P: ToParameterValue + ?Sized>(mut self, params: &P) -> Result<Self> {
        if !self.method.has_body() {
            return Err(Error::invalid_request(format!(
                "{} `{}` cannot carry a form body",
                self.method, self.template
            )));
        }
        let body = crate::to_form(params)?;
        self.body = Some(body);
        Ok(self.header("Content-Type", ContentType::FormUrlEncoded.as_str()))
    }

    /// Attaches a multipart body and its `Content-Type` header.
    #[must_use]
    pub fn multipart(mut self, form: Form) -> Self {
        let (content_type, body) = form.into_body();
        self.body = Some(body);
        self.header("Content-Type", content_type)
    }

    /// Adds an endpoint-specific header. It overrides route-group headers of
    /// the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sends the endpoint to the file upload host.
    #[must_use]
    pub const fn on_files_host(mut self) -> Self {
        self.host = ApiHost::Files;
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Path template, before substitution.
    #[must_use]
    pub const fn template(&self) -> PathTemplate {
        self.template
    }

    /// Path with the identifiers substituted so far.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Encoded query string, without `?`.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Encoded body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Target host.
    #[must_use]
    pub const fn host(&self) -> ApiHost {
        self.host
    }

    /// Builds the request against `base_url`.
    ///
    /// `headers` (the route group's headers) are applied first, then the
    /// endpoint's own headers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if a placeholder was never filled in.
    pub fn into_request(
        self,
        base_url: &Url,
        headers: &HashMap<String, String>,
    ) -> Result<Request<Bytes>> {
        let unresolved: Vec<_> = self
            .template
            .placeholders()
            .filter(|name| self.path.contains(&format!("{{{name}}}")))
            .collect();
        if !unresolved.is_empty() {
            return Err(Error::invalid_request(format!(
                "unresolved path placeholder(s) {unresolved:?} in `{}`",
                self.template
            )));
        }
        if !self.empty_params.is_empty() {
            return Err(Error::invalid_request(format!(
                "empty path parameter(s) {:?} in `{}`",
                self.empty_params, self.template
            )));
        }

        let mut url = base_url.clone();
        url.set_path(&format!(
            "{}{}",
            base_url.path().trim_end_matches('/'),
            self.path
        ));
        url.set_query(self.query.as_deref());

        let mut builder = Request::builder(self.method, url)
            .path_template(self.template)
            .headers(headers.iter().map(|(name, value)| (name.clone(), value.clone())))
            .headers(self.headers);
        if let Some(body) = self.body {
            builder = builder.body(body);
        }

        Ok(builder.build())
    }
}
