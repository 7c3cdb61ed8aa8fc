//! Outgoing calls, as handed to an [`HttpClient`](crate::HttpClient).
//!
//! Resources never build these by hand: [`Endpoint::into_request`](crate::Endpoint::into_request)
//! does. The builder is for transports and tests.
//!
//! ```
//! use bytes::Bytes;
//! use stripe_kit_core::{Method, Request};
//!
//! let url = "https://api.stripe.com/v1/balance".parse().expect("valid URL");
//! let request = Request::<Bytes>::builder(Method::Get, url)
//!     .header("Stripe-Account", "acct_123")
//!     .build();
//! assert_eq!(request.header("stripe-account"), Some("acct_123"));
//! ```

use std::collections::HashMap;

use bytes::Bytes;
use url::Url;

use crate::{Method, PathTemplate};

/// Looks a header up, exact name first, then ignoring ASCII case.
pub(crate) fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .or_else(|| {
            headers
                .iter()
                .find_map(|(key, value)| key.eq_ignore_ascii_case(name).then_some(value))
        })
        .map(String::as_str)
}

/// A resolved API call: absolute URL, headers, and encoded body.
#[derive(Debug, Clone)]
pub struct Request<B = Bytes> {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: Option<B>,
    path_template: Option<PathTemplate>,
}

impl<B> Request<B> {
    /// Starts a request.
    #[must_use]
    pub fn builder(method: Method, url: Url) -> RequestBuilder<B> {
        RequestBuilder(Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
            path_template: None,
        })
    }

    /// Verb.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Absolute URL, query included.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// All headers.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Header value, whatever the case of `name`.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Sets a header, replacing any value already stored under a name that
    /// differs only in case.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
    }

    /// Encoded body. `None` for reads and deletions.
    #[must_use]
    pub const fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// Route the URL was resolved from, such as `/customers/{customer}`.
    #[must_use]
    pub const fn path_template(&self) -> Option<PathTemplate> {
        self.path_template
    }

    /// Splits the request for a transport.
    #[must_use]
    pub fn into_parts(self) -> (Method, Url, HashMap<String, String>, Option<B>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder returned by [`Request::builder`].
#[derive(Debug, Clone)]
pub struct RequestBuilder<B = Bytes>(Request<B>);

impl<B> RequestBuilder<B> {
    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.set_header(name, value);
        self
    }

    /// Sets every header of `headers`, in order.
    #[must_use]
    pub fn headers(self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.header(name, value))
    }

    /// Records the route template.
    #[must_use]
    pub const fn path_template(mut self, template: PathTemplate) -> Self {
        self.0.path_template = Some(template);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: B) -> Self {
        self.0.body = Some(body);
        self
    }

    /// Finishes the request.
    #[must_use]
    pub fn build(self) -> Request<B> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    fn url(path: &str) -> Url {
        Url::parse("https://api.stripe.com/v1/")
            .and_then(|base| base.join(path))
            .expect("valid URL")
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = Request::<Bytes>::builder(Method::Get, url("balance"))
            .header("Stripe-Version", "2024-06-20")
            .build();

        check!(request.header("Stripe-Version") == Some("2024-06-20"));
        check!(request.header("stripe-version") == Some("2024-06-20"));
        check!(request.header("Stripe-Account").is_none());
    }

    #[test]
    fn later_headers_replace_earlier_ones_whatever_the_case() {
        let request = Request::<Bytes>::builder(Method::Post, url("files"))
            .headers([
                ("content-type".to_string(), "text/plain".to_string()),
                ("Stripe-Account".to_string(), "acct_1".to_string()),
            ])
            .header("Content-Type", "multipart/form-data;boundary=b")
            .build();

        check!(request.headers().len() == 2);
        check!(request.header("Content-Type") == Some("multipart/form-data;boundary=b"));
    }

    #[test]
    fn parts_hand_over_everything() {
        let request = Request::builder(Method::Post, url("charges"))
            .header("Idempotency-Key", "order-1")
            .path_template(PathTemplate::new("/charges"))
            .body(Bytes::from_static(b"amount=100"))
            .build();
        check!(request.path_template() == Some(PathTemplate::new("/charges")));

        let (method, parts_url, headers, body) = request.into_parts();
        check!(method == Method::Post);
        check!(parts_url.as_str() == "https://api.stripe.com/v1/charges");
        check!(headers.get("Idempotency-Key").map(String::as_str) == Some("order-1"));
        check!(body == Some(Bytes::from_static(b"amount=100")));
    }
}
