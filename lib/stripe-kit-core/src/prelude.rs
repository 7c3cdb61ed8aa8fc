//! Prelude module for convenient imports.
//!
//! ```ignore
//! use stripe_kit_core::prelude::*;
//! ```

pub use crate::{
    ApiError, ApiErrorKind, ApiHost, Clearable, ContentType, Endpoint, Error, Form, HttpClient,
    ListStyle, Method, ParameterValue, Part, Request, RequestBuilder, Response, Result,
    ToParameterValue, Transport, from_json, to_form, to_query_string,
};
