//! Core types and traits for stripe-kit.
//!
//! This crate holds everything that does not touch the network:
//! - [`ParameterValue`], [`ToParameterValue`], [`ListStyle`], [`Clearable`] - typed parameter trees
//! - [`flatten`] - bracket-path flattening of parameter trees
//! - [`to_form`], [`to_query_string`], [`encode_pairs`] - form encoding
//! - [`Form`] and [`Part`] - multipart bodies for file uploads
//! - [`Endpoint`] - the route-building helper every resource uses
//! - [`Request`], [`Response`], [`Method`], [`PathTemplate`] - HTTP types
//! - [`Error`], [`Result`], [`ApiError`] - error handling
//! - [`HttpClient`] and [`Transport`] - execution traits

mod api_error;
mod body;
mod client;
mod endpoint;
mod error;
mod flatten;
mod method;
mod multipart;
mod params;
mod path_template;
pub mod prelude;
mod request;
mod response;

pub use api_error::{ApiError, ApiErrorKind};
pub use body::{ContentType, encode_pairs, from_json, to_form, to_query_string};
pub use client::{HttpClient, Transport, decode_response};
pub use endpoint::{ApiHost, Endpoint};
pub use error::{Error, Result};
pub use flatten::{flatten, flatten_params};
pub use method::Method;
pub use multipart::{FILE_PART_FILENAME, FILE_PART_NAME, Form, Part};
pub use params::{Clearable, ListStyle, ParameterMap, ParameterValue, ToParameterValue};
pub use path_template::PathTemplate;
pub use request::{Request, RequestBuilder};
pub use response::{REQUEST_ID_HEADER, Response};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
