//! Typed async client for the Stripe REST API.
//!
//! Every resource is a route group built from a [`StripeClient`]. Parameters
//! are plain structs deriving [`Params`]: they are flattened into bracketed
//! form fields (`metadata[plan]=gold`, `items[0][price]=...`) for writes and
//! into the query string for lists.
//!
//! # Example
//!
//! ```ignore
//! use stripe_kit::prelude::*;
//! use stripe_kit::resources::charges::CreateCharge;
//!
//! let stripe = StripeClient::builder("sk_test_...")
//!     .configure_client(|b| b.with_logging())
//!     .build()?;
//!
//! let charge = stripe
//!     .charges()
//!     .with_idempotency_key("order-1234")
//!     .create(&CreateCharge {
//!         source: Some("tok_visa".into()),
//!         ..CreateCharge::new(2000, "usd")
//!     })
//!     .await?;
//! ```
//!
//! Any [`HttpClient`] can carry the requests: wrap it in an [`ApiClient`] and
//! hand it to [`StripeClient::with_transport`].

// The derive macro refers to `::stripe_kit`, including from inside this crate.
extern crate self as stripe_kit;

mod api_client;
mod client;
mod config;
pub mod middleware;
pub mod prelude;
pub mod resources;
mod routes;
mod shared;
mod stripe_client;

pub use api_client::{ApiClient, DEFAULT_API_BASE, DEFAULT_FILES_BASE};
pub use client::{
    BoxedService, CLIENT_USER_AGENT_HEADER, HyperClient, HyperClientBuilder, ServiceFuture,
};
pub use config::{AppInfo, BINDINGS_USER_AGENT, ClientConfig, ClientConfigBuilder};
pub use routes::{IDEMPOTENCY_KEY_HEADER, Routes, STRIPE_ACCOUNT_HEADER};
pub use shared::{
    Address, AddressParams, BillingDetails, BillingDetailsParams, Deleted, Expandable,
    Identifiable, List, Metadata, Pagination, RangeQuery, Shipping, ShippingParams,
};
pub use stripe_client::{StripeClient, StripeClientBuilder};

// Re-export tower for middleware composition
pub use tower;

pub use stripe_kit_core::{
    ApiError, ApiErrorKind, ApiHost, Clearable, ContentType, Endpoint, Error, FILE_PART_FILENAME,
    FILE_PART_NAME, Form, HttpClient, ListStyle, Method, ParameterMap, ParameterValue, Part,
    PathTemplate, REQUEST_ID_HEADER, Request, RequestBuilder, Response, Result, ToParameterValue,
    Transport, decode_response, encode_pairs, flatten, flatten_params, from_json, to_form,
    to_query_string,
};

// Re-export http types for status codes and headers
pub use stripe_kit_core::{StatusCode, header};

pub use url;

pub use stripe_kit_macro::Params;
