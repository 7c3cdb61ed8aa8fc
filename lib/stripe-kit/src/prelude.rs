//! Prelude module for convenient imports.
//!
//! ```ignore
//! use stripe_kit::prelude::*;
//! ```

pub use crate::{
    ApiClient, ApiError, ApiErrorKind, Clearable, Error, Expandable, HttpClient, HyperClient,
    Identifiable, List, Metadata, Pagination, Params, RangeQuery, Result, Routes, StripeClient,
    ToParameterValue, Transport,
};
