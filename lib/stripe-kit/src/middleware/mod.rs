//! Tower middleware layers for the stripe-kit HTTP client.
//!
//! Layers are applied with [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer):
//! the last layer added is the first to process requests.
//!
//! # Available Layers
//!
//! - [`AuthLayer`] - Adds `Authorization: Bearer <key>` and `Stripe-Version`
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//!
//! Any other tower layer over `Request<Bytes>` works as well. Retries are not
//! installed by default: a failed call surfaces as-is.
//!
//! # Example
//!
//! ```ignore
//! use stripe_kit::HyperClient;
//! use stripe_kit::middleware::{AuthLayer, LoggingLayer};
//!
//! let client = HyperClient::builder()
//!     .layer(AuthLayer::new("sk_test_123"))
//!     .layer(LoggingLayer::new())
//!     .build();
//! ```

mod auth;
mod logging;

pub use auth::{Auth, AuthLayer, STRIPE_VERSION_HEADER};
pub use logging::{Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
