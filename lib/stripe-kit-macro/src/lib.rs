//! Procedural macros for stripe-kit.
//!
//! - `#[derive(Params)]` - map a parameter struct to its wire field names, or a
//!   unit enum to its wire strings
//!
//! # Example
//!
//! ```ignore
//! use stripe_kit::{Params, Pagination};
//!
//! #[derive(Params)]
//! pub struct ListCharges {
//!     pub customer: Option<String>,
//!     #[param(list = "brackets")]
//!     pub expand: Vec<String>,
//!     #[param(flatten)]
//!     pub page: Pagination,
//! }
//! ```

mod params_derive;

use proc_macro::TokenStream;

/// Derive the `ToParameterValue` trait.
///
/// Structs become a parameter map with one entry per field, in declaration
/// order. Absent values (`None`) are left out. Unit enums become the wire
/// string of the variant.
///
/// # Container Attributes
///
/// - `#[param(rename_all = "snake_case")]` - Rename all fields (or variants) using a case convention
///
/// # Field Attributes
///
/// - `#[param(rename = "name")]` - Use a custom wire name
/// - `#[param(skip)]` - Leave the field out
/// - `#[param(flatten)]` - Merge the field's own entries into the parent map
/// - `#[param(list = "indexed" | "brackets" | "repeat" | "csv")]` - Layout of a list field
///
/// # Variant Attributes
///
/// - `#[param(rename = "name")]` - Use a custom wire string
///
/// # Example
///
/// ```ignore
/// #[derive(Params)]
/// #[param(rename_all = "snake_case")]
/// pub enum CaptureMethod {
///     Automatic,
///     Manual,
/// }
///
/// #[derive(Params)]
/// pub struct CreatePaymentIntent {
///     pub amount: i64,
///     pub currency: String,
///     pub capture_method: Option<CaptureMethod>,
///     #[param(list = "brackets")]
///     pub payment_method_types: Option<Vec<String>>,
/// }
/// ```
#[proc_macro_derive(Params, attributes(param))]
pub fn derive_params(input: TokenStream) -> TokenStream {
    params_derive::expand_params_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
