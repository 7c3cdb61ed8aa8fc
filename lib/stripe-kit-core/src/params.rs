//! Typed parameter trees.
//!
//! Every route operation turns its arguments into a [`ParameterValue`] tree
//! before anything is encoded. The tree keeps the difference between a field
//! that was not provided ([`ParameterValue::Absent`]) and a field the caller
//! wants cleared on the server ([`Clearable::Clear`], sent as an empty string).

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Ordered map of wire field names to values.
pub type ParameterMap = IndexMap<String, ParameterValue>;

/// How the elements of a list are laid out as flattened keys.
///
/// The remote API is not uniform here, so every list field picks its own style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ListStyle {
    /// `key[0]=a&key[1]=b`. Works for lists of maps too (`items[0][price]`).
    #[default]
    Indexed,
    /// `key[]=a&key[]=b`.
    Brackets,
    /// `key=a&key=b`.
    Repeat,
    /// `key=a,b`. Scalars only.
    Csv,
}

/// A node of a parameter tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ParameterValue {
    /// Not provided. Never produces output.
    #[default]
    Absent,
    /// Text value.
    String(String),
    /// Integer value.
    Integer(i64),
    /// Boolean, encoded as `true` / `false`.
    Boolean(bool),
    /// Floating point value, encoded in plain decimal form.
    Number(f64),
    /// List of values with its key layout.
    List(ListStyle, Vec<ParameterValue>),
    /// Nested map, kept in insertion order.
    Map(ParameterMap),
    /// Raw bytes. Only valid as a multipart file, never inside a form.
    Binary(Bytes),
}

impl ParameterValue {
    /// Creates an empty map value.
    #[must_use]
    pub fn map() -> Self {
        Self::Map(ParameterMap::new())
    }

    /// Adds an entry when `self` is a map, otherwise leaves `self` untouched.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToParameterValue) -> Self {
        if let Self::Map(map) = &mut self {
            map.insert(key.into(), value.to_parameter_value());
        }
        self
    }

    /// Re-tags a list with another [`ListStyle`]. Other values are returned as is.
    #[must_use]
    pub fn with_list_style(self, style: ListStyle) -> Self {
        match self {
            Self::List(_, items) => Self::List(style, items),
            other => other,
        }
    }

    /// Returns `true` for [`ParameterValue::Absent`].
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns `true` for strings, integers, booleans and numbers.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::String(_) | Self::Integer(_) | Self::Boolean(_) | Self::Number(_)
        )
    }

    /// Textual form of a scalar, `None` for every other variant.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::String(value) => Some(value.clone()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Boolean(value) => Some(value.to_string()),
            Self::Number(value) => Some(value.to_string()),
            _ => None,
        }
    }

    /// Consumes a map value into its entries.
    #[must_use]
    pub fn into_map(self) -> Option<ParameterMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrows a map value's entries.
    #[must_use]
    pub const fn as_map(&self) -> Option<&ParameterMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// A field that can be set, or explicitly cleared on the server.
///
/// Use it as `Option<Clearable<T>>`: `None` leaves the server value alone,
/// `Some(Clearable::Clear)` sends an empty string, which the API reads as "unset".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clearable<T> {
    /// Set the field to this value.
    Set(T),
    /// Unset the field.
    Clear,
}

impl<T> From<T> for Clearable<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

/// Conversion of a value into a parameter tree.
///
/// `#[derive(Params)]` implements this for parameter structs and unit enums.
pub trait ToParameterValue {
    /// Builds the parameter tree for this value.
    fn to_parameter_value(&self) -> ParameterValue;
}

impl ToParameterValue for ParameterValue {
    fn to_parameter_value(&self) -> ParameterValue {
        self.clone()
    }
}

impl<T: ToParameterValue + ?Sized> ToParameterValue for &T {
    fn to_parameter_value(&self) -> ParameterValue {
        (**self).to_parameter_value()
    }
}

impl<T: ToParameterValue + ?Sized> ToParameterValue for Box<T> {
    fn to_parameter_value(&self) -> ParameterValue {
        (**self).to_parameter_value()
    }
}

impl ToParameterValue for str {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::String(self.to_string())
    }
}

impl ToParameterValue for String {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::String(self.clone())
    }
}

impl ToParameterValue for bool {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::Boolean(*self)
    }
}

macro_rules! integer_parameter {
    ($($ty:ty),*) => {
        $(
            impl ToParameterValue for $ty {
                fn to_parameter_value(&self) -> ParameterValue {
                    ParameterValue::Integer(i64::from(*self))
                }
            }
        )*
    };
}

integer_parameter!(i8, i16, i32, i64, u8, u16, u32);

impl ToParameterValue for u64 {
    fn to_parameter_value(&self) -> ParameterValue {
        i64::try_from(*self).map_or_else(
            |_| ParameterValue::String(self.to_string()),
            ParameterValue::Integer,
        )
    }
}

impl ToParameterValue for usize {
    fn to_parameter_value(&self) -> ParameterValue {
        i64::try_from(*self).map_or_else(
            |_| ParameterValue::String(self.to_string()),
            ParameterValue::Integer,
        )
    }
}

impl ToParameterValue for f64 {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::Number(*self)
    }
}

impl ToParameterValue for f32 {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::Number(f64::from(*self))
    }
}

impl ToParameterValue for Bytes {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::Binary(self.clone())
    }
}

impl ToParameterValue for DateTime<Utc> {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::Integer(self.timestamp())
    }
}

impl<T: ToParameterValue> ToParameterValue for Option<T> {
    fn to_parameter_value(&self) -> ParameterValue {
        self.as_ref()
            .map_or(ParameterValue::Absent, ToParameterValue::to_parameter_value)
    }
}

impl<T: ToParameterValue> ToParameterValue for Clearable<T> {
    fn to_parameter_value(&self) -> ParameterValue {
        match self {
            Self::Set(value) => value.to_parameter_value(),
            Self::Clear => ParameterValue::String(String::new()),
        }
    }
}

impl<T: ToParameterValue> ToParameterValue for [T] {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::List(
            ListStyle::default(),
            self.iter().map(ToParameterValue::to_parameter_value).collect(),
        )
    }
}

impl<T: ToParameterValue> ToParameterValue for Vec<T> {
    fn to_parameter_value(&self) -> ParameterValue {
        self.as_slice().to_parameter_value()
    }
}

impl<K: AsRef<str>, V: ToParameterValue> ToParameterValue for IndexMap<K, V> {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::Map(
            self.iter()
                .map(|(key, value)| (key.as_ref().to_string(), value.to_parameter_value()))
                .collect(),
        )
    }
}

impl<K: AsRef<str>, V: ToParameterValue> ToParameterValue for BTreeMap<K, V> {
    fn to_parameter_value(&self) -> ParameterValue {
        ParameterValue::Map(
            self.iter()
                .map(|(key, value)| (key.as_ref().to_string(), value.to_parameter_value()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_none_is_absent() {
        let value: Option<String> = None;
        assert!(value.to_parameter_value().is_absent());
        assert_eq!(
            Some(3_u32).to_parameter_value(),
            ParameterValue::Integer(3)
        );
    }

    #[test]
    fn clearable_clear_is_empty_string() {
        let value: Option<Clearable<String>> = Some(Clearable::Clear);
        assert_eq!(
            value.to_parameter_value(),
            ParameterValue::String(String::new())
        );

        let value: Option<Clearable<i64>> = Some(42.into());
        assert_eq!(value.to_parameter_value(), ParameterValue::Integer(42));
    }

    #[test]
    fn large_u64_falls_back_to_text() {
        assert_eq!(
            u64::MAX.to_parameter_value(),
            ParameterValue::String("18446744073709551615".to_string())
        );
        assert_eq!(7_u64.to_parameter_value(), ParameterValue::Integer(7));
    }

    #[test]
    fn datetime_is_epoch_seconds() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");
        assert_eq!(
            at.to_parameter_value(),
            ParameterValue::Integer(1_700_000_000)
        );
    }

    #[test]
    fn vec_uses_default_style_and_can_be_retagged() {
        let value = vec!["a", "b"].to_parameter_value();
        assert!(matches!(value, ParameterValue::List(ListStyle::Indexed, _)));

        let value = value.with_list_style(ListStyle::Brackets);
        assert!(matches!(value, ParameterValue::List(ListStyle::Brackets, ref items) if items.len() == 2));

        // Non-lists are not affected
        assert!(
            ParameterValue::Absent
                .with_list_style(ListStyle::Csv)
                .is_absent()
        );
    }

    #[test]
    fn map_builder_keeps_insertion_order() {
        let value = ParameterValue::map()
            .with("zeta", "1")
            .with("alpha", 2_i64)
            .with("mid", true);

        let keys: Vec<_> = value
            .as_map()
            .expect("map")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn as_text_for_scalars() {
        assert_eq!(ParameterValue::Boolean(false).as_text().as_deref(), Some("false"));
        assert_eq!(ParameterValue::Number(2.5).as_text().as_deref(), Some("2.5"));
        assert_eq!(ParameterValue::Number(3.0).as_text().as_deref(), Some("3"));
        assert_eq!(ParameterValue::map().as_text(), None);
    }
}
