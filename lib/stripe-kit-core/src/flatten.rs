//! Parameter flattening.
//!
//! Turns a [`ParameterValue`] tree into the ordered `(key, value)` pairs of a
//! form body or query string, composing keys with brackets:
//! `{shipping: {address: {city: "Paris"}}}` becomes `shipping[address][city]=Paris`.
//!
//! Pair order follows the tree's insertion order. Keys are never sorted or
//! deduplicated, since list styles rely on repeated keys.

use crate::{Error, ListStyle, ParameterValue, Result, ToParameterValue};

/// Flattens a parameter tree into ordered key/value pairs.
///
/// The root must be a map (or absent, which yields no pairs).
///
/// # Errors
///
/// Returns [`Error::InvalidRequest`] when the tree holds binary data, when a
/// CSV list holds a non-scalar, or when the root is not a map.
///
/// # Example
///
/// ```
/// use stripe_kit_core::{ParameterValue, flatten};
///
/// let params = ParameterValue::map()
///     .with("description", "test")
///     .with("metadata", ParameterValue::map().with("a", "b"));
///
/// let pairs = flatten(&params).expect("flatten");
/// assert_eq!(pairs, [
///     ("description".to_string(), "test".to_string()),
///     ("metadata[a]".to_string(), "b".to_string()),
/// ]);
/// ```
pub fn flatten(root: &ParameterValue) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    match root {
        ParameterValue::Absent => {}
        ParameterValue::Map(map) => {
            for (key, value) in map {
                flatten_into(key, value, &mut pairs)?;
            }
        }
        _ => {
            return Err(Error::invalid_request(
                "top-level parameters must be a map of named fields",
            ));
        }
    }
    Ok(pairs)
}

/// Flattens anything that converts into a parameter tree.
///
/// # Errors
///
/// Same as [`flatten`].
pub fn flatten_params<P>(params: &P) -> Result<Vec<(String, String)>>
where
    P: ToParameterValue + ?Sized,
{
    flatten(&params.to_parameter_value())
}

fn flatten_into(
    prefix: &str,
    value: &ParameterValue,
    pairs: &mut Vec<(String, String)>,
) -> Result<()> {
    match value {
        ParameterValue::Absent => {}
        ParameterValue::String(text) => pairs.push((prefix.to_string(), text.clone())),
        ParameterValue::Integer(number) => pairs.push((prefix.to_string(), number.to_string())),
        ParameterValue::Boolean(flag) => pairs.push((prefix.to_string(), flag.to_string())),
        ParameterValue::Number(number) => pairs.push((prefix.to_string(), number.to_string())),
        ParameterValue::Map(map) => {
            for (key, nested) in map {
                flatten_into(&format!("{prefix}[{key}]"), nested, pairs)?;
            }
        }
        ParameterValue::List(style, items) => flatten_list(prefix, *style, items, pairs)?,
        ParameterValue::Binary(_) => {
            return Err(Error::invalid_request(format!(
                "binary value at `{prefix}` cannot be form-encoded, upload it as a multipart file"
            )));
        }
    }
    Ok(())
}

fn flatten_list(
    prefix: &str,
    style: ListStyle,
    items: &[ParameterValue],
    pairs: &mut Vec<(String, String)>,
) -> Result<()> {
    let present = items.iter().filter(|item| !item.is_absent());

    match style {
        ListStyle::Indexed => {
            for (index, item) in present.enumerate() {
                flatten_into(&format!("{prefix}[{index}]"), item, pairs)?;
            }
        }
        ListStyle::Brackets => {
            let key = format!("{prefix}[]");
            for item in present {
                flatten_into(&key, item, pairs)?;
            }
        }
        ListStyle::Repeat => {
            for item in present {
                flatten_into(prefix, item, pairs)?;
            }
        }
        ListStyle::Csv => {
            let values = present
                .map(|item| {
                    item.as_text().ok_or_else(|| {
                        Error::invalid_request(format!(
                            "comma-separated list `{prefix}` only accepts scalar values"
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            if !values.is_empty() {
                pairs.push((prefix.to_string(), values.join(",")));
            }
        }
    }
    Ok(())
}
