//! Serde helpers for decoding quote provider responses.
//!
//! The 0x API reports amounts as decimal strings, while some fields (and some
//! proxies in front of it) emit hex strings or bare JSON integers. [`U256FromAny`]
//! accepts all three. When the `tracing` feature is enabled, unknown response
//! fields are logged so API drift is visible without failing the swap.

use std::str::FromStr as _;

use alloy::primitives::U256;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A `serde_as` type that deserializes decimal strings, `0x` hex strings or
/// unsigned integers as [`U256`]. Serializes back as a decimal string.
///
/// Use with `#[serde_as(as = "U256FromAny")]` or `#[serde_as(as = "Option<U256FromAny>")]`.
pub struct U256FromAny;

impl<'de> serde_with::DeserializeAs<'de, U256> for U256FromAny {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<U256, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use std::fmt;

        use serde::de::{self, Visitor};

        struct U256Visitor;

        impl Visitor<'_> for U256Visitor {
            type Value = U256;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a non-negative integer, decimal string or hex string")
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                U256::from_str(v.trim()).map_err(E::custom)
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(U256::from(v))
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(v)
                    .map(U256::from)
                    .map_err(|_e| E::invalid_value(de::Unexpected::Signed(v), &self))
            }
        }

        deserializer.deserialize_any(U256Visitor)
    }
}

impl serde_with::SerializeAs<U256> for U256FromAny {
    fn serialize_as<S>(source: &U256, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(source)
    }
}

/// Deserialize a response body, logging any fields the target type ignores.
///
/// Unknown fields trigger warnings but do not cause deserialization to fail. On
/// failure, the offending JSON path and value are logged before the error is
/// returned.
#[cfg(feature = "tracing")]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    use std::any::type_name;

    tracing::trace!(
        type_name = %type_name::<T>(),
        json = %value,
        "deserializing JSON"
    );

    let original = value.clone();
    let mut unknown_paths: Vec<String> = Vec::new();

    let result: T = serde_ignored::deserialize(value, |path| {
        unknown_paths.push(path.to_string());
    })
    .inspect_err(|_| {
        let json_str = original.to_string();
        let jd = &mut serde_json::Deserializer::from_str(&json_str);
        let path_result: Result<T, _> = serde_path_to_error::deserialize(jd);
        if let Err(path_err) = path_result {
            let path = path_err.path().to_string();

            tracing::error!(
                type_name = %type_name::<T>(),
                path = %path,
                value = %format_value(lookup_value(&original, &path)),
                error = %path_err.inner(),
                "deserialization failed"
            );
        }
    })?;

    if !unknown_paths.is_empty() {
        let type_name = type_name::<T>();
        for path in unknown_paths {
            tracing::warn!(
                type_name = %type_name,
                field = %path,
                value = %format_value(lookup_value(&original, &path)),
                "unknown field in API response"
            );
        }
    }

    Ok(result)
}

/// Pass-through deserialization when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// Look up a value by a `serde_ignored` / `serde_path_to_error` path such as
/// `route.fills[0].source` or `?.issues.?.allowance`.
#[cfg(feature = "tracing")]
fn lookup_value<'value>(value: &'value Value, path: &str) -> Option<&'value Value> {
    let mut current = value;

    for segment in path
        .split(['.', '[', ']'])
        .filter(|segment| !segment.is_empty() && *segment != "?")
    {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

#[cfg(feature = "tracing")]
fn format_value(value: Option<&Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "<unable to retrieve>".to_owned(),
    }
}
