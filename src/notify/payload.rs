//! Dynamically shaped JSON payloads with fixed-point decimal support.

use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Number;

/// A JSON-serializable value built at runtime
///
/// Mappings keep their keys sorted. [`Payload::Decimal`] renders through
/// [`serialize_decimal`], so exact decimal amounts come out as plain JSON
/// numbers rather than strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Decimal(BigDecimal),
    String(String),
    Sequence(Vec<Payload>),
    Mapping(BTreeMap<String, Payload>),
}

impl Payload {
    /// Empty mapping, the usual starting point for a status message
    pub fn mapping() -> Self {
        Payload::Mapping(BTreeMap::new())
    }

    /// Inserts `value` under `key`, turning a non-mapping payload into a mapping
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Payload>) -> Self {
        if !matches!(self, Payload::Mapping(_)) {
            self = Payload::mapping();
        }
        if let Payload::Mapping(entries) = &mut self {
            entries.insert(key.into(), value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Payload> {
        match self {
            Payload::Mapping(entries) => entries.get(key),
            _ => None,
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Payload::Null => serializer.serialize_unit(),
            Payload::Bool(value) => serializer.serialize_bool(*value),
            Payload::Integer(value) => serializer.serialize_i64(*value),
            Payload::Float(value) => serializer.serialize_f64(*value),
            Payload::Decimal(value) => serialize_decimal(value, serializer),
            Payload::String(value) => serializer.serialize_str(value),
            Payload::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Payload::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Serializes a decimal as a bare JSON number
///
/// A value with no fractional part becomes an integer literal with every
/// digit kept, whatever its magnitude. Anything else becomes the `f64`
/// nearest to its exact decimal value. Usable on struct fields via
/// `#[serde(serialize_with = "efs_notify::notify::serialize_decimal")]`.
pub fn serialize_decimal<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    let integral = value.with_scale(0);
    if integral == *value {
        let (digits, _) = integral.into_bigint_and_exponent();
        let number: Number = digits.to_string().parse().map_err(S::Error::custom)?;
        return number.serialize(serializer);
    }

    // Parsing the decimal text rounds correctly, which `to_f64` does not promise.
    match value.to_string().parse::<f64>() {
        Ok(float) if float.is_finite() => serializer.serialize_f64(float),
        _ => Err(S::Error::custom(format!(
            "decimal {} is out of range for a JSON number",
            value
        ))),
    }
}

impl From<bool> for Payload {
    fn from(value: bool) -> Self {
        Payload::Bool(value)
    }
}

impl From<i64> for Payload {
    fn from(value: i64) -> Self {
        Payload::Integer(value)
    }
}

impl From<i32> for Payload {
    fn from(value: i32) -> Self {
        Payload::Integer(value.into())
    }
}

impl From<u32> for Payload {
    fn from(value: u32) -> Self {
        Payload::Integer(value.into())
    }
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::Float(value)
    }
}

impl From<BigDecimal> for Payload {
    fn from(value: BigDecimal) -> Self {
        Payload::Decimal(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::String(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::String(value)
    }
}

impl<T: Into<Payload>> From<Vec<T>> for Payload {
    fn from(items: Vec<T>) -> Self {
        Payload::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(value: Option<T>) -> Self {
        value.map_or(Payload::Null, Into::into)
    }
}

impl From<BTreeMap<String, Payload>> for Payload {
    fn from(entries: BTreeMap<String, Payload>) -> Self {
        Payload::Mapping(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_integral_decimal_is_integer() {
        let value = serde_json::to_value(Payload::Decimal(decimal("42.000"))).unwrap();
        assert_eq!(value, json!(42));
        assert!(value.is_i64());
    }

    #[test]
    fn test_fractional_decimal_is_float() {
        let value = serde_json::to_value(Payload::Decimal(decimal("12.75"))).unwrap();
        assert_eq!(value, json!(12.75));
        assert!(value.is_f64());
    }

    #[test]
    fn test_negative_decimals() {
        assert_eq!(serde_json::to_value(Payload::Decimal(decimal("-7"))).unwrap(), json!(-7));
        assert_eq!(
            serde_json::to_value(Payload::Decimal(decimal("-1.5"))).unwrap(),
            json!(-1.5)
        );
    }

    #[test]
    fn test_large_unsigned_decimal() {
        let value = serde_json::to_value(Payload::Decimal(decimal("18446744073709551615"))).unwrap();
        assert_eq!(value, json!(u64::MAX));
    }

    #[test]
    fn test_integral_decimal_beyond_u64_keeps_every_digit() {
        let value = serde_json::to_value(Payload::Decimal(decimal("1e30"))).unwrap();
        assert_eq!(value.to_string(), "1000000000000000000000000000000");

        let value = serde_json::to_value(Payload::Decimal(decimal("-99999999999999999999.000"))).unwrap();
        assert_eq!(value.to_string(), "-99999999999999999999");
        assert!(!value.is_f64());
    }

    #[test]
    fn test_fractional_decimal_rounds_to_nearest_float() {
        let value =
            serde_json::to_value(Payload::Decimal(decimal("0.1000000000000000055511151231257827"))).unwrap();
        assert_eq!(value.as_f64(), Some(0.1));
        assert_eq!(value.to_string(), "0.1");

        let value = serde_json::to_value(Payload::Decimal(decimal("2.00000000000000000000001"))).unwrap();
        assert_eq!(value.as_f64(), Some(2.0));
    }

    #[test]
    fn test_fractional_decimal_out_of_float_range() {
        let huge = BigDecimal::from_str("1e400").unwrap() + decimal("0.5");
        assert!(serde_json::to_value(Payload::Decimal(huge)).is_err());
    }

    #[test]
    fn test_serialize_with_on_struct_field() {
        #[derive(Serialize)]
        struct Usage {
            #[serde(serialize_with = "serialize_decimal")]
            size_gb: BigDecimal,
        }

        let value = serde_json::to_value(Usage { size_gb: decimal("3.25") }).unwrap();
        assert_eq!(value, json!({ "size_gb": 3.25 }));
    }

    #[test]
    fn test_builder_and_nesting() {
        let payload = Payload::mapping()
            .with("status", "OK")
            .with("files", 12)
            .with("errors", Vec::<Payload>::new())
            .with("note", Option::<String>::None)
            .with("size", decimal("1.50"));

        assert_eq!(payload.get("status"), Some(&Payload::from("OK")));
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "errors": [],
                "files": 12,
                "note": null,
                "size": 1.5,
                "status": "OK",
            })
        );
    }

    #[test]
    fn test_with_on_scalar_starts_mapping() {
        let payload = Payload::from(true).with("k", "v");
        assert_eq!(payload.get("k"), Some(&Payload::from("v")));
        assert!(Payload::Null.get("k").is_none());
    }
}
