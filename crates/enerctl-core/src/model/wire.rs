// ── Wire helpers ──
//
// The backend is loose about scalar types: numbers arrive as JSON numbers
// or numeric strings, enums sometimes arrive empty or null. These serde
// adapters keep the form-facing model string-typed while sending numbers
// back out as numbers.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// `number | string | null` in, `String` out; numeric text goes back
/// out as a JSON number.
pub(crate) mod numeric_text {
    use super::{Deserialize, Deserializer, Serializer, Value};

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        })
    }

    #[allow(clippy::ptr_arg)]
    pub(crate) fn serialize<S: Serializer>(value: &String, s: S) -> Result<S::Ok, S::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return s.serialize_none();
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return s.serialize_i64(n);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => s.serialize_f64(f),
            _ => s.serialize_str(value),
        }
    }
}

/// Parse an optional enum from its wire string; absent, empty, or
/// unrecognized values decode as `None` instead of failing the record.
pub(crate) fn lenient_enum<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}
