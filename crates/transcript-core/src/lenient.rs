//! Lenient field deserializers for backend records.
//!
//! Backend snapshots are loosely typed: text columns arrive as strings,
//! numbers or `null`, and flags arrive as booleans, `0`/`1` or strings.
//! These helpers accept all of those so that one odd field never rejects a
//! whole record.

use crate::Decimal;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Text field; `null`, blank or structured values become `None`.
pub(crate) fn text_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    d.deserialize_any(TextVisitor { trim: true })
}

/// Text field that is always present; absent values become the empty string.
pub(crate) fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(text_opt(d)?.unwrap_or_default())
}

/// Text field kept byte-for-byte. Non-string scalars are still stringified
/// and `null` or structured values become the empty string.
pub(crate) fn verbatim_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(d
        .deserialize_any(TextVisitor { trim: false })?
        .unwrap_or_default())
}

/// Non-negative whole count. Fractions truncate, anything malformed is 0.
pub(crate) fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(Decimal::deserialize(d)?.to_count())
}

/// Optional whole count; `null` and absent stay `None`.
pub(crate) fn count_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let value: Option<Decimal> = Option::deserialize(d)?;
    Ok(value.map(Decimal::to_count))
}

/// Optional flag. Accepts booleans, `0`/`1` and `"true"`/`"false"`.
pub(crate) fn flag_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    let text = text_opt(d)?;
    Ok(match text.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("true" | "1" | "yes") => Some(true),
        Some("false" | "0" | "no") => Some(false),
        _ => None,
    })
}

struct TextVisitor {
    trim: bool,
}

impl<'de> Visitor<'de> for TextVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if !self.trim {
            return Ok(Some(v.to_string()));
        }
        let trimmed = v.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(v.is_finite().then(|| v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Row {
        #[serde(deserialize_with = "text_opt")]
        label: Option<String>,
        #[serde(deserialize_with = "count")]
        quantity: u32,
        #[serde(deserialize_with = "flag_opt")]
        main: Option<bool>,
        #[serde(deserialize_with = "verbatim_text")]
        code: String,
    }

    #[test]
    fn text_accepts_numbers_and_blanks() {
        let row: Row = serde_json::from_str(r#"{"label": 12}"#).unwrap();
        assert_eq!(row.label.as_deref(), Some("12"));

        let row: Row = serde_json::from_str(r#"{"label": "   "}"#).unwrap();
        assert_eq!(row.label, None);

        let row: Row = serde_json::from_str(r#"{"label": null}"#).unwrap();
        assert_eq!(row.label, None);
    }

    #[test]
    fn verbatim_text_keeps_padding() {
        let row: Row = serde_json::from_str(r#"{"code": "  PASSED\n"}"#).unwrap();
        assert_eq!(row.code, "  PASSED\n");

        let row: Row = serde_json::from_str(r#"{"code": 3}"#).unwrap();
        assert_eq!(row.code, "3");

        let row: Row = serde_json::from_str(r#"{"code": null}"#).unwrap();
        assert_eq!(row.code, "");

        let row: Row = serde_json::from_str(r#"{"code": ["PASSED"]}"#).unwrap();
        assert_eq!(row.code, "");
    }

    #[test]
    fn count_truncates_and_defaults() {
        let row: Row = serde_json::from_str(r#"{"quantity": "2.7"}"#).unwrap();
        assert_eq!(row.quantity, 2);

        let row: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(row.quantity, 0);
    }

    #[test]
    fn flag_variants() {
        let row: Row = serde_json::from_str(r#"{"main": 1}"#).unwrap();
        assert_eq!(row.main, Some(true));

        let row: Row = serde_json::from_str(r#"{"main": "FALSE"}"#).unwrap();
        assert_eq!(row.main, Some(false));

        let row: Row = serde_json::from_str(r#"{"main": "maybe"}"#).unwrap();
        assert_eq!(row.main, None);
    }
}
