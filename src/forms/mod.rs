//! Request-body normalization shared by every mutating endpoint.
//!
//! Admin tooling talks to this service both as JSON and as plain HTML
//! forms, so each mutating endpoint accepts either a JSON object or a flat
//! field/value set. [`normalize`] reduces both shapes to one canonical
//! allow-listed field map, and the coercion helpers below apply the lenient
//! per-field conversions the payload builders rely on.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::{Slug, TypeConstraintError};

pub mod categories;
pub mod products;
pub mod users;

/// A request body after transport decoding but before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    /// A decoded `application/json` payload.
    Json(Value),
    /// Flat field/value pairs from an urlencoded or multipart form.
    Form(Vec<(String, String)>),
}

/// Canonical allow-listed field map produced by [`normalize`].
pub type FieldMap = BTreeMap<String, Value>;

/// Errors raised while turning a raw body into a typed payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// The body decoded to a shape this service does not accept.
    #[error("{0}")]
    UnsupportedEncoding(&'static str),
    /// A field was missing, malformed or out of range.
    #[error("{0}")]
    Validation(String),
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        FormError::Validation(err.to_string())
    }
}

impl From<ValidationErrors> for FormError {
    fn from(err: ValidationErrors) -> Self {
        FormError::Validation(err.to_string())
    }
}

/// Reduce a decoded body to the canonical field map.
///
/// Keys outside `allowed` are dropped silently: this is a boundary filter,
/// not validation. Form values always enter as strings and are coerced
/// later by the payload builders; a repeated form field keeps its last
/// occurrence.
pub fn normalize(body: RawBody, allowed: &[&str]) -> Result<FieldMap, FormError> {
    match body {
        RawBody::Json(Value::Object(map)) => Ok(map
            .into_iter()
            .filter(|(key, _)| allowed.contains(&key.as_str()))
            .collect()),
        RawBody::Json(_) => Err(FormError::UnsupportedEncoding(
            "JSON payload must be an object",
        )),
        RawBody::Form(pairs) => Ok(pairs
            .into_iter()
            .filter(|(key, _)| allowed.contains(&key.as_str()))
            .map(|(key, value)| (key, Value::String(value)))
            .collect()),
    }
}

/// Patch semantics for slug fields: a present-but-blank slug asks for
/// regeneration from the entity's title rather than for an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugPatch {
    Regenerate,
    Set(Slug),
}

impl SlugPatch {
    /// Resolve the patch against the title the slug should be derived from.
    pub fn resolve(self, title: &str) -> Slug {
        match self {
            SlugPatch::Set(slug) => slug,
            SlugPatch::Regenerate => Slug::slugify(title),
        }
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The trimmed text of a present field, `None` when absent or null.
pub fn coerce_string(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(other) => Some(text_of(other).trim().to_string()),
    }
}

/// `true` iff the value reads as one of the affirmative tokens
/// `1`, `true`, `on`, `yes` (case-insensitive); absent and null are `false`.
pub fn coerce_bool(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => matches!(
            text_of(other).trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
    }
}

/// Lenient integer coercion: blank, absent and unparsable all map to `None`.
pub fn coerce_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Null => None,
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        other => {
            let text = text_of(other);
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                text.parse::<i64>().ok()
            }
        }
    }
}

fn parse_decimal(text: &str) -> Result<Decimal, rust_decimal::Error> {
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(text))
}

/// Money coercion: numbers pass through exactly, string values accept a
/// decimal comma, a blank string means zero. Unlike the other helpers this
/// one is strict — an unparsable amount is an error, not `None`.
pub fn coerce_price(value: Option<&Value>) -> Result<Option<Decimal>, FormError> {
    let Some(value) = value else { return Ok(None) };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => parse_decimal(&n.to_string())
            .map(Some)
            .map_err(|_| FormError::Validation(format!("invalid price: {n}"))),
        other => {
            let text = text_of(other).trim().replace(',', ".");
            if text.is_empty() {
                return Ok(Some(Decimal::ZERO));
            }
            parse_decimal(&text)
                .map(Some)
                .map_err(|_| FormError::Validation(format!("invalid price: {text}")))
        }
    }
}

/// Structured-list coercion: a list passes through, a string is parsed as a
/// JSON literal. Parse failures and type mismatches yield `None` rather
/// than an error. Blank entries are dropped so every kept string is
/// non-empty.
pub fn coerce_string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = match value? {
        Value::Array(items) => items.clone(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };
    Some(
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => {
                    let trimmed = s.trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                }
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
    )
}

/// Structured-map coercion: an object passes through, a string is parsed as
/// a JSON literal. Parse failures and type mismatches yield `None`.
pub fn coerce_object(value: Option<&Value>) -> Option<Map<String, Value>> {
    match value? {
        Value::Object(map) => Some(map.clone()),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_drops_unknown_json_keys() {
        let body = RawBody::Json(json!({"title": "Shoes", "hack": true}));
        let map = normalize(body, &["title", "price"]).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["title"], json!("Shoes"));
    }

    #[test]
    fn normalize_rejects_non_object_json() {
        let err = normalize(RawBody::Json(json!([1, 2, 3])), &["title"]).unwrap_err();
        assert!(matches!(err, FormError::UnsupportedEncoding(_)));
        let err = normalize(RawBody::Json(json!("text")), &["title"]).unwrap_err();
        assert!(matches!(err, FormError::UnsupportedEncoding(_)));
    }

    #[test]
    fn normalize_filters_form_pairs_and_keeps_last_occurrence() {
        let body = RawBody::Form(vec![
            ("title".into(), "First".into()),
            ("bogus".into(), "x".into()),
            ("title".into(), "Second".into()),
        ]);
        let map = normalize(body, &["title"]).unwrap();
        assert_eq!(map["title"], json!("Second"));
    }

    #[test]
    fn bool_coercion_accepts_affirmative_tokens() {
        for token in ["1", "true", "On", " YES "] {
            assert!(coerce_bool(Some(&json!(token))), "{token}");
        }
        assert!(coerce_bool(Some(&json!(true))));
        assert!(coerce_bool(Some(&json!(1))));
        assert!(!coerce_bool(Some(&json!("0"))));
        assert!(!coerce_bool(Some(&json!("no"))));
        assert!(!coerce_bool(Some(&Value::Null)));
        assert!(!coerce_bool(None));
    }

    #[test]
    fn int_coercion_is_lenient() {
        assert_eq!(coerce_int(Some(&json!("42"))), Some(42));
        assert_eq!(coerce_int(Some(&json!(7))), Some(7));
        assert_eq!(coerce_int(Some(&json!(7.9))), Some(7));
        assert_eq!(coerce_int(Some(&json!(""))), None);
        assert_eq!(coerce_int(Some(&json!("  "))), None);
        assert_eq!(coerce_int(Some(&json!("abc"))), None);
        assert_eq!(coerce_int(None), None);
    }

    #[test]
    fn price_coercion_accepts_decimal_comma_and_blank() {
        assert_eq!(
            coerce_price(Some(&json!("12,50"))).unwrap(),
            Some("12.50".parse().unwrap())
        );
        assert_eq!(coerce_price(Some(&json!(""))).unwrap(), Some(Decimal::ZERO));
        assert_eq!(
            coerce_price(Some(&json!(10.5))).unwrap(),
            Some("10.5".parse().unwrap())
        );
        assert_eq!(coerce_price(None).unwrap(), None);
    }

    #[test]
    fn price_coercion_rejects_garbage() {
        let err = coerce_price(Some(&json!("cheap"))).unwrap_err();
        assert!(matches!(err, FormError::Validation(_)));
    }

    #[test]
    fn list_coercion_parses_json_strings_and_drops_blanks() {
        let parsed = coerce_string_list(Some(&json!("[\" a.jpg \", \"\", \"b.jpg\"]")));
        assert_eq!(parsed, Some(vec!["a.jpg".to_string(), "b.jpg".to_string()]));
        assert_eq!(coerce_string_list(Some(&json!("not json"))), None);
        assert_eq!(coerce_string_list(Some(&json!("{\"a\":1}"))), None);
        assert_eq!(
            coerce_string_list(Some(&json!(["x.png"]))),
            Some(vec!["x.png".to_string()])
        );
    }

    #[test]
    fn object_coercion_parses_json_strings() {
        let parsed = coerce_object(Some(&json!("{\"brand\": \"Acme\"}"))).unwrap();
        assert_eq!(parsed["brand"], json!("Acme"));
        assert_eq!(coerce_object(Some(&json!("[1]"))), None);
        assert_eq!(coerce_object(Some(&json!(5))), None);
    }

    #[test]
    fn slug_patch_resolves_against_title() {
        assert_eq!(
            SlugPatch::Regenerate.resolve("Nice Shoes").as_str(),
            "nice-shoes"
        );
        let explicit = SlugPatch::Set(Slug::slugify("custom"));
        assert_eq!(explicit.resolve("ignored").as_str(), "custom");
    }
}
