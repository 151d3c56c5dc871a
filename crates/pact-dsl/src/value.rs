//! The declarative value tree accepted by the compiler.
//!
//! A [`DslValue`] is plain JSON plus one extra case: a [`Matcher`] node that
//! may appear anywhere a value can, including inside another matcher.

use crate::error::DslError;
use crate::matcher::{MatchKind, Matcher, MatchingRule};
use crate::path::Selector;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Key that marks a JSON object as an encoded matcher.
pub const MATCHER_TYPE_KEY: &str = "pact:matcher:type";

/// A body declaration node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DslValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<DslValue>),
    Object(BTreeMap<String, DslValue>),
    Matcher(Box<Matcher>),
}

impl DslValue {
    /// Build an object node from key/value pairs.
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<DslValue>,
    {
        DslValue::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an array node.
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DslValue>,
    {
        DslValue::Array(items.into_iter().map(Into::into).collect())
    }

    /// JSON-ish name of the node kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            DslValue::Null => "null",
            DslValue::Bool(_) => "boolean",
            DslValue::Number(_) => "number",
            DslValue::String(_) => "string",
            DslValue::Array(_) => "array",
            DslValue::Object(_) => "object",
            DslValue::Matcher(_) => "matcher",
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, DslValue::Object(_))
    }

    /// Decode a JSON document whose matchers are encoded as objects carrying
    /// a `"pact:matcher:type"` key:
    ///
    /// ```json
    /// {"pact:matcher:type": "regex", "regex": "\\d+", "value": "42"}
    /// {"pact:matcher:type": "type", "min": 2, "value": {"id": 1}}
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, DslError> {
        decode(value, &Selector::document())
    }
}

fn decode(value: &Value, path: &Selector) -> Result<DslValue, DslError> {
    match value {
        Value::Object(map) if map.contains_key(MATCHER_TYPE_KEY) => decode_matcher(map, path),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| decode(v, &path.key(k)).map(|decoded| (k.clone(), decoded)))
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(DslValue::Object),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| decode(v, &path.index(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(DslValue::Array),
        other => Ok(DslValue::from(other.clone())),
    }
}

fn decode_matcher(map: &Map<String, Value>, path: &Selector) -> Result<DslValue, DslError> {
    let kind = match map.get(MATCHER_TYPE_KEY) {
        Some(Value::String(kind)) => kind.as_str(),
        _ => {
            return Err(DslError::malformed(
                path.as_str(),
                format!("'{MATCHER_TYPE_KEY}' must be a string"),
            ))
        }
    };
    let kind = match kind {
        "type" => MatchKind::Type,
        "regex" => MatchKind::Regex,
        unknown => {
            return Err(DslError::UnknownMatcher {
                kind: unknown.to_string(),
                path: path.to_string(),
            })
        }
    };

    let regex = match map.get("regex") {
        None => None,
        Some(Value::String(pattern)) => Some(pattern.clone()),
        Some(_) => return Err(DslError::malformed(path.as_str(), "'regex' must be a string")),
    };
    let rule = MatchingRule {
        kind,
        regex,
        min: bound(map, "min", path)?,
        max: bound(map, "max", path)?,
    };

    let example = map
        .get("value")
        .ok_or_else(|| DslError::malformed(path.as_str(), "matcher is missing 'value'"))?;
    let example_path = if rule.min.is_some() || rule.max.is_some() {
        path.each()
    } else {
        path.clone()
    };
    let example = decode(example, &example_path)?;

    Matcher::from_rule(rule, example, path).map(DslValue::from)
}

fn bound(map: &Map<String, Value>, key: &str, path: &Selector) -> Result<Option<usize>, DslError> {
    match map.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                DslError::malformed(
                    path.as_str(),
                    format!("'{key}' must be a non-negative integer, found {value}"),
                )
            }),
    }
}

impl From<Value> for DslValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DslValue::Null,
            Value::Bool(b) => DslValue::Bool(b),
            Value::Number(n) => DslValue::Number(n),
            Value::String(s) => DslValue::String(s),
            Value::Array(items) => DslValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                DslValue::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<Matcher> for DslValue {
    fn from(matcher: Matcher) -> Self {
        DslValue::Matcher(Box::new(matcher))
    }
}

impl From<&str> for DslValue {
    fn from(s: &str) -> Self {
        DslValue::String(s.to_string())
    }
}

impl From<String> for DslValue {
    fn from(s: String) -> Self {
        DslValue::String(s)
    }
}

impl From<bool> for DslValue {
    fn from(b: bool) -> Self {
        DslValue::Bool(b)
    }
}

impl From<i32> for DslValue {
    fn from(n: i32) -> Self {
        DslValue::Number(n.into())
    }
}

impl From<i64> for DslValue {
    fn from(n: i64) -> Self {
        DslValue::Number(n.into())
    }
}

impl From<u64> for DslValue {
    fn from(n: u64) -> Self {
        DslValue::Number(n.into())
    }
}

impl From<f64> for DslValue {
    /// Non-finite floats have no JSON form and become `null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(DslValue::Null, DslValue::Number)
    }
}

impl<T: Into<DslValue>> From<Vec<T>> for DslValue {
    fn from(items: Vec<T>) -> Self {
        DslValue::array(items)
    }
}

impl<T: Into<DslValue>> From<Option<T>> for DslValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DslValue::Null, Into::into)
    }
}
