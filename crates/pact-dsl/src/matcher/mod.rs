//! Matchers and the rule descriptors they emit.
//!
//! A matcher stands in for a value in a body declaration. It contributes two
//! things to the compiled contract:
//!
//! - an example payload, substituted into the generated body
//! - a [`MatchingRule`], recorded against the matcher's selector path
//!
//! # Module Structure
//!
//! - `presets` - Ready-made matchers for common formats (UUIDs, timestamps, IPs)

pub mod presets;

use crate::error::DslError;
use crate::path::Selector;
use crate::value::DslValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Matching rules keyed by selector path.
///
/// Ordered so serialized documents are stable between runs.
pub type MatchingRules = BTreeMap<String, MatchingRule>;

/// Kind of structural check a rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Value must have the same JSON type as the example
    Type,
    /// String form of the value must match a regular expression
    Regex,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Type => "type",
            MatchKind::Regex => "regex",
        }
    }
}

/// Rule descriptor as written into a pact document.
///
/// Serializes to `{"match": "type"}`, `{"match": "regex", "regex": ".."}`,
/// `{"match": "type", "min": n}` or `{"match": "type", "max": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingRule {
    #[serde(rename = "match")]
    pub kind: MatchKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

impl MatchingRule {
    pub fn type_match() -> Self {
        Self {
            kind: MatchKind::Type,
            regex: None,
            min: None,
            max: None,
        }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            kind: MatchKind::Regex,
            regex: Some(pattern.into()),
            min: None,
            max: None,
        }
    }

    pub fn min(min: usize) -> Self {
        Self {
            min: Some(min),
            ..Self::type_match()
        }
    }

    pub fn max(max: usize) -> Self {
        Self {
            max: Some(max),
            ..Self::type_match()
        }
    }
}

/// A structural rule plus the example that stands in for it.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// Match by type; the example is substituted as-is.
    Like(DslValue),
    /// Match by regular expression.
    Term { regex: String, example: DslValue },
    /// Array of at least `min` elements shaped like `template`.
    ArrayMinLike { min: usize, template: DslValue },
    /// Array of at most `max` elements shaped like `template`.
    ArrayMaxLike { max: usize, template: DslValue },
}

impl Matcher {
    /// Match on type rather than value.
    pub fn like(example: impl Into<DslValue>) -> Self {
        Matcher::Like(example.into())
    }

    /// Match on a regular expression; `example` should satisfy it.
    pub fn term(regex: impl Into<String>, example: impl Into<DslValue>) -> Self {
        Matcher::Term {
            regex: regex.into(),
            example: example.into(),
        }
    }

    /// Alias of [`Matcher::term`].
    pub fn regex(regex: impl Into<String>, example: impl Into<DslValue>) -> Self {
        Self::term(regex, example)
    }

    pub fn array_min_like(min: usize, template: impl Into<DslValue>) -> Self {
        Matcher::ArrayMinLike {
            min,
            template: template.into(),
        }
    }

    pub fn array_max_like(max: usize, template: impl Into<DslValue>) -> Self {
        Matcher::ArrayMaxLike {
            max,
            template: template.into(),
        }
    }

    /// Rebuild a matcher from a raw rule descriptor and its example.
    ///
    /// `path` only feeds error messages.
    pub fn from_rule(
        rule: MatchingRule,
        example: DslValue,
        path: &Selector,
    ) -> Result<Self, DslError> {
        match (rule.kind, rule.regex, rule.min, rule.max) {
            (MatchKind::Regex, Some(regex), None, None) => Ok(Matcher::Term { regex, example }),
            (MatchKind::Regex, None, _, _) => {
                Err(DslError::malformed(path.as_str(), "regex rule without a pattern"))
            }
            (MatchKind::Regex, Some(_), _, _) => Err(DslError::malformed(
                path.as_str(),
                "regex rule cannot carry array bounds",
            )),
            (MatchKind::Type, Some(_), _, _) => Err(DslError::malformed(
                path.as_str(),
                "type rule cannot carry a regex",
            )),
            (MatchKind::Type, None, Some(_), Some(_)) => Err(DslError::malformed(
                path.as_str(),
                "array rule has both min and max",
            )),
            (MatchKind::Type, None, Some(min), None) => Ok(Matcher::ArrayMinLike {
                min,
                template: example,
            }),
            (MatchKind::Type, None, None, Some(max)) => Ok(Matcher::ArrayMaxLike {
                max,
                template: example,
            }),
            (MatchKind::Type, None, None, None) => Ok(Matcher::Like(example)),
        }
    }

    /// The rule descriptor recorded for this matcher.
    pub fn rule(&self) -> MatchingRule {
        match self {
            Matcher::Like(_) => MatchingRule::type_match(),
            Matcher::Term { regex, .. } => MatchingRule::regex(regex.clone()),
            Matcher::ArrayMinLike { min, .. } => MatchingRule::min(*min),
            Matcher::ArrayMaxLike { max, .. } => MatchingRule::max(*max),
        }
    }

    /// The example payload, or the element template for array matchers.
    pub fn example(&self) -> &DslValue {
        match self {
            Matcher::Like(example) | Matcher::Term { example, .. } => example,
            Matcher::ArrayMinLike { template, .. } | Matcher::ArrayMaxLike { template, .. } => {
                template
            }
        }
    }

    /// Number of template copies placed in the generated example array.
    pub fn repeat_count(&self) -> Option<usize> {
        match self {
            Matcher::ArrayMinLike { min, .. } => Some(*min),
            Matcher::ArrayMaxLike { max, .. } => Some(*max),
            Matcher::Like(_) | Matcher::Term { .. } => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Matcher::Like(_) => "like",
            Matcher::Term { .. } => "term",
            Matcher::ArrayMinLike { .. } => "arrayMinLike",
            Matcher::ArrayMaxLike { .. } => "arrayMaxLike",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_serialization() {
        assert_eq!(
            serde_json::to_value(Matcher::like("x").rule()).unwrap(),
            json!({"match": "type"})
        );
        assert_eq!(
            serde_json::to_value(Matcher::term("\\d+", 1234).rule()).unwrap(),
            json!({"match": "regex", "regex": "\\d+"})
        );
        assert_eq!(
            serde_json::to_value(Matcher::array_min_like(3, "pw").rule()).unwrap(),
            json!({"match": "type", "min": 3})
        );
        assert_eq!(
            serde_json::to_value(Matcher::array_max_like(5, "pw").rule()).unwrap(),
            json!({"match": "type", "max": 5})
        );
    }

    #[test]
    fn test_rule_deserialization() {
        let rule: MatchingRule =
            serde_json::from_value(json!({"match": "type", "min": 2})).unwrap();
        assert_eq!(rule, MatchingRule::min(2));
    }

    #[test]
    fn test_from_rule_round_trips_each_variant() {
        let path = Selector::body();
        for matcher in [
            Matcher::like(1),
            Matcher::term("[a-z]+", "abc"),
            Matcher::array_min_like(2, "a"),
            Matcher::array_max_like(4, "a"),
        ] {
            let rebuilt =
                Matcher::from_rule(matcher.rule(), matcher.example().clone(), &path).unwrap();
            assert_eq!(rebuilt, matcher);
        }
    }

    #[test]
    fn test_from_rule_rejects_malformed() {
        let path = Selector::body().key("items");
        let both = MatchingRule {
            min: Some(1),
            max: Some(3),
            ..MatchingRule::type_match()
        };
        let err = Matcher::from_rule(both, DslValue::Null, &path).unwrap_err();
        assert!(matches!(err, DslError::MalformedRule { ref path, .. } if path == "$.body.items"));

        let no_pattern = MatchingRule {
            kind: MatchKind::Regex,
            ..MatchingRule::type_match()
        };
        assert!(Matcher::from_rule(no_pattern, DslValue::Null, &path).is_err());
    }

    #[test]
    fn test_repeat_count() {
        assert_eq!(Matcher::array_min_like(3, 1).repeat_count(), Some(3));
        assert_eq!(Matcher::array_max_like(7, 1).repeat_count(), Some(7));
        assert_eq!(Matcher::like(1).repeat_count(), None);
    }
}
