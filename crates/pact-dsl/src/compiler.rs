//! Matcher-tree compiler.
//!
//! Walks a [`DslValue`] depth-first and produces two synchronized artifacts:
//! the example body with every matcher replaced by its (compiled) example, and
//! the selector → rule map the verifier checks the real document against.
//!
//! Each call owns its accumulator, so independent compilations can run on
//! different threads without observing each other's rules.

use crate::config::CompileOptions;
use crate::error::DslError;
use crate::matcher::{Matcher, MatchingRule, MatchingRules};
use crate::path::Selector;
use crate::value::DslValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Example body plus the matching rules extracted from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PactBody {
    /// Matcher-free example document
    pub body: Value,
    /// Rules keyed by selector path (`$.body...`)
    pub matching_rules: MatchingRules,
}

impl PactBody {
    pub fn rule_at(&self, selector: &str) -> Option<&MatchingRule> {
        self.matching_rules.get(selector)
    }
}

/// Compile a body declaration with default options.
///
/// The root must be an object; anything else is a caller error.
pub fn compile(root: &DslValue) -> Result<PactBody, DslError> {
    compile_with(root, &CompileOptions::default())
}

/// Compile a body declaration.
pub fn compile_with(root: &DslValue, options: &CompileOptions) -> Result<PactBody, DslError> {
    let mut compiler = Compiler::new(options);
    let body = compiler.compile_body(root)?;
    let matching_rules = compiler.into_rules();
    debug!(rules = matching_rules.len(), "compiled pact body");

    Ok(PactBody {
        body,
        matching_rules,
    })
}

/// Per-compilation state: options plus the rule accumulator.
pub(crate) struct Compiler<'a> {
    options: &'a CompileOptions,
    rules: MatchingRules,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            rules: MatchingRules::new(),
        }
    }

    /// Compile any node rooted at `path`, accumulating its rules.
    pub(crate) fn compile_at(
        &mut self,
        value: &DslValue,
        path: &Selector,
    ) -> Result<Value, DslError> {
        self.node(value, path, 0)
    }

    /// Compile a body declaration rooted at `$.body`.
    pub(crate) fn compile_body(&mut self, root: &DslValue) -> Result<Value, DslError> {
        if !root.is_object() {
            return Err(DslError::NonObjectRoot(root.kind_name()));
        }
        self.compile_at(root, &Selector::body())
    }

    pub(crate) fn into_rules(self) -> MatchingRules {
        self.rules
    }

    fn node(&mut self, value: &DslValue, path: &Selector, depth: usize) -> Result<Value, DslError> {
        if depth > self.options.max_depth {
            return Err(DslError::DepthExceeded {
                max_depth: self.options.max_depth,
                path: path.to_string(),
            });
        }
        trace!(path = %path, kind = value.kind_name(), "compiling node");

        match value {
            DslValue::Null => Ok(Value::Null),
            DslValue::Bool(b) => Ok(Value::Bool(*b)),
            DslValue::Number(n) => Ok(Value::Number(n.clone())),
            DslValue::String(s) => Ok(Value::String(s.clone())),
            DslValue::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.node(item, &path.index(i), depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            DslValue::Object(entries) => {
                let mut compiled = Map::new();
                for (key, entry) in entries {
                    let value = self.node(entry, &path.key(key), depth + 1)?;
                    compiled.insert(key.clone(), value);
                }
                Ok(Value::Object(compiled))
            }
            DslValue::Matcher(matcher) => self.matcher(matcher, path, depth),
        }
    }

    fn matcher(
        &mut self,
        matcher: &Matcher,
        path: &Selector,
        depth: usize,
    ) -> Result<Value, DslError> {
        match matcher {
            Matcher::Like(example) => {
                let compiled = self.node(example, path, depth + 1)?;
                self.record(path, matcher.rule());
                Ok(compiled)
            }
            Matcher::Term { regex, example } => {
                self.check_pattern(regex, path)?;
                let compiled = self.node(example, path, depth + 1)?;
                self.record(path, matcher.rule());
                Ok(compiled)
            }
            Matcher::ArrayMinLike { template, .. } | Matcher::ArrayMaxLike { template, .. } => {
                let count = self.repeat_count(matcher, path)?;
                let element = self.template(template, path, depth)?;
                self.record(path, matcher.rule());
                Ok(Value::Array(vec![element; count]))
            }
        }
    }

    fn repeat_count(&self, matcher: &Matcher, path: &Selector) -> Result<usize, DslError> {
        let count = matcher.repeat_count().unwrap_or(0);
        if count > self.options.max_repeat {
            return Err(DslError::malformed(
                path.as_str(),
                format!(
                    "{} repeats its template {} times, limit is {}",
                    matcher.name(),
                    count,
                    self.options.max_repeat
                ),
            ));
        }
        Ok(count)
    }

    /// Compile the single element an array matcher replicates.
    ///
    /// Its rules apply to every generated element, hence the `[*]` segment.
    fn template(
        &mut self,
        template: &DslValue,
        path: &Selector,
        depth: usize,
    ) -> Result<Value, DslError> {
        self.node(template, &path.each(), depth + 1)
    }

    fn check_pattern(&self, pattern: &str, path: &Selector) -> Result<(), DslError> {
        if !self.options.validate_patterns {
            return Ok(());
        }
        regex::Regex::new(pattern)
            .map(|_| ())
            .map_err(|source| DslError::InvalidRegex {
                pattern: pattern.to_string(),
                path: path.to_string(),
                source,
            })
    }

    fn record(&mut self, path: &Selector, rule: MatchingRule) {
        debug!(path = %path, rule = rule.kind.as_str(), "recording matching rule");
        if let Some(previous) = self.rules.insert(path.to_string(), rule) {
            trace!(path = %path, ?previous, "replaced matching rule");
        }
    }
}
