//! Selector paths for matching rules.
//!
//! A selector is the JSONPath-like key the verifier uses to find where a rule
//! applies: `$.body.user.addresses[0].street`, or `$.body.items[*].id` when a
//! rule covers every element generated from an array template.

use std::fmt;

const BODY_ROOT: &str = "$.body";
const PATH_ROOT: &str = "$.path";
const HEADERS_ROOT: &str = "$.headers";
const DOCUMENT_ROOT: &str = "$";

/// An immutable selector path; every extension returns a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector(String);

impl Selector {
    /// Root of a request or response body (`$.body`).
    pub fn body() -> Self {
        Self(BODY_ROOT.to_string())
    }

    /// Selector for the request path (`$.path`).
    pub fn request_path() -> Self {
        Self(PATH_ROOT.to_string())
    }

    /// Selector for a header. Header names are upper-cased.
    pub fn header(name: &str) -> Self {
        Self(format!("{HEADERS_ROOT}.{}", name.to_uppercase()))
    }

    /// Root of an arbitrary JSON document (`$`), used in decoding diagnostics.
    pub fn document() -> Self {
        Self(DOCUMENT_ROOT.to_string())
    }

    /// Enter an object key. An empty key is the synthetic root entry and
    /// leaves the path unchanged.
    pub fn key(&self, key: &str) -> Self {
        if key.is_empty() {
            return self.clone();
        }
        Self(format!("{}.{key}", self.0))
    }

    /// Enter a concrete array position.
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Enter every element of an array generated from a template.
    pub fn each(&self) -> Self {
        Self(format!("{}[*]", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.0
    }
}
