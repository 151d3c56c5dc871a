//! Interaction assembly.
//!
//! An interaction pairs the request a consumer sends with the response it
//! expects. Request paths, header values and bodies may all contain matchers;
//! they are compiled here and their rules attached to the request or
//! response they belong to.

use crate::compiler::Compiler;
use crate::config::CompileOptions;
use crate::error::DslError;
use crate::matcher::MatchingRules;
use crate::path::Selector;
use crate::value::DslValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

// ============================================================================
// Declarations
// ============================================================================

/// A request or response body as declared by the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Raw text. Valid JSON is parsed so it is not double encoded;
    /// anything else is kept as a string.
    Text(String),
    /// A literal JSON document, used as-is.
    Json(Value),
    /// A matcher tree, compiled into an example plus matching rules.
    Dsl(DslValue),
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl From<DslValue> for Body {
    fn from(value: DslValue) -> Self {
        Body::Dsl(value)
    }
}

/// Expected request. `path` and header values may be matchers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: String,
    pub path: DslValue,
    pub query: Option<String>,
    pub headers: BTreeMap<String, DslValue>,
    pub body: Option<Body>,
}

impl RequestSpec {
    pub fn new(method: impl Into<String>, path: impl Into<DslValue>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: None,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<DslValue>) -> Self {
        Self::new("GET", path)
    }

    pub fn post(path: impl Into<DslValue>) -> Self {
        Self::new("POST", path)
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<DslValue>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self::get("/")
    }
}

/// Expected response. Header values may be matchers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSpec {
    pub status: u16,
    pub headers: BTreeMap<String, DslValue>,
    pub body: Option<Body>,
}

impl ResponseSpec {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<DslValue>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl Default for ResponseSpec {
    fn default() -> Self {
        Self::new(200)
    }
}

// ============================================================================
// Pact file representation
// ============================================================================

/// Request as written into a pact document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub matching_rules: MatchingRules,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            path: "/".to_string(),
            query: None,
            headers: BTreeMap::new(),
            body: None,
            matching_rules: MatchingRules::new(),
        }
    }
}

/// Response as written into a pact document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub matching_rules: MatchingRules,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: 200,
            headers: BTreeMap::new(),
            body: None,
            matching_rules: MatchingRules::new(),
        }
    }
}

/// One request/response pair of a pact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_state: Option<String>,
    #[serde(default)]
    pub request: Request,
    #[serde(default)]
    pub response: Response,
    #[serde(skip)]
    options: CompileOptions,
}

impl Interaction {
    /// Start an interaction. The description names the test case in the pact.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            provider_state: None,
            request: Request::default(),
            response: Response::default(),
            options: CompileOptions::default(),
        }
    }

    /// Compile matchers in this interaction with the given options.
    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Provider state the interaction depends on.
    pub fn given(mut self, state: impl Into<String>) -> Self {
        self.provider_state = Some(state.into());
        self
    }

    /// Replace the description.
    pub fn upon_receiving(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the expected request, compiling any matchers it contains.
    pub fn with_request(mut self, spec: RequestSpec) -> Result<Self, DslError> {
        let mut compiler = Compiler::new(&self.options);

        let path = match compiler.compile_at(&spec.path, &Selector::request_path())? {
            Value::String(path) => path,
            other => {
                return Err(DslError::malformed(
                    Selector::request_path().as_str(),
                    format!("request path example must be a string, found {other}"),
                ))
            }
        };
        let headers = compile_headers(&mut compiler, &spec.headers)?;
        let body = compile_body(&mut compiler, spec.body)?;
        let matching_rules = compiler.into_rules();

        debug!(
            description = %self.description,
            method = %spec.method,
            rules = matching_rules.len(),
            "compiled request"
        );
        self.request = Request {
            method: spec.method,
            path,
            query: spec.query,
            headers,
            body,
            matching_rules,
        };
        Ok(self)
    }

    /// Set the expected response, compiling any matchers it contains.
    pub fn will_respond_with(mut self, spec: ResponseSpec) -> Result<Self, DslError> {
        let mut compiler = Compiler::new(&self.options);

        let headers = compile_headers(&mut compiler, &spec.headers)?;
        let body = compile_body(&mut compiler, spec.body)?;
        let matching_rules = compiler.into_rules();

        debug!(
            description = %self.description,
            status = spec.status,
            rules = matching_rules.len(),
            "compiled response"
        );
        self.response = Response {
            status: spec.status,
            headers,
            body,
            matching_rules,
        };
        Ok(self)
    }
}

fn compile_headers(
    compiler: &mut Compiler<'_>,
    headers: &BTreeMap<String, DslValue>,
) -> Result<BTreeMap<String, String>, DslError> {
    let mut compiled = BTreeMap::new();
    let mut seen = BTreeMap::new();
    for (name, value) in headers {
        let selector = Selector::header(name);
        if let Some(previous) = seen.insert(selector.to_string(), name) {
            return Err(DslError::malformed(
                selector.as_str(),
                format!("headers '{previous}' and '{name}' differ only in case"),
            ));
        }
        match compiler.compile_at(value, &selector)? {
            Value::String(example) => {
                compiled.insert(name.clone(), example);
            }
            other => {
                return Err(DslError::malformed(
                    selector.as_str(),
                    format!("header example must be a string, found {other}"),
                ))
            }
        }
    }
    Ok(compiled)
}

fn compile_body(
    compiler: &mut Compiler<'_>,
    body: Option<Body>,
) -> Result<Option<Value>, DslError> {
    let Some(body) = body else {
        return Ok(None);
    };
    let compiled = match body {
        Body::Text(text) => match serde_json::from_str::<Value>(&text) {
            Ok(value) => value,
            Err(e) => {
                debug!("Body is not JSON, keeping it as a string: {}", e);
                Value::String(text)
            }
        },
        Body::Json(value) => value,
        Body::Dsl(value) => compiler.compile_body(&value)?,
    };
    Ok(Some(compiled))
}
