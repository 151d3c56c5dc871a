//! Consumer-side Pact DSL.
//!
//! A consumer declares the bodies it sends and expects as a tree of values in
//! which some positions hold matchers instead of literals. This crate compiles
//! such a tree into the two halves of a pact interaction: an example document
//! the mock server can serve, and the matching rules the provider verifier
//! applies to the real traffic.
//!
//! # Example
//!
//! ```
//! use pact_dsl::{compile, DslValue, Matcher};
//! use serde_json::json;
//!
//! let body = DslValue::object([
//!     ("pass", DslValue::from(Matcher::regex("\\d+", 1234))),
//!     ("user", DslValue::object([("name", Matcher::regex("\\s+", "bob"))])),
//! ]);
//!
//! let compiled = compile(&body).unwrap();
//! assert_eq!(compiled.body, json!({"pass": 1234, "user": {"name": "bob"}}));
//! assert!(compiled.rule_at("$.body.user.name").is_some());
//! ```
//!
//! # Module Structure
//!
//! - `value` - The declarative value tree and JSON decoding of embedded matchers
//! - `matcher` - Matcher kinds, rule descriptors, standard presets
//! - `path` - Selector path construction
//! - `compiler` - The matcher-tree compiler
//! - `interaction` - Request/response assembly with header and path matchers
//! - `pact` - Consumer/provider document assembly
//! - `config` - Compiler options and pact configuration

mod compiler;
mod config;
mod error;
mod interaction;
pub mod matcher;
mod pact;
mod path;
mod value;

pub use compiler::{compile, compile_with, PactBody};
pub use config::{CompileOptions, PactConfig, DEFAULT_SPECIFICATION_VERSION};
pub use error::DslError;
pub use interaction::{Body, Interaction, Request, RequestSpec, Response, ResponseSpec};
pub use matcher::{presets, MatchKind, Matcher, MatchingRule, MatchingRules};
pub use pact::{Metadata, Pact, Pacticipant, SpecificationVersion};
pub use path::Selector;
pub use value::{DslValue, MATCHER_TYPE_KEY};
