//! Error type shared by decoding, compilation and document assembly.

/// Errors raised while turning a matcher tree into a pact document.
///
/// Every variant aborts the whole operation: a partially compiled body
/// would produce a contract that is silently wrong.
#[derive(Debug, thiserror::Error)]
pub enum DslError {
    #[error("Body root must be an object, found {0}")]
    NonObjectRoot(&'static str),
    #[error("Unknown matcher type '{kind}' at {path}")]
    UnknownMatcher { kind: String, path: String },
    #[error("Malformed matching rule at {path}: {reason}")]
    MalformedRule { path: String, reason: String },
    #[error("Invalid regex '{pattern}' at {path}: {source}")]
    InvalidRegex {
        pattern: String,
        path: String,
        #[source]
        source: regex::Error,
    },
    #[error("Maximum nesting depth {max_depth} exceeded at {path}")]
    DepthExceeded { max_depth: usize, path: String },
    #[error("Duplicate interaction '{description}' (provider state: {state})")]
    DuplicateInteraction { description: String, state: String },
    #[error("Failed to serialize pact: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DslError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        DslError::MalformedRule {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
