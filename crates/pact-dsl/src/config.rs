//! Configuration types for pact assembly and matcher compilation.

use serde::{Deserialize, Serialize};

/// Pact specification version written into document metadata.
pub const DEFAULT_SPECIFICATION_VERSION: &str = "2.0.0";

const SUPPORTED_SPECIFICATION_VERSIONS: [&str; 2] = ["1.0.0", "2.0.0"];

fn default_max_depth() -> usize {
    128
}

fn default_max_repeat() -> usize {
    1024
}

/// Upper bound accepted for `compile.maxRepeat`.
const MAX_REPEAT_CEILING: usize = 1 << 20;

fn default_validate_patterns() -> bool {
    true
}

fn default_specification_version() -> String {
    DEFAULT_SPECIFICATION_VERSION.to_string()
}

/// Knobs for the matcher-tree compiler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    /// Deepest nesting accepted before compilation is aborted
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Largest element count an array matcher may expand into
    #[serde(default = "default_max_repeat")]
    pub max_repeat: usize,
    /// Reject regex matchers whose pattern does not parse
    #[serde(default = "default_validate_patterns")]
    pub validate_patterns: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_repeat: default_max_repeat(),
            validate_patterns: default_validate_patterns(),
        }
    }
}

/// Consumer/provider pairing and compiler settings for one pact.
///
/// ```yaml
/// consumer: billing-ui
/// provider: billing-api
/// specificationVersion: "2.0.0"
/// compile:
///   maxDepth: 64
///   maxRepeat: 256
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PactConfig {
    pub consumer: String,
    pub provider: String,
    #[serde(default = "default_specification_version")]
    pub specification_version: String,
    #[serde(default)]
    pub compile: CompileOptions,
}

impl PactConfig {
    pub fn new(consumer: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            consumer: consumer.into(),
            provider: provider.into(),
            specification_version: default_specification_version(),
            compile: CompileOptions::default(),
        }
    }

    /// Parse and validate a YAML configuration.
    pub fn from_yaml_str(contents: &str) -> Result<Self, anyhow::Error> {
        let config: PactConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.consumer.trim().is_empty() {
            anyhow::bail!("Consumer name must not be empty");
        }
        if self.provider.trim().is_empty() {
            anyhow::bail!("Provider name must not be empty");
        }
        if !SUPPORTED_SPECIFICATION_VERSIONS.contains(&self.specification_version.as_str()) {
            anyhow::bail!(
                "Unsupported pact specification version: '{}'. Supported: {}",
                self.specification_version,
                SUPPORTED_SPECIFICATION_VERSIONS.join(", ")
            );
        }
        if self.compile.max_depth == 0 {
            anyhow::bail!("compile.maxDepth must be at least 1");
        }
        if self.compile.max_repeat > MAX_REPEAT_CEILING {
            anyhow::bail!(
                "compile.maxRepeat {} exceeds the limit of {}",
                self.compile.max_repeat,
                MAX_REPEAT_CEILING
            );
        }
        Ok(())
    }
}
