//! Pact document assembly.

use crate::config::{CompileOptions, PactConfig};
use crate::error::DslError;
use crate::interaction::Interaction;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A consumer or provider named in a pact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacticipant {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationVersion {
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub pact_specification: SpecificationVersion,
}

/// The contract between one consumer and one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pact {
    pub consumer: Pacticipant,
    pub provider: Pacticipant,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    pub metadata: Metadata,
    #[serde(skip)]
    options: CompileOptions,
}

impl Pact {
    pub fn new(consumer: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::from_config(&PactConfig::new(consumer, provider))
    }

    pub fn from_config(config: &PactConfig) -> Self {
        Self {
            consumer: Pacticipant {
                name: config.consumer.clone(),
            },
            provider: Pacticipant {
                name: config.provider.clone(),
            },
            interactions: Vec::new(),
            metadata: Metadata {
                pact_specification: SpecificationVersion {
                    version: config.specification_version.clone(),
                },
            },
            options: config.compile.clone(),
        }
    }

    /// Start an interaction that compiles with this pact's options.
    pub fn interaction(&self, description: impl Into<String>) -> Interaction {
        Interaction::new(description).with_options(self.options.clone())
    }

    /// Append an interaction.
    ///
    /// Two interactions with the same description and provider state would be
    /// indistinguishable to the verifier, so the second one is rejected.
    pub fn add_interaction(&mut self, interaction: Interaction) -> Result<&mut Self, DslError> {
        let duplicate = self.interactions.iter().any(|existing| {
            existing.description == interaction.description
                && existing.provider_state == interaction.provider_state
        });
        if duplicate {
            return Err(DslError::DuplicateInteraction {
                description: interaction.description,
                state: interaction
                    .provider_state
                    .unwrap_or_else(|| "none".to_string()),
            });
        }

        debug!(
            consumer = %self.consumer.name,
            provider = %self.provider.name,
            description = %interaction.description,
            "pact add interaction"
        );
        self.interactions.push(interaction);
        Ok(self)
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn specification_version(&self) -> &str {
        &self.metadata.pact_specification.version
    }

    pub fn to_json_value(&self) -> Result<Value, DslError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, DslError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
