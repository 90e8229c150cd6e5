//! Configuration for classification and workflow behavior.

use serde::{Deserialize, Serialize};

use crate::error::{NfmailError, Result};

/// Main configuration for the nfmail pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NfmailConfig {
    /// Classifier configuration.
    pub classify: ClassifyConfig,

    /// Workflow configuration.
    pub workflow: WorkflowConfig,
}

impl Default for NfmailConfig {
    fn default() -> Self {
        Self {
            classify: ClassifyConfig::default(),
            workflow: WorkflowConfig::default(),
        }
    }
}

/// Classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Sender domain treated as internal to the company.
    pub internal_domain: String,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            internal_domain: crate::classify::DEFAULT_INTERNAL_DOMAIN.to_string(),
        }
    }
}

/// Workflow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Minimum classifier confidence for a document to enter CLASSIFICADO
    /// directly; anything below waits in PENDENTE for manual review.
    pub auto_classify_threshold: f32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            auto_classify_threshold: 0.8,
        }
    }
}

impl NfmailConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values outside their meaningful ranges.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.workflow.auto_classify_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(NfmailError::Config(format!(
                "auto_classify_threshold must be within [0, 1], got {threshold}"
            )));
        }
        if self.classify.internal_domain.is_empty() {
            return Err(NfmailError::Config(
                "internal_domain must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
