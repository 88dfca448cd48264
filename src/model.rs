//! Qualitative review model, abstracted as an injected capability.
//!
//! The review engine only needs a confidence score for a "quality issue"
//! verdict over the whole file's source. Implementations can be swapped or
//! removed without affecting any rule-based engine.

use crate::config::Config;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// A model's verdict over one source file.
#[derive(Debug, Clone, Deserialize)]
pub struct QualityAssessment {
    /// Confidence in the "quality issue" class, in [0, 1].
    pub confidence: f64,
    /// Optional free-text remark; appended verbatim when present.
    #[serde(default)]
    pub summary: Option<String>,
}

/// Prompt-in, assessment-out contract. `Ok(None)` means the model had no
/// opinion (or is disabled); errors are the caller's to degrade.
pub trait QualityModel: Send + Sync {
    fn assess(&self, source: &str) -> Result<Option<QualityAssessment>>;
}

/// No-model configuration: never has an opinion.
pub struct DisabledModel;

impl QualityModel for DisabledModel {
    fn assess(&self, _source: &str) -> Result<Option<QualityAssessment>> {
        Ok(None)
    }
}

/// Hosted-model client: POSTs the source to an inference endpoint and reads
/// back a JSON assessment.
pub struct HttpQualityModel {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpQualityModel {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl QualityModel for HttpQualityModel {
    fn assess(&self, source: &str) -> Result<Option<QualityAssessment>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "text": source }))
            .send()
            .with_context(|| format!("model request to {} failed", self.endpoint))?
            .error_for_status()
            .context("model endpoint returned an error status")?;
        let assessment: QualityAssessment =
            response.json().context("malformed model response")?;
        Ok(Some(assessment))
    }
}

/// Build the process-wide model from configuration: an HTTP client when an
/// endpoint is configured, otherwise disabled. Initialized once at startup
/// and shared read-only across requests.
pub fn from_config(config: &Config) -> Box<dyn QualityModel> {
    match &config.model_endpoint {
        Some(endpoint) => match HttpQualityModel::new(endpoint) {
            Ok(model) => Box::new(model),
            Err(e) => {
                log::error!("Disabling model review pass: {e:#}");
                Box::new(DisabledModel)
            }
        },
        None => Box::new(DisabledModel),
    }
}
