//! Image moderation types

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A label reported by the moderation service.
///
/// Serialized with the service's own field names so stored reports stay
/// comparable with raw service output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationLabel {
    #[serde(rename = "Name")]
    pub name: String,
    /// 0-100
    #[serde(rename = "Confidence")]
    pub confidence: f64,
    /// Empty for top-level labels
    #[serde(rename = "ParentName", default)]
    pub parent_name: String,
}

impl ModerationLabel {
    pub fn new(name: impl Into<String>, confidence: f64, parent_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            confidence,
            parent_name: parent_name.into(),
        }
    }
}

/// Everything observed during one evaluation, whether or not it matched the policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModerationReport {
    #[serde(rename = "ModerationLabels")]
    pub labels: Vec<ModerationLabel>,
    #[serde(rename = "ModerationModelVersion", default)]
    pub model_version: String,
}

/// Verdict plus report
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationOutcome {
    pub is_appropriate: bool,
    pub report: ModerationReport,
}

impl ModerationOutcome {
    pub fn label_count(&self) -> usize {
        self.report.labels.len()
    }
}

/// Request sent to an image moderation backend
#[derive(Debug, Clone)]
pub struct ImageModerationRequest {
    /// Raw image bytes (JPEG or PNG)
    pub image: Bytes,
    /// Server-side filter. Labels under this confidence are not returned at all,
    /// so the evaluator leaves it unset.
    pub min_confidence: Option<f64>,
}

impl ImageModerationRequest {
    pub fn new(image: impl Into<Bytes>) -> Self {
        Self {
            image: image.into(),
            min_confidence: None,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = Some(min_confidence);
        self
    }
}

/// Labels returned by an image moderation backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageModerationResponse {
    pub labels: Vec<ModerationLabel>,
    pub model_version: String,
}
