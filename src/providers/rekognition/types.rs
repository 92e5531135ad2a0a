//! `DetectModerationLabels` wire types

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::types::{ImageModerationRequest, ImageModerationResponse, ModerationLabel};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectModerationLabelsRequest {
    pub image: ImagePayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImagePayload {
    /// Base64 of the raw image
    pub bytes: String,
}

impl From<&ImageModerationRequest> for DetectModerationLabelsRequest {
    fn from(request: &ImageModerationRequest) -> Self {
        Self {
            image: ImagePayload {
                bytes: base64::engine::general_purpose::STANDARD.encode(&request.image),
            },
            min_confidence: request.min_confidence,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectModerationLabelsResponse {
    #[serde(default)]
    pub moderation_labels: Vec<WireModerationLabel>,
    #[serde(default)]
    pub moderation_model_version: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireModerationLabel {
    pub name: String,
    pub confidence: f64,
    #[serde(default)]
    pub parent_name: String,
}

impl From<DetectModerationLabelsResponse> for ImageModerationResponse {
    fn from(raw: DetectModerationLabelsResponse) -> Self {
        Self {
            labels: raw
                .moderation_labels
                .into_iter()
                .map(|l| ModerationLabel {
                    name: l.name,
                    confidence: l.confidence,
                    parent_name: l.parent_name,
                })
                .collect(),
            model_version: raw.moderation_model_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let request = ImageModerationRequest::new(b"abc".to_vec()).with_min_confidence(50.0);
        let body = serde_json::to_value(DetectModerationLabelsRequest::from(&request)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"Image": {"Bytes": "YWJj"}, "MinConfidence": 50.0})
        );

        let request = ImageModerationRequest::new(b"abc".to_vec());
        let body = serde_json::to_value(DetectModerationLabelsRequest::from(&request)).unwrap();
        assert!(body.get("MinConfidence").is_none());
    }

    #[test]
    fn response_tolerates_missing_and_extra_fields() {
        let raw: DetectModerationLabelsResponse = serde_json::from_value(serde_json::json!({
            "ModerationLabels": [
                {"Name": "Explicit Nudity", "Confidence": 98.5, "ParentName": "", "TaxonomyLevel": 1},
                {"Name": "Nudity", "Confidence": 97.0, "ParentName": "Explicit Nudity"},
                {"Name": "Smoking", "Confidence": 70.25}
            ],
            "ModerationModelVersion": "7.0",
            "ContentTypes": []
        }))
        .unwrap();
        let response = ImageModerationResponse::from(raw);
        assert_eq!(response.model_version, "7.0");
        assert_eq!(response.labels.len(), 3);
        assert_eq!(response.labels[1].parent_name, "Explicit Nudity");
        assert_eq!(response.labels[2].parent_name, "");
    }

    #[test]
    fn confidence_just_above_threshold_keeps_full_precision() {
        let raw: DetectModerationLabelsResponse = serde_json::from_str(
            r#"{"ModerationLabels": [{"Name": "Violence", "Confidence": 60.000001, "ParentName": ""}]}"#,
        )
        .unwrap();
        let response = ImageModerationResponse::from(raw);
        assert_eq!(response.labels[0].confidence, 60.000001);

        let outcome =
            crate::evaluator::evaluate_response(response, &crate::policy::ModerationPolicy::default());
        assert!(!outcome.is_appropriate);
        let json = serde_json::to_value(&outcome.report).unwrap();
        assert_eq!(
            json["ModerationLabels"][0]["Confidence"],
            serde_json::json!(60.000001)
        );
    }

    #[test]
    fn empty_response_has_no_labels() {
        let raw: DetectModerationLabelsResponse = serde_json::from_str("{}").unwrap();
        let response = ImageModerationResponse::from(raw);
        assert!(response.labels.is_empty());
        assert_eq!(response.model_version, "");
    }

    #[test]
    fn label_without_confidence_is_rejected() {
        let result = serde_json::from_str::<DetectModerationLabelsResponse>(
            r#"{"ModerationLabels": [{"Name": "Violence"}]}"#,
        );
        assert!(result.is_err());
    }
}
