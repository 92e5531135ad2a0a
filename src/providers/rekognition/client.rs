//! AWS Rekognition moderation client
//!
//! Calls `DetectModerationLabels` over the JSON 1.1 protocol with SigV4
//! signing. One request per call, no retries.
//!
//! # API Reference
//! <https://docs.aws.amazon.com/rekognition/latest/APIReference/API_DetectModerationLabels.html>

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::config::RekognitionConfig;
use super::errors::classify_rekognition_error;
use super::signing::RequestSigner;
use super::types::{DetectModerationLabelsRequest, DetectModerationLabelsResponse};
use crate::defaults::rekognition::{CONTENT_TYPE, DETECT_MODERATION_LABELS_TARGET, SERVICE};
use crate::error::ModerationError;
use crate::traits::ImageModerationCapability;
use crate::types::{ImageModerationRequest, ImageModerationResponse};
use crate::utils::mime::ensure_supported_image;

#[derive(Debug, Clone)]
pub struct RekognitionClient {
    config: RekognitionConfig,
    endpoint: Url,
    http_client: reqwest::Client,
}

impl RekognitionClient {
    /// Create a client with an HTTP client built from `config.http_config`.
    pub fn new(config: RekognitionConfig) -> Result<Self, ModerationError> {
        let http_client = config.http_config.build_client()?;
        Self::with_http_client(config, http_client)
    }

    pub fn with_http_client(
        config: RekognitionConfig,
        http_client: reqwest::Client,
    ) -> Result<Self, ModerationError> {
        config.validate()?;
        let endpoint = config.endpoint_url()?;
        Ok(Self {
            config,
            endpoint,
            http_client,
        })
    }

    pub fn config(&self) -> &RekognitionConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn signed_headers(&self, body: &[u8]) -> Result<HeaderMap, ModerationError> {
        let to_sign = BTreeMap::from([
            ("content-type".to_string(), CONTENT_TYPE.to_string()),
            (
                "x-amz-target".to_string(),
                DETECT_MODERATION_LABELS_TARGET.to_string(),
            ),
        ]);
        let signed = RequestSigner::new(&self.config.credentials, &self.config.region, SERVICE)
            .sign("POST", &self.endpoint, &to_sign, body, chrono::Utc::now())?;

        let mut headers = HeaderMap::new();
        for (name, value) in &to_sign {
            insert_header(&mut headers, name, value)?;
        }
        insert_header(&mut headers, "x-amz-date", &signed.amz_date)?;
        if let Some(token) = &signed.security_token {
            insert_header(&mut headers, "x-amz-security-token", token)?;
        }
        insert_header(&mut headers, "authorization", &signed.authorization)?;
        Ok(headers)
    }
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), ModerationError> {
    let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        ModerationError::ConfigurationError(format!("Invalid header name '{name}': {e}"))
    })?;
    let value = HeaderValue::from_str(value).map_err(|e| {
        ModerationError::ConfigurationError(format!("Invalid header value for '{name}': {e}"))
    })?;
    headers.insert(name, value);
    Ok(())
}

/// Body of an error response, or a description of why it could not be read.
fn error_body_text<E: std::fmt::Display>(status: u16, body: Result<String, E>) -> String {
    match body {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(status, error = %e, "failed to read error response body");
            format!("HTTP {status} (response body unreadable: {e})")
        }
    }
}

#[async_trait]
impl ImageModerationCapability for RekognitionClient {
    async fn detect_moderation_labels(
        &self,
        request: ImageModerationRequest,
    ) -> Result<ImageModerationResponse, ModerationError> {
        let format = ensure_supported_image(&request.image)?;

        let body = serde_json::to_vec(&DetectModerationLabelsRequest::from(&request))?;
        let headers = self.signed_headers(&body)?;

        tracing::debug!(
            bytes = request.image.len(),
            format,
            region = %self.config.region,
            "sending DetectModerationLabels request"
        );

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = error_body_text(status.as_u16(), response.text().await);
            let err = classify_rekognition_error(status.as_u16(), &text);
            tracing::error!(status = status.as_u16(), error = %err, "moderation request failed");
            return Err(err);
        }

        let raw: DetectModerationLabelsResponse = response
            .json()
            .await
            .map_err(|e| ModerationError::ParseError(format!("Failed to parse response: {e}")))?;

        Ok(raw.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_error_body_is_reported() {
        let text = error_body_text(503, Err::<String, _>("connection reset by peer"));
        let err = classify_rekognition_error(503, &text);
        match err {
            ModerationError::ApiError { code, message, .. } => {
                assert_eq!(code, 503);
                assert!(message.contains("response body unreadable: connection reset by peer"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn readable_error_body_is_passed_through() {
        let body = r#"{"__type":"ThrottlingException","message":"Rate exceeded"}"#;
        let text = error_body_text(400, Ok::<_, String>(body.to_string()));
        assert_eq!(text, body);
    }
}
