//! Settings loading
//!
//! [`ModerationSettings`] gathers credentials, region and policy from a JSON
//! settings object or from the environment, and builds the client and upload
//! validator from them.
//!
//! JSON keys:
//!
//! | key | meaning |
//! |-----|---------|
//! | `AWS_ACCESS_KEY` | access key id (required) |
//! | `AWS_SECRET_KEY` | secret access key (required) |
//! | `AWS_SESSION_TOKEN` | temporary credentials token |
//! | `AWS_REGION` | defaults to `us-east-1` |
//! | `ENDPOINT` | endpoint override |
//! | `MODERATION_LEVEL` | 0-4, defaults to 4; any other integer means 4 |
//! | `MIN_CONFIDENCE` | defaults to 60 |
//! | `CUSTOM_LABELS` | explicit label list, overrides the level |
//! | `NOT_APPROPRIATE_TEXT` | rejection message |

use std::sync::Arc;

use secrecy::SecretString;
use serde::Deserialize;

use crate::defaults;
use crate::error::ModerationError;
use crate::field::ImageModerationField;
use crate::policy::ModerationPolicy;
use crate::providers::rekognition::{
    AwsCredentials, REGION_ENV, RekognitionClient, RekognitionConfig,
};
use crate::traits::IncidentStore;
use crate::types::HttpConfig;
use crate::utils::env::{first_non_empty, process_env};

pub const ENDPOINT_ENV: &str = "IMAGE_MODERATION_ENDPOINT";
pub const LEVEL_ENV: &str = "IMAGE_MODERATION_LEVEL";
pub const MIN_CONFIDENCE_ENV: &str = "IMAGE_MODERATION_MIN_CONFIDENCE";
/// Comma-separated label names
pub const CUSTOM_LABELS_ENV: &str = "IMAGE_MODERATION_CUSTOM_LABELS";
pub const NOT_APPROPRIATE_TEXT_ENV: &str = "IMAGE_MODERATION_NOT_APPROPRIATE_TEXT";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RawSettings {
    aws_access_key: Option<String>,
    aws_secret_key: Option<String>,
    aws_session_token: Option<String>,
    aws_region: Option<String>,
    endpoint: Option<String>,
    moderation_level: Option<i64>,
    min_confidence: Option<f64>,
    custom_labels: Option<Vec<String>>,
    not_appropriate_text: Option<String>,
}

/// Resolved settings for the Rekognition client and the upload validator.
#[derive(Debug, Clone)]
pub struct ModerationSettings {
    pub credentials: AwsCredentials,
    pub region: String,
    pub endpoint: Option<String>,
    pub policy: ModerationPolicy,
    pub not_appropriate_text: String,
    pub http_config: HttpConfig,
}

impl ModerationSettings {
    pub fn new(credentials: AwsCredentials) -> Self {
        Self {
            credentials,
            region: defaults::rekognition::REGION.to_string(),
            endpoint: None,
            policy: ModerationPolicy::default(),
            not_appropriate_text: defaults::moderation::NOT_APPROPRIATE_TEXT.to_string(),
            http_config: HttpConfig::default(),
        }
    }

    /// Parse a JSON settings object.
    pub fn from_json_str(json: &str) -> Result<Self, ModerationError> {
        let raw: RawSettings = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ModerationError> {
        Self::from_lookup(process_env)
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ModerationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = AwsCredentials::from_lookup(&lookup)?;
        let non_empty = |name: &str| first_non_empty(&[name], &lookup);

        let moderation_level = non_empty(LEVEL_ENV)
            .map(|v| {
                v.parse::<i64>().map_err(|e| {
                    ModerationError::ConfigurationError(format!("{LEVEL_ENV}={v}: {e}"))
                })
            })
            .transpose()?;
        let min_confidence = non_empty(MIN_CONFIDENCE_ENV)
            .map(|v| {
                v.parse::<f64>().map_err(|e| {
                    ModerationError::ConfigurationError(format!("{MIN_CONFIDENCE_ENV}={v}: {e}"))
                })
            })
            .transpose()?;
        let custom_labels = non_empty(CUSTOM_LABELS_ENV).map(|v| {
            v.split(',')
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect()
        });

        Self::new(credentials).apply(RawSettings {
            aws_region: first_non_empty(REGION_ENV, &lookup),
            endpoint: non_empty(ENDPOINT_ENV),
            moderation_level,
            min_confidence,
            custom_labels,
            not_appropriate_text: non_empty(NOT_APPROPRIATE_TEXT_ENV),
            ..RawSettings::default()
        })
    }

    fn from_raw(raw: RawSettings) -> Result<Self, ModerationError> {
        let required = |value: Option<String>, key: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ModerationError::MissingCredentials(format!("{key} is not set")))
        };
        let access_key_id = required(raw.aws_access_key.clone(), "AWS_ACCESS_KEY")?;
        let secret = required(raw.aws_secret_key.clone(), "AWS_SECRET_KEY")?;

        let mut credentials = AwsCredentials::new(access_key_id, secret);
        if let Some(token) = raw.aws_session_token.clone().filter(|t| !t.trim().is_empty()) {
            credentials = credentials.with_session_token(SecretString::from(token));
        }
        Self::new(credentials).apply(raw)
    }

    /// Apply region, endpoint, policy and message from `raw`; credentials are left alone.
    fn apply(mut self, raw: RawSettings) -> Result<Self, ModerationError> {
        let mut policy = ModerationPolicy::default();
        if let Some(level) = raw.moderation_level {
            policy = policy.level(level);
        }
        if let Some(min_confidence) = raw.min_confidence {
            policy = policy.min_confidence(min_confidence);
        }
        if let Some(labels) = raw.custom_labels {
            policy = policy.custom_labels(labels);
        }
        policy.validate()?;

        if let Some(region) = raw.aws_region.filter(|r| !r.trim().is_empty()) {
            self.region = region;
        }
        self.endpoint = raw.endpoint.filter(|e| !e.trim().is_empty());
        self.policy = policy;
        if let Some(text) = raw.not_appropriate_text {
            self.not_appropriate_text = text;
        }
        Ok(self)
    }

    pub fn with_http_config(mut self, http_config: HttpConfig) -> Self {
        self.http_config = http_config;
        self
    }

    pub fn rekognition_config(&self) -> RekognitionConfig {
        let config = RekognitionConfig::new(self.credentials.clone())
            .with_region(self.region.clone())
            .with_http_config(self.http_config.clone());
        match &self.endpoint {
            Some(endpoint) => config.with_endpoint(endpoint.clone()),
            None => config,
        }
    }

    /// Validate the credentials, endpoint and policy together.
    pub fn validate(&self) -> Result<(), ModerationError> {
        self.rekognition_config().validate()?;
        self.policy.validate()
    }

    pub fn build_client(&self) -> Result<RekognitionClient, ModerationError> {
        RekognitionClient::new(self.rekognition_config())
    }

    /// Wire a Rekognition client, the policy and `incidents` into an upload validator.
    pub fn build_field(
        &self,
        incidents: Arc<dyn IncidentStore>,
    ) -> Result<ImageModerationField, ModerationError> {
        let client = Arc::new(self.build_client()?);
        Ok(
            ImageModerationField::with_backend(client, self.policy.clone(), incidents)?
                .not_appropriate_text(self.not_appropriate_text.clone()),
        )
    }
}
