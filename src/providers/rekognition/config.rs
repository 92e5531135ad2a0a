//! AWS Rekognition configuration

use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};

use crate::defaults;
use crate::error::ModerationError;
use crate::types::HttpConfig;
use crate::utils::env::{first_non_empty, process_env};

pub const ACCESS_KEY_ENV: &[&str] = &["IMAGE_MODERATION_AWS_ACCESS_KEY", "AWS_ACCESS_KEY_ID"];
pub const SECRET_KEY_ENV: &[&str] = &["IMAGE_MODERATION_AWS_SECRET_KEY", "AWS_SECRET_ACCESS_KEY"];
pub const SESSION_TOKEN_ENV: &[&str] = &["IMAGE_MODERATION_AWS_SESSION_TOKEN", "AWS_SESSION_TOKEN"];
pub const REGION_ENV: &[&str] = &[
    "IMAGE_MODERATION_AWS_REGION",
    "AWS_REGION",
    "AWS_DEFAULT_REGION",
];

/// Static AWS credentials
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub session_token: Option<SecretString>,
}

impl AwsCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::from(secret_access_key.into()),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: SecretString) -> Self {
        self.session_token = Some(token);
        self
    }

    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, ModerationError> {
        Self::from_lookup(process_env)
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ModerationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key_id = first_non_empty(ACCESS_KEY_ENV, &lookup).ok_or_else(|| {
            ModerationError::MissingCredentials(format!(
                "set one of {}",
                ACCESS_KEY_ENV.join(", ")
            ))
        })?;
        let secret = first_non_empty(SECRET_KEY_ENV, &lookup).ok_or_else(|| {
            ModerationError::MissingCredentials(format!(
                "set one of {}",
                SECRET_KEY_ENV.join(", ")
            ))
        })?;
        let mut credentials = Self::new(access_key_id, secret);
        if let Some(token) = first_non_empty(SESSION_TOKEN_ENV, &lookup) {
            credentials = credentials.with_session_token(SecretString::from(token));
        }
        Ok(credentials)
    }

    pub fn validate(&self) -> Result<(), ModerationError> {
        if self.access_key_id.trim().is_empty() {
            return Err(ModerationError::MissingCredentials(
                "AWS access key id is empty".to_string(),
            ));
        }
        if self.secret_access_key.expose_secret().trim().is_empty() {
            return Err(ModerationError::MissingCredentials(
                "AWS secret access key is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rekognition client configuration
#[derive(Debug, Clone)]
pub struct RekognitionConfig {
    pub credentials: AwsCredentials,
    pub region: String,
    /// Overrides `https://rekognition.{region}.amazonaws.com/`
    pub endpoint: Option<String>,
    pub http_config: HttpConfig,
}

impl RekognitionConfig {
    pub fn new(credentials: AwsCredentials) -> Self {
        Self {
            credentials,
            region: defaults::rekognition::REGION.to_string(),
            endpoint: None,
            http_config: HttpConfig::default(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_http_config(mut self, http_config: HttpConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Credentials and region from the process environment.
    pub fn from_env() -> Result<Self, ModerationError> {
        Self::from_lookup(process_env)
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ModerationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = AwsCredentials::from_lookup(&lookup)?;
        let mut config = Self::new(credentials);
        if let Some(region) = first_non_empty(REGION_ENV, &lookup) {
            config.region = region;
        }
        Ok(config)
    }

    pub fn endpoint_url(&self) -> Result<Url, ModerationError> {
        let raw = match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!(
                "https://{}.{}.amazonaws.com/",
                defaults::rekognition::SERVICE,
                self.region
            ),
        };
        let url = Url::parse(&raw).map_err(|e| {
            ModerationError::ConfigurationError(format!("Invalid endpoint '{raw}': {e}"))
        })?;
        if url.host_str().is_none() {
            return Err(ModerationError::ConfigurationError(format!(
                "Endpoint '{raw}' has no host"
            )));
        }
        Ok(url)
    }

    pub fn validate(&self) -> Result<(), ModerationError> {
        self.credentials.validate()?;
        if self.region.trim().is_empty() {
            return Err(ModerationError::ConfigurationError(
                "AWS region is empty".to_string(),
            ));
        }
        self.endpoint_url().map(|_| ())
    }
}
