//! Rekognition Builder Implementation
//!
//! Explicit values win over the environment. Anything not set explicitly is
//! looked up the same way as [`RekognitionConfig::from_env`].

use std::time::Duration;

use secrecy::SecretString;

use super::client::RekognitionClient;
use super::config::{
    ACCESS_KEY_ENV, AwsCredentials, REGION_ENV, RekognitionConfig, SECRET_KEY_ENV,
    SESSION_TOKEN_ENV,
};
use crate::defaults;
use crate::error::ModerationError;
use crate::types::{HttpConfig, HttpConfigBuilder};
use crate::utils::env::{first_non_empty, process_env};

#[derive(Debug, Clone, Default)]
pub struct RekognitionBuilder {
    access_key_id: Option<String>,
    secret_access_key: Option<SecretString>,
    session_token: Option<SecretString>,
    region: Option<String>,
    endpoint: Option<String>,
    http: HttpConfigBuilder,
    http_client: Option<reqwest::Client>,
}

impl RekognitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn access_key_id<S: Into<String>>(mut self, key: S) -> Self {
        self.access_key_id = Some(key.into());
        self
    }

    pub fn secret_access_key<S: Into<String>>(mut self, secret: S) -> Self {
        self.secret_access_key = Some(SecretString::from(secret.into()));
        self
    }

    pub fn session_token<S: Into<String>>(mut self, token: S) -> Self {
        self.session_token = Some(SecretString::from(token.into()));
        self
    }

    pub fn region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Send requests somewhere other than the regional endpoint (VPC endpoint, local stub).
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.timeout(Some(timeout));
        self
    }

    /// Set connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.connect_timeout(Some(timeout));
        self
    }

    pub fn proxy<S: Into<String>>(mut self, proxy: S) -> Self {
        self.http = self.http.proxy(Some(proxy));
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.http = self.http.header(key, value);
        self
    }

    /// Use a preconfigured HTTP client. Timeouts and headers set on this
    /// builder are then ignored.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<RekognitionClient, ModerationError> {
        self.build_with_lookup(process_env)
    }

    pub(crate) fn build_with_lookup<F>(self, lookup: F) -> Result<RekognitionClient, ModerationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = self.resolve_config(&lookup)?;
        match self.http_client {
            Some(client) => RekognitionClient::with_http_client(config, client),
            None => RekognitionClient::new(config),
        }
    }

    fn resolve_config<F>(&self, lookup: F) -> Result<RekognitionConfig, ModerationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key_id = match &self.access_key_id {
            Some(key) => key.clone(),
            None => first_non_empty(ACCESS_KEY_ENV, &lookup).ok_or_else(|| {
                ModerationError::MissingCredentials(format!(
                    "no access key id given and none of {} is set",
                    ACCESS_KEY_ENV.join(", ")
                ))
            })?,
        };
        let secret_access_key = match &self.secret_access_key {
            Some(secret) => secret.clone(),
            None => first_non_empty(SECRET_KEY_ENV, &lookup)
                .map(SecretString::from)
                .ok_or_else(|| {
                    ModerationError::MissingCredentials(format!(
                        "no secret access key given and none of {} is set",
                        SECRET_KEY_ENV.join(", ")
                    ))
                })?,
        };
        let session_token = self
            .session_token
            .clone()
            .or_else(|| first_non_empty(SESSION_TOKEN_ENV, &lookup).map(SecretString::from));
        let region = self
            .region
            .clone()
            .or_else(|| first_non_empty(REGION_ENV, &lookup))
            .unwrap_or_else(|| defaults::rekognition::REGION.to_string());

        let credentials = AwsCredentials {
            access_key_id,
            secret_access_key,
            session_token,
        };
        let http_config: HttpConfig = self.http.clone().build();

        let mut config = RekognitionConfig::new(credentials)
            .with_region(region)
            .with_http_config(http_config);
        config.endpoint = self.endpoint.clone();
        Ok(config)
    }
}
