//! Shared fixtures for the wiremock-backed tests.
#![allow(dead_code)]

use image_moderation::{AwsCredentials, RekognitionClient, RekognitionConfig};
use wiremock::MockServer;

/// PNG signature plus the start of an IHDR chunk; enough for magic-number sniffing.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

pub const ACCESS_KEY: &str = "AKIDEXAMPLE";

pub fn client_for(server: &MockServer) -> RekognitionClient {
    let config = RekognitionConfig::new(AwsCredentials::new(ACCESS_KEY, "test-secret"))
        .with_region("us-east-1")
        .with_endpoint(server.uri());
    RekognitionClient::new(config).expect("client should build")
}

pub fn labels_body(labels: &[(&str, f64, &str)]) -> serde_json::Value {
    let labels: Vec<serde_json::Value> = labels
        .iter()
        .map(|(name, confidence, parent)| {
            serde_json::json!({
                "Name": name,
                "Confidence": confidence,
                "ParentName": parent,
            })
        })
        .collect();
    serde_json::json!({
        "ModerationLabels": labels,
        "ModerationModelVersion": "7.0",
    })
}
