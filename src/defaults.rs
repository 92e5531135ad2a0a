//! Default Configuration Values
//!
//! Centralizes the default values used throughout the crate.

use std::time::Duration;

/// HTTP client defaults
pub mod http {
    use super::*;

    /// Default request timeout.
    ///
    /// A moderation call is a single round trip with an inline image, so it is
    /// much shorter than a generation-style API timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default connection timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string
    pub const USER_AGENT: &str = concat!("image-moderation/", env!("CARGO_PKG_VERSION"));
}

/// Moderation policy defaults
pub mod moderation {
    /// Most restrictive severity tier
    pub const LEVEL: i64 = 4;

    /// A label must score strictly above this to count as a violation
    pub const MIN_CONFIDENCE: f64 = 60.0;

    /// User-facing text returned when an upload is rejected
    pub const NOT_APPROPRIATE_TEXT: &str = "The content of this image is not suitable. \
        Uploading such material could have a negative impact on your profile. \
        Repeated violations may lead to permanent profile suspension.";
}

/// AWS Rekognition defaults
pub mod rekognition {
    /// Region used when none is configured
    pub const REGION: &str = "us-east-1";

    /// SigV4 service name
    pub const SERVICE: &str = "rekognition";

    /// JSON 1.1 target for the moderation operation
    pub const DETECT_MODERATION_LABELS_TARGET: &str =
        "RekognitionService.DetectModerationLabels";

    pub const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

    /// Largest image the service accepts as inline bytes (5 MiB)
    pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
}
