//! # image-moderation
//!
//! Image moderation for upload pipelines. Image bytes go to an external
//! moderation service (AWS Rekognition `DetectModerationLabels`), the
//! returned labels are compared against a severity level or an explicit
//! label list, and the result is a verdict plus the full label report.
//!
#![deny(unsafe_code)]

//! ## Features
//!
//! - **Severity levels**: five label tiers, from level 0 (flags nothing) to
//!   level 4 (the broadest), or an explicit label list that replaces the
//!   tier entirely.
//! - **Confidence threshold**: a label counts only when its confidence is
//!   strictly above the threshold (default 60).
//! - **Pluggable backends**: anything implementing
//!   [`ImageModerationCapability`] can be evaluated; [`RekognitionClient`]
//!   signs requests with SigV4 and talks to the real service.
//! - **Upload validation**: [`ImageModerationField`] rejects inappropriate
//!   uploads with a user-facing message and records an incident with the
//!   user's incremented warning count.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use image_moderation::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RekognitionBuilder::new()
//!         .access_key_id("AKID")
//!         .secret_access_key("secret")
//!         .build()?;
//!
//!     let evaluator = ModerationEvaluator::new(Arc::new(client), ModerationPolicy::with_level(2))?;
//!     let image = std::fs::read("upload.jpg")?;
//!     let outcome = evaluator.moderate_image(image).await?;
//!     println!("appropriate: {}, labels: {}", outcome.is_appropriate, outcome.label_count());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod evaluator;
pub mod field;
pub mod incident;
pub mod policy;
pub mod providers;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod utils;

pub use config::ModerationSettings;
pub use error::{ModerationError, ValidationError};
pub use evaluator::{ModerationEvaluator, evaluate_labels, evaluate_response};
pub use field::{ImageModerationField, UploadContext};
pub use incident::{InMemoryIncidentStore, Incident, NewIncident, UserRef};
pub use policy::{MODERATION_LEVELS, ModerationPolicy, labels_for_level};
pub use providers::rekognition::{
    AwsCredentials, RekognitionBuilder, RekognitionClient, RekognitionConfig,
};
pub use traits::{ImageModerationCapability, IncidentStore};
pub use types::{
    HttpConfig, ImageModerationRequest, ImageModerationResponse, ModerationLabel,
    ModerationOutcome, ModerationReport,
};

pub mod prelude {
    pub use crate::config::ModerationSettings;
    pub use crate::error::{ModerationError, ValidationError};
    pub use crate::evaluator::{ModerationEvaluator, evaluate_labels};
    pub use crate::field::{ImageModerationField, UploadContext};
    pub use crate::incident::{InMemoryIncidentStore, UserRef};
    pub use crate::policy::ModerationPolicy;
    pub use crate::providers::rekognition::{RekognitionBuilder, RekognitionClient};
    pub use crate::traits::{ImageModerationCapability, IncidentStore};
    pub use crate::types::{ModerationLabel, ModerationOutcome, ModerationReport};
}
