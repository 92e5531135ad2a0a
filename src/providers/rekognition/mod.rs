//! AWS Rekognition provider
//!
//! [`RekognitionClient`] implements [`ImageModerationCapability`] on top of
//! `DetectModerationLabels`.
//!
//! ```rust,ignore
//! use image_moderation::providers::rekognition::RekognitionBuilder;
//!
//! let client = RekognitionBuilder::new()
//!     .region("eu-west-1")
//!     .build()?; // credentials from the environment
//! ```
//!
//! [`ImageModerationCapability`]: crate::traits::ImageModerationCapability

mod builder;
mod client;
mod config;
mod errors;
mod signing;
mod types;

pub use builder::RekognitionBuilder;
pub use client::RekognitionClient;
pub use config::{
    ACCESS_KEY_ENV, AwsCredentials, REGION_ENV, RekognitionConfig, SECRET_KEY_ENV,
    SESSION_TOKEN_ENV,
};
pub use errors::classify_rekognition_error;
pub use signing::{RequestSigner, SignedHeaders};
