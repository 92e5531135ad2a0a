//! Moderation service providers

pub mod rekognition;

pub use rekognition::{RekognitionBuilder, RekognitionClient, RekognitionConfig};
