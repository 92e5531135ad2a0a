//! Image moderation capability trait

use crate::error::ModerationError;
use crate::types::{ImageModerationRequest, ImageModerationResponse};
use async_trait::async_trait;

/// A backend that analyses an image and reports moderation labels.
///
/// Implementations perform a single round trip and never retry. Any failure is
/// returned as an error, never as an empty label list.
#[async_trait]
pub trait ImageModerationCapability: Send + Sync {
    async fn detect_moderation_labels(
        &self,
        request: ImageModerationRequest,
    ) -> Result<ImageModerationResponse, ModerationError>;
}
