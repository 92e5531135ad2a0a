//! Shared data types

pub mod http;
pub mod moderation;

pub use http::{HttpConfig, HttpConfigBuilder};
pub use moderation::{
    ImageModerationRequest, ImageModerationResponse, ModerationLabel, ModerationOutcome,
    ModerationReport,
};
