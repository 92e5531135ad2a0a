//! Core Trait Definitions
//!
//! Traits are organized under `traits/*` and re-exported here for a stable API.

mod moderation;
pub use moderation::ImageModerationCapability;

mod incident;
pub use incident::IncidentStore;
