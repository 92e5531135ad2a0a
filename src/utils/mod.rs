//! Utility modules

pub mod env;
pub mod mime;

pub use mime::{ensure_supported_image, guess_mime_from_bytes};
