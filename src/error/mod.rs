//! Error Handling Module
//!
//! - `ModerationError`: infrastructure failures (transport, auth, malformed
//!   responses, configuration, incident storage)
//! - `ValidationError`: what an upload validator returns, separating a policy
//!   rejection from an infrastructure failure
//!
//! # Example
//!
//! ```rust,ignore
//! use image_moderation::error::ModerationError;
//!
//! let error = ModerationError::api_error(404, "Not found");
//! assert!(error.is_client_error());
//! ```

mod conversions;
pub mod types;

pub use types::*;
