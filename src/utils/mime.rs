//! MIME type detection for uploaded images

use crate::defaults;
use crate::error::ModerationError;

/// MIME types the moderation service accepts as inline bytes
pub const SUPPORTED_IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Guess MIME by inspecting bytes (magic numbers)
pub fn guess_mime_from_bytes(bytes: &[u8]) -> Option<String> {
    infer::get(bytes).map(|k| k.mime_type().to_string())
}

/// Check that `bytes` can be sent inline: non-empty, within the size limit,
/// and JPEG or PNG.
pub fn ensure_supported_image(bytes: &[u8]) -> Result<&'static str, ModerationError> {
    if bytes.is_empty() {
        return Err(ModerationError::InvalidInput(
            "Image must not be empty".to_string(),
        ));
    }
    if bytes.len() > defaults::rekognition::MAX_IMAGE_BYTES {
        return Err(ModerationError::InvalidInput(format!(
            "Image is {} bytes, limit is {}",
            bytes.len(),
            defaults::rekognition::MAX_IMAGE_BYTES
        )));
    }
    let mime = infer::get(bytes).map(|k| k.mime_type());
    match mime.and_then(|m| SUPPORTED_IMAGE_MIME_TYPES.iter().find(|s| **s == m)) {
        Some(supported) => Ok(*supported),
        None => Err(ModerationError::InvalidInput(format!(
            "Unsupported image format: {}",
            mime.unwrap_or("unknown")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    const GIF_HEADER: &[u8] = b"GIF89a\x01\0\x01\0";

    #[test]
    fn accepts_png_and_jpeg() {
        assert_eq!(ensure_supported_image(PNG_HEADER).unwrap(), "image/png");
        assert_eq!(ensure_supported_image(JPEG_HEADER).unwrap(), "image/jpeg");
    }

    #[test]
    fn rejects_other_formats() {
        let err = ensure_supported_image(GIF_HEADER).unwrap_err();
        assert!(err.to_string().contains("image/gif"));
        let err = ensure_supported_image(b"plain text").unwrap_err();
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn rejects_empty_and_oversized() {
        assert!(matches!(
            ensure_supported_image(&[]),
            Err(ModerationError::InvalidInput(_))
        ));
        let mut big = PNG_HEADER.to_vec();
        big.resize(defaults::rekognition::MAX_IMAGE_BYTES + 1, 0);
        assert!(matches!(
            ensure_supported_image(&big),
            Err(ModerationError::InvalidInput(_))
        ));
    }

    #[test]
    fn guesses_png() {
        assert_eq!(guess_mime_from_bytes(PNG_HEADER).as_deref(), Some("image/png"));
    }
}
