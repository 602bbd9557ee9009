//! Content-based MIME detection.
//!
//! Only the leading bytes of a file are inspected; the filename extension is never
//! trusted. Formats this build cannot decode, and anything unrecognised, are reported
//! as `application/octet-stream`.

use pictor_core::constants::{OCTET_STREAM, SNIFF_LEN};

/// Detect the MIME type of `data` from its magic number.
pub fn sniff_mime_type(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(SNIFF_LEN)];

    image::guess_format(head)
        .ok()
        .filter(|format| format.reading_enabled())
        .map(|format| format.to_mime_type())
        .unwrap_or(OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_known_signatures() {
        assert_eq!(sniff_mime_type(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]), "image/jpeg");
        assert_eq!(
            sniff_mime_type(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00]),
            "image/png"
        );
        assert_eq!(sniff_mime_type(b"GIF89a\x01\x00"), "image/gif");
        assert_eq!(sniff_mime_type(b"RIFF\x24\x00\x00\x00WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime_type(b"BM\x00\x00"), "image/bmp");
        assert_eq!(sniff_mime_type(&[0x49, 0x49, 0x2A, 0x00, 0x08]), "image/tiff");
        assert_eq!(sniff_mime_type(&[0x4D, 0x4D, 0x00, 0x2A, 0x00]), "image/tiff");
        assert_eq!(sniff_mime_type(&[0x00, 0x00, 0x01, 0x00, 0x01]), "image/x-icon");
    }

    #[test]
    fn test_sniff_big_tiff() {
        assert_eq!(sniff_mime_type(b"II+\x00\x08\x00"), "image/tiff");
    }

    #[test]
    fn test_sniff_falls_back_to_octet_stream() {
        assert_eq!(sniff_mime_type(b""), OCTET_STREAM);
        assert_eq!(sniff_mime_type(&[1, 2, 3, 4, 5]), OCTET_STREAM);
        assert_eq!(sniff_mime_type(b"RIFF\x24\x00\x00\x00WAVEfmt "), OCTET_STREAM);
    }

    #[test]
    fn test_sniff_ignores_bytes_past_window() {
        let mut data = vec![0u8; SNIFF_LEN];
        data.extend_from_slice(b"GIF89a");
        assert_eq!(sniff_mime_type(&data), OCTET_STREAM);
    }
}
