use image::ImageFormat;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Detects a MIME type from the leading bytes of `bytes`, ignoring any
/// declared type.
pub fn detect_content_type(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(format) => mime_for(format),
        Err(_) => OCTET_STREAM,
    }
}

fn mime_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        ImageFormat::Ico => "image/x-icon",
        ImageFormat::Avif => "image/avif",
        other => other.to_mime_type(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D',
        b'R',
    ];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn detects_png_and_jpeg() {
        assert_eq!(detect_content_type(PNG_HEADER), "image/png");
        assert_eq!(detect_content_type(JPEG_HEADER), "image/jpeg");
    }

    #[test]
    fn detects_gif() {
        assert_eq!(detect_content_type(b"GIF89a\x01\x00\x01\x00"), "image/gif");
    }

    #[test]
    fn unknown_bytes_are_octet_stream() {
        assert_eq!(detect_content_type(b"hello world"), OCTET_STREAM);
        assert_eq!(detect_content_type(&[]), OCTET_STREAM);
    }
}
