use brick_review_application::{ApiError, ImageDecoder};
use brick_review_domain::DecodedImage;

#[derive(Debug, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, ApiError> {
        let image = image::load_from_memory(bytes)
            .map_err(|error| ApiError::decode(format!("image decode failed: {error}")))?
            .to_rgba8();
        Ok(DecodedImage {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use brick_review_application::ApiErrorKind;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};

    use super::*;

    #[test]
    fn decodes_png_into_rgba() {
        let source = ImageBuffer::from_pixel(5, 3, Rgba([10_u8, 20_u8, 30_u8, 255_u8]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(source)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("encode png");

        let decoded = ImageCrateDecoder.decode(&bytes).expect("decode");
        assert_eq!((decoded.width, decoded.height), (5, 3));
        assert!(decoded.is_consistent());
        assert_eq!(&decoded.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let error = ImageCrateDecoder.decode(b"not an image").expect_err("garbage");
        assert_eq!(error.kind, ApiErrorKind::Decode);
    }
}
