//! Writing linear data images.
use super::types::{clamp, Float};
use image::error::{ParameterError, ParameterErrorKind};
use image::{DynamicImage, ImageBuffer, ImageError, ImageResult, Luma, Rgb};
use std::path::Path;

/// Quantize a value in `[0, 1]` to 16 bits. No gamma is applied.
#[inline]
pub fn quantize_u16(v: Float) -> u16 {
    (clamp(v, 0.0, 1.0) * 65535.0 + 0.5) as u16
}

/// Write `width * height` pixels of one or three interleaved channels.
///
/// The format follows the file extension; values are stored linearly at 16 bits.
pub fn write_image<P: AsRef<Path>>(path: P, pixels: &[Float], width: u32, height: u32, channels: u32) -> ImageResult<()> {
    let expected = (width as u64) * (height as u64) * (channels as u64);
    if pixels.len() as u64 != expected {
        return Err(dimension_mismatch());
    }
    let data: Vec<u16> = pixels.iter().map(|p| quantize_u16(*p)).collect();
    let image = match channels {
        1 => ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(width, height, data).map(DynamicImage::ImageLuma16),
        3 => ImageBuffer::<Rgb<u16>, Vec<u16>>::from_raw(width, height, data).map(DynamicImage::ImageRgb16),
        _ => None
    };
    match image {
        Some(image) => image.save(path),
        None => Err(dimension_mismatch())
    }
}

fn dimension_mismatch() -> ImageError {
    ImageError::Parameter(ParameterError::from_kind(ParameterErrorKind::DimensionMismatch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_should_clamp() {
        assert_eq!(quantize_u16(-1.0), 0);
        assert_eq!(quantize_u16(0.0), 0);
        assert_eq!(quantize_u16(1.0), 65535);
        assert_eq!(quantize_u16(2.0), 65535);
        assert_eq!(quantize_u16(0.5), 32768);
    }

    #[test]
    fn write_should_reject_wrong_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        assert!(write_image(&path, &[0.5; 5], 2, 2, 1).is_err());
        assert!(write_image(&path, &[0.5; 8], 2, 2, 2).is_err());
        assert!(write_image(&path, &[0.5; 10], 2, 2, 1).is_err());
        assert!(write_image(&path, &[0.5; 13], 2, 2, 3).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn write_should_create_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grey.png");
        write_image(&path, &[0.0, 0.25, 0.5, 1.0], 2, 2, 1).unwrap();
        assert!(path.exists());
    }
}
