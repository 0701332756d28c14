//! On-the-fly image scaling for SHED.
//!
//! Scaling is best-effort by contract: only content declared as an image is
//! ever decoded, and content that declares an image type but fails to
//! decode is passed through untouched as `application/octet-stream`. A
//! decode failure is not an error; a bad scale specifier on a real image
//! is.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::content_type::is_image;
use crate::{Result, ShedError};

/// Resampling filter used for every resize. Catmull-Rom is a bicubic
/// kernel; fixing it keeps identical requests byte-identical.
const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Ceiling on total output pixels. Targets past this are rejected as
/// invalid scale factors before any pixel buffer is allocated.
const MAX_TARGET_PIXELS: u64 = 100_000_000;

/// Output of [`maybe_scale`]: the bytes to serve and their content type.
#[derive(Debug, Clone)]
pub struct ScaledFile {
    /// Bytes to serve (resized, or the original on pass-through).
    pub bytes: Vec<u8>,
    /// Content type matching the bytes.
    pub content_type: String,
}

/// Parse a scale specifier into a positive factor.
///
/// `"50%"` divides by 100, `"0.5"` is taken as-is; both denote the same
/// factor. Whitespace around the number is ignored. Malformed, zero,
/// negative, or non-finite values are rejected.
pub fn parse_scale_factor(spec: &str) -> Result<f64> {
    let trimmed = spec.trim();
    let (number, divisor) = match trimmed.strip_suffix('%') {
        Some(percent) => (percent.trim(), 100.0),
        None => (trimmed, 1.0),
    };

    let value: f64 = number
        .parse()
        .map_err(|_| ShedError::InvalidScale(trimmed.to_string()))?;
    let factor = value / divisor;

    if !factor.is_finite() || factor <= 0.0 {
        return Err(ShedError::InvalidScale(trimmed.to_string()));
    }
    Ok(factor)
}

/// Compute target dimensions for a resize.
///
/// Both axes floor, matching integer-truncation scaling. A factor that
/// floors either axis to zero is rejected rather than clamped, as is one
/// whose target exceeds `MAX_TARGET_PIXELS` in total.
pub fn scaled_dimensions(width: u32, height: u32, factor: f64) -> Result<(u32, u32)> {
    let w = (width as f64 * factor).floor() as u32;
    let h = (height as f64 * factor).floor() as u32;

    if w == 0 || h == 0 {
        return Err(ShedError::InvalidScale(format!(
            "factor {factor} scales {width}x{height} to zero size"
        )));
    }
    // The casts above saturate, so an oversized axis always lands here
    if w as u64 * h as u64 > MAX_TARGET_PIXELS {
        return Err(ShedError::InvalidScale(format!(
            "factor {factor} scales {width}x{height} past the output pixel limit"
        )));
    }
    Ok((w, h))
}

/// Scale image bytes by the given specifier, or pass them through.
///
/// The content-type gate runs before the specifier is parsed: non-image
/// content is returned unchanged even when the specifier is garbage.
/// Declared-image content that fails to decode is returned unchanged as
/// `application/octet-stream`. The re-encode format follows the declared
/// content type, falling back to the sniffed input format when the declared
/// type has no encoder.
pub fn maybe_scale(bytes: Vec<u8>, content_type: &str, spec: &str) -> Result<ScaledFile> {
    if !is_image(content_type) {
        return Ok(ScaledFile {
            bytes,
            content_type: content_type.to_string(),
        });
    }

    let factor = parse_scale_factor(spec)?;

    let img = match image::load_from_memory(&bytes) {
        Ok(img) => img,
        Err(_) => {
            // Declared an image but isn't one we can read: serve the raw
            // bytes without vouching for the type
            return Ok(ScaledFile {
                bytes,
                content_type: "application/octet-stream".to_string(),
            });
        }
    };
    let sniffed = image::guess_format(&bytes).ok();

    let (src_width, src_height) = img.dimensions();
    let (width, height) = scaled_dimensions(src_width, src_height, factor)?;
    let resized = img.resize_exact(width, height, RESIZE_FILTER);

    let format = ImageFormat::from_mime_type(content_type)
        .filter(|f| f.can_write())
        .or_else(|| sniffed.filter(|f| f.can_write()))
        .ok_or_else(|| ShedError::Image(format!("no encoder for {content_type}")))?;

    // JPEG has no alpha channel
    let resized = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(resized.to_rgb8())
    } else {
        resized
    };

    let mut out = Cursor::new(Vec::new());
    resized.write_to(&mut out, format)?;

    Ok(ScaledFile {
        bytes: out.into_inner(),
        content_type: format.to_mime_type().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            image::Rgb([10, 120, 230]),
        ));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_parse_percent_and_decimal_agree() {
        assert_eq!(parse_scale_factor("50%").unwrap(), 0.5);
        assert_eq!(parse_scale_factor("0.5").unwrap(), 0.5);
        assert_eq!(parse_scale_factor("150%").unwrap(), 1.5);
        assert_eq!(parse_scale_factor("2").unwrap(), 2.0);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_scale_factor("  75%  ").unwrap(), 0.75);
        assert_eq!(parse_scale_factor("50 %").unwrap(), 0.5);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for spec in ["abc", "", "12x", "%", "50%%"] {
            assert!(
                matches!(parse_scale_factor(spec), Err(ShedError::InvalidScale(_))),
                "accepted {spec:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        for spec in ["0", "0%", "-50%", "-0.5"] {
            assert!(
                matches!(parse_scale_factor(spec), Err(ShedError::InvalidScale(_))),
                "accepted {spec:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        for spec in ["inf", "nan", "1e999"] {
            assert!(
                matches!(parse_scale_factor(spec), Err(ShedError::InvalidScale(_))),
                "accepted {spec:?}"
            );
        }
    }

    #[test]
    fn test_scaled_dimensions_floor_both_axes() {
        assert_eq!(scaled_dimensions(99, 51, 0.5).unwrap(), (49, 25));
        assert_eq!(scaled_dimensions(100, 60, 0.5).unwrap(), (50, 30));
        assert_eq!(scaled_dimensions(10, 10, 1.5).unwrap(), (15, 15));
    }

    #[test]
    fn test_scaled_dimensions_zero_rejected() {
        assert!(matches!(
            scaled_dimensions(10, 10, 0.01),
            Err(ShedError::InvalidScale(_))
        ));
        assert!(matches!(
            scaled_dimensions(1, 100, 0.99),
            Err(ShedError::InvalidScale(_))
        ));
    }

    #[test]
    fn test_scaled_dimensions_oversized_rejected() {
        assert!(matches!(
            scaled_dimensions(10, 10, 1e9),
            Err(ShedError::InvalidScale(_))
        ));
        assert!(matches!(
            scaled_dimensions(10_000, 10_000, 1.1),
            Err(ShedError::InvalidScale(_))
        ));
        // The cap itself is still reachable
        assert_eq!(
            scaled_dimensions(10_000, 10_000, 1.0).unwrap(),
            (10_000, 10_000)
        );
    }

    #[test]
    fn test_scale_resizes_image() {
        let original = png_bytes(100, 60);

        let scaled = maybe_scale(original, "image/png", "50%").unwrap();

        assert_eq!(scaled.content_type, "image/png");
        let img = image::load_from_memory(&scaled.bytes).unwrap();
        assert_eq!(img.dimensions(), (50, 30));
    }

    #[test]
    fn test_percent_and_decimal_outputs_identical() {
        let original = png_bytes(64, 40);

        let a = maybe_scale(original.clone(), "image/png", "50%").unwrap();
        let b = maybe_scale(original, "image/png", "0.5").unwrap();

        assert_eq!(a.bytes, b.bytes);
    }

    #[test]
    fn test_non_image_passes_through() {
        let scaled = maybe_scale(b"hello".to_vec(), "text/plain", "50%").unwrap();

        assert_eq!(scaled.bytes, b"hello");
        assert_eq!(scaled.content_type, "text/plain");
    }

    #[test]
    fn test_non_image_skips_spec_parsing() {
        // Gate runs before parse: garbage spec on non-image is not an error
        let scaled = maybe_scale(b"data".to_vec(), "application/json", "abc").unwrap();

        assert_eq!(scaled.bytes, b"data");
        assert_eq!(scaled.content_type, "application/json");
    }

    #[test]
    fn test_undecodable_image_passes_through_as_octet_stream() {
        let scaled = maybe_scale(b"not an image".to_vec(), "image/png", "50%").unwrap();

        assert_eq!(scaled.bytes, b"not an image");
        assert_eq!(scaled.content_type, "application/octet-stream");
    }

    #[test]
    fn test_invalid_spec_on_real_image_rejected() {
        let original = png_bytes(10, 10);

        let result = maybe_scale(original, "image/png", "abc");

        assert!(matches!(result, Err(ShedError::InvalidScale(_))));
    }

    #[test]
    fn test_zero_factor_on_real_image_rejected() {
        let original = png_bytes(10, 10);

        let result = maybe_scale(original, "image/png", "0");

        assert!(matches!(result, Err(ShedError::InvalidScale(_))));
    }

    #[test]
    fn test_huge_factor_on_real_image_rejected() {
        let original = png_bytes(10, 10);

        for spec in ["1e9", "1e11%"] {
            let result = maybe_scale(original.clone(), "image/png", spec);
            assert!(
                matches!(result, Err(ShedError::InvalidScale(_))),
                "accepted {spec:?}"
            );
        }
    }

    #[test]
    fn test_encode_format_follows_declared_type() {
        let original = png_bytes(20, 20);

        let scaled = maybe_scale(original, "image/png", "0.5").unwrap();

        assert_eq!(
            image::guess_format(&scaled.bytes).unwrap(),
            ImageFormat::Png
        );
    }

    #[test]
    fn test_unknown_declared_type_falls_back_to_input_format() {
        let original = png_bytes(20, 20);

        // Declared subtype has no encoder; the sniffed input format wins
        let scaled = maybe_scale(original, "image/x-weird", "0.5").unwrap();

        assert_eq!(scaled.content_type, "image/png");
        assert_eq!(
            image::guess_format(&scaled.bytes).unwrap(),
            ImageFormat::Png
        );
    }
}
