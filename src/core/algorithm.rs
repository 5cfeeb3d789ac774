use std::io::{BufWriter, Cursor};

use bytes::Bytes;
use fast_image_resize::{images::Image, IntoImageView, Resizer};
use image::{
    codecs::{jpeg, png},
    load_from_memory_with_format, DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat,
    ImageReader,
};

use super::{ImageProcessor, ProcessingError};

/// [`ImageProcessor`] backed by the `image` codecs and `fast_image_resize`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateProcessor;

impl ImageProcessor for ImageCrateProcessor {
    fn convert_png_to_jpeg(&self, input: &[u8]) -> Result<Bytes, ProcessingError> {
        ensure_not_empty(input)?;
        let src_image = load_from_memory_with_format(input, ImageFormat::Png)?;

        let mut writer = BufWriter::new(Vec::new());
        write_jpeg(jpeg::JpegEncoder::new(&mut writer), &src_image)?;

        into_bytes(writer)
    }

    fn resize_image(
        &self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Bytes, ProcessingError> {
        ensure_not_empty(input)?;
        if width == 0 || height == 0 {
            return Err(ProcessingError::Failed(format!(
                "target size {width}x{height} must be positive"
            )));
        }
        let src_image = normalize_for_png(decode(input)?);

        let pixel_type = src_image.pixel_type().ok_or_else(|| {
            ProcessingError::Failed(format!("unsupported pixel layout {:?}", src_image.color()))
        })?;
        let mut dst_image = Image::new(width, height, pixel_type);

        let mut resizer = Resizer::new();
        resizer
            .resize(&src_image, &mut dst_image, None)
            .map_err(|e| ProcessingError::Failed(e.to_string()))?;

        let mut writer = BufWriter::new(Vec::new());
        png::PngEncoder::new(&mut writer).write_image(
            dst_image.buffer(),
            width,
            height,
            src_image.color().into(),
        )?;

        into_bytes(writer)
    }

    fn compress_image(&self, input: &[u8], quality: u8) -> Result<Bytes, ProcessingError> {
        ensure_not_empty(input)?;
        let src_image = decode(input)?;

        // The encoder's quality scale starts at 1.
        let quality = quality.clamp(1, 100);
        let mut writer = BufWriter::new(Vec::new());
        write_jpeg(
            jpeg::JpegEncoder::new_with_quality(&mut writer, quality),
            &src_image,
        )?;

        into_bytes(writer)
    }
}

fn ensure_not_empty(input: &[u8]) -> Result<(), ProcessingError> {
    if input.is_empty() {
        return Err(ProcessingError::Empty);
    }
    Ok(())
}

fn decode(input: &[u8]) -> Result<DynamicImage, ProcessingError> {
    let reader = ImageReader::new(Cursor::new(input))
        .with_guessed_format()
        .map_err(|e| ProcessingError::Failed(e.to_string()))?;

    if reader.format().is_none() {
        return Err(ProcessingError::Failed(
            "image format is unknown".to_string(),
        ));
    }

    Ok(reader.decode()?)
}

// JPEG carries neither alpha nor 16-bit samples.
fn write_jpeg<W: std::io::Write>(
    encoder: jpeg::JpegEncoder<W>,
    image: &DynamicImage,
) -> Result<(), ProcessingError> {
    let rgb = image.to_rgb8();
    encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)?;
    Ok(())
}

// PNG has no float samples.
fn normalize_for_png(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(image.to_rgb16()),
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(image.to_rgba16()),
        other => other,
    }
}

fn into_bytes(writer: BufWriter<Vec<u8>>) -> Result<Bytes, ProcessingError> {
    let buffer = writer
        .into_inner()
        .map_err(|e| ProcessingError::Failed(e.to_string()))?;
    Ok(Bytes::from(buffer))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{GenericImageView, RgbaImage};

    /// Encode a gradient RGBA image as PNG.
    pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 200])
        });
        let mut buf = Vec::new();
        png::PngEncoder::new(&mut buf)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
            .unwrap();
        buf
    }

    fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
        let png = sample_png(width, height);
        ImageCrateProcessor
            .compress_image(&png, 90)
            .unwrap()
            .to_vec()
    }

    #[test]
    fn png_to_jpeg_keeps_dimensions() {
        let out = ImageCrateProcessor
            .convert_png_to_jpeg(&sample_png(40, 24))
            .unwrap();

        assert!(!out.is_empty());
        let decoded = load_from_memory_with_format(&out, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (40, 24));
    }

    #[test]
    fn png_to_jpeg_rejects_non_png_input() {
        let err = ImageCrateProcessor
            .convert_png_to_jpeg(&sample_jpeg(8, 8))
            .unwrap_err();
        assert!(matches!(err, ProcessingError::Failed(_)));
    }

    #[test]
    fn resize_forces_exact_dimensions() {
        let out = ImageCrateProcessor
            .resize_image(&sample_png(64, 32), 10, 50)
            .unwrap();

        let decoded = load_from_memory_with_format(&out, ImageFormat::Png).unwrap();
        assert_eq!(decoded.dimensions(), (10, 50));
    }

    #[test]
    fn resize_accepts_jpeg_and_emits_png() {
        let out = ImageCrateProcessor
            .resize_image(&sample_jpeg(30, 30), 15, 20)
            .unwrap();

        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Png);
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.dimensions(), (15, 20));
    }

    #[test]
    fn resize_rejects_zero_dimension() {
        let err = ImageCrateProcessor
            .resize_image(&sample_png(8, 8), 0, 8)
            .unwrap_err();
        assert!(matches!(err, ProcessingError::Failed(_)));
    }

    #[test]
    fn compress_produces_jpeg() {
        let out = ImageCrateProcessor
            .compress_image(&sample_png(32, 32), 50)
            .unwrap();

        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.dimensions(), (32, 32));
    }

    #[test]
    fn compress_quality_zero_is_accepted() {
        assert!(ImageCrateProcessor
            .compress_image(&sample_png(16, 16), 0)
            .is_ok());
    }

    #[test]
    fn lower_quality_is_not_larger_for_gradient() {
        let png = sample_png(128, 128);
        let high = ImageCrateProcessor.compress_image(&png, 100).unwrap();
        let low = ImageCrateProcessor.compress_image(&png, 10).unwrap();
        assert!(low.len() <= high.len());
    }

    #[test]
    fn empty_input_is_rejected_by_every_operation() {
        let p = ImageCrateProcessor;
        assert!(matches!(p.convert_png_to_jpeg(&[]), Err(ProcessingError::Empty)));
        assert!(matches!(p.resize_image(&[], 5, 5), Err(ProcessingError::Empty)));
        assert!(matches!(p.compress_image(&[], 50), Err(ProcessingError::Empty)));
    }

    #[test]
    fn garbage_input_fails() {
        let junk = b"definitely not an image";
        let p = ImageCrateProcessor;
        assert!(p.convert_png_to_jpeg(junk).is_err());
        assert!(p.resize_image(junk, 5, 5).is_err());
        assert!(p.compress_image(junk, 50).is_err());
    }
}
