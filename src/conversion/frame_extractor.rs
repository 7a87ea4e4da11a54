// frame_extractor.rs
use crate::conversion::{gif_destination, ConversionError, ConversionResult};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use std::path::Path;
use webp::{AnimDecoder, AnimFrame, PixelLayout};

/// Decodes every frame of a WebP file, in stream order.
///
/// Still images and animations both go through libwebp. A stream that fails
/// to decode is treated exactly like an empty one, so broken or non-WebP
/// input simply yields no frames.
pub fn decode_frames(bytes: &[u8]) -> Vec<RgbaImage> {
    if let Some(still) = webp::Decoder::new(bytes).decode() {
        return vec![still.to_image().to_rgba8()];
    }

    match AnimDecoder::new(bytes).decode() {
        Ok(animation) => animation
            .into_iter()
            .map_while(|frame| frame_to_rgba(&frame))
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn frame_to_rgba(frame: &AnimFrame) -> Option<RgbaImage> {
    let (width, height) = (frame.width(), frame.height());
    let pixels = frame.get_image().to_vec();
    match frame.get_layout() {
        PixelLayout::Rgba => RgbaImage::from_raw(width, height, pixels),
        PixelLayout::Rgb => RgbImage::from_raw(width, height, pixels)
            .map(|rgb| DynamicImage::ImageRgb8(rgb).to_rgba8()),
    }
}

/// First decodable frame of the file at `path`, if any.
pub fn extract_first_frame(path: &Path) -> Option<RgbaImage> {
    let bytes = std::fs::read(path).ok()?;
    decode_frames(&bytes).into_iter().next()
}

/// Writes the first frame of `source` as a single-frame GIF inside `output_dir`.
///
/// Animations are truncated to their first frame. An existing file at the
/// destination is overwritten. When nothing can be decoded, nothing is written
/// and the result carries no output path.
pub fn convert_webp_to_gif(
    source: &Path,
    output_dir: &Path,
) -> Result<ConversionResult, ConversionError> {
    let destination = gif_destination(source, output_dir);

    let first = match extract_first_frame(source) {
        Some(frame) => frame,
        None => {
            return Ok(ConversionResult {
                source: source.to_path_buf(),
                output: None,
            })
        }
    };

    DynamicImage::ImageRgba8(first)
        .save_with_format(&destination, ImageFormat::Gif)
        .map_err(|source| ConversionError::Write {
            path: destination.clone(),
            source,
        })?;

    Ok(ConversionResult {
        source: source.to_path_buf(),
        output: Some(destination),
    })
}
