//! Encodage vers les formats de sortie

use crate::error::{at, PipelineError, ProcessingError, Stage};
use crate::format::{OutputFormat, Quality};
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::DynamicImage;
use std::borrow::Cow;
use webp::{Encoder, WebPMemory};

/// Vitesse de l'encodeur AVIF (1 = lent et compact, 10 = rapide)
const AVIF_SPEED: u8 = 6;

/// Encode l'image dans le format demandé
pub fn encode(
    img: &DynamicImage,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>, PipelineError> {
    tracing::debug!(%format, quality = quality.value(), "Encoding image");
    match format {
        OutputFormat::Webp => encode_webp(img, quality),
        OutputFormat::Avif => encode_avif(img, quality),
        OutputFormat::Jpeg => encode_jpeg(img, quality),
        OutputFormat::Png => encode_png(img, quality),
    }
}

pub fn encode_webp(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, PipelineError> {
    let rgba = img.to_rgba8();
    let encoder = Encoder::from_rgba(&rgba, rgba.width(), rgba.height());
    let webp_data: WebPMemory = encoder
        .encode_simple(false, quality.value() as f32)
        .map_err(|e| {
            PipelineError::new(Stage::Encode, ProcessingError::Codec(format!("{:?}", e)))
        })?;
    Ok(webp_data.to_vec())
}

pub fn encode_avif(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, PipelineError> {
    let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
    let mut buffer = Vec::new();
    let encoder = AvifEncoder::new_with_speed_quality(&mut buffer, AVIF_SPEED, quality.value());
    rgba.write_with_encoder(encoder).map_err(at(Stage::Encode))?;
    Ok(buffer)
}

/// JPEG n'a pas de canal alpha : l'image est aplatie en RGB
pub fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, PipelineError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.value());
    rgb.write_with_encoder(encoder).map_err(at(Stage::Encode))?;
    Ok(buffer)
}

/// PNG est sans perte : la qualité ne règle que l'effort de compression.
/// Plus la qualité demandée est basse, plus la compression est poussée.
///
/// PNG ne stocke pas de flottants : les images HDR passent en 16 bits.
pub fn encode_png(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, PipelineError> {
    let img = match img {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            Cow::Owned(DynamicImage::ImageRgba16(img.to_rgba16()))
        }
        _ => Cow::Borrowed(img),
    };
    let compression = match quality.value() {
        0..=40 => CompressionType::Best,
        41..=90 => CompressionType::Default,
        _ => CompressionType::Fast,
    };

    let mut buffer = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buffer, compression, PngFilter::Adaptive);
    img.write_with_encoder(encoder).map_err(at(Stage::Encode))?;
    Ok(buffer)
}
