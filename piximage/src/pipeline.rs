use crate::avif::pretranscode_avif;
use crate::encode::encode;
use crate::error::{at, PipelineError, ProcessingError, Stage};
use crate::format::{OptimizeOptions, OutputFormat};
use crate::resize::resize_within;
use image::DynamicImage;

/// Résultat d'une optimisation
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl OptimizedImage {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Décode l'image quel que soit son format (détecté sur les octets)
pub fn decode(input: &[u8]) -> Result<DynamicImage, PipelineError> {
    if input.is_empty() {
        return Err(PipelineError::new(
            Stage::Decode,
            ProcessingError::Invalid("empty input".to_string()),
        ));
    }
    image::load_from_memory(input).map_err(at(Stage::Decode))
}

/// Optimise une image : pré-transcodage AVIF éventuel, décodage,
/// redimensionnement éventuel puis encodage.
///
/// Traitement CPU synchrone : à appeler depuis `spawn_blocking` dans un
/// contexte async.
pub fn optimize(input: &[u8], options: &OptimizeOptions) -> Result<OptimizedImage, PipelineError> {
    let transcoded;
    let source = if options.is_avif_source() {
        transcoded = pretranscode_avif(input)?;
        transcoded.as_slice()
    } else {
        input
    };

    let img = decode(source)?;
    tracing::debug!(width = img.width(), height = img.height(), "Decoded source image");

    let img = if options.wants_resize() {
        resize_within(img, options.width, options.height)?
    } else {
        img
    };

    let bytes = encode(&img, options.format, options.quality)?;

    Ok(OptimizedImage {
        bytes,
        format: options.format,
        width: img.width(),
        height: img.height(),
    })
}
