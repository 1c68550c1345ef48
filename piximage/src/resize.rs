use crate::error::{PipelineError, ProcessingError, Stage};
use image::{imageops::FilterType, DynamicImage};

/// Calcule la taille finale en mode « fit inside, never enlarge ».
///
/// L'image est réduite pour tenir dans la boîte `max_width` x `max_height` en
/// conservant ses proportions. Une borne absente ne contraint pas l'axe
/// correspondant. La taille retournée n'excède jamais celle de la source.
pub fn fit_inside(
    width: u32,
    height: u32,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let scale_w = max_width.map_or(1.0, |w| w as f64 / width as f64);
    let scale_h = max_height.map_or(1.0, |h| h as f64 / height as f64);
    let scale = scale_w.min(scale_h).min(1.0);

    if scale >= 1.0 {
        return (width, height);
    }

    let new_width = ((width as f64 * scale).round() as u32).clamp(1, width);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, height);
    (new_width, new_height)
}

/// Redimensionne l'image pour qu'elle tienne dans les bornes données
pub fn resize_within(
    img: DynamicImage,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> Result<DynamicImage, PipelineError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(PipelineError::new(
            Stage::Resize,
            ProcessingError::Invalid("image has no pixels".to_string()),
        ));
    }

    let (width, height) = fit_inside(img.width(), img.height(), max_width, max_height);
    if (width, height) == (img.width(), img.height()) {
        return Ok(img);
    }

    tracing::debug!(
        from_width = img.width(),
        from_height = img.height(),
        width,
        height,
        "Resizing image"
    );
    Ok(img.resize_exact(width, height, FilterType::Lanczos3))
}
