//! Pré-transcodage des sources AVIF
//!
//! Certains fichiers AVIF font échouer la suite du pipeline lorsqu'ils sont
//! traités directement. Quand le client déclare une source AVIF, l'image est
//! d'abord ré-encodée en JPEG de haute qualité et c'est ce JPEG qui est
//! ensuite redimensionné et encodé dans le format final.

use crate::encode::encode_jpeg;
use crate::error::{at, PipelineError, Stage};
use crate::format::Quality;
use image::ImageFormat;
use std::io::{self, Write};
use std::path::Path;

/// Qualité du JPEG intermédiaire
const INTERMEDIATE_QUALITY: i64 = 95;

/// Ré-encode une source AVIF en JPEG intermédiaire.
///
/// Le JPEG transite par un fichier temporaire ; si celui-ci ne peut pas être
/// utilisé, le tampon mémoire est utilisé tel quel.
pub fn pretranscode_avif(input: &[u8]) -> Result<Vec<u8>, PipelineError> {
    pretranscode_avif_in(&std::env::temp_dir(), input)
}

/// Comme [`pretranscode_avif`], avec le fichier temporaire créé dans `tmp_dir`
pub fn pretranscode_avif_in(tmp_dir: &Path, input: &[u8]) -> Result<Vec<u8>, PipelineError> {
    let img = image::load_from_memory_with_format(input, ImageFormat::Avif)
        .map_err(at(Stage::AvifPretranscode))?;

    let jpeg = encode_jpeg(&img, Quality::new(INTERMEDIATE_QUALITY))
        .map_err(|e| PipelineError::new(Stage::AvifPretranscode, e.source))?;

    Ok(stage_through_tempfile(tmp_dir, jpeg))
}

/// Fait transiter le JPEG par un fichier de `tmp_dir`, ou le rend tel quel
fn stage_through_tempfile(tmp_dir: &Path, jpeg: Vec<u8>) -> Vec<u8> {
    match roundtrip_through_tempfile_in(tmp_dir, &jpeg) {
        Ok(bytes) => {
            tracing::debug!(size = bytes.len(), "AVIF source transcoded through temporary file");
            bytes
        }
        Err(e) => {
            tracing::warn!("Temporary file unavailable ({}), using in-memory JPEG", e);
            jpeg
        }
    }
}

fn roundtrip_through_tempfile_in(tmp_dir: &Path, data: &[u8]) -> io::Result<Vec<u8>> {
    let mut file = tempfile::Builder::new()
        .prefix("pixopt-avif-")
        .suffix(".jpeg")
        .tempfile_in(tmp_dir)?;
    file.write_all(data)?;
    file.flush()?;
    std::fs::read(file.path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_avif_reports_pretranscode_stage() {
        let err = pretranscode_avif(b"definitely not an avif file").unwrap_err();
        assert_eq!(err.stage, Stage::AvifPretranscode);
    }

    #[test]
    fn test_tempfile_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let data = vec![1u8, 2, 3, 4, 5];
        assert_eq!(roundtrip_through_tempfile_in(dir.path(), &data).unwrap(), data);
        // le fichier temporaire est supprimé après lecture
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_tmp_dir_keeps_in_memory_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3];

        assert!(roundtrip_through_tempfile_in(&missing, &jpeg).is_err());
        assert_eq!(stage_through_tempfile(&missing, jpeg.clone()), jpeg);
    }

    #[cfg(feature = "avif-native")]
    #[test]
    fn test_pretranscode_falls_back_to_memory() {
        use image::{DynamicImage, RgbaImage};

        let pixels = RgbaImage::from_pixel(16, 12, image::Rgba([200, 30, 30, 255]));
        let source = DynamicImage::ImageRgba8(pixels);
        let avif = crate::encode::encode_avif(&source, Quality::new(80)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let jpeg = pretranscode_avif_in(&dir.path().join("does-not-exist"), &avif).unwrap();
        assert_eq!(&jpeg[0..3], &[0xFF, 0xD8, 0xFF]);
        let decoded = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 12));
    }
}
