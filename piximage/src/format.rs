//! Formats de sortie et paramètres d'optimisation

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Qualité utilisée quand la requête n'en fournit pas d'exploitable
pub const DEFAULT_QUALITY: u8 = 80;

/// Formats de sortie autorisés
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum OutputFormat {
    #[default]
    Webp,
    Avif,
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Interprète le format demandé par le client.
    ///
    /// Toute valeur hors de la liste autorisée (ou absente) retombe sur WebP.
    pub fn from_request(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("avif") => OutputFormat::Avif,
            Some("jpeg") | Some("jpg") => OutputFormat::Jpeg,
            Some("png") => OutputFormat::Png,
            _ => OutputFormat::Webp,
        }
    }

    /// Format correspondant à une image détectée par `image::guess_format`
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::WebP => Some(OutputFormat::Webp),
            image::ImageFormat::Avif => Some(OutputFormat::Avif),
            image::ImageFormat::Jpeg => Some(OutputFormat::Jpeg),
            image::ImageFormat::Png => Some(OutputFormat::Png),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Webp => "webp",
            OutputFormat::Avif => "avif",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Webp => "image/webp",
            OutputFormat::Avif => "image/avif",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualité d'encodage, toujours comprise entre 1 et 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: i64) -> Self {
        Quality(value.clamp(1, 100) as u8)
    }

    /// Interprète la qualité demandée ; une valeur absente ou illisible donne `default`
    pub fn parse(value: Option<&str>, default: Quality) -> Self {
        match value.map(str::trim).and_then(|v| v.parse::<f64>().ok()) {
            Some(q) if q.is_finite() => Quality::new(q.round() as i64),
            _ => default,
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality(DEFAULT_QUALITY)
    }
}

/// Champs texte bruts d'une requête d'optimisation, tels que reçus
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    pub format: Option<String>,
    pub quality: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub source_format: Option<String>,
}

/// Paramètres d'optimisation normalisés
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptimizeOptions {
    pub format: OutputFormat,
    pub quality: Quality,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub source_format: Option<String>,
}

impl OptimizeOptions {
    pub fn from_raw(raw: &RawOptions, default_quality: Quality) -> Self {
        Self {
            format: OutputFormat::from_request(raw.format.as_deref()),
            quality: Quality::parse(raw.quality.as_deref(), default_quality),
            width: parse_dimension(raw.width.as_deref()),
            height: parse_dimension(raw.height.as_deref()),
            source_format: raw
                .source_format
                .as_deref()
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn is_avif_source(&self) -> bool {
        self.source_format.as_deref() == Some("avif")
    }

    pub fn wants_resize(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

/// Une dimension absente, illisible ou nulle n'impose aucune contrainte
fn parse_dimension(value: Option<&str>) -> Option<u32> {
    value
        .map(str::trim)
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|&v| v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_allow_list() {
        assert_eq!(OutputFormat::from_request(None), OutputFormat::Webp);
        assert_eq!(OutputFormat::from_request(Some("AVIF")), OutputFormat::Avif);
        assert_eq!(OutputFormat::from_request(Some(" png ")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_request(Some("jpg")), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_request(Some("gif")), OutputFormat::Webp);
        assert_eq!(OutputFormat::from_request(Some("")), OutputFormat::Webp);
    }

    #[test]
    fn test_quality_parsing() {
        let default = Quality::default();
        assert_eq!(Quality::parse(None, default).value(), 80);
        assert_eq!(Quality::parse(Some("abc"), default).value(), 80);
        assert_eq!(Quality::parse(Some("65"), default).value(), 65);
        assert_eq!(Quality::parse(Some("150"), default).value(), 100);
        assert_eq!(Quality::parse(Some("0"), default).value(), 1);
        assert_eq!(Quality::parse(Some("72.6"), default).value(), 73);
        assert_eq!(Quality::parse(Some("NaN"), Quality::new(50)).value(), 50);
    }

    #[test]
    fn test_options_from_raw() {
        let raw = RawOptions {
            format: Some("jpeg".into()),
            quality: Some("90".into()),
            width: Some("640".into()),
            height: Some("0".into()),
            source_format: Some(" AVIF ".into()),
        };
        let opts = OptimizeOptions::from_raw(&raw, Quality::default());

        assert_eq!(opts.format, OutputFormat::Jpeg);
        assert_eq!(opts.quality.value(), 90);
        assert_eq!(opts.width, Some(640));
        assert_eq!(opts.height, None);
        assert!(opts.is_avif_source());
        assert!(opts.wants_resize());
    }

    #[test]
    fn test_empty_options() {
        let opts = OptimizeOptions::from_raw(&RawOptions::default(), Quality::new(70));
        assert_eq!(opts.format, OutputFormat::Webp);
        assert_eq!(opts.quality.value(), 70);
        assert!(!opts.wants_resize());
        assert!(!opts.is_avif_source());
    }
}
