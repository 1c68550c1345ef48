//! # piximage - Pipeline d'optimisation d'images pour PixOpt
//!
//! Cette crate regroupe le traitement appliqué à une image envoyée au service :
//!
//! 1. Pré-transcodage en JPEG si le client déclare une source AVIF
//! 2. Décodage (format détecté sur le contenu)
//! 3. Redimensionnement « fit inside, never enlarge » si une largeur ou une hauteur est demandée
//! 4. Encodage en WebP, AVIF, JPEG ou PNG avec la qualité demandée
//!
//! Chaque erreur porte l'étape ([`Stage`]) où elle s'est produite.
//!
//! ## Exemple
//!
//! ```rust,no_run
//! use piximage::{optimize, OptimizeOptions, Quality, RawOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let input = std::fs::read("photo.jpg")?;
//! let raw = RawOptions {
//!     format: Some("webp".into()),
//!     width: Some("800".into()),
//!     ..Default::default()
//! };
//! let result = optimize(&input, &OptimizeOptions::from_raw(&raw, Quality::default()))?;
//! println!("{}x{} ({} octets)", result.width, result.height, result.size());
//! # Ok(())
//! # }
//! ```
//!
//! Le décodage des sources AVIF nécessite la feature `avif-native` (dav1d).

pub mod avif;
pub mod encode;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod resize;

pub use error::{PipelineError, ProcessingError, Stage};
pub use format::{OptimizeOptions, OutputFormat, Quality, RawOptions, DEFAULT_QUALITY};
pub use pipeline::{decode, optimize, OptimizedImage};
pub use resize::fit_inside;
