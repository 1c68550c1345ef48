//! Erreurs du pipeline d'optimisation

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Étape du pipeline, rapportée avec toute erreur de traitement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum Stage {
    Decode,
    AvifPretranscode,
    Resize,
    Encode,
    Write,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Decode => "decode",
            Stage::AvifPretranscode => "avif-pretranscode",
            Stage::Resize => "resize",
            Stage::Encode => "encode",
            Stage::Write => "write",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cause d'un échec, indépendamment de l'étape
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Erreur remontée par un encodeur qui ne renvoie qu'un message
    #[error("{0}")]
    Codec(String),

    #[error("{0}")]
    Invalid(String),
}

/// Erreur du pipeline : une cause et l'étape où elle s'est produite
#[derive(Debug, Error)]
#[error("{stage}: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: ProcessingError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<ProcessingError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    /// Message de la cause seule, sans le libellé d'étape
    pub fn message(&self) -> String {
        self.source.to_string()
    }
}

/// Raccourci pour `map_err` : `.map_err(at(Stage::Decode))`
pub(crate) fn at<E: Into<ProcessingError>>(stage: Stage) -> impl FnOnce(E) -> PipelineError {
    move |e| PipelineError::new(stage, e)
}
