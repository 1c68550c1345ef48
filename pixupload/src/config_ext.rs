//! Extension pour intégrer les paramètres d'upload dans pixconfig
//!
//! Ce module fournit le trait `UploadConfigExt` qui ajoute à `pixconfig::Config`
//! les réglages du service d'upload.

use crate::store::UploadStore;
use anyhow::Result;
use piximage::{DEFAULT_QUALITY, Quality};
use pixconfig::Config;
use serde_yaml::{Number, Value};

const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Trait d'extension pour gérer l'upload dans pixconfig
///
/// # Exemple
///
/// ```rust,ignore
/// use pixconfig::get_config;
/// use pixupload::UploadConfigExt;
///
/// let config = get_config();
/// let store = config.create_upload_store()?;
/// ```
pub trait UploadConfigExt {
    /// Répertoire de stockage (default: "uploads", relatif au répertoire de config)
    fn get_upload_dir(&self) -> Result<String>;

    fn set_upload_dir(&self, directory: String) -> Result<()>;

    /// URL publique des fichiers stockés
    ///
    /// Une valeur vide donne `http://{base_url}:{http_port}/uploads`.
    fn get_upload_public_url(&self) -> String;

    fn set_upload_public_url(&self, url: String) -> Result<()>;

    /// Taille maximale d'une requête d'upload en octets (default: 10 Mio)
    fn get_upload_max_file_size(&self) -> Result<usize>;

    fn set_upload_max_file_size(&self, size: usize) -> Result<()>;

    /// Qualité appliquée quand la requête n'en précise pas (default: 80)
    fn get_upload_default_quality(&self) -> Quality;

    fn set_upload_default_quality(&self, quality: u8) -> Result<()>;

    /// Crée le store à partir du répertoire et de l'URL publique configurés
    fn create_upload_store(&self) -> Result<UploadStore>;
}

impl UploadConfigExt for Config {
    fn get_upload_dir(&self) -> Result<String> {
        self.get_managed_dir(&["upload", "directory"], DEFAULT_UPLOAD_DIR)
    }

    fn set_upload_dir(&self, directory: String) -> Result<()> {
        self.set_managed_dir(&["upload", "directory"], directory)
    }

    fn get_upload_public_url(&self) -> String {
        match self.get_value(&["upload", "public_url"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => format!(
                "http://{}:{}/uploads",
                self.get_base_url(),
                self.get_http_port()
            ),
        }
    }

    fn set_upload_public_url(&self, url: String) -> Result<()> {
        self.set_value(&["upload", "public_url"], Value::String(url))
    }

    fn get_upload_max_file_size(&self) -> Result<usize> {
        match self.get_value(&["upload", "max_file_size"]) {
            Ok(Value::Number(n)) => Ok(n
                .as_u64()
                .filter(|&v| v > 0)
                .map(|v| v as usize)
                .unwrap_or(DEFAULT_MAX_FILE_SIZE)),
            _ => Ok(DEFAULT_MAX_FILE_SIZE),
        }
    }

    fn set_upload_max_file_size(&self, size: usize) -> Result<()> {
        self.set_value(
            &["upload", "max_file_size"],
            Value::Number(Number::from(size as u64)),
        )
    }

    fn get_upload_default_quality(&self) -> Quality {
        match self.get_value(&["upload", "default_quality"]) {
            Ok(Value::Number(n)) => n
                .as_i64()
                .map(Quality::new)
                .unwrap_or_else(|| Quality::new(DEFAULT_QUALITY as i64)),
            Ok(Value::String(s)) => Quality::parse(Some(&s), Quality::default()),
            _ => Quality::default(),
        }
    }

    fn set_upload_default_quality(&self, quality: u8) -> Result<()> {
        self.set_value(
            &["upload", "default_quality"],
            Value::Number(Number::from(Quality::new(quality as i64).value() as u64)),
        )
    }

    fn create_upload_store(&self) -> Result<UploadStore> {
        let dir = self.get_upload_dir()?;
        UploadStore::new(dir, &self.get_upload_public_url())
    }
}
