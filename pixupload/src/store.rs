//! Stockage des images envoyées sur le disque local

use anyhow::Result;
use piximage::OutputFormat;
use std::io;
use std::path::{Path, PathBuf};

/// Répertoire de stockage des images et URL publique correspondante
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_base_url: String,
}

impl UploadStore {
    /// Crée le store ; le répertoire est créé s'il n'existe pas
    pub fn new(dir: impl AsRef<Path>, public_base_url: &str) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Identifiant aléatoire d'une nouvelle image
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Nom de fichier d'une image : `{id}.{extension}`
    pub fn file_name(id: &str, format: OutputFormat) -> String {
        format!("{}.{}", id, format.extension())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    pub fn public_url(&self, name: &str) -> String {
        format!("{}/{}", self.public_base_url, name)
    }

    /// Chemin d'un fichier du store, `None` si le nom sort du répertoire
    pub fn path_of(&self, name: &str) -> Option<PathBuf> {
        is_valid_name(name).then(|| self.dir.join(name))
    }

    /// Écrit le fichier et retourne son chemin
    pub async fn save(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self
            .path_of(name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid file name"))?;
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path=%path.display(), size = bytes.len(), "Stored upload");
        Ok(path)
    }

    /// Taille d'un fichier stocké, `None` s'il n'existe pas
    pub async fn size_of(&self, name: &str) -> io::Result<Option<u64>> {
        let Some(path) = self.path_of(name) else {
            return Ok(None);
        };
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Supprime un fichier ; retourne `false` s'il n'existait pas
    pub async fn remove(&self, name: &str) -> io::Result<bool> {
        let Some(path) = self.path_of(name) else {
            return Ok(false);
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Un nom valide désigne un fichier directement dans le répertoire du store
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
        && !name.contains("..")
}
