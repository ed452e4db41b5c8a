use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Route prefix under which stored files are served.
pub const MEDIA_ROUTE: &str = "/media";

/// Local directory holding uploaded pictures.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the media directory if it does not exist yet.
    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Copy an uploaded temp file into the media directory under a fresh name
    /// and return that name.
    pub async fn persist(
        &self,
        source: &Path,
        original_name: Option<&str>,
    ) -> std::io::Result<String> {
        let file_name = stored_file_name(original_name);
        tokio::fs::copy(source, self.root.join(&file_name)).await?;
        tracing::debug!("Stored upload as {}", file_name);
        Ok(file_name)
    }

    /// Remove a stored file. A file that is already gone is not an error.
    pub async fn remove(&self, file_path: &str) -> std::io::Result<()> {
        match tokio::fs::remove_file(self.root.join(file_path)).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Remove several files, logging failures instead of returning them.
    pub async fn remove_all<'a>(&self, file_paths: impl IntoIterator<Item = &'a str>) {
        for file_path in file_paths {
            if let Err(e) = self.remove(file_path).await {
                tracing::warn!("Failed to remove stored file {}: {}", file_path, e);
            }
        }
    }
}

/// `{uuid}.{ext}`, keeping the client's extension when it is a plain one.
pub fn stored_file_name(original_name: Option<&str>) -> String {
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    }
}
