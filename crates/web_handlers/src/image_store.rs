use std::path::{Path, PathBuf};

use chrono::Utc;

/// Public URL prefix under which stored images are served
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Writes uploaded images into a local directory and hands out their public paths.
#[derive(Debug, Clone)]
pub struct ImageStore {
    directory: PathBuf,
    public_prefix: String,
}

impl ImageStore {
    /// Creates a store writing into `directory`, served under [`UPLOADS_PREFIX`].
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            public_prefix: UPLOADS_PREFIX.to_string(),
        }
    }

    /// Directory the files are written to
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Creates the upload directory if it does not exist yet.
    pub async fn ensure_directory(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.directory).await
    }

    /// Stores `bytes` under a timestamp based name and returns the public path.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> std::io::Result<String> {
        self.ensure_directory().await?;

        let file_name = generate_file_name(original_name);
        tokio::fs::write(self.directory.join(&file_name), bytes).await?;

        log::info!("🖼️ Stored uploaded image as {}", file_name);
        Ok(format!("{}/{}", self.public_prefix, file_name))
    }

    /// Deletes a previously stored image given its public path. Failures are only logged.
    pub async fn remove(&self, public_path: &str) {
        let Some(file_name) = public_path
            .strip_prefix(self.public_prefix.as_str())
            .map(|rest| rest.trim_start_matches('/'))
            .filter(|name| !name.is_empty() && !name.contains('/'))
        else {
            return;
        };

        if let Err(e) = tokio::fs::remove_file(self.directory.join(file_name)).await {
            log::warn!("Failed to remove stored image {}: {}", file_name, e);
        }
    }
}

/// `<unix-millis>-<random>[.ext]`, keeping the extension of the client file name
pub fn generate_file_name(original_name: Option<&str>) -> String {
    let stem = format!("{}-{:08x}", Utc::now().timestamp_millis(), rand::random::<u32>());

    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}
