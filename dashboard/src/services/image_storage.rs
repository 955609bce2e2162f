// dashboard/src/services/image_storage.rs

//! Stores uploaded product images on disk and maps them to public paths.

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
  pub file_name: String,
  /// Path under which the file is served, e.g. `/images/products/<file>`.
  pub public_path: String,
  pub disk_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ImageStorage {
  root_dir: PathBuf,
  public_prefix: String,
  max_bytes: usize,
}

impl ImageStorage {
  pub fn new(root_dir: impl Into<PathBuf>, public_prefix: impl Into<String>, max_bytes: usize) -> Self {
    Self {
      root_dir: root_dir.into(),
      public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
      max_bytes,
    }
  }

  /// Subdirectory of `PUBLIC_DIR` served at `/images`.
  pub const SERVED_SUBDIR: &'static str = "images";

  /// The upload directory must live under `PUBLIC_DIR/images`, the only
  /// directory the server exposes for uploads.
  pub fn from_config(config: &AppConfig) -> Result<Self> {
    let served_root = config.public_dir.join(Self::SERVED_SUBDIR);
    let relative = config.upload_dir.strip_prefix(&served_root).map_err(|_| {
      AppError::Config(format!(
        "UPLOAD_DIR '{}' is not inside '{}'",
        config.upload_dir.display(),
        served_root.display()
      ))
    })?;
    let mut segments = vec![Self::SERVED_SUBDIR.to_string()];
    segments.extend(
      relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    Ok(Self::new(
      config.upload_dir.clone(),
      format!("/{}", segments.join("/")),
      config.max_upload_bytes,
    ))
  }

  pub fn max_bytes(&self) -> usize {
    self.max_bytes
  }

  /// Writes `bytes` under a fresh `{unix-millis}-{uuid}.{ext}` name.
  #[instrument(name = "image_storage::store", skip(self, bytes), fields(size = bytes.len()))]
  pub async fn store(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<StoredImage> {
    if bytes.is_empty() {
      return Err(AppError::Upload("No image uploaded".to_string()));
    }
    if bytes.len() > self.max_bytes {
      return Err(AppError::Upload(format!(
        "Image exceeds the {} byte limit",
        self.max_bytes
      )));
    }

    tokio::fs::create_dir_all(&self.root_dir).await?;
    let file_name = unique_file_name(original_name);
    let disk_path = self.root_dir.join(&file_name);
    tokio::fs::write(&disk_path, bytes).await?;
    info!(file = %disk_path.display(), "Stored uploaded image.");

    Ok(StoredImage {
      public_path: format!("{}/{}", self.public_prefix, file_name),
      file_name,
      disk_path,
    })
  }

  pub async fn remove(&self, image: &StoredImage) {
    if let Err(e) = tokio::fs::remove_file(&image.disk_path).await {
      warn!(file = %image.disk_path.display(), error = %e, "Failed to remove stored image.");
    }
  }
}

fn unique_file_name(original_name: Option<&str>) -> String {
  let millis = chrono::Utc::now().timestamp_millis();
  let stem = format!("{}-{}", millis, Uuid::new_v4());
  match original_name.and_then(extension_of) {
    Some(ext) => format!("{}.{}", stem, ext),
    None => stem,
  }
}

/// Lower-cased alphanumeric extension of an uploaded file name.
fn extension_of(name: &str) -> Option<String> {
  let ext = Path::new(name).extension()?.to_str()?;
  let valid = !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric());
  valid.then(|| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("image-storage-{}", Uuid::new_v4()))
  }

  #[test]
  fn extension_is_sanitized() {
    assert_eq!(extension_of("photo.JPG").as_deref(), Some("jpg"));
    assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
    assert_eq!(extension_of("noext"), None);
    assert_eq!(extension_of("evil.p/hp"), None);
  }

  #[tokio::test]
  async fn stores_under_unique_name_and_public_path() {
    let dir = scratch_dir();
    let storage = ImageStorage::new(&dir, "/images/products/", 1024);

    let first = storage.store(Some("cat.png"), b"png-bytes").await.unwrap();
    let second = storage.store(Some("cat.png"), b"png-bytes").await.unwrap();

    assert_ne!(first.file_name, second.file_name);
    assert!(first.file_name.ends_with(".png"));
    assert_eq!(first.public_path, format!("/images/products/{}", first.file_name));
    assert_eq!(tokio::fs::read(&first.disk_path).await.unwrap(), b"png-bytes");

    storage.remove(&first).await;
    assert!(!first.disk_path.exists());
    let _ = tokio::fs::remove_dir_all(&dir).await;
  }

  #[tokio::test]
  async fn rejects_empty_and_oversized_uploads() {
    let storage = ImageStorage::new(scratch_dir(), "/images/products", 4);
    assert!(matches!(storage.store(Some("a.png"), b"").await, Err(AppError::Upload(_))));
    assert!(matches!(storage.store(Some("a.png"), b"12345").await, Err(AppError::Upload(_))));
  }

  #[test]
  fn public_prefix_derives_from_public_dir() {
    let config = AppConfig::from_source(|key| match key {
      "DATABASE_URL" => Some("postgres://x".to_string()),
      _ => None,
    })
    .unwrap();
    let storage = ImageStorage::from_config(&config).unwrap();
    let stored_path = format!("{}/x.png", storage.public_prefix);
    assert_eq!(stored_path, "/images/products/x.png");
  }

  #[test]
  fn upload_dir_outside_served_images_is_rejected() {
    let config = AppConfig::from_source(|key| match key {
      "DATABASE_URL" => Some("postgres://x".to_string()),
      "UPLOAD_DIR" => Some("public/uploads".to_string()),
      _ => None,
    })
    .unwrap();
    let err = ImageStorage::from_config(&config).unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("public/uploads")));
  }
}
