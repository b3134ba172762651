//! Image storage on the local file system.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tokio::fs::{self, File};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Public route images are served from.
pub const IMAGE_URL_PREFIX: &str = "/bookstore/images/";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("file name is empty")]
    Empty,

    #[error("file name `{0}` points outside the image directory")]
    Traversal(String),

    #[error("file name `{0}` contains a control character")]
    InvalidCharacter(String),

    #[error("`{0}` is not a supported image type")]
    UnsupportedExtension(String),
}

#[derive(Debug, Clone)]
pub struct FileService {
    root: PathBuf,
}

/// An opened image ready to be streamed.
#[derive(Debug)]
pub struct ImageResource {
    pub path: PathBuf,
    pub content_type: String,
    pub file: File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub orig_img_name: String,
    pub img_name: String,
    pub img_url: String,
}

impl FileService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a stored file name to its location under the image directory.
    pub fn full_path(&self, stored_name: &str) -> Result<PathBuf, FileError> {
        validate_name(stored_name)?;
        Ok(self.root.join(stored_name))
    }

    pub async fn open(&self, stored_name: &str) -> AppResult<ImageResource> {
        let path = self.full_path(stored_name)?;
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(AppError::NotFound),
            Err(err) => return Err(err.into()),
        };
        let content_type = mime_guess::from_path(&path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();

        Ok(ImageResource {
            path,
            content_type,
            file,
        })
    }

    /// Writes `bytes` under a fresh `<uuid>.<ext>` name, keeping the original extension.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> AppResult<StoredImage> {
        let orig_img_name = Path::new(original_name)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(FileError::Empty)?
            .to_string();
        let extension = image_extension(&orig_img_name)?;
        let img_name = format!("{}.{extension}", Uuid::new_v4());

        fs::create_dir_all(&self.root).await?;
        fs::write(self.root.join(&img_name), bytes).await?;
        tracing::debug!(orig = %orig_img_name, stored = %img_name, "image stored");

        Ok(StoredImage {
            orig_img_name,
            img_url: format!("{IMAGE_URL_PREFIX}{img_name}"),
            img_name,
        })
    }

    /// Deletes a stored image. A file that is already gone is not an error.
    pub async fn remove(&self, stored_name: &str) -> AppResult<()> {
        let path = self.full_path(stored_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn validate_name(name: &str) -> Result<(), FileError> {
    if name.trim().is_empty() {
        return Err(FileError::Empty);
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(FileError::Traversal(name.to_string()));
    }
    if name.chars().any(char::is_control) {
        return Err(FileError::InvalidCharacter(name.escape_default().to_string()));
    }
    Ok(())
}

fn image_extension(name: &str) -> Result<String, FileError> {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| FileError::UnsupportedExtension(name.to_string()))?;
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(FileError::UnsupportedExtension(name.to_string()));
    }
    Ok(extension)
}
