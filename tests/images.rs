use std::path::PathBuf;

use bookstore::{
    error::AppError,
    services::{
        catalog_service,
        file_service::{FileError, FileService, IMAGE_URL_PREFIX},
    },
};
use tokio::io::AsyncReadExt;
use uuid::Uuid;

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("bookstore-images-{}", Uuid::new_v4()))
}

#[test]
fn full_path_joins_the_storage_root() -> anyhow::Result<()> {
    let files = FileService::new("/srv/uploads");
    assert_eq!(
        files.full_path("8f1c.png")?,
        PathBuf::from("/srv/uploads/8f1c.png")
    );
    Ok(())
}

#[test]
fn malformed_names_are_rejected() {
    let files = FileService::new("/srv/uploads");

    assert_eq!(files.full_path(""), Err(FileError::Empty));
    assert_eq!(files.full_path("  "), Err(FileError::Empty));
    assert_eq!(
        files.full_path(".."),
        Err(FileError::Traversal("..".into()))
    );
    assert_eq!(
        files.full_path("../secret.png"),
        Err(FileError::Traversal("../secret.png".into()))
    );
    assert_eq!(
        files.full_path("dir\\a.png"),
        Err(FileError::Traversal("dir\\a.png".into()))
    );
    assert!(matches!(
        files.full_path("a\0.png"),
        Err(FileError::InvalidCharacter(_))
    ));
}

#[tokio::test]
async fn download_streams_the_stored_bytes() -> anyhow::Result<()> {
    let dir = scratch_dir();
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join("cover.png"), b"not really a png").await?;
    let files = FileService::new(&dir);

    let mut resource = catalog_service::download_image(&files, "cover.png").await?;
    let mut body = Vec::new();
    resource.file.read_to_end(&mut body).await?;

    assert_eq!(body, b"not really a png");
    assert_eq!(resource.content_type, "image/png");
    assert_eq!(resource.path, dir.join("cover.png"));

    tokio::fs::remove_dir_all(&dir).await?;
    Ok(())
}

#[tokio::test]
async fn download_of_missing_file_is_not_found() {
    let files = FileService::new(scratch_dir());
    let result = catalog_service::download_image(&files, "nope.png").await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn download_of_malformed_name_is_descriptive() {
    let files = FileService::new(scratch_dir());
    let err = catalog_service::download_image(&files, "../x.png")
        .await
        .expect_err("traversal");

    assert!(matches!(err, AppError::ImagePath(FileError::Traversal(_))));
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    assert!(err.to_string().contains("../x.png"));
}

#[tokio::test]
async fn store_keeps_extension_and_remove_is_idempotent() -> anyhow::Result<()> {
    let dir = scratch_dir();
    let files = FileService::new(&dir);

    let stored = files.store("Cover.JPG", b"jpeg bytes").await?;
    assert_eq!(stored.orig_img_name, "Cover.JPG");
    assert!(stored.img_name.ends_with(".jpg"));
    assert_eq!(stored.img_url, format!("{IMAGE_URL_PREFIX}{}", stored.img_name));
    assert_eq!(tokio::fs::read(dir.join(&stored.img_name)).await?, b"jpeg bytes");

    files.remove(&stored.img_name).await?;
    files.remove(&stored.img_name).await?;
    assert!(!dir.join(&stored.img_name).exists());

    tokio::fs::remove_dir_all(&dir).await?;
    Ok(())
}

#[tokio::test]
async fn store_rejects_non_images() {
    let files = FileService::new(scratch_dir());
    let result = files.store("notes.txt", b"hello").await;
    assert!(matches!(
        result,
        Err(AppError::ImagePath(FileError::UnsupportedExtension(_)))
    ));
}
