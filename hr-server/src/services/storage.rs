//! File storage service
//!
//! Stores uploaded document files and profile photos under the work
//! directory and releases them when their metadata rows go away. Documents
//! are stored as-is under a generated name; photos are recompressed to JPEG.

use std::fs;
use std::path::PathBuf;

use image::DynamicImage;
use uuid::Uuid;

use crate::core::Config;
use crate::utils::AppError;
use shared::error::ErrorCode;

/// Maximum document size (10MB)
pub const MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024;

/// Maximum photo size (5MB)
pub const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024;

/// Accepted document extensions
const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "txt", "png", "jpg", "jpeg",
];

/// Accepted photo formats
const PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for profile photos (85% keeps faces sharp at sane sizes)
const JPEG_QUALITY: u8 = 85;

/// File storage under `work_dir/uploads/`
#[derive(Debug, Clone)]
pub struct FileStorage {
    documents_dir: PathBuf,
    photos_dir: PathBuf,
}

impl FileStorage {
    pub fn new(config: &Config) -> Self {
        Self {
            documents_dir: config.documents_dir(),
            photos_dir: config.photos_dir(),
        }
    }

    // ── Documents ───────────────────────────────────────────────────

    /// Validate and store a document upload. Returns the generated stored
    /// file name (`<uuid>.<ext>`).
    pub fn store_document(&self, original_name: &str, data: &[u8]) -> Result<String, AppError> {
        if data.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyFile));
        }
        if data.len() > MAX_DOCUMENT_SIZE {
            return Err(AppError::with_message(
                ErrorCode::FileTooLarge,
                format!("File exceeds {}MB limit", MAX_DOCUMENT_SIZE / 1024 / 1024),
            ));
        }

        let ext = file_extension(original_name)?;
        if !DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!(
                    "Unsupported file format '{}'. Supported: {}",
                    ext,
                    DOCUMENT_EXTENSIONS.join(", ")
                ),
            ));
        }

        fs::create_dir_all(&self.documents_dir)
            .map_err(|e| storage_error(format!("Failed to create documents directory: {e}")))?;

        let stored_file = format!("{}.{}", Uuid::new_v4(), ext);
        let path = self.documents_dir.join(&stored_file);
        fs::write(&path, data)
            .map_err(|e| storage_error(format!("Failed to save file: {e}")))?;

        tracing::info!(
            original_name = %original_name,
            stored_file = %stored_file,
            size = data.len(),
            "Document stored"
        );
        Ok(stored_file)
    }

    /// Absolute path of a stored document.
    pub fn document_path(&self, stored_file: &str) -> Result<PathBuf, AppError> {
        check_stored_name(stored_file)?;
        Ok(self.documents_dir.join(stored_file))
    }

    /// Best-effort removal of a stored document file.
    pub fn delete_document(&self, stored_file: &str) {
        delete_stored(&self.documents_dir, stored_file);
    }

    // ── Photos ──────────────────────────────────────────────────────

    /// Validate, recompress and store a profile photo. Returns the
    /// generated stored file name (`<uuid>.jpg`).
    pub fn store_photo(&self, original_name: &str, data: &[u8]) -> Result<String, AppError> {
        if data.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyFile));
        }
        if data.len() > MAX_PHOTO_SIZE {
            return Err(AppError::with_message(
                ErrorCode::FileTooLarge,
                format!("Photo exceeds {}MB limit", MAX_PHOTO_SIZE / 1024 / 1024),
            ));
        }

        let ext = file_extension(original_name)?;
        if !PHOTO_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!(
                    "Unsupported photo format '{}'. Supported: {}",
                    ext,
                    PHOTO_EXTENSIONS.join(", ")
                ),
            ));
        }

        let compressed = compress_to_jpeg(data)?;

        fs::create_dir_all(&self.photos_dir)
            .map_err(|e| storage_error(format!("Failed to create photos directory: {e}")))?;

        let stored_file = format!("{}.jpg", Uuid::new_v4());
        let path = self.photos_dir.join(&stored_file);
        fs::write(&path, &compressed)
            .map_err(|e| storage_error(format!("Failed to save photo: {e}")))?;

        tracing::info!(
            original_name = %original_name,
            stored_file = %stored_file,
            size = compressed.len(),
            "Profile photo stored"
        );
        Ok(stored_file)
    }

    /// Absolute path of a stored photo.
    pub fn photo_path(&self, stored_file: &str) -> Result<PathBuf, AppError> {
        check_stored_name(stored_file)?;
        Ok(self.photos_dir.join(stored_file))
    }

    /// Best-effort removal of a stored photo file.
    pub fn delete_photo(&self, stored_file: &str) {
        delete_stored(&self.photos_dir, stored_file);
    }
}

/// Load an image and re-encode it as JPEG at the configured quality.
fn compress_to_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img: DynamicImage = image::load_from_memory(data)
        .map_err(|e| AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = std::io::Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img.write_with_encoder(encoder).map_err(|e| {
            AppError::with_message(
                ErrorCode::ImageProcessingFailed,
                format!("Failed to compress image: {e}"),
            )
        })?;
    }
    Ok(buffer)
}

fn storage_error(message: impl Into<String>) -> AppError {
    AppError::with_message(ErrorCode::FileStorageFailed, message)
}

fn file_extension(name: &str) -> Result<String, AppError> {
    PathBuf::from(name)
        .extension()
        .and_then(|ext| ext.to_str().map(|s| s.to_lowercase()))
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidFileExtension,
                format!("Invalid file extension for: {name}"),
            )
        })
}

/// Stored names are generated by us; reject anything path-like.
fn check_stored_name(stored_file: &str) -> Result<(), AppError> {
    if stored_file.is_empty()
        || stored_file.contains('/')
        || stored_file.contains('\\')
        || stored_file.contains("..")
    {
        return Err(AppError::with_message(
            ErrorCode::InvalidRequest,
            "Invalid file reference",
        ));
    }
    Ok(())
}

fn delete_stored(dir: &std::path::Path, stored_file: &str) {
    if check_stored_name(stored_file).is_err() {
        tracing::warn!(stored_file = %stored_file, "Refusing to delete suspicious file reference");
        return;
    }
    let path = dir.join(stored_file);
    if let Err(e) = fs::remove_file(&path) {
        // Missing files are fine: deletion is best-effort and may race
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to delete stored file");
        }
    }
}
